// Status bar widget: connection, phase, progress and the latest notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use schoolhub_core::protocol::{ConnectionStatus, SessionPhase};

use crate::tui::ViewState;

/// Layout: [connection dot] [phase] [answered/total] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color) = connection_indicator(state.connection_status);
    spans.push(Span::styled(format!(" {dot} "), Style::default().fg(dot_color)));

    if let Some(session) = &state.session {
        spans.push(Span::styled(
            phase_label(session.phase, session.editing),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("Answered {}/{}", session.answered, session.total),
            Style::default().fg(Color::White),
        ));
    } else {
        spans.push(Span::styled("Loading", Style::default().fg(Color::Gray)));
    }

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Cyan)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn connection_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connected => ("●", Color::Green),
        ConnectionStatus::Disconnected => ("●", Color::Red),
    }
}

pub fn phase_label(phase: SessionPhase, editing: bool) -> &'static str {
    match (phase, editing) {
        (SessionPhase::Preview, _) => "Not started",
        (SessionPhase::Active, _) => "In progress",
        (SessionPhase::Submitted, true) => "Editing",
        (SessionPhase::Submitted, false) => "Submitted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::state_with;

    #[test]
    fn connection_indicator_colors() {
        assert_eq!(connection_indicator(ConnectionStatus::Connected).1, Color::Green);
        assert_eq!(connection_indicator(ConnectionStatus::Disconnected).1, Color::Red);
    }

    #[test]
    fn phase_labels() {
        assert_eq!(phase_label(SessionPhase::Preview, false), "Not started");
        assert_eq!(phase_label(SessionPhase::Active, false), "In progress");
        assert_eq!(phase_label(SessionPhase::Submitted, true), "Editing");
        assert_eq!(phase_label(SessionPhase::Submitted, false), "Submitted");
    }

    #[test]
    fn render_shows_progress_and_notice() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = state_with(SessionPhase::Active, true);
        state.notice = Some("Restored 2 saved answer(s)".into());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("Answered 1/4"));
        assert!(rendered.contains("Restored 2"));
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
