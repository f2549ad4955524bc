// Question list widget: one row per question with an answered marker.
//
// Each row: "{marker} {n}. {text}" where the marker is ✓ for answered,
// ↑ for a file waiting to upload and · otherwise.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use schoolhub_core::protocol::{QuestionView, SessionPhase};

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Questions");

    if state.phase() == Some(SessionPhase::Preview) {
        let total = state.session.as_ref().map(|s| s.total).unwrap_or(0);
        let paragraph = Paragraph::new(format!("  {total} question(s), hidden until start."))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let (marker, color) = marker(q);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(color)),
                Span::raw(format!("{}. {}", i + 1, q.text)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !state.questions().is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn marker(question: &QuestionView) -> (&'static str, Color) {
    if question.pending_file.is_some() {
        ("↑", Color::Yellow)
    } else if question.answer.is_some() {
        ("✓", Color::Green)
    } else {
        ("·", Color::DarkGray)
    }
}
