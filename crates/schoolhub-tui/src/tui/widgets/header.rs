// Header widget: test title, description and the close date.

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(session) = &state.session else {
        let paragraph = Paragraph::new("  Loading test...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Test"));
        frame.render_widget(paragraph, area);
        return;
    };

    let (deadline, color) = deadline_text(session.close_date, Utc::now());
    let lines = vec![
        Line::from(Span::raw(
            session.description.clone().unwrap_or_default(),
        )),
        Line::from(Span::styled(deadline, Style::default().fg(color))),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default().borders(Borders::ALL).title(Span::styled(
            format!(" {} ", session.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    );
    frame.render_widget(paragraph, area);
}

/// Describe the close date relative to `now`.
pub fn deadline_text(close: Option<DateTime<Utc>>, now: DateTime<Utc>) -> (String, Color) {
    let Some(close) = close else {
        return ("No close date".to_string(), Color::DarkGray);
    };
    let stamp = close.format("%Y-%m-%d %H:%M UTC");
    if now >= close {
        return (format!("Closed {stamp}"), Color::Red);
    }
    let left = close - now;
    let remaining = if left.num_days() > 0 {
        format!("{}d {}h", left.num_days(), left.num_hours() % 24)
    } else if left.num_hours() > 0 {
        format!("{}h {}m", left.num_hours(), left.num_minutes() % 60)
    } else {
        format!("{}m", left.num_minutes().max(1))
    };
    let color = if left.num_hours() < 1 {
        Color::Yellow
    } else {
        Color::Green
    };
    (format!("Closes {stamp} ({remaining} left)"), color)
}
