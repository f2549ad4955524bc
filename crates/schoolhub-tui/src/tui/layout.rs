// Screen layout for the test-session dashboard.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Header: title, description, close date (4 rows)   |
// +-------------------------+------------------------+
// | Questions (40%)          | Answer Panel (60%)     |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub header: Rect,
    pub questions: Rect,
    pub answer_panel: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(4), // header
            Constraint::Min(6),    // questions + answer panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(vertical[2]);

    AppLayout {
        status_bar: vertical[0],
        header: vertical[1],
        questions: horizontal[0],
        answer_panel: horizontal[1],
        help_bar: vertical[3],
    }
}
