// TUI widget modules for each dashboard panel.

pub mod answer_panel;
pub mod dialog;
pub mod header;
pub mod question_list;
pub mod status_bar;
