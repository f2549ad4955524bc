// Answer panel widget: the selected question, its choices and the current
// answer, plus the input line while typing.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use schoolhub_core::models::QuestionKind;
use schoolhub_core::protocol::SessionPhase;

use crate::tui::{choice_options, InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Answer");
    let paragraph = Paragraph::new(build_lines(state))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn build_lines(state: &ViewState) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);

    if state.phase() == Some(SessionPhase::Preview) {
        return vec![Line::from(Span::styled("Press s to start the test.", dim))];
    }
    let Some(question) = state.selected_question() else {
        return vec![Line::from(Span::styled("No questions.", dim))];
    };

    let mut lines = vec![
        Line::from(Span::styled(
            question.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("({})", kind_label(question.kind)), dim)),
        Line::from(""),
    ];

    for (i, option) in choice_options(question).iter().enumerate() {
        let chosen = question.answer.as_deref() == Some(option.as_str());
        let style = if chosen {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mark = if chosen { "(x)" } else { "( )" };
        lines.push(Line::from(Span::styled(
            format!("{} {mark} {option}", i + 1),
            style,
        )));
    }

    if !matches!(
        question.kind,
        QuestionKind::MultipleChoice | QuestionKind::TrueFalse
    ) {
        let current = question.answer.as_deref().unwrap_or("(no answer)");
        lines.push(Line::from(vec![
            Span::styled("Answer: ", dim),
            Span::raw(current.to_string()),
        ]));
    }

    if let Some(pending) = &question.pending_file {
        lines.push(Line::from(Span::styled(
            format!("Selected file: {pending} (uploads on submit)"),
            Style::default().fg(Color::Yellow),
        )));
    }

    match state.input_mode {
        InputMode::Normal => {}
        InputMode::Answer | InputMode::FilePath => {
            let prompt = if state.input_mode == InputMode::FilePath {
                "File path: "
            } else {
                "> "
            };
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(prompt, Style::default().fg(Color::Cyan)),
                Span::raw(format!("{}_", state.input_buffer)),
            ]));
        }
    }

    lines
}

pub fn kind_label(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::MultipleChoice => "multiple choice",
        QuestionKind::TrueFalse => "true / false",
        QuestionKind::ShortAnswer => "short answer",
        QuestionKind::Essay => "essay",
        QuestionKind::File => "file upload",
    }
}
