// Terminal front-end for a test session.
//
// The TUI owns a `ViewState` that mirrors the latest session snapshot. The
// app loop pushes `UiUpdate` messages over an mpsc channel; the TUI applies
// them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use schoolhub_core::models::QuestionKind;
use schoolhub_core::protocol::{
    ConnectionStatus, QuestionView, SessionPhase, SessionSnapshot, UiUpdate, UserCommand,
};

use layout::{build_layout, AppLayout};

/// What the answer input line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Free-text answer for the selected question.
    Answer,
    /// Local path of a file for the selected file question.
    FilePath,
}

/// How the TUI loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    /// The server acknowledged the submission.
    Submitted,
}

pub struct ViewState {
    pub session: Option<SessionSnapshot>,
    pub connection_status: ConnectionStatus,
    /// Index of the highlighted question.
    pub selected: usize,
    pub input_mode: InputMode,
    pub input_buffer: String,
    /// Blocking message; must be dismissed.
    pub alert: Option<String>,
    /// Status-bar message; replaced by the next one.
    pub notice: Option<String>,
    /// Pending partial-submit confirmation with the unanswered count.
    pub confirm_submit: Option<usize>,
    pub confirm_quit: bool,
    pub finished: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            session: None,
            connection_status: ConnectionStatus::Disconnected,
            selected: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            alert: None,
            notice: None,
            confirm_submit: None,
            confirm_quit: false,
            finished: false,
        }
    }
}

impl ViewState {
    pub fn phase(&self) -> Option<SessionPhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn questions(&self) -> &[QuestionView] {
        self.session
            .as_ref()
            .map(|s| s.questions.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_question(&self) -> Option<&QuestionView> {
        self.questions().get(self.selected)
    }

    pub fn editable(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.editable)
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        let last = snapshot.questions.len().saturating_sub(1);
        self.selected = self.selected.min(last);
        if !snapshot.editable {
            self.input_mode = InputMode::Normal;
            self.input_buffer.clear();
        }
        self.session = Some(snapshot);
    }
}

/// Answer choices offered for a question, in display order. True/false
/// questions without explicit options get `true` and `false`.
pub fn choice_options(question: &QuestionView) -> Vec<String> {
    match question.kind {
        QuestionKind::MultipleChoice => question.options.clone(),
        QuestionKind::TrueFalse if question.options.is_empty() => {
            vec!["true".to_string(), "false".to_string()]
        }
        QuestionKind::TrueFalse => question.options.clone(),
        QuestionKind::ShortAnswer | QuestionKind::Essay | QuestionKind::File => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::ConnectionStatus(status) => {
            state.connection_status = status;
        }
        UiUpdate::Alert(message) => {
            state.alert = Some(message);
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
        UiUpdate::ConfirmPartialSubmit { unanswered } => {
            state.confirm_submit = Some(unanswered);
        }
        UiUpdate::NavigateAway => {
            state.finished = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::header::render(frame, layout.header, state);
    widgets::question_list::render(frame, layout.questions, state);
    widgets::answer_panel::render(frame, layout.answer_panel, state);
    render_help_bar(frame, &layout, state);

    if let Some(unanswered) = state.confirm_submit {
        widgets::dialog::render_confirm(
            frame,
            frame.area(),
            " Submit? ",
            &format!("{unanswered} question(s) unanswered. Submit anyway?"),
        );
    } else if state.confirm_quit {
        widgets::dialog::render_confirm(frame, frame.area(), " Quit? ", "Really quit?");
    }
    if let Some(alert) = &state.alert {
        widgets::dialog::render_alert(frame, frame.area(), alert);
    }
}

/// Key hints for the current phase and mode.
pub fn help_text(state: &ViewState) -> &'static str {
    match (state.input_mode, state.phase()) {
        (InputMode::Answer, _) | (InputMode::FilePath, _) => " Enter:Save | Esc:Cancel",
        (_, None) => " q:Quit",
        (_, Some(SessionPhase::Preview)) => " s:Start test | q:Quit",
        (_, Some(SessionPhase::Active)) => {
            " j/k:Move | Enter:Answer | 1-9:Choose | Del:Clear | u:Submit | q:Quit"
        }
        (_, Some(SessionPhase::Submitted)) if state.editable() => {
            " j/k:Move | Enter:Answer | 1-9:Choose | w:Save edits | e:Discard edits | q:Quit"
        }
        (_, Some(SessionPhase::Submitted)) => " j/k:Move | e:Edit answers | q:Quit",
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        help_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits, the server acknowledges
/// the submission, or the app loop goes away.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<SessionEnd> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let end = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                        if view_state.finished {
                            break SessionEnd::Submitted;
                        }
                    }
                    // App loop is gone
                    None => break SessionEnd::Quit,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break SessionEnd::Quit;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break SessionEnd::Quit,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    };

    ratatui::restore();
    Ok(end)
}
