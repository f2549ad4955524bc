// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// loop, or into local ViewState changes (selection, the input line,
// dismissing dialogs).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use schoolhub_core::models::QuestionKind;
use schoolhub_core::protocol::{SessionPhase, UserCommand};

use super::{choice_options, InputMode, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Ignore Release/Repeat so Windows does not double-process keys.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.alert.is_some() {
        if matches!(
            key_event.code,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
        ) {
            view_state.alert = None;
        }
        return None;
    }

    if view_state.confirm_submit.is_some() {
        return handle_confirm_submit(key_event, view_state);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.input_mode != InputMode::Normal {
        return handle_input_line(key_event, view_state);
    }

    handle_normal(key_event, view_state)
}

fn handle_normal(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let phase = view_state.phase();
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_state.questions().len().saturating_sub(1);
            view_state.selected = (view_state.selected + 1).min(last);
            None
        }

        KeyCode::Char('s') if phase == Some(SessionPhase::Preview) => Some(UserCommand::StartTest),
        KeyCode::Char('u') if phase == Some(SessionPhase::Active) => Some(UserCommand::Submit),
        KeyCode::Char('e') if phase == Some(SessionPhase::Submitted) => {
            Some(UserCommand::ToggleEdit)
        }
        KeyCode::Char('w') if phase == Some(SessionPhase::Submitted) && view_state.editable() => {
            Some(UserCommand::SaveEdits)
        }

        KeyCode::Enter => {
            open_input(view_state);
            None
        }
        KeyCode::Char(c @ '1'..='9') => choose_option(view_state, c),
        KeyCode::Delete => clear_answer(view_state),

        KeyCode::Esc => {
            view_state.notice = None;
            None
        }

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Start typing an answer (or a file path) for the selected question.
/// Choice questions are answered with the number keys instead.
fn open_input(view_state: &mut ViewState) {
    if !view_state.editable() {
        return;
    }
    let Some(question) = view_state.selected_question() else {
        return;
    };
    let (mode, initial) = match question.kind {
        QuestionKind::File => (
            InputMode::FilePath,
            question.pending_file.clone().unwrap_or_default(),
        ),
        QuestionKind::ShortAnswer | QuestionKind::Essay => (
            InputMode::Answer,
            question.answer.clone().unwrap_or_default(),
        ),
        QuestionKind::MultipleChoice | QuestionKind::TrueFalse => return,
    };
    view_state.input_mode = mode;
    view_state.input_buffer = initial;
}

fn choose_option(view_state: &mut ViewState, digit: char) -> Option<UserCommand> {
    if !view_state.editable() {
        return None;
    }
    let question = view_state.selected_question()?;
    let index = digit.to_digit(10)? as usize;
    let option = choice_options(question).into_iter().nth(index.checked_sub(1)?)?;
    Some(UserCommand::SetAnswer {
        question_id: question.id.clone(),
        answer: option,
    })
}

fn clear_answer(view_state: &mut ViewState) -> Option<UserCommand> {
    if !view_state.editable() {
        return None;
    }
    let question = view_state.selected_question()?;
    if question.kind.is_file() || question.answer.is_none() {
        return None;
    }
    Some(UserCommand::SetAnswer {
        question_id: question.id.clone(),
        answer: String::new(),
    })
}

/// Keys while the input line is open: printable characters edit the
/// buffer, Enter sends it, Esc discards it.
fn handle_input_line(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.input_buffer.clear();
            None
        }
        KeyCode::Enter => {
            let mode = view_state.input_mode;
            view_state.input_mode = InputMode::Normal;
            let value = std::mem::take(&mut view_state.input_buffer);
            let question_id = view_state.selected_question()?.id.clone();
            match mode {
                InputMode::Answer => Some(UserCommand::SetAnswer {
                    question_id,
                    answer: value,
                }),
                InputMode::FilePath => {
                    let path = value.trim().to_string();
                    if path.is_empty() {
                        return None;
                    }
                    Some(UserCommand::SelectFile { question_id, path })
                }
                InputMode::Normal => None,
            }
        }
        KeyCode::Backspace => {
            view_state.input_buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.input_buffer.push(c);
            None
        }
        _ => None,
    }
}

fn handle_confirm_submit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm_submit = None;
            Some(UserCommand::ConfirmSubmit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_submit = None;
            Some(UserCommand::CancelSubmit)
        }
        _ => None,
    }
}

fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}
