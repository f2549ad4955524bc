// Application event loop for one test session.
//
// Owns the TestSession and the API client. Socket events and user commands
// arrive on channels; everything the terminal needs goes out as UiUpdate.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use schoolhub_api::ApiClient;
use schoolhub_core::db::Database;
use schoolhub_core::models::Role;
use schoolhub_core::protocol::{
    ClientMessage, ConnectionStatus, ServerMessage, SessionPhase, UiUpdate, UserCommand,
};
use schoolhub_core::ws_client::WsEvent;

use crate::session::{SessionEvent, SubmitCheck, TestSession};
use crate::sync;

pub struct AppState {
    pub api: ApiClient,
    pub session: TestSession,
    pub connection_status: ConnectionStatus,
    ws_tx: mpsc::Sender<ClientMessage>,
    /// A partial submit is waiting for the student's confirmation.
    awaiting_confirmation: bool,
    /// `submit_test` was sent and neither an acknowledgement nor an error
    /// has come back yet.
    submit_in_flight: bool,
    /// Draft store; `None` when autosave is off.
    drafts: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(api: ApiClient, session: TestSession, ws_tx: mpsc::Sender<ClientMessage>) -> Self {
        AppState {
            api,
            session,
            connection_status: ConnectionStatus::Disconnected,
            ws_tx,
            awaiting_confirmation: false,
            submit_in_flight: false,
            drafts: None,
        }
    }

    /// Autosave answers of the active test into `db`.
    pub fn with_drafts(mut self, db: Arc<Database>) -> Self {
        self.drafts = Some(db);
        self
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn is_submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    async fn mark_disconnected(&mut self, ui_tx: &mpsc::Sender<UiUpdate>) {
        self.connection_status = ConnectionStatus::Disconnected;
        self.submit_in_flight = false;
        let _ = ui_tx
            .send(UiUpdate::ConnectionStatus(ConnectionStatus::Disconnected))
            .await;
        let _ = ui_tx.send(UiUpdate::Alert(SOCKET_CLOSED.into())).await;
    }

    async fn push_snapshot(&self, ui_tx: &mpsc::Sender<UiUpdate>) {
        let view = self.session.view(Utc::now());
        let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(view))).await;
    }

    async fn send_socket(&self, msg: ClientMessage) -> bool {
        if self.ws_tx.send(msg).await.is_err() {
            warn!("Socket writer is gone; message dropped");
            return false;
        }
        true
    }

    fn save_drafts(&self) {
        if self.session.phase() != SessionPhase::Active {
            return;
        }
        if let Some(db) = &self.drafts {
            if let Err(e) = db.save_drafts(self.session.test_id(), self.session.answers()) {
                warn!("Failed to save answer drafts: {e}");
            }
        }
    }

    fn restore_drafts(&mut self) -> usize {
        let Some(db) = &self.drafts else {
            return 0;
        };
        match db.load_drafts(self.session.test_id()) {
            Ok(drafts) => self.session.restore_drafts(&drafts),
            Err(e) => {
                warn!("Failed to load answer drafts: {e}");
                0
            }
        }
    }

    fn clear_drafts(&self) {
        if let Some(db) = &self.drafts {
            if let Err(e) = db.clear_drafts(self.session.test_id()) {
                warn!("Failed to clear answer drafts: {e}");
            }
        }
    }
}

const SOCKET_CLOSED: &str = "Connection to the test server closed";
const NOT_CONNECTED: &str = "Not connected to the test server";

/// What the loop should do after handling one event.
enum Flow {
    Continue,
    Exit,
}

/// Run the application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. WebSocket events from the backend
/// 2. User commands from the TUI
///
/// Exits on `Quit`, when the command channel closes, or after the server
/// acknowledged the submission (the UI receives `NavigateAway` first).
/// A closed socket only marks the session disconnected; REST commands such
/// as editing a submitted test keep working.
pub async fn run(
    mut ws_rx: mpsc::Receiver<WsEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Session event loop started for test {}", state.session.test_id());
    state.push_snapshot(&ui_tx).await;
    let mut socket_open = true;

    loop {
        let flow = tokio::select! {
            ws_event = ws_rx.recv(), if socket_open => {
                match ws_event {
                    Some(WsEvent::Connected { url }) => {
                        info!("Connected to {url}");
                        state.connection_status = ConnectionStatus::Connected;
                        let _ = ui_tx.send(UiUpdate::ConnectionStatus(ConnectionStatus::Connected)).await;
                        Flow::Continue
                    }
                    Some(WsEvent::Disconnected) => {
                        warn!("Test server disconnected");
                        state.mark_disconnected(&ui_tx).await;
                        Flow::Continue
                    }
                    Some(WsEvent::Message(json)) => handle_ws_message(&mut state, &json, &ui_tx).await,
                    None => {
                        info!("WebSocket channel closed; continuing without the socket");
                        socket_open = false;
                        if state.connection_status == ConnectionStatus::Connected {
                            state.mark_disconnected(&ui_tx).await;
                        }
                        Flow::Continue
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        Flow::Exit
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                        Flow::Continue
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        Flow::Exit
                    }
                }
            }
        };

        if let Flow::Exit = flow {
            break;
        }
    }

    info!("Session event loop exiting");
    Ok(())
}

async fn handle_ws_message(state: &mut AppState, json: &str, ui_tx: &mpsc::Sender<UiUpdate>) -> Flow {
    let msg: ServerMessage = match serde_json::from_str(json) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse server message: {e}");
            return Flow::Continue;
        }
    };

    match state.session.handle_server(&msg) {
        Some(SessionEvent::Started) => {
            let restored = state.restore_drafts();
            if restored > 0 {
                info!("Restored {restored} draft answer(s)");
                let _ = ui_tx
                    .send(UiUpdate::Notice(format!("Restored {restored} saved answer(s)")))
                    .await;
            }
            state.push_snapshot(ui_tx).await;
            Flow::Continue
        }
        Some(SessionEvent::NavigateAway) => {
            state.clear_drafts();
            state.awaiting_confirmation = false;
            state.submit_in_flight = false;
            let _ = ui_tx.send(UiUpdate::NavigateAway).await;
            Flow::Exit
        }
        Some(SessionEvent::ShowError(message)) => {
            state.submit_in_flight = false;
            let _ = ui_tx.send(UiUpdate::Alert(message)).await;
            Flow::Continue
        }
        None => Flow::Continue,
    }
}

async fn handle_user_command(state: &mut AppState, cmd: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
    let now = Utc::now();
    match cmd {
        UserCommand::StartTest => {
            let token = match state.api.token(Role::Student) {
                Ok(t) => t,
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::Alert(e.user_message())).await;
                    return;
                }
            };
            match state.session.start_message(&token) {
                Ok(msg) => {
                    info!("Requesting start of test {}", state.session.test_id());
                    if !state.send_socket(msg).await {
                        let _ = ui_tx.send(UiUpdate::Alert(NOT_CONNECTED.into())).await;
                    }
                }
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::Alert(e.to_string())).await;
                }
            }
        }
        UserCommand::SetAnswer {
            question_id,
            answer,
        } => match state.session.set_answer(&question_id, &answer, now) {
            Ok(()) => {
                state.save_drafts();
                state.push_snapshot(ui_tx).await;
            }
            Err(e) => {
                let _ = ui_tx.send(UiUpdate::Alert(e.to_string())).await;
            }
        },
        UserCommand::SelectFile { question_id, path } => {
            let path = PathBuf::from(path);
            match state.session.select_file(&question_id, &path, now) {
                Ok(()) => state.push_snapshot(ui_tx).await,
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::Alert(e.to_string())).await;
                }
            }
        }
        UserCommand::Submit if state.submit_in_flight => {
            debug!("Submit ignored; waiting for the server to answer the last one");
            let _ = ui_tx
                .send(UiUpdate::Alert(
                    "Answers already sent; waiting for the server".into(),
                ))
                .await;
        }
        UserCommand::Submit => match state.session.submit_check() {
            SubmitCheck::NeedsConfirmation { unanswered } => {
                debug!("{unanswered} question(s) unanswered; asking for confirmation");
                state.awaiting_confirmation = true;
                let _ = ui_tx.send(UiUpdate::ConfirmPartialSubmit { unanswered }).await;
            }
            SubmitCheck::Ready => submit(state, ui_tx).await,
        },
        UserCommand::ConfirmSubmit => {
            if state.awaiting_confirmation && !state.submit_in_flight {
                state.awaiting_confirmation = false;
                submit(state, ui_tx).await;
            }
        }
        UserCommand::CancelSubmit => {
            state.awaiting_confirmation = false;
        }
        UserCommand::ToggleEdit => match state.session.toggle_edit(now) {
            Ok(editing) => {
                info!("Edit mode {}", if editing { "on" } else { "off" });
                state.push_snapshot(ui_tx).await;
            }
            Err(e) => {
                let _ = ui_tx.send(UiUpdate::Alert(e.to_string())).await;
            }
        },
        UserCommand::SaveEdits => {
            if !state.session.can_edit_at(now) || state.session.phase() != SessionPhase::Submitted {
                let _ = ui_tx
                    .send(UiUpdate::Alert("Answers can no longer be edited".into()))
                    .await;
                return;
            }
            match sync::save_edits(&mut state.session, &state.api).await {
                Ok(0) => {
                    let _ = ui_tx.send(UiUpdate::Notice("No changes to save".into())).await;
                }
                Ok(n) => {
                    let _ = ui_tx
                        .send(UiUpdate::Notice(format!("{n} answer(s) updated")))
                        .await;
                }
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::Alert(e.user_message())).await;
                }
            }
            state.push_snapshot(ui_tx).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Upload pending files, then send the collected answers over the socket.
/// Any upload failure aborts before `submit_test` is sent.
async fn submit(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let token = match state.api.token(Role::Student) {
        Ok(t) => t,
        Err(e) => {
            let _ = ui_tx.send(UiUpdate::Alert(e.user_message())).await;
            return;
        }
    };

    if let Err(e) = sync::upload_pending(&mut state.session, &state.api).await {
        let _ = ui_tx
            .send(UiUpdate::Alert(format!("File upload failed: {}", e.user_message())))
            .await;
        state.push_snapshot(ui_tx).await;
        return;
    }

    match state.session.submit_message(&token) {
        Ok(msg) => {
            info!(
                "Submitting {} answer(s) for test {}",
                state.session.answers().len(),
                state.session.test_id()
            );
            if state.send_socket(msg).await {
                state.submit_in_flight = true;
            } else {
                let _ = ui_tx.send(UiUpdate::Alert(NOT_CONNECTED.into())).await;
            }
        }
        Err(e) => {
            let _ = ui_tx.send(UiUpdate::Alert(e.to_string())).await;
        }
    }
    state.push_snapshot(ui_tx).await;
}
