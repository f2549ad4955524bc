// Message types: the test-session WebSocket contract with the backend, and
// the internal channels between the app loop and the terminal UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AnswerEntry, QuestionKind};

// ---------------------------------------------------------------------------
// WebSocket: client -> server
// ---------------------------------------------------------------------------

/// Session-control messages sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    StartTest { test_id: String, token: String },
    #[serde(rename_all = "camelCase")]
    SubmitTest {
        test_id: String,
        answer_data: Vec<AnswerEntry>,
        token: String,
    },
}

// ---------------------------------------------------------------------------
// WebSocket: server -> client
// ---------------------------------------------------------------------------

/// Events pushed by the backend over the test-session socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    TestStarted { test_id: String },
    #[serde(rename_all = "camelCase")]
    AnswerSubmitted { test_id: String, is_submitted: bool },
    Error { message: String },
    /// Any message type this client does not understand.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// App <-> UI
// ---------------------------------------------------------------------------

/// Socket connection state shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Phase of a student's test session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Metadata loaded; questions withheld until the server confirms start.
    Preview,
    /// Server confirmed start; answers are editable.
    Active,
    /// Answers accepted by the server (or found submitted at load).
    Submitted,
}

/// One question row as the UI renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub answer: Option<String>,
    /// File chosen locally but not yet uploaded.
    pub pending_file: Option<String>,
}

/// Everything the UI needs to draw the session in one shot.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub test_id: String,
    pub title: String,
    pub description: Option<String>,
    pub phase: SessionPhase,
    pub editing: bool,
    /// Whether answers can currently be changed (active, or submitted,
    /// editing and before the close date).
    pub editable: bool,
    pub close_date: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionView>,
    pub answered: usize,
    pub total: usize,
}

/// Updates pushed from the app loop to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<SessionSnapshot>),
    ConnectionStatus(ConnectionStatus),
    /// Blocking notice for the user (network failures, server errors).
    Alert(String),
    /// Non-blocking status text (e.g. "2 answers updated").
    Notice(String),
    /// Submit was requested with unanswered questions; ask before sending.
    ConfirmPartialSubmit { unanswered: usize },
    /// The session is over; leave the test page.
    NavigateAway,
}

/// Commands sent from the UI to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    StartTest,
    SetAnswer { question_id: String, answer: String },
    SelectFile { question_id: String, path: String },
    Submit,
    ConfirmSubmit,
    CancelSubmit,
    ToggleEdit,
    SaveEdits,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_test_wire_shape() {
        let msg = ClientMessage::StartTest {
            test_id: "t1".into(),
            token: "tok".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "start_test", "testId": "t1", "token": "tok"})
        );
    }

    #[test]
    fn submit_test_wire_shape() {
        let msg = ClientMessage::SubmitTest {
            test_id: "t1".into(),
            answer_data: vec![AnswerEntry::new("q1", "4")],
            token: "tok".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "submit_test");
        assert_eq!(json["answerData"][0]["questionId"], "q1");
        assert_eq!(json["token"], "tok");
    }

    #[test]
    fn parses_server_events() {
        let started: ServerMessage =
            serde_json::from_str(r#"{"type":"test_started","testId":"t1"}"#).unwrap();
        assert_eq!(
            started,
            ServerMessage::TestStarted {
                test_id: "t1".into()
            }
        );

        let submitted: ServerMessage = serde_json::from_str(
            r#"{"type":"answer_submitted","testId":"t1","isSubmitted":true}"#,
        )
        .unwrap();
        assert_eq!(
            submitted,
            ServerMessage::AnswerSubmitted {
                test_id: "t1".into(),
                is_submitted: true
            }
        );

        let error: ServerMessage =
            serde_json::from_str(r#"{"type":"error","message":"Test is closed"}"#).unwrap();
        assert_eq!(
            error,
            ServerMessage::Error {
                message: "Test is closed".into()
            }
        );
    }

    #[test]
    fn unknown_server_event_type_is_tolerated() {
        let msg: ServerMessage =
            serde_json::from_str(r#"{"type":"grading_progress","percent":40}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
    }
}
