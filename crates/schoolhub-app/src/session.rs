// Test session: one student working through one test instance.
//
// The server is the authority on whether the test has started and whether
// the answer set was accepted; this type only tracks what the client has
// been told and guards local edits accordingly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use schoolhub_core::models::{Answer, AnswerEntry, Question, Test, TestDetail};
use schoolhub_core::protocol::{
    ClientMessage, QuestionView, ServerMessage, SessionPhase, SessionSnapshot,
};

use crate::error::SessionError;

/// What the caller should do after a server message was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The server confirmed the start of this test; questions may be shown.
    Started,
    /// The server accepted the submission; leave the test page.
    NavigateAway,
    /// The server reported an error; show it verbatim.
    ShowError(String),
}

/// Outcome of the pre-submit completeness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitCheck {
    Ready,
    /// Some questions have no answer; the student must confirm.
    NeedsConfirmation { unanswered: usize },
}

/// One change to a previously submitted answer.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerEdit {
    /// New value for a text or choice answer (JSON PUT).
    Text {
        answer_id: String,
        question_id: String,
        answer: String,
    },
    /// Replacement file for a file answer (multipart PUT).
    File {
        answer_id: String,
        question_id: String,
        path: PathBuf,
    },
}

impl AnswerEdit {
    pub fn question_id(&self) -> &str {
        match self {
            AnswerEdit::Text { question_id, .. } | AnswerEdit::File { question_id, .. } => {
                question_id
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestSession {
    test: Test,
    questions: Vec<Question>,
    phase: SessionPhase,
    editing: bool,
    /// Working answers in the order they were first given.
    answers: Vec<AnswerEntry>,
    /// Files chosen for file questions and not yet uploaded.
    pending_files: BTreeMap<String, PathBuf>,
    /// Answer rows as fetched at load; the diff baseline for edit mode.
    snapshot: Vec<Answer>,
    /// Set once the server acknowledged the submission.
    navigated: bool,
}

impl TestSession {
    /// Build a session from the student test detail fetch.
    ///
    /// A prior submission (`status == true`) starts in `Submitted` with the
    /// stored answers pre-populated; otherwise the session starts in
    /// `Preview` with no answers.
    pub fn from_detail(detail: TestDetail) -> Self {
        let TestDetail {
            test,
            questions,
            answers,
            status,
        } = detail;

        let (phase, working) = if status {
            let working = answers
                .iter()
                .map(|a| AnswerEntry::new(a.question_id.clone(), a.answer.clone()))
                .collect();
            (SessionPhase::Submitted, working)
        } else {
            (SessionPhase::Preview, Vec::new())
        };

        info!(
            "Loaded test {} ({} questions) in {:?}",
            test.id,
            questions.len(),
            phase
        );

        TestSession {
            test,
            questions,
            phase,
            editing: false,
            answers: working,
            pending_files: BTreeMap::new(),
            snapshot: answers,
            navigated: false,
        }
    }

    pub fn test_id(&self) -> &str {
        &self.test.id
    }

    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn answers(&self) -> &[AnswerEntry] {
        &self.answers
    }

    pub fn snapshot(&self) -> &[Answer] {
        &self.snapshot
    }

    /// Questions the student may see. Empty until the start is confirmed.
    pub fn visible_questions(&self) -> &[Question] {
        match self.phase {
            SessionPhase::Preview => &[],
            SessionPhase::Active | SessionPhase::Submitted => self.questions.as_slice(),
        }
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.answer.as_str())
    }

    pub fn pending_uploads(&self) -> Vec<(String, PathBuf)> {
        self.pending_files
            .iter()
            .map(|(q, p)| (q.clone(), p.clone()))
            .collect()
    }

    // -- deadline and editability ------------------------------------------

    /// Whether `now` is strictly before the close date. No close date means
    /// the deadline cannot be confirmed, so this is `false`.
    pub fn is_before_close(&self, now: DateTime<Utc>) -> bool {
        self.test.close_date.is_some_and(|close| now < close)
    }

    /// Whether answers may be changed at `now`.
    pub fn can_edit_at(&self, now: DateTime<Utc>) -> bool {
        match self.phase {
            SessionPhase::Preview => false,
            SessionPhase::Active => true,
            SessionPhase::Submitted => self.editing && self.is_before_close(now),
        }
    }

    fn ensure_editable(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Preview => Err(SessionError::InvalidPhase {
                action: "answer",
                phase: self.phase,
            }),
            SessionPhase::Active => Ok(()),
            SessionPhase::Submitted if !self.is_before_close(now) => Err(SessionError::Closed),
            SessionPhase::Submitted if !self.editing => Err(SessionError::ReadOnly),
            SessionPhase::Submitted => Ok(()),
        }
    }

    fn question(&self, question_id: &str) -> Result<&Question, SessionError> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))
    }

    // -- starting ----------------------------------------------------------

    /// The `start_test` message for this session. The phase only changes
    /// once the server echoes `test_started` for the same test.
    pub fn start_message(&self, token: &str) -> Result<ClientMessage, SessionError> {
        if self.phase != SessionPhase::Preview {
            return Err(SessionError::InvalidPhase {
                action: "start",
                phase: self.phase,
            });
        }
        Ok(ClientMessage::StartTest {
            test_id: self.test.id.clone(),
            token: token.to_string(),
        })
    }

    // -- server messages -----------------------------------------------------

    /// Apply a server message. Messages about other tests are ignored.
    pub fn handle_server(&mut self, msg: &ServerMessage) -> Option<SessionEvent> {
        match msg {
            ServerMessage::TestStarted { test_id } => {
                if *test_id != self.test.id {
                    debug!("Ignoring test_started for {test_id}; session is {}", self.test.id);
                    return None;
                }
                if self.phase != SessionPhase::Preview {
                    debug!("Duplicate test_started for {test_id} in {:?}", self.phase);
                    return None;
                }
                info!("Test {test_id} started");
                self.phase = SessionPhase::Active;
                Some(SessionEvent::Started)
            }
            ServerMessage::AnswerSubmitted {
                test_id,
                is_submitted,
            } => {
                if *test_id != self.test.id {
                    debug!(
                        "Ignoring answer_submitted for {test_id}; session is {}",
                        self.test.id
                    );
                    return None;
                }
                if !*is_submitted || self.navigated {
                    return None;
                }
                info!("Submission for {test_id} accepted");
                self.navigated = true;
                self.phase = SessionPhase::Submitted;
                self.editing = false;
                Some(SessionEvent::NavigateAway)
            }
            ServerMessage::Error { message } => {
                warn!("Server error for test {}: {message}", self.test.id);
                Some(SessionEvent::ShowError(message.clone()))
            }
            ServerMessage::Unknown => {
                debug!("Ignoring unrecognized socket message");
                None
            }
        }
    }

    // -- answering -----------------------------------------------------------

    /// Set the text or choice answer of a question. An empty value clears it
    /// while the test is active; a submitted answer can only be replaced.
    pub fn set_answer(
        &mut self,
        question_id: &str,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure_editable(now)?;
        if self.question(question_id)?.kind.is_file() {
            return Err(SessionError::FileQuestion(question_id.to_string()));
        }
        if self.phase == SessionPhase::Submitted {
            self.submitted_answer(question_id)?;
            if answer.is_empty() {
                return Err(SessionError::ClearSubmitted(question_id.to_string()));
            }
        }

        if answer.is_empty() {
            self.answers.retain(|a| a.question_id != question_id);
        } else {
            self.upsert(question_id, answer);
        }
        Ok(())
    }

    /// Choose a file for a file question. The file name stands in as the
    /// answer until the upload replaces it with the stored path.
    pub fn select_file(
        &mut self,
        question_id: &str,
        path: &Path,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure_editable(now)?;
        if !self.question(question_id)?.kind.is_file() {
            return Err(SessionError::NotFileQuestion(question_id.to_string()));
        }
        if self.phase == SessionPhase::Submitted {
            self.submitted_answer(question_id)?;
        }

        let placeholder = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.upsert(question_id, &placeholder);
        self.pending_files
            .insert(question_id.to_string(), path.to_path_buf());
        Ok(())
    }

    /// The stored row an edit would replace. Only answers that were part of
    /// the submission have an edit endpoint.
    fn submitted_answer(&self, question_id: &str) -> Result<&Answer, SessionError> {
        self.snapshot
            .iter()
            .find(|a| a.question_id == question_id)
            .ok_or_else(|| SessionError::NotSubmitted(question_id.to_string()))
    }

    fn upsert(&mut self, question_id: &str, answer: &str) {
        match self.answers.iter_mut().find(|a| a.question_id == question_id) {
            Some(entry) => entry.answer = answer.to_string(),
            None => self.answers.push(AnswerEntry::new(question_id, answer)),
        }
    }

    /// Put drafts saved by an earlier run back into an active session.
    /// File answers are skipped: their local selection is gone.
    pub fn restore_drafts(&mut self, drafts: &[AnswerEntry]) -> usize {
        if self.phase != SessionPhase::Active {
            return 0;
        }
        let mut restored = 0;
        for draft in drafts {
            let Some(question) = self.questions.iter().find(|q| q.id == draft.question_id) else {
                continue;
            };
            if question.kind.is_file() || draft.answer.is_empty() {
                continue;
            }
            self.upsert(&draft.question_id, &draft.answer);
            restored += 1;
        }
        restored
    }

    // -- submitting ----------------------------------------------------------

    /// Compare the number of answers to the number of questions.
    pub fn submit_check(&self) -> SubmitCheck {
        let total = self.questions.len();
        let answered = self.answers.len();
        if answered < total {
            SubmitCheck::NeedsConfirmation {
                unanswered: total - answered,
            }
        } else {
            SubmitCheck::Ready
        }
    }

    /// Record the stored path of an uploaded file, replacing the placeholder
    /// (or adding the entry if there was none).
    pub fn apply_upload(&mut self, question_id: &str, stored_path: &str) {
        self.upsert(question_id, stored_path);
        self.pending_files.remove(question_id);
    }

    /// The `submit_test` message carrying exactly the answers collected so
    /// far. All pending files must have been uploaded first.
    pub fn submit_message(&self, token: &str) -> Result<ClientMessage, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::InvalidPhase {
                action: "submit",
                phase: self.phase,
            });
        }
        if !self.pending_files.is_empty() {
            return Err(SessionError::PendingUploads(self.pending_files.len()));
        }
        Ok(ClientMessage::SubmitTest {
            test_id: self.test.id.clone(),
            answer_data: self.answers.clone(),
            token: token.to_string(),
        })
    }

    // -- editing after submission ------------------------------------------

    /// Enter or leave edit mode on a submitted test. Leaving without saving
    /// restores the snapshot values. Returns the new editing flag.
    pub fn toggle_edit(&mut self, now: DateTime<Utc>) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::Submitted {
            return Err(SessionError::InvalidPhase {
                action: "edit",
                phase: self.phase,
            });
        }
        if self.editing {
            self.editing = false;
            self.reset_to_snapshot();
            return Ok(false);
        }
        if !self.is_before_close(now) {
            return Err(SessionError::Closed);
        }
        self.editing = true;
        Ok(true)
    }

    fn reset_to_snapshot(&mut self) {
        self.answers = self
            .snapshot
            .iter()
            .map(|a| AnswerEntry::new(a.question_id.clone(), a.answer.clone()))
            .collect();
        self.pending_files.clear();
    }

    /// Diff the working answers against the snapshot. Only questions whose
    /// value changed produce an edit; file questions produce an edit only
    /// when a new file was selected.
    pub fn compute_edits(&self) -> Vec<AnswerEdit> {
        let mut edits = Vec::new();
        for entry in &self.answers {
            let Some(question) = self.questions.iter().find(|q| q.id == entry.question_id) else {
                continue;
            };
            let Some(original) = self
                .snapshot
                .iter()
                .find(|a| a.question_id == entry.question_id)
            else {
                warn!(
                    "Question {} has no submitted answer to edit; skipping",
                    entry.question_id
                );
                continue;
            };

            if question.kind.is_file() {
                if let Some(path) = self.pending_files.get(&entry.question_id) {
                    edits.push(AnswerEdit::File {
                        answer_id: original.id.clone(),
                        question_id: entry.question_id.clone(),
                        path: path.clone(),
                    });
                }
            } else if entry.answer != original.answer {
                edits.push(AnswerEdit::Text {
                    answer_id: original.id.clone(),
                    question_id: entry.question_id.clone(),
                    answer: entry.answer.clone(),
                });
            }
        }
        edits
    }

    /// Fold a server-confirmed edit back into the working answers and the
    /// snapshot, so later diffs start from what the server holds.
    pub fn apply_edit_result(&mut self, updated: &Answer) {
        self.upsert(&updated.question_id, &updated.answer);
        self.pending_files.remove(&updated.question_id);
        match self
            .snapshot
            .iter_mut()
            .find(|a| a.question_id == updated.question_id)
        {
            Some(row) => *row = updated.clone(),
            None => self.snapshot.push(updated.clone()),
        }
    }

    /// Leave edit mode after all edits were saved. The working answers are
    /// rebuilt from the snapshot so the read-only view matches the server.
    pub fn finish_editing(&mut self) {
        self.editing = false;
        self.reset_to_snapshot();
    }

    // -- view ----------------------------------------------------------------

    pub fn view(&self, now: DateTime<Utc>) -> SessionSnapshot {
        let questions = self
            .visible_questions()
            .iter()
            .map(|q| QuestionView {
                id: q.id.clone(),
                text: q.text.clone(),
                kind: q.kind,
                options: q.options.clone(),
                answer: self.answer_for(&q.id).map(str::to_string),
                pending_file: self
                    .pending_files
                    .get(&q.id)
                    .map(|p| p.display().to_string()),
            })
            .collect();

        SessionSnapshot {
            test_id: self.test.id.clone(),
            title: self.test.title.clone(),
            description: self.test.description.clone(),
            phase: self.phase,
            editing: self.editing,
            editable: self.can_edit_at(now),
            close_date: self.test.close_date,
            questions,
            answered: self.answers.len(),
            total: self.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use schoolhub_core::models::QuestionKind;

    fn now() -> DateTime<Utc> {
        "2026-04-10T12:00:00Z".parse().unwrap()
    }

    fn question(id: &str, kind: QuestionKind) -> Question {
        Question {
            id: id.into(),
            test_id: Some("t1".into()),
            text: format!("Question {id}"),
            kind,
            options: if kind == QuestionKind::MultipleChoice {
                vec!["a".into(), "b".into()]
            } else {
                vec![]
            },
            points: None,
            image: None,
        }
    }

    fn stored(id: &str, question_id: &str, answer: &str) -> Answer {
        Answer {
            id: id.into(),
            question_id: question_id.into(),
            student_id: Some("s1".into()),
            answer: answer.into(),
            grade: None,
            feedback: None,
        }
    }

    fn detail(status: bool, close_in: Option<Duration>) -> TestDetail {
        TestDetail {
            test: Test {
                id: "t1".into(),
                title: "Algebra".into(),
                description: None,
                class_id: Some("c1".into()),
                open_date: None,
                close_date: close_in.map(|d| now() + d),
                duration_minutes: Some(30),
            },
            questions: vec![
                question("q1", QuestionKind::MultipleChoice),
                question("q2", QuestionKind::ShortAnswer),
                question("q3", QuestionKind::File),
            ],
            answers: if status {
                vec![
                    stored("a1", "q1", "a"),
                    stored("a2", "q2", "x = 2"),
                    stored("a3", "q3", "uploads/old.pdf"),
                ]
            } else {
                vec![]
            },
            status,
        }
    }

    fn active_session() -> TestSession {
        let mut session = TestSession::from_detail(detail(false, Some(Duration::hours(1))));
        session.handle_server(&ServerMessage::TestStarted {
            test_id: "t1".into(),
        });
        session
    }

    fn editing_session() -> TestSession {
        let mut session = TestSession::from_detail(detail(true, Some(Duration::hours(1))));
        session.toggle_edit(now()).unwrap();
        session
    }

    // -- preview / start ---------------------------------------------------

    #[test]
    fn unstarted_test_opens_in_preview_without_questions() {
        let session = TestSession::from_detail(detail(false, None));
        assert_eq!(session.phase(), SessionPhase::Preview);
        assert!(session.visible_questions().is_empty());
        assert!(session.view(now()).questions.is_empty());
        assert_eq!(session.view(now()).total, 3);
    }

    #[test]
    fn start_message_does_not_change_phase() {
        let session = TestSession::from_detail(detail(false, None));
        let msg = session.start_message("tok").unwrap();
        assert_eq!(
            msg,
            ClientMessage::StartTest {
                test_id: "t1".into(),
                token: "tok".into()
            }
        );
        assert_eq!(session.phase(), SessionPhase::Preview);
    }

    #[test]
    fn matching_test_started_activates() {
        let mut session = TestSession::from_detail(detail(false, None));
        let event = session.handle_server(&ServerMessage::TestStarted {
            test_id: "t1".into(),
        });
        assert_eq!(event, Some(SessionEvent::Started));
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.visible_questions().len(), 3);
    }

    #[test]
    fn foreign_test_started_is_ignored() {
        let mut session = TestSession::from_detail(detail(false, None));
        let event = session.handle_server(&ServerMessage::TestStarted {
            test_id: "t2".into(),
        });
        assert_eq!(event, None);
        assert_eq!(session.phase(), SessionPhase::Preview);
        assert!(session.visible_questions().is_empty());
    }

    #[test]
    fn cannot_answer_in_preview() {
        let mut session = TestSession::from_detail(detail(false, None));
        let err = session.set_answer("q1", "a", now()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidPhase { .. }));
    }

    #[test]
    fn cannot_start_twice() {
        let session = active_session();
        assert!(session.start_message("tok").is_err());
    }

    // -- prior submission ----------------------------------------------------

    #[test]
    fn prior_submission_prepopulates_read_only_answers() {
        let mut session = TestSession::from_detail(detail(true, Some(Duration::hours(1))));
        assert_eq!(session.phase(), SessionPhase::Submitted);
        assert_eq!(session.answer_for("q2"), Some("x = 2"));
        assert!(!session.can_edit_at(now()));
        assert_eq!(
            session.set_answer("q2", "x = 3", now()),
            Err(SessionError::ReadOnly)
        );
    }

    #[test]
    fn edit_mode_only_before_close_date() {
        let mut open = TestSession::from_detail(detail(true, Some(Duration::minutes(5))));
        assert_eq!(open.toggle_edit(now()), Ok(true));
        assert!(open.can_edit_at(now()));

        let mut closed = TestSession::from_detail(detail(true, Some(Duration::minutes(-5))));
        assert_eq!(closed.toggle_edit(now()), Err(SessionError::Closed));
        assert!(!closed.can_edit_at(now()));
    }

    #[test]
    fn deadline_passing_during_edit_locks_answers() {
        let mut session = editing_session();
        let later = now() + Duration::hours(2);
        assert!(session.is_editing());
        assert!(!session.can_edit_at(later));
        assert_eq!(
            session.set_answer("q2", "late", later),
            Err(SessionError::Closed)
        );
        assert!(!session.view(later).editable);
    }

    #[test]
    fn missing_close_date_is_not_editable() {
        let mut session = TestSession::from_detail(detail(true, None));
        assert_eq!(session.toggle_edit(now()), Err(SessionError::Closed));
    }

    #[test]
    fn leaving_edit_mode_restores_snapshot() {
        let mut session = editing_session();
        session.set_answer("q2", "changed", now()).unwrap();
        session
            .select_file("q3", Path::new("/tmp/new.pdf"), now())
            .unwrap();

        assert_eq!(session.toggle_edit(now()), Ok(false));
        assert_eq!(session.answer_for("q2"), Some("x = 2"));
        assert_eq!(session.answer_for("q3"), Some("uploads/old.pdf"));
        assert!(session.pending_uploads().is_empty());
    }

    // -- answering / submitting ---------------------------------------------

    #[test]
    fn set_answer_replaces_and_clears() {
        let mut session = active_session();
        session.set_answer("q1", "a", now()).unwrap();
        session.set_answer("q1", "b", now()).unwrap();
        assert_eq!(session.answers(), &[AnswerEntry::new("q1", "b")]);

        session.set_answer("q1", "", now()).unwrap();
        assert!(session.answers().is_empty());
    }

    #[test]
    fn answer_kind_must_match_question() {
        let mut session = active_session();
        assert_eq!(
            session.set_answer("q3", "text", now()),
            Err(SessionError::FileQuestion("q3".into()))
        );
        assert_eq!(
            session.select_file("q2", Path::new("a.pdf"), now()),
            Err(SessionError::NotFileQuestion("q2".into()))
        );
        assert_eq!(
            session.set_answer("q9", "x", now()),
            Err(SessionError::UnknownQuestion("q9".into()))
        );
    }

    #[test]
    fn partial_answers_need_confirmation() {
        let mut session = active_session();
        session.set_answer("q1", "a", now()).unwrap();
        assert_eq!(
            session.submit_check(),
            SubmitCheck::NeedsConfirmation { unanswered: 2 }
        );

        session.set_answer("q2", "x", now()).unwrap();
        session
            .select_file("q3", Path::new("/tmp/work.pdf"), now())
            .unwrap();
        assert_eq!(session.submit_check(), SubmitCheck::Ready);
    }

    #[test]
    fn submit_sends_only_collected_answers() {
        let mut session = active_session();
        session.set_answer("q2", "x = 4", now()).unwrap();

        let msg = session.submit_message("tok").unwrap();
        assert_eq!(
            msg,
            ClientMessage::SubmitTest {
                test_id: "t1".into(),
                answer_data: vec![AnswerEntry::new("q2", "x = 4")],
                token: "tok".into()
            }
        );
    }

    #[test]
    fn submit_requires_uploads_first() {
        let mut session = active_session();
        session
            .select_file("q3", Path::new("/tmp/work.pdf"), now())
            .unwrap();
        assert_eq!(session.answer_for("q3"), Some("work.pdf"));
        assert_eq!(
            session.submit_message("tok"),
            Err(SessionError::PendingUploads(1))
        );

        session.apply_upload("q3", "uploads/answers/work-123.pdf");
        let ClientMessage::SubmitTest { answer_data, .. } = session.submit_message("tok").unwrap()
        else {
            panic!("expected submit_test");
        };
        assert_eq!(
            answer_data,
            vec![AnswerEntry::new("q3", "uploads/answers/work-123.pdf")]
        );
    }

    #[test]
    fn answer_submitted_navigates_exactly_once() {
        let mut session = active_session();
        let ack = ServerMessage::AnswerSubmitted {
            test_id: "t1".into(),
            is_submitted: true,
        };
        assert_eq!(session.handle_server(&ack), Some(SessionEvent::NavigateAway));
        assert_eq!(session.handle_server(&ack), None);
        assert_eq!(session.phase(), SessionPhase::Submitted);
    }

    #[test]
    fn answer_submitted_for_other_test_or_false_is_ignored() {
        let mut session = active_session();
        assert_eq!(
            session.handle_server(&ServerMessage::AnswerSubmitted {
                test_id: "t2".into(),
                is_submitted: true,
            }),
            None
        );
        assert_eq!(
            session.handle_server(&ServerMessage::AnswerSubmitted {
                test_id: "t1".into(),
                is_submitted: false,
            }),
            None
        );
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn server_error_is_shown_verbatim() {
        let mut session = active_session();
        let event = session.handle_server(&ServerMessage::Error {
            message: "Test already submitted".into(),
        });
        assert_eq!(
            event,
            Some(SessionEvent::ShowError("Test already submitted".into()))
        );
    }

    #[test]
    fn drafts_restore_only_text_answers_when_active() {
        let drafts = vec![
            AnswerEntry::new("q1", "b"),
            AnswerEntry::new("q3", "work.pdf"),
            AnswerEntry::new("q9", "gone"),
        ];

        let mut preview = TestSession::from_detail(detail(false, None));
        assert_eq!(preview.restore_drafts(&drafts), 0);

        let mut session = active_session();
        assert_eq!(session.restore_drafts(&drafts), 1);
        assert_eq!(session.answers(), &[AnswerEntry::new("q1", "b")]);
    }

    // -- edit diff -------------------------------------------------------------

    #[test]
    fn unchanged_answers_produce_no_edits() {
        let mut session = editing_session();
        session.set_answer("q2", "x = 2", now()).unwrap();
        assert!(session.compute_edits().is_empty());
    }

    #[test]
    fn changed_text_answer_produces_text_edit() {
        let mut session = editing_session();
        session.set_answer("q2", "x = 3", now()).unwrap();
        assert_eq!(
            session.compute_edits(),
            vec![AnswerEdit::Text {
                answer_id: "a2".into(),
                question_id: "q2".into(),
                answer: "x = 3".into()
            }]
        );
    }

    #[test]
    fn new_file_produces_file_edit_only() {
        let mut session = editing_session();
        session
            .select_file("q3", Path::new("/tmp/redo.pdf"), now())
            .unwrap();
        assert_eq!(
            session.compute_edits(),
            vec![AnswerEdit::File {
                answer_id: "a3".into(),
                question_id: "q3".into(),
                path: PathBuf::from("/tmp/redo.pdf")
            }]
        );
    }

    #[test]
    fn submitted_answer_cannot_be_cleared() {
        let mut session = editing_session();
        assert_eq!(
            session.set_answer("q2", "", now()),
            Err(SessionError::ClearSubmitted("q2".into()))
        );
        assert_eq!(session.answer_for("q2"), Some("x = 2"));
        assert!(session.compute_edits().is_empty());
    }

    #[test]
    fn question_without_submitted_answer_cannot_be_edited() {
        let mut detail = detail(true, Some(Duration::hours(1)));
        detail.answers.retain(|a| a.question_id != "q2" && a.question_id != "q3");
        let mut session = TestSession::from_detail(detail);
        session.toggle_edit(now()).unwrap();

        assert_eq!(
            session.set_answer("q2", "x = 5", now()),
            Err(SessionError::NotSubmitted("q2".into()))
        );
        assert_eq!(
            session.select_file("q3", Path::new("/tmp/late.pdf"), now()),
            Err(SessionError::NotSubmitted("q3".into()))
        );
        assert_eq!(session.answer_for("q2"), None);
        assert!(session.pending_uploads().is_empty());
    }

    #[test]
    fn finishing_edits_shows_what_the_server_holds() {
        let mut session = editing_session();
        session.set_answer("q2", "x = 3", now()).unwrap();
        session
            .select_file("q3", Path::new("/tmp/redo.pdf"), now())
            .unwrap();
        session.apply_edit_result(&stored("a2", "q2", "x = 3"));
        session.finish_editing();

        assert!(!session.is_editing());
        assert_eq!(session.answer_for("q2"), Some("x = 3"));
        assert_eq!(session.answer_for("q3"), Some("uploads/old.pdf"));
        assert!(session.pending_uploads().is_empty());
    }

    #[test]
    fn edit_result_moves_the_baseline() {
        let mut session = editing_session();
        session.set_answer("q2", "x = 3", now()).unwrap();
        session.apply_edit_result(&stored("a2", "q2", "x = 3"));
        assert!(session.compute_edits().is_empty());
        assert_eq!(session.snapshot()[1].answer, "x = 3");
    }
}
