// REST side of the session: file uploads before submit and answer edits
// after it. Socket messages are not sent from here.

use tracing::{info, warn};

use schoolhub_api::{ApiClient, ApiError};

use crate::session::{AnswerEdit, TestSession};

/// Upload every selected file, ordered by question id, and splice the stored
/// paths into the session's answers.
///
/// Stops at the first failure. Files uploaded before the failure keep their
/// stored path; the rest stay pending so a retry only sends what is left.
pub async fn upload_pending(session: &mut TestSession, api: &ApiClient) -> Result<usize, ApiError> {
    let pending = session.pending_uploads();
    let test_id = session.test_id().to_string();
    let mut uploaded = 0;

    for (question_id, path) in pending {
        let stored = match api
            .students()
            .upload_answer_file(&test_id, &question_id, &path)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Upload for question {question_id} failed: {e}");
                return Err(e);
            }
        };
        info!("Uploaded {} for question {question_id}", path.display());
        session.apply_upload(&question_id, &stored);
        uploaded += 1;
    }

    Ok(uploaded)
}

/// Send each changed answer of a submitted test through the edit endpoints.
///
/// Text answers go through the JSON endpoint, file answers through the
/// multipart one; a file answer never touches the text endpoint. Each
/// confirmed edit moves the session baseline. Edit mode is left only when
/// every edit succeeded.
pub async fn save_edits(session: &mut TestSession, api: &ApiClient) -> Result<usize, ApiError> {
    let edits = session.compute_edits();
    let mut saved = 0;

    for edit in edits {
        let result = match &edit {
            AnswerEdit::Text {
                answer_id, answer, ..
            } => api.students().edit_answer(answer_id, answer).await,
            AnswerEdit::File {
                answer_id, path, ..
            } => api.students().edit_answer_file(answer_id, path).await,
        };
        match result {
            Ok(updated) => {
                session.apply_edit_result(&updated);
                saved += 1;
            }
            Err(e) => {
                warn!("Saving edit for question {} failed: {e}", edit.question_id());
                return Err(e);
            }
        }
    }

    session.finish_editing();
    info!("Saved {saved} answer edit(s) for test {}", session.test_id());
    Ok(saved)
}
