// REST resources exchanged with the school backend.
//
// The backend owns and validates every entity; these types only mirror the
// JSON it sends (camelCase keys, Mongo-style `_id` accepted as `id`).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The acting role of an API call. Each role authenticates with its own
/// bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    /// Storage key for this role's bearer token.
    pub fn token_key(self) -> &'static str {
        match self {
            Role::Admin => "adminToken",
            Role::Teacher => "teacherToken",
            Role::Student => "studentToken",
        }
    }

    /// Path segment used by role-scoped endpoints (`/api/{role}/...`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// A required-field check failed on a create/update payload.
#[derive(Debug, Error, PartialEq)]
#[error("invalid field `{field}`: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Classes, students, teachers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

impl ClassInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub student_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    /// Initial password; only sent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl StudentInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl TeacherInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)
    }
}

// ---------------------------------------------------------------------------
// Tests, questions, answers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub open_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl TestInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("classId", &self.class_id)?;
        if let (Some(open), Some(close)) = (self.open_date, self.close_date) {
            if close <= open {
                return Err(ValidationError {
                    field: "closeDate".into(),
                    message: "must be after openDate".into(),
                });
            }
        }
        Ok(())
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
    /// Answered by uploading a file; the answer value is the stored path.
    File,
}

impl QuestionKind {
    pub fn is_file(self) -> bool {
        self == QuestionKind::File
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::Essay => "essay",
            QuestionKind::File => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub test_id: Option<String>,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub points: Option<f64>,
    /// Stored image path, if the question carries one.
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionInput {
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub points: Option<f64>,
}

impl QuestionInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("text", &self.text)?;
        if self.kind == QuestionKind::MultipleChoice && self.options.len() < 2 {
            return Err(ValidationError {
                field: "options".into(),
                message: "multiple choice needs at least two options".into(),
            });
        }
        Ok(())
    }
}

/// A stored answer row, as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(alias = "_id")]
    pub id: String,
    pub question_id: String,
    #[serde(default)]
    pub student_id: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// One question-id/answer-value pair as sent in `submit_test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEntry {
    pub question_id: String,
    pub answer: String,
}

impl AnswerEntry {
    pub fn new(question_id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }
}

/// The student test detail fetch: metadata, questions, any stored answers
/// and whether the student already submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDetail {
    pub test: Test,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub status: bool,
}

/// Body returned by the answer-file upload endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_path: String,
}

/// One student's answers to a test, as listed for the teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub student_id: String,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeInput {
    pub grade: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

// ---------------------------------------------------------------------------
// Lessons and schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub class_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Stored material file paths.
    #[serde(default)]
    pub materials: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonInput {
    pub title: String,
    pub class_id: String,
    pub description: Option<String>,
}

impl LessonInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("classId", &self.class_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(alias = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
    pub day: String,
    pub start: String,
    pub end: String,
    pub subject: String,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Activity logs and reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(alias = "_id")]
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub action: String,
    #[serde(default)]
    pub detail: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for the activity log; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFilter {
    pub role: Option<Role>,
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ActivityFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(role) = self.role {
            query.push(("role".into(), role.to_string()));
        }
        if let Some(user_id) = &self.user_id {
            query.push(("userId".into(), user_id.clone()));
        }
        if let Some(from) = self.from {
            query.push(("from".into(), from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            query.push(("to".into(), to.to_rfc3339()));
        }
        if let Some(page) = self.page {
            query.push(("page".into(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".into(), limit.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    pub total_students: u32,
    pub total_teachers: u32,
    pub total_classes: u32,
    pub total_tests: u32,
    pub active_users: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub class_id: String,
    #[serde(default)]
    pub average_grade: Option<f64>,
    #[serde(default)]
    pub submissions: u32,
    #[serde(default)]
    pub students: u32,
}

// ---------------------------------------------------------------------------
// Mailing and personal profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl MailRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.recipients.is_empty() {
            return Err(ValidationError {
                field: "recipients".into(),
                message: "at least one recipient is required".into(),
            });
        }
        require("subject", &self.subject)?;
        require("body", &self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_keys_match_browser_storage_names() {
        assert_eq!(Role::Admin.token_key(), "adminToken");
        assert_eq!(Role::Teacher.token_key(), "teacherToken");
        assert_eq!(Role::Student.token_key(), "studentToken");
        assert_eq!(Role::Teacher.to_string(), "teacher");
    }

    #[test]
    fn test_detail_accepts_mongo_ids_and_question_type() {
        let json = r#"{
            "test": {"_id": "t1", "title": "Algebra", "closeDate": "2026-05-01T10:00:00Z"},
            "questions": [
                {"_id": "q1", "text": "2+2?", "type": "multiple_choice", "options": ["3", "4"]},
                {"_id": "q2", "text": "Upload your work", "type": "file"}
            ],
            "answers": [{"_id": "a1", "questionId": "q1", "answer": "4", "grade": 1.0}],
            "status": true
        }"#;
        let detail: TestDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.test.id, "t1");
        assert!(detail.test.close_date.is_some());
        assert_eq!(detail.questions[1].kind, QuestionKind::File);
        assert_eq!(detail.answers[0].question_id, "q1");
        assert!(detail.status);
    }

    #[test]
    fn test_detail_status_defaults_to_not_submitted() {
        let json = r#"{"test": {"id": "t1", "title": "Quiz"}}"#;
        let detail: TestDetail = serde_json::from_str(json).unwrap();
        assert!(!detail.status);
        assert!(detail.questions.is_empty());
    }

    #[test]
    fn answer_entry_serializes_camel_case() {
        let entry = AnswerEntry::new("q1", "4");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"questionId": "q1", "answer": "4"}));
    }

    #[test]
    fn test_input_rejects_close_before_open() {
        let open = "2026-05-02T00:00:00Z".parse().unwrap();
        let close = "2026-05-01T00:00:00Z".parse().unwrap();
        let input = TestInput {
            title: "Quiz".into(),
            class_id: "c1".into(),
            open_date: Some(open),
            close_date: Some(close),
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.field, "closeDate");
    }

    #[test]
    fn required_fields_are_checked() {
        let input = ClassInput {
            name: "   ".into(),
            ..Default::default()
        };
        assert!(input.validate().is_err());

        let mail = MailRequest {
            recipients: vec![],
            subject: "Hi".into(),
            body: "Body".into(),
        };
        assert_eq!(mail.validate().unwrap_err().field, "recipients");
    }

    #[test]
    fn multiple_choice_question_needs_options() {
        let q = QuestionInput {
            text: "Pick one".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec!["only".into()],
            points: None,
        };
        assert!(q.validate().is_err());
    }

    #[test]
    fn activity_filter_only_sends_set_fields() {
        let filter = ActivityFilter {
            role: Some(Role::Student),
            page: Some(2),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("role".to_string(), "student".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
    }
}
