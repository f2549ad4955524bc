// Test authoring and grading (teacher role).
//
// Grading itself, including AI grading and AI question generation, runs on
// the backend; these calls only trigger it and return the results.

use std::path::Path;

use serde_json::json;

use schoolhub_core::models::{
    Answer, GradeInput, Question, QuestionInput, Role, Submission, Test, TestInput,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{FormPart, Method, RequestBody};

pub struct TestApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TestApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Test>, ApiError> {
        self.client
            .get(Role::Teacher, "/api/teacher/tests".into())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Test, ApiError> {
        self.client
            .get(Role::Teacher, format!("/api/teacher/tests/{id}"))
            .await
    }

    pub async fn create(&self, input: &TestInput) -> Result<Test, ApiError> {
        input.validate()?;
        self.client
            .post_json(Role::Teacher, "/api/teacher/tests".into(), input)
            .await
    }

    pub async fn update(&self, id: &str, input: &TestInput) -> Result<Test, ApiError> {
        input.validate()?;
        self.client
            .put_json(Role::Teacher, format!("/api/teacher/tests/{id}"), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Teacher,
                Method::Delete,
                format!("/api/teacher/tests/{id}"),
                RequestBody::Empty,
            )
            .await
    }

    // -- questions -----------------------------------------------------------

    pub async fn add_question(
        &self,
        test_id: &str,
        input: &QuestionInput,
        image: Option<&Path>,
    ) -> Result<Question, ApiError> {
        input.validate()?;
        let parts = question_form(input, image).await?;
        self.client
            .multipart(
                Role::Teacher,
                Method::Post,
                format!("/api/teacher/tests/{test_id}/questions"),
                parts,
            )
            .await
    }

    pub async fn update_question(
        &self,
        question_id: &str,
        input: &QuestionInput,
        image: Option<&Path>,
    ) -> Result<Question, ApiError> {
        input.validate()?;
        let parts = question_form(input, image).await?;
        self.client
            .multipart(
                Role::Teacher,
                Method::Put,
                format!("/api/teacher/questions/{question_id}"),
                parts,
            )
            .await
    }

    pub async fn delete_question(&self, question_id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Teacher,
                Method::Delete,
                format!("/api/teacher/questions/{question_id}"),
                RequestBody::Empty,
            )
            .await
    }

    // -- grading -------------------------------------------------------------

    pub async fn submissions(&self, test_id: &str) -> Result<Vec<Submission>, ApiError> {
        self.client
            .get(Role::Teacher, format!("/api/teacher/tests/{test_id}/submissions"))
            .await
    }

    pub async fn grade_answer(&self, answer_id: &str, grade: &GradeInput) -> Result<Answer, ApiError> {
        self.client
            .put_json(
                Role::Teacher,
                format!("/api/teacher/answers/{answer_id}/grade"),
                grade,
            )
            .await
    }

    /// Ask the backend to grade every open answer of the test.
    pub async fn auto_grade(&self, test_id: &str) -> Result<Vec<Answer>, ApiError> {
        self.client
            .post_json(
                Role::Teacher,
                format!("/api/teacher/tests/{test_id}/auto-grade"),
                &json!({}),
            )
            .await
    }

    /// Ask the backend to draft `count` questions on `topic`.
    pub async fn generate_questions(
        &self,
        test_id: &str,
        topic: &str,
        count: u32,
    ) -> Result<Vec<Question>, ApiError> {
        self.client
            .post_json(
                Role::Teacher,
                format!("/api/teacher/tests/{test_id}/generate-questions"),
                &json!({ "topic": topic, "count": count }),
            )
            .await
    }
}

async fn question_form(
    input: &QuestionInput,
    image: Option<&Path>,
) -> Result<Vec<FormPart>, ApiError> {
    let mut parts = vec![
        FormPart::text("text", &input.text),
        FormPart::text("type", input.kind.as_str()),
        FormPart::text("options", serde_json::to_string(&input.options)?),
    ];
    if let Some(points) = input.points {
        parts.push(FormPart::text("points", points.to_string()));
    }
    if let Some(path) = image {
        parts.push(FormPart::file("image", path).await?);
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::recording::RecordingTransport;
    use crate::tokens::MemoryTokens;
    use schoolhub_core::models::QuestionKind;

    fn client() -> (Arc<RecordingTransport>, ApiClient) {
        let transport = Arc::new(RecordingTransport::new());
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryTokens::with_token(Role::Teacher, "teach")),
        );
        (transport, client)
    }

    #[tokio::test]
    async fn add_question_sends_multipart_fields() {
        let (transport, client) = client();
        transport.respond(
            Method::Post,
            "/api/teacher/tests/t1/questions",
            json!({"id": "q1", "text": "2+2?", "type": "multiple_choice", "options": ["3", "4"]}),
        );
        let input = QuestionInput {
            text: "2+2?".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec!["3".into(), "4".into()],
            points: Some(2.0),
        };

        let q = client.tests().add_question("t1", &input, None).await.unwrap();
        assert_eq!(q.id, "q1");

        let sent = transport.requests_to(Method::Post, "/api/teacher/tests/t1/questions");
        let RequestBody::Multipart(parts) = &sent[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(
            parts,
            &vec![
                FormPart::text("text", "2+2?"),
                FormPart::text("type", "multiple_choice"),
                FormPart::text("options", r#"["3","4"]"#),
                FormPart::text("points", "2"),
            ]
        );
    }

    #[tokio::test]
    async fn grade_answer_puts_grade_and_feedback() {
        let (transport, client) = client();
        transport.respond(
            Method::Put,
            "/api/teacher/answers/a1/grade",
            json!({"id": "a1", "questionId": "q1", "answer": "4", "grade": 2.0}),
        );
        let grade = GradeInput {
            grade: 2.0,
            feedback: Some("Good".into()),
        };

        let answer = client.tests().grade_answer("a1", &grade).await.unwrap();
        assert_eq!(answer.grade, Some(2.0));
        let sent = transport.requests_to(Method::Put, "/api/teacher/answers/a1/grade");
        assert_eq!(
            sent[0].body,
            RequestBody::Json(json!({"grade": 2.0, "feedback": "Good"}))
        );
    }

    #[tokio::test]
    async fn generate_questions_posts_topic_and_count() {
        let (transport, client) = client();
        transport.respond(
            Method::Post,
            "/api/teacher/tests/t1/generate-questions",
            json!([{"id": "g1", "text": "Define a prime.", "type": "short_answer"}]),
        );

        let generated = client
            .tests()
            .generate_questions("t1", "primes", 1)
            .await
            .unwrap();
        assert_eq!(generated[0].kind, QuestionKind::ShortAnswer);
        let sent = transport.requests_to(Method::Post, "/api/teacher/tests/t1/generate-questions");
        assert_eq!(
            sent[0].body,
            RequestBody::Json(json!({"topic": "primes", "count": 1}))
        );
    }
}
