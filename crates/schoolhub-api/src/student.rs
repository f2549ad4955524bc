// Student records (admin) and the student's own portal endpoints.

use std::path::Path;

use serde_json::json;

use schoolhub_core::models::{
    Answer, Lesson, Role, Student, StudentInput, Test, TestDetail, TimeSlot, UploadedFile,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{FormPart, Method, RequestBody};

pub struct StudentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StudentApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    // -- admin -------------------------------------------------------------

    /// List students; `query` (search, classId, page, ...) is passed through.
    pub async fn list(&self, query: &[(String, String)]) -> Result<Vec<Student>, ApiError> {
        self.client
            .get_with_query(Role::Admin, "/api/admin/students".into(), query.to_vec())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Student, ApiError> {
        self.client
            .get(Role::Admin, format!("/api/admin/students/{id}"))
            .await
    }

    pub async fn create(&self, input: &StudentInput) -> Result<Student, ApiError> {
        input.validate()?;
        self.client
            .post_json(Role::Admin, "/api/admin/students".into(), input)
            .await
    }

    pub async fn update(&self, id: &str, input: &StudentInput) -> Result<Student, ApiError> {
        input.validate()?;
        self.client
            .put_json(Role::Admin, format!("/api/admin/students/{id}"), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Admin,
                Method::Delete,
                format!("/api/admin/students/{id}"),
                RequestBody::Empty,
            )
            .await
    }

    // -- student self ------------------------------------------------------

    pub async fn my_tests(&self) -> Result<Vec<Test>, ApiError> {
        self.client
            .get(Role::Student, "/api/student/tests".into())
            .await
    }

    /// Test metadata, questions, stored answers and the submitted flag.
    pub async fn test_detail(&self, test_id: &str) -> Result<TestDetail, ApiError> {
        self.client
            .get(Role::Student, format!("/api/student/test/{test_id}"))
            .await
    }

    /// Upload the file answering `question_id`; returns the stored path.
    pub async fn upload_answer_file(
        &self,
        test_id: &str,
        question_id: &str,
        file: &Path,
    ) -> Result<String, ApiError> {
        let parts = vec![
            FormPart::text("questionId", question_id),
            FormPart::file("file", file).await?,
        ];
        let uploaded: UploadedFile = self
            .client
            .multipart(
                Role::Student,
                Method::Post,
                format!("/api/student/test/{test_id}/upload"),
                parts,
            )
            .await?;
        Ok(uploaded.file_path)
    }

    /// Change the value of a submitted text or choice answer.
    pub async fn edit_answer(&self, answer_id: &str, answer: &str) -> Result<Answer, ApiError> {
        self.client
            .put_json(
                Role::Student,
                format!("/api/student/answer/{answer_id}"),
                &json!({ "answer": answer }),
            )
            .await
    }

    /// Replace the file of a submitted file answer.
    pub async fn edit_answer_file(&self, answer_id: &str, file: &Path) -> Result<Answer, ApiError> {
        let parts = vec![FormPart::file("file", file).await?];
        self.client
            .multipart(
                Role::Student,
                Method::Put,
                format!("/api/student/answer/{answer_id}/file"),
                parts,
            )
            .await
    }

    pub async fn my_lessons(&self) -> Result<Vec<Lesson>, ApiError> {
        self.client
            .get(Role::Student, "/api/student/lessons".into())
            .await
    }

    pub async fn my_schedule(&self) -> Result<Vec<TimeSlot>, ApiError> {
        self.client
            .get(Role::Student, "/api/student/schedule".into())
            .await
    }
}
