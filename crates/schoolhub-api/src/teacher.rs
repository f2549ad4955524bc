// Teacher records (admin) and the teacher's own class roster.

use schoolhub_core::models::{Class, Role, Student, Teacher, TeacherInput};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

pub struct TeacherApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TeacherApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &[(String, String)]) -> Result<Vec<Teacher>, ApiError> {
        self.client
            .get_with_query(Role::Admin, "/api/admin/teachers".into(), query.to_vec())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Teacher, ApiError> {
        self.client
            .get(Role::Admin, format!("/api/admin/teachers/{id}"))
            .await
    }

    pub async fn create(&self, input: &TeacherInput) -> Result<Teacher, ApiError> {
        input.validate()?;
        self.client
            .post_json(Role::Admin, "/api/admin/teachers".into(), input)
            .await
    }

    pub async fn update(&self, id: &str, input: &TeacherInput) -> Result<Teacher, ApiError> {
        input.validate()?;
        self.client
            .put_json(Role::Admin, format!("/api/admin/teachers/{id}"), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Admin,
                Method::Delete,
                format!("/api/admin/teachers/{id}"),
                RequestBody::Empty,
            )
            .await
    }

    pub async fn my_classes(&self) -> Result<Vec<Class>, ApiError> {
        self.client
            .get(Role::Teacher, "/api/teacher/classes".into())
            .await
    }

    pub async fn class_students(&self, class_id: &str) -> Result<Vec<Student>, ApiError> {
        self.client
            .get(Role::Teacher, format!("/api/teacher/classes/{class_id}/students"))
            .await
    }
}
