// Class administration: CRUD, membership and the weekly schedule.

use serde_json::json;

use schoolhub_core::models::{Class, ClassInput, Role, TimeSlot};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

pub struct ClassApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ClassApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Class>, ApiError> {
        self.client.get(Role::Admin, "/api/class".into()).await
    }

    pub async fn get(&self, id: &str) -> Result<Class, ApiError> {
        self.client.get(Role::Admin, format!("/api/class/{id}")).await
    }

    pub async fn create(&self, input: &ClassInput) -> Result<Class, ApiError> {
        input.validate()?;
        self.client
            .post_json(Role::Admin, "/api/class".into(), input)
            .await
    }

    pub async fn update(&self, id: &str, input: &ClassInput) -> Result<Class, ApiError> {
        input.validate()?;
        self.client
            .put_json(Role::Admin, format!("/api/class/{id}"), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Admin,
                Method::Delete,
                format!("/api/class/{id}"),
                RequestBody::Empty,
            )
            .await
    }

    pub async fn add_student(&self, class_id: &str, student_id: &str) -> Result<Class, ApiError> {
        self.client
            .post_json(
                Role::Admin,
                format!("/api/class/{class_id}/students"),
                &json!({ "studentId": student_id }),
            )
            .await
    }

    pub async fn remove_student(&self, class_id: &str, student_id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Admin,
                Method::Delete,
                format!("/api/class/{class_id}/students/{student_id}"),
                RequestBody::Empty,
            )
            .await
    }

    pub async fn schedule(&self, class_id: &str) -> Result<Vec<TimeSlot>, ApiError> {
        self.client
            .get(Role::Admin, format!("/api/class/{class_id}/schedule"))
            .await
    }

    /// Replace the class schedule. Conflict checks happen server-side.
    pub async fn set_schedule(
        &self,
        class_id: &str,
        slots: &[TimeSlot],
    ) -> Result<Vec<TimeSlot>, ApiError> {
        self.client
            .put_json(
                Role::Admin,
                format!("/api/class/{class_id}/schedule"),
                &json!({ "schedule": slots }),
            )
            .await
    }
}
