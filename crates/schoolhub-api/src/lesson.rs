// Lessons and their uploaded materials (teacher role).

use std::path::{Path, PathBuf};

use schoolhub_core::models::{Lesson, LessonInput, Role};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{FormPart, Method, RequestBody};

pub struct LessonApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LessonApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Lesson>, ApiError> {
        self.client
            .get(Role::Teacher, "/api/teacher/lessons".into())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Lesson, ApiError> {
        self.client
            .get(Role::Teacher, format!("/api/teacher/lessons/{id}"))
            .await
    }

    /// Create a lesson, uploading each file in `materials`.
    pub async fn create(
        &self,
        input: &LessonInput,
        materials: &[PathBuf],
    ) -> Result<Lesson, ApiError> {
        input.validate()?;
        let parts = lesson_form(input, materials).await?;
        self.client
            .multipart(
                Role::Teacher,
                Method::Post,
                "/api/teacher/lessons".into(),
                parts,
            )
            .await
    }

    /// Update a lesson; files in `materials` are added to the existing ones.
    pub async fn update(
        &self,
        id: &str,
        input: &LessonInput,
        materials: &[PathBuf],
    ) -> Result<Lesson, ApiError> {
        input.validate()?;
        let parts = lesson_form(input, materials).await?;
        self.client
            .multipart(
                Role::Teacher,
                Method::Put,
                format!("/api/teacher/lessons/{id}"),
                parts,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .execute(
                Role::Teacher,
                Method::Delete,
                format!("/api/teacher/lessons/{id}"),
                RequestBody::Empty,
            )
            .await
    }
}

async fn lesson_form(input: &LessonInput, materials: &[PathBuf]) -> Result<Vec<FormPart>, ApiError> {
    let mut parts = vec![
        FormPart::text("title", &input.title),
        FormPart::text("classId", &input.class_id),
    ];
    if let Some(description) = &input.description {
        parts.push(FormPart::text("description", description));
    }
    for path in materials {
        parts.push(FormPart::file("materials", Path::new(path)).await?);
    }
    Ok(parts)
}
