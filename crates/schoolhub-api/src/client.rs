// Shared request plumbing for the per-domain clients.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use schoolhub_core::models::Role;

use crate::class::ClassApi;
use crate::error::ApiError;
use crate::lesson::LessonApi;
use crate::mailing::MailingApi;
use crate::personal::PersonalApi;
use crate::report::ReportApi;
use crate::student::StudentApi;
use crate::teacher::TeacherApi;
use crate::test::TestApi;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, FormPart, Method, RequestBody, ReqwestTransport, Transport};

/// Entry point for every REST call. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// Client for the real backend at `base_url`.
    pub fn connect(base_url: &str, tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(Arc::new(ReqwestTransport::new(base_url)), tokens)
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// The bearer token for `role`, or `MissingToken` if none is stored.
    pub fn token(&self, role: Role) -> Result<String, ApiError> {
        self.tokens
            .get(role)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken { role })
    }

    // -- domain views --------------------------------------------------------

    pub fn classes(&self) -> ClassApi<'_> {
        ClassApi::new(self)
    }

    pub fn students(&self) -> StudentApi<'_> {
        StudentApi::new(self)
    }

    pub fn teachers(&self) -> TeacherApi<'_> {
        TeacherApi::new(self)
    }

    pub fn tests(&self) -> TestApi<'_> {
        TestApi::new(self)
    }

    pub fn lessons(&self) -> LessonApi<'_> {
        LessonApi::new(self)
    }

    pub fn reports(&self) -> ReportApi<'_> {
        ReportApi::new(self)
    }

    pub fn mailing(&self) -> MailingApi<'_> {
        MailingApi::new(self)
    }

    pub fn personal(&self, role: Role) -> PersonalApi<'_> {
        PersonalApi::new(self, role)
    }

    // -- request helpers -----------------------------------------------------

    /// Send an authenticated request as `role` and return the raw body.
    pub(crate) async fn send(
        &self,
        role: Role,
        method: Method,
        path: String,
        query: Vec<(String, String)>,
        body: RequestBody,
    ) -> Result<Value, ApiError> {
        let token = self.token(role)?;
        self.transport
            .send(ApiRequest {
                method,
                path,
                query,
                token: Some(token),
                body,
            })
            .await
    }

    /// Send a request without a bearer token (login).
    pub(crate) async fn send_anonymous(
        &self,
        method: Method,
        path: String,
        body: RequestBody,
    ) -> Result<Value, ApiError> {
        self.transport
            .send(ApiRequest {
                method,
                path,
                query: Vec::new(),
                token: None,
                body,
            })
            .await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        role: Role,
        path: String,
    ) -> Result<T, ApiError> {
        self.get_with_query(role, path, Vec::new()).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        role: Role,
        path: String,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let value = self.send(role, Method::Get, path, query, RequestBody::Empty).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        role: Role,
        path: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let value = self.send(role, Method::Post, path, Vec::new(), body).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        role: Role,
        path: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let value = self.send(role, Method::Put, path, Vec::new(), body).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) async fn multipart<T: DeserializeOwned>(
        &self,
        role: Role,
        method: Method,
        path: String,
        parts: Vec<FormPart>,
    ) -> Result<T, ApiError> {
        let value = self
            .send(role, method, path, Vec::new(), RequestBody::Multipart(parts))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a request whose response body is not needed.
    pub(crate) async fn execute(
        &self,
        role: Role,
        method: Method,
        path: String,
        body: RequestBody,
    ) -> Result<(), ApiError> {
        self.send(role, method, path, Vec::new(), body).await?;
        Ok(())
    }
}
