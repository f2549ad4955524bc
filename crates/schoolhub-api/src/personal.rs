// Login and profile endpoints shared by all three roles.

use serde_json::json;
use tracing::info;

use schoolhub_core::models::{LoginResponse, Profile, ProfileUpdate, Role};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

pub struct PersonalApi<'a> {
    client: &'a ApiClient,
    role: Role,
}

impl<'a> PersonalApi<'a> {
    pub(crate) fn new(client: &'a ApiClient, role: Role) -> Self {
        Self { client, role }
    }

    fn path(&self, suffix: &str) -> String {
        format!("/api/{}/{suffix}", self.role.path_segment())
    }

    /// Log in and store the returned bearer token for this role.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = RequestBody::Json(json!({ "email": email, "password": password }));
        let value = self
            .client
            .send_anonymous(Method::Post, self.path("login"), body)
            .await?;
        let response: LoginResponse = serde_json::from_value(value)?;
        self.client.tokens().set(self.role, &response.token);
        info!("Logged in as {}", self.role);
        Ok(())
    }

    /// Forget this role's token locally.
    pub fn logout(&self) {
        self.client.tokens().clear(self.role);
        info!("Logged out {}", self.role);
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.client.get(self.role, self.path("profile")).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.client
            .put_json(self.role, self.path("profile"), update)
            .await
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), ApiError> {
        let body = RequestBody::Json(json!({
            "currentPassword": current,
            "newPassword": new,
        }));
        self.client
            .execute(self.role, Method::Put, self.path("password"), body)
            .await
    }
}
