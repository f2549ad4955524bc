// Outbound announcement mail (admin role). Delivery happens server-side.

use serde::Serialize;

use schoolhub_core::models::{MailRequest, Role};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

pub struct MailingApi<'a> {
    client: &'a ApiClient,
}

#[derive(Serialize)]
struct ClassMail<'a> {
    subject: &'a str,
    body: &'a str,
}

impl<'a> MailingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn send(&self, mail: &MailRequest) -> Result<(), ApiError> {
        mail.validate()?;
        let body = RequestBody::Json(serde_json::to_value(mail)?);
        self.client
            .execute(Role::Admin, Method::Post, "/api/admin/mail".into(), body)
            .await
    }

    /// Mail every student of a class.
    pub async fn send_to_class(
        &self,
        class_id: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), ApiError> {
        let payload = serde_json::to_value(ClassMail { subject, body })?;
        self.client
            .execute(
                Role::Admin,
                Method::Post,
                format!("/api/admin/mail/class/{class_id}"),
                RequestBody::Json(payload),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::recording::RecordingTransport;
    use crate::tokens::MemoryTokens;

    #[tokio::test]
    async fn send_posts_mail_request() {
        let transport = Arc::new(RecordingTransport::new());
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryTokens::with_token(Role::Admin, "adm")),
        );
        let mail = MailRequest {
            recipients: vec!["parent@example.org".into()],
            subject: "Exam week".into(),
            body: "Tests start Monday.".into(),
        };

        client.mailing().send(&mail).await.unwrap();
        let sent = transport.requests_to(Method::Post, "/api/admin/mail");
        assert_eq!(
            sent[0].body,
            RequestBody::Json(json!({
                "recipients": ["parent@example.org"],
                "subject": "Exam week",
                "body": "Tests start Monday."
            }))
        );
    }

    #[tokio::test]
    async fn server_failure_is_returned() {
        let transport = Arc::new(RecordingTransport::new());
        let client = ApiClient::new(
            transport.clone(),
            Arc::new(MemoryTokens::with_token(Role::Admin, "adm")),
        );
        transport.fail(Method::Post, "/api/admin/mail/class/c1", 502, "SMTP unavailable");

        let err = client
            .mailing()
            .send_to_class("c1", "Hi", "Body")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 502, .. }));
    }
}
