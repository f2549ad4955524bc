// Error type shared by every REST client.

use std::path::PathBuf;

use schoolhub_core::models::{Role, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token is stored for the acting role; nothing was sent.
    #[error("no {role} token stored; log in first")]
    MissingToken { role: Role },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

impl ApiError {
    /// Text suitable for an alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}
