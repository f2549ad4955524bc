// In-process transport that records every request and replays canned
// responses. Used by tests across the workspace and for offline runs.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{ApiRequest, Method, Transport};

#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Status(u16, String),
    Network(String),
}

#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<HashMap<(Method, String), VecDeque<Canned>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, path: &str, canned: Canned) {
        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        responses
            .entry((method, path.to_string()))
            .or_default()
            .push_back(canned);
    }

    /// Queue `body` as the next response to `method path`. Unqueued calls
    /// answer `null`.
    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.push(method, path, Canned::Body(body));
    }

    /// Queue an HTTP error status as the next response to `method path`.
    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) {
        self.push(method, path, Canned::Status(status, message.to_string()));
    }

    /// Queue a network-level failure as the next response to `method path`.
    pub fn fail_network(&self, method: Method, path: &str, message: &str) {
        self.push(method, path, Canned::Network(message.to_string()));
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Requests sent to exactly `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let key = (request.method, request.path.clone());
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let canned = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match canned {
            None => Ok(Value::Null),
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status, message)) => Err(ApiError::Status { status, message }),
            Some(Canned::Network(message)) => Err(ApiError::Transport(message)),
        }
    }
}
