//! In-memory upstream for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Upstream, UpstreamError, UpstreamRequest};

#[derive(Debug, Clone)]
enum Canned {
    Body(Value),
    Status(u16, String),
}

/// Serves canned JSON per path and records every request.
///
/// A response registered under `path?k=v` wins over one registered under the
/// bare path. Anything without a canned response answers 404.
#[derive(Default)]
pub struct MockUpstream {
    responses: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), Canned::Body(body));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16, message: &str) -> Self {
        self.responses
            .insert(path.to_string(), Canned::Status(status, message.to_string()));
        self
    }

    /// Hold the response for `path` back by `millis`.
    pub fn with_delay(mut self, path: &str, millis: u64) -> Self {
        self.delays
            .insert(path.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().iter().map(UpstreamRequest::path).collect()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get(&self, request: UpstreamRequest) -> Result<Value, UpstreamError> {
        let path = request.path();
        let full = request.path_and_query();
        self.calls.lock().unwrap().push(request);

        if let Some(delay) = self.delays.get(&path) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&full).or_else(|| self.responses.get(&path)) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(404, _)) | None => Err(UpstreamError::NotFound { path }),
            Some(Canned::Status(status, message)) => Err(UpstreamError::HttpStatus {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
