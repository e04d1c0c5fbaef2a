//! Upstream FACEIT Data API access.
//!
//! - [`Upstream`]: transport seam (real HTTP client or test double)
//! - [`FaceitClient`]: reqwest-backed implementation with bearer auth
//! - [`FaceitApi`]: typed catalogue of the endpoints the façade forwards to

mod client;
mod faceit;
#[cfg(test)]
pub mod mock;

pub use client::FaceitClient;
pub use faceit::{FaceitApi, Page};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from a single upstream call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("API token is not a valid header value")]
    InvalidToken,

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UpstreamError {
    /// HTTP-style status describing the failure.
    pub fn status_code(&self) -> u16 {
        match self {
            UpstreamError::NotFound { .. } => 404,
            UpstreamError::HttpStatus { status, .. } => *status,
            UpstreamError::Timeout => 504,
            UpstreamError::InvalidUrl(_) | UpstreamError::InvalidToken => 500,
            UpstreamError::Http(_) | UpstreamError::Json(_) => 502,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::NotFound { .. })
    }
}

/// A GET against the upstream API: path segments plus query pairs.
///
/// Segments are percent-encoded individually when the URL is built, so IDs
/// and nicknames can be passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add the parameter only when the caller supplied it.
    pub fn opt_param<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// `/a/b/c` form, for logging and test matching.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// `/a/b?k=v&k2=v2` form, unencoded.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.path(), query.join("&"))
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport to the upstream API.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Issue a GET and return the parsed JSON body.
    async fn get(&self, request: UpstreamRequest) -> Result<Value, UpstreamError>;
}

/// Error value embedded in a composite response in place of a sub-result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamFailure {
    pub error: String,
    pub status: u16,
}

impl From<&UpstreamError> for UpstreamFailure {
    fn from(err: &UpstreamError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}

/// Sub-result of a composite response: the payload or the failure that
/// replaced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fetched<T> {
    Ok(T),
    Failed(UpstreamFailure),
}

impl<T> Fetched<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Fetched::Ok(_))
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            Fetched::Ok(v) => Some(v),
            Fetched::Failed(_) => None,
        }
    }
}

impl<T> From<Result<T, UpstreamError>> for Fetched<T> {
    fn from(result: Result<T, UpstreamError>) -> Self {
        match result {
            Ok(v) => Fetched::Ok(v),
            Err(e) => Fetched::Failed(UpstreamFailure::from(&e)),
        }
    }
}
