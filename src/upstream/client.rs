//! reqwest-backed upstream transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::{Upstream, UpstreamError, UpstreamRequest};
use crate::config::UpstreamConfig;

const CLIENT_USER_AGENT: &str = concat!("faceit-finder/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the FACEIT Data API.
///
/// The bearer token is fixed at construction and attached to every call.
pub struct FaceitClient {
    client: Client,
    base_url: Url,
}

impl FaceitClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| UpstreamError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Full URL for a request: base path, encoded segments, then query.
    pub fn url_for(&self, request: &UpstreamRequest) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Http(err)
    }
}

/// Pull `errors[0].message` out of a FACEIT error body.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("errors")?
        .get(0)?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl Upstream for FaceitClient {
    fn name(&self) -> &'static str {
        "faceit"
    }

    async fn get(&self, request: UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = self.url_for(&request)?;
        info!("Fetching {}", request.path_and_query());
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                path: request.path(),
            });
        }

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            return Err(UpstreamError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, RawQuery};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn echo(headers: AxumHeaders, RawQuery(query): RawQuery) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({"auth": auth, "query": query}))
    }

    async fn player(Path(id): Path<String>) -> (AxumStatus, Json<Value>) {
        match id.as_str() {
            "missing" => (
                AxumStatus::NOT_FOUND,
                Json(json!({"errors": [{"message": "The resource was not found."}]})),
            ),
            "broken" => (
                AxumStatus::SERVICE_UNAVAILABLE,
                Json(json!({"errors": [{"message": "Maintenance window"}]})),
            ),
            other => (AxumStatus::OK, Json(json!({"player_id": other}))),
        }
    }

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/data/v4/players", get(echo))
            .route("/data/v4/players/:id", get(player))
            .route("/data/v4/garbage", get(|| async { "not json" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/data/v4", addr)
    }

    fn client(base_url: &str, api_key: Option<&str>) -> FaceitClient {
        FaceitClient::new(&UpstreamConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            timeout_seconds: 5,
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = client("https://open.faceit.com/data/v4", None);

        let url = client
            .url_for(&UpstreamRequest::new(["players", "a b/c"]))
            .unwrap();
        assert_eq!(url.as_str(), "https://open.faceit.com/data/v4/players/a%20b%2Fc");

        let url = client
            .url_for(&UpstreamRequest::new(["players"]).param("nickname", "s&p"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://open.faceit.com/data/v4/players?nickname=s%26p"
        );
    }

    #[test]
    fn test_trailing_slash_base_url() {
        let client = client("https://open.faceit.com/data/v4/", None);
        let url = client
            .url_for(&UpstreamRequest::new(["matches", "1-abc"]))
            .unwrap();
        assert_eq!(url.as_str(), "https://open.faceit.com/data/v4/matches/1-abc");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = FaceitClient::new(&UpstreamConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..UpstreamConfig::default()
        });
        assert!(matches!(result, Err(UpstreamError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_bearer_token_and_query_are_sent() {
        let base = spawn_upstream().await;
        let client = client(&base, Some("secret"));

        let body = client
            .get(UpstreamRequest::new(["players"]).param("nickname", "shroud"))
            .await
            .unwrap();

        assert_eq!(body["auth"], "Bearer secret");
        assert_eq!(body["query"], "nickname=shroud");
    }

    #[tokio::test]
    async fn test_missing_token_sends_no_header() {
        let base = spawn_upstream().await;
        let client = client(&base, None);

        let body = client.get(UpstreamRequest::new(["players"])).await.unwrap();
        assert_eq!(body["auth"], Value::Null);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let base = spawn_upstream().await;
        let client = client(&base, None);

        let err = client
            .get(UpstreamRequest::new(["players", "missing"]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_error_status_uses_upstream_message() {
        let base = spawn_upstream().await;
        let client = client(&base, None);

        let err = client
            .get(UpstreamRequest::new(["players", "broken"]))
            .await
            .unwrap_err();
        match err {
            UpstreamError::HttpStatus { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Maintenance window");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_json_error() {
        let base = spawn_upstream().await;
        let client = client(&base, None);

        let err = client
            .get(UpstreamRequest::new(["garbage"]))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Json(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(&format!("http://{}/data/v4", addr), None);
        let err = client
            .get(UpstreamRequest::new(["players"]))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 502);
    }
}
