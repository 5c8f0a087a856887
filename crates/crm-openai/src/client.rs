// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI REST API.
//!
//! Handles bearer authentication, JSON encoding, and a single retry on
//! transient statuses (429, 500, 503).

use std::time::Duration;

use crm_core::CrmError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::ApiErrorResponse;

const API_BASE_URL: &str = "https://api.openai.com/v1";

/// Which error kind failures are reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSurface {
    Provider,
    Embedding,
}

impl ErrorSurface {
    fn error(
        self,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> CrmError {
        match self {
            ErrorSurface::Provider => CrmError::Provider { message, source },
            ErrorSurface::Embedding => CrmError::Embedding { message, source },
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Result<Self, CrmError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| CrmError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CrmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    /// Overrides the base URL (OpenAI-compatible servers, wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// POSTs `body` as JSON to `{base_url}{path}` and decodes the reply.
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        surface: ErrorSurface,
    ) -> Result<R, CrmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| {
                    surface.error(format!("HTTP request failed: {e}"), Some(Box::new(e)))
                })?;

            let status = response.status();
            debug!(status = %status, attempt, path, "response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| {
                    surface.error(
                        format!("failed to read response body: {e}"),
                        Some(Box::new(e)),
                    )
                })?;
                return serde_json::from_str(&text).map_err(|e| {
                    surface.error(format!("malformed API response: {e}"), Some(Box::new(e)))
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(surface.error(format!("API returned {status}: {body}"), None));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "OpenAI API error ({}, {}): {}",
                    status,
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(surface.error(message, None));
        }

        Err(last_error
            .unwrap_or_else(|| surface.error("request failed after retries".into(), None)))
    }
}

/// Returns true for HTTP status codes worth retrying.
pub(crate) fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new("sk-test")
            .unwrap()
            .with_base_url(base_url)
            .with_retry_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn sends_bearer_auth_and_decodes_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let value: Value = test_client(&server.uri())
            .post_json("/echo", &json!({}), ErrorSurface::Provider)
            .await
            .unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"n": 2})))
            .mount(&server)
            .await;

        let value: Value = test_client(&server.uri())
            .post_json("/x", &json!({}), ErrorSurface::Embedding)
            .await
            .unwrap();
        assert_eq!(value["n"], 2);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_as_requested_kind() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .post_json::<_, Value>("/x", &json!({}), ErrorSurface::Embedding)
            .await
            .unwrap_err();
        assert!(err.is_embedding(), "got {err}");
    }

    #[tokio::test]
    async fn auth_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .post_json::<_, Value>("/x", &json!({}), ErrorSurface::Provider)
            .await
            .unwrap_err();
        assert!(err.is_provider());
        assert!(err.to_string().contains("Incorrect API key"), "got {err}");
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .post_json::<_, Value>("/x", &json!({}), ErrorSurface::Embedding)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("malformed"), "got {err}");
    }
}
