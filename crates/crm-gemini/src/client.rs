// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Generative Language API.

use std::time::Duration;

use crm_core::CrmError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::GoogleErrorResponse;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Result<Self, CrmError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| CrmError::Config(format!("invalid Gemini API key: {e}")))?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| CrmError::embedding("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Calls `models/{model}:{method}`. All failures are embedding errors.
    pub async fn call_model<B, R>(&self, model: &str, method: &str, body: &B) -> Result<R, CrmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/models/{model}:{method}", self.base_url);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, method, "retrying Gemini request");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| CrmError::embedding(format!("HTTP request failed: {e}"), e))?;

            let status = response.status();
            debug!(status = %status, attempt, method, "Gemini response received");

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| CrmError::embedding("failed to read response body", e))?;
                return serde_json::from_str(&text)
                    .map_err(|e| CrmError::embedding(format!("malformed Gemini response: {e}"), e));
            }

            let body = response.text().await.unwrap_or_default();
            if matches!(status.as_u16(), 429 | 500 | 503) && attempt < self.max_retries {
                continue;
            }

            let message = match serde_json::from_str::<GoogleErrorResponse>(&body) {
                Ok(err) => format!(
                    "Gemini API error ({}, {}): {}",
                    status,
                    err.error.status.as_deref().unwrap_or("UNKNOWN"),
                    err.error.message
                ),
                Err(_) => format!("Gemini API returned {status}: {body}"),
            };
            return Err(CrmError::Embedding {
                message,
                source: None,
            });
        }

        Err(CrmError::Embedding {
            message: "Gemini request failed after retries".into(),
            source: None,
        })
    }
}
