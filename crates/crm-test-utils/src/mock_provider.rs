// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock text-generation provider.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crm_core::traits::{PluginAdapter, ProviderAdapter};
use crm_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage};
use crm_core::CrmError;

/// Returns queued replies in order, then "mock response".
///
/// A queued `Err` is returned as [`CrmError::Provider`]. Every request is
/// recorded for later inspection.
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Ok(text.into()));
    }

    /// Queues a failure with `message`.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.replies.lock().await.push_back(Err(message.into()));
    }

    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, CrmError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CrmError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CrmError> {
        let model = request.model.clone();
        let n = {
            let mut requests = self.requests.lock().await;
            requests.push(request);
            requests.len()
        };

        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()));

        match reply {
            Ok(content) => Ok(ProviderResponse {
                id: format!("mock-{n}"),
                content,
                model,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            }),
            Err(message) => Err(CrmError::Provider {
                message,
                source: None,
            }),
        }
    }
}
