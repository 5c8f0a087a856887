// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat-completions provider adapter.

use async_trait::async_trait;
use crm_config::model::GenerationConfig;
use crm_core::traits::{PluginAdapter, ProviderAdapter};
use crm_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use crm_core::CrmError;
use tracing::debug;

use crate::client::{ErrorSurface, OpenAiClient};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Text generation through `POST /chat/completions`.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    /// Builds a provider from config, or `None` when no API key is set.
    pub fn from_config(config: &GenerationConfig) -> Result<Option<Self>, CrmError> {
        match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => Ok(Some(Self::new(OpenAiClient::new(key)?))),
            None => Ok(None),
        }
    }

    fn to_wire(request: ProviderRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system_prompt {
            messages.push(ChatMessage {
                role: "system".into(),
                content: Some(system),
            });
        }
        messages.extend(request.messages.into_iter().map(|m| ChatMessage {
            role: m.role,
            content: Some(m.content),
        }));

        ChatCompletionRequest {
            model: request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
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
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, CrmError> {
        let wire = Self::to_wire(request);
        let response: ChatCompletionResponse = self
            .client
            .post_json("/chat/completions", &wire, ErrorSurface::Provider)
            .await?;

        // An empty choice list is an error; empty content is passed through.
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CrmError::Provider {
                message: "response contained no choices".into(),
                source: None,
            })?;

        let usage = response.usage.unwrap_or_default();
        debug!(
            model = %response.model,
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            "completion received"
        );

        Ok(ProviderResponse {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}
