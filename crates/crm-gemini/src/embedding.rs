// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini embedding adapter.

use async_trait::async_trait;
use crm_config::model::EmbeddingConfig;
use crm_core::traits::{EmbeddingAdapter, PluginAdapter};
use crm_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use crm_core::CrmError;
use tracing::debug;

use crate::client::GeminiClient;
use crate::types::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, EmbedContentRequest,
    EmbedContentResponse,
};

pub struct GeminiEmbedder {
    client: GeminiClient,
    model: String,
}

impl GeminiEmbedder {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// `None` when `gemini_api_key` is unset or blank.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Option<Self>, CrmError> {
        match config
            .gemini_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
        {
            Some(key) => Ok(Some(Self::new(GeminiClient::new(key)?, &config.gemini_model))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiEmbedder {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, CrmError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CrmError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for GeminiEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CrmError> {
        let embeddings = match input.texts.len() {
            0 => Vec::new(),
            1 => {
                let text = input.texts.into_iter().next().unwrap_or_default();
                let response: EmbedContentResponse = self
                    .client
                    .call_model(
                        &self.model,
                        "embedContent",
                        &EmbedContentRequest::new(&self.model, text),
                    )
                    .await?;
                vec![response.embedding.values]
            }
            n => {
                let request = BatchEmbedContentsRequest {
                    requests: input
                        .texts
                        .into_iter()
                        .map(|t| EmbedContentRequest::new(&self.model, t))
                        .collect(),
                };
                let response: BatchEmbedContentsResponse = self
                    .client
                    .call_model(&self.model, "batchEmbedContents", &request)
                    .await?;
                if response.embeddings.len() != n {
                    return Err(CrmError::Embedding {
                        message: format!(
                            "expected {n} embeddings, received {}",
                            response.embeddings.len()
                        ),
                        source: None,
                    });
                }
                response.embeddings.into_iter().map(|e| e.values).collect()
            }
        };

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        debug!(model = %self.model, count = embeddings.len(), dimensions, "Gemini embeddings received");
        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}
