// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI embeddings backend.

use async_trait::async_trait;
use crm_config::model::EmbeddingConfig;
use crm_core::traits::{EmbeddingAdapter, PluginAdapter};
use crm_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};
use crm_core::CrmError;
use tracing::debug;

use crate::client::{ErrorSurface, OpenAiClient};
use crate::types::{EmbeddingRequest, EmbeddingResponse};

pub struct OpenAiEmbedder {
    client: OpenAiClient,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Builds the embedder from config; `None` when no key is configured.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Option<Self>, CrmError> {
        match config
            .openai_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
        {
            Some(key) => Ok(Some(Self::new(OpenAiClient::new(key)?, &config.openai_model))),
            None => Ok(None),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PluginAdapter for OpenAiEmbedder {
    fn name(&self) -> &str {
        "openai"
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
impl EmbeddingAdapter for OpenAiEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, CrmError> {
        if input.texts.is_empty() {
            return Ok(EmbeddingOutput {
                embeddings: Vec::new(),
                dimensions: 0,
            });
        }

        let expected = input.texts.len();
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: input.texts,
        };
        let mut response: EmbeddingResponse = self
            .client
            .post_json("/embeddings", &request, ErrorSurface::Embedding)
            .await?;

        if response.data.len() != expected {
            return Err(CrmError::Embedding {
                message: format!(
                    "expected {expected} embeddings, received {}",
                    response.data.len()
                ),
                source: None,
            });
        }

        response.data.sort_by_key(|d| d.index);
        let embeddings: Vec<Vec<f32>> = response.data.into_iter().map(|d| d.embedding).collect();
        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        debug!(model = %self.model, count = embeddings.len(), dimensions, "embeddings received");

        Ok(EmbeddingOutput {
            embeddings,
            dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn embedder(server: &MockServer) -> OpenAiEmbedder {
        OpenAiEmbedder::new(
            OpenAiClient::new("sk-embed")
                .unwrap()
                .with_base_url(server.uri())
                .with_retry_delay(Duration::from_millis(10)),
            "text-embedding-3-small",
        )
    }

    #[test]
    fn from_config_requires_key() {
        assert!(OpenAiEmbedder::from_config(&EmbeddingConfig::default())
            .unwrap()
            .is_none());
        let config = EmbeddingConfig {
            openai_api_key: Some("sk-x".into()),
            ..Default::default()
        };
        let embedder = OpenAiEmbedder::from_config(&config).unwrap().unwrap();
        assert_eq!(embedder.model(), "text-embedding-3-small");
    }

    #[tokio::test]
    async fn embeddings_are_returned_in_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer sk-embed"))
            .and(body_json(json!({
                "model": "text-embedding-3-small",
                "input": ["first", "second"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "model": "text-embedding-3-small",
                "data": [
                    {"object": "embedding", "index": 1, "embedding": [0.0, 1.0, 0.0]},
                    {"object": "embedding", "index": 0, "embedding": [1.0, 0.0, 0.0]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = embedder(&server)
            .embed(EmbeddingInput {
                texts: vec!["first".into(), "second".into()],
            })
            .await
            .unwrap();
        assert_eq!(output.dimensions, 3);
        assert_eq!(output.embeddings[0], vec![1.0, 0.0, 0.0]);
        assert_eq!(output.embeddings[1], vec![0.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn count_mismatch_is_embedding_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = embedder(&server)
            .embed(EmbeddingInput {
                texts: vec!["one".into()],
            })
            .await
            .unwrap_err();
        assert!(err.is_embedding());
    }

    #[tokio::test]
    async fn auth_failure_is_embedding_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid key", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = embedder(&server)
            .embed(EmbeddingInput {
                texts: vec!["one".into()],
            })
            .await
            .unwrap_err();
        assert!(err.is_embedding());
        assert!(err.to_string().contains("Invalid key"));
    }

    #[tokio::test]
    async fn empty_input_skips_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let output = embedder(&server)
            .embed(EmbeddingInput { texts: vec![] })
            .await
            .unwrap();
        assert!(output.embeddings.is_empty());
    }
}
