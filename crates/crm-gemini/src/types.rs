// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies for `embedContent` and `batchEmbedContents`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EmbedContentRequest {
    /// Fully qualified model name, `models/<id>`.
    pub model: String,
    pub content: Content,
}

impl EmbedContentRequest {
    pub fn new(model: &str, text: impl Into<String>) -> Self {
        Self {
            model: format!("models/{model}"),
            content: Content {
                parts: vec![Part { text: text.into() }],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEmbedContentsRequest {
    pub requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchEmbedContentsResponse {
    #[serde(default)]
    pub embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentEmbedding {
    pub values: Vec<f32>,
}

/// Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_qualifies_model_name() {
        let req = EmbedContentRequest::new("text-embedding-004", "hello");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "models/text-embedding-004");
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
    }
}
