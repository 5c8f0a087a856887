// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summaries: the rolling short-term summary and provider-backed archive
//! summaries.

use std::sync::Arc;

use async_trait::async_trait;
use crm_core::types::{Interaction, ProviderRequest};
use crm_core::{CrmError, ProviderAdapter};
use crm_memory::long_term::truncate_chars;
use crm_memory::{Summarizer, Turn};
use tracing::info;

/// Characters of each message kept in the rolling summary.
const ROLLING_MESSAGE_CHARS: usize = 50;

const ARCHIVE_SUMMARY_MAX_TOKENS: u32 = 300;

const ARCHIVE_SUMMARY_PROMPT: &str = "You summarize customer relationship history for a CRM. \
Write 2-4 sentences covering the topics raised, requests made, commitments given, and any \
open follow-ups. Mention only facts present in the interactions.";

/// Short summary of the turns currently in the short-term window.
pub fn rolling_summary<'a>(turns: impl IntoIterator<Item = &'a Turn>) -> String {
    let parts: Vec<String> = turns
        .into_iter()
        .map(|t| truncate_chars(&t.message, ROLLING_MESSAGE_CHARS))
        .collect();
    if parts.is_empty() {
        "No recent interactions to summarize.".to_string()
    } else {
        format!("Recent interactions: {}", parts.join("; "))
    }
}

/// Archive summarizer backed by the text-generation provider.
pub struct ProviderSummarizer {
    provider: Arc<dyn ProviderAdapter>,
    model: String,
}

impl ProviderSummarizer {
    pub fn new(provider: Arc<dyn ProviderAdapter>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for ProviderSummarizer {
    async fn summarize(&self, interactions: &[Interaction]) -> Result<String, CrmError> {
        let transcript: String = interactions
            .iter()
            .map(|i| match &i.response {
                Some(response) => format!("Customer: {}\nAssistant: {response}", i.message),
                None => format!("Customer: {}", i.message),
            })
            .collect::<Vec<_>>()
            .join("\n");

        let request = ProviderRequest::single_turn(
            self.model.clone(),
            ARCHIVE_SUMMARY_PROMPT,
            format!("Summarize these interactions:\n\n{transcript}"),
            ARCHIVE_SUMMARY_MAX_TOKENS,
        );
        let response = self.provider.complete(request).await?;

        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            interactions = interactions.len(),
            "archive summary generated"
        );
        Ok(response.content.trim().to_string())
    }
}
