// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt context assembly.
//!
//! The context blob is a newline-joined list of lines: the contact header
//! first, then recent turns, the latest archived summary, and finally the
//! matching knowledge documents.

use crm_core::types::Contact;
use crm_memory::{ScoredDocument, Turn};

/// Everything gathered for one turn before generation.
#[derive(Debug, Clone)]
pub struct AssembledContext {
    /// Rendered context lines.
    pub blob: String,
    /// Summary included in the blob, stored with the interaction.
    pub summary: Option<String>,
    pub knowledge: Vec<ScoredDocument>,
}

impl AssembledContext {
    pub fn new(
        contact: &Contact,
        turns: &[&Turn],
        summary: Option<String>,
        knowledge: Vec<ScoredDocument>,
    ) -> Self {
        let blob = render_context(contact, turns, summary.as_deref(), &knowledge);
        Self {
            blob,
            summary,
            knowledge,
        }
    }

    /// The user prompt sent to the generator for `message`.
    pub fn prompt(&self, message: &str) -> String {
        build_prompt(&self.blob, message)
    }
}

pub fn render_context(
    contact: &Contact,
    turns: &[&Turn],
    summary: Option<&str>,
    knowledge: &[ScoredDocument],
) -> String {
    let mut lines = Vec::with_capacity(turns.len() + 3);
    lines.push(contact.header());

    for turn in turns {
        lines.push(format!("Previous: {} -> {}", turn.message, turn.response));
    }

    if let Some(summary) = summary.filter(|s| !s.trim().is_empty()) {
        lines.push(format!("Summary: {summary}"));
    }

    if !knowledge.is_empty() {
        let docs: Vec<&str> = knowledge.iter().map(|d| d.content.as_str()).collect();
        lines.push(format!("Knowledge: {}", docs.join(" | ")));
    }

    lines.join("\n")
}

pub fn build_prompt(blob: &str, message: &str) -> String {
    format!(
        "Context:\n{blob}\n\nCurrent message: {message}\n\n\
         Based on the context above, provide a helpful response. Avoid repeating \
         information that was already mentioned in previous interactions."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crm_core::Metadata;

    fn contact() -> Contact {
        Contact {
            id: 7,
            name: "Ada Lovelace".into(),
            email: Some("ada@example.com".into()),
            company: Some("Analytical Engines".into()),
            status: "lead".into(),
            last_contact_at: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    fn turn(message: &str, response: &str) -> Turn {
        Turn {
            message: message.into(),
            response: response.into(),
            timestamp: Utc::now(),
            metadata: Metadata::new(),
        }
    }

    fn doc(id: i64, content: &str) -> ScoredDocument {
        ScoredDocument {
            id,
            content: content.into(),
            metadata: Metadata::new(),
            similarity: 0.9,
        }
    }

    #[test]
    fn header_only_when_nothing_else() {
        let blob = render_context(&contact(), &[], None, &[]);
        assert_eq!(blob, "Contact: Ada Lovelace (Analytical Engines) - Status: lead");
    }

    #[test]
    fn lines_follow_fixed_order() {
        let a = turn("Hi", "Hello!");
        let b = turn("Pricing?", "Starts at $10.");
        let blob = render_context(
            &contact(),
            &[&a, &b],
            Some("Asked about onboarding"),
            &[doc(1, "Plan A"), doc(2, "Plan B")],
        );
        let lines: Vec<&str> = blob.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Contact: Ada Lovelace"));
        assert_eq!(lines[1], "Previous: Hi -> Hello!");
        assert_eq!(lines[2], "Previous: Pricing? -> Starts at $10.");
        assert_eq!(lines[3], "Summary: Asked about onboarding");
        assert_eq!(lines[4], "Knowledge: Plan A | Plan B");
    }

    #[test]
    fn blank_summary_is_skipped() {
        let blob = render_context(&contact(), &[], Some("   "), &[]);
        assert!(!blob.contains("Summary:"));
    }

    #[test]
    fn prompt_wraps_context_and_message() {
        let assembled = AssembledContext::new(&contact(), &[], None, vec![]);
        let prompt = assembled.prompt("Can we meet Tuesday?");
        assert!(prompt.starts_with("Context:\nContact: Ada Lovelace"));
        assert!(prompt.contains("\n\nCurrent message: Can we meet Tuesday?\n\n"));
        assert!(prompt.ends_with("already mentioned in previous interactions."));
    }
}
