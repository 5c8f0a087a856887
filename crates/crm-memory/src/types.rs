// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval result types and vector math.

use crm_core::Metadata;
use crm_core::types::{Contact, ContextSummary, Interaction};
use serde::Serialize;

/// A knowledge document paired with its similarity to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub id: i64,
    pub content: String,
    pub metadata: Metadata,
    pub similarity: f64,
}

/// Everything known about one contact, as shown by `history`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactHistory {
    pub contact: Contact,
    /// Newest first.
    pub interactions: Vec<Interaction>,
    /// Newest first.
    pub summaries: Vec<ContextSummary>,
    pub recently_contacted: bool,
}

/// Cosine similarity between two vectors.
///
/// Returns exactly 0.0 when the lengths differ or either vector has zero
/// magnitude. Accumulates in f64.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
