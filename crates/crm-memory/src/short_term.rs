// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-process window of recent turns.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use crm_core::Metadata;
use serde::Serialize;
use serde_json::Value;

/// Default number of turns held before the oldest is evicted.
pub const MAX_WINDOW: usize = 10;

/// One message/response pair. Never persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub message: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
}

/// Point-in-time copy of everything short-term memory holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSnapshot {
    /// Oldest first.
    pub turns: Vec<Turn>,
    /// Caller-set keys merged with `last_message`, `last_response`, `last_timestamp`.
    pub current: BTreeMap<String, Value>,
    pub summary: Option<String>,
}

/// Strict FIFO of at most `capacity` turns, a scalar context map, and one
/// optional summary.
///
/// The `last_*` context keys are derived from the newest turn on read and
/// are not stored independently.
#[derive(Debug, Clone)]
pub struct ShortTermMemory {
    capacity: usize,
    turns: VecDeque<Turn>,
    context: BTreeMap<String, Value>,
    summary: Option<String>,
}

impl Default for ShortTermMemory {
    fn default() -> Self {
        Self::new(MAX_WINDOW)
    }
}

impl ShortTermMemory {
    /// A window of `capacity` turns (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            turns: VecDeque::with_capacity(capacity + 1),
            context: BTreeMap::new(),
            summary: None,
        }
    }

    /// Appends a turn stamped with the current time, evicting the oldest
    /// when over capacity.
    pub fn add(
        &mut self,
        message: impl Into<String>,
        response: impl Into<String>,
        metadata: Metadata,
    ) {
        self.push(Turn {
            message: message.into(),
            response: response.into(),
            timestamp: Utc::now(),
            metadata,
        });
    }

    /// Appends a prebuilt turn (used when replaying persisted history).
    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// The newest `limit` turns, oldest of them first.
    pub fn recent(&self, limit: usize) -> Vec<&Turn> {
        let skip = self.turns.len().saturating_sub(limit);
        self.turns.iter().skip(skip).collect()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn size(&self) -> usize {
        self.turns.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.turns.len() >= self.capacity
    }

    /// Resets turns, context, and summary.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.context.clear();
        self.summary = None;
    }

    /// Replaces the summary wholesale.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn set_current_context(&mut self, key: impl Into<String>, value: Value) {
        self.context.insert(key.into(), value);
    }

    /// Looks up a context key. Derived `last_*` keys win over caller-set ones.
    pub fn current_context(&self, key: &str) -> Option<Value> {
        let last = self.turns.back();
        match key {
            "last_message" => last.map(|t| Value::String(t.message.clone())),
            "last_response" => last.map(|t| Value::String(t.response.clone())),
            "last_timestamp" => last.map(|t| Value::String(t.timestamp.to_rfc3339())),
            _ => None,
        }
        .or_else(|| self.context.get(key).cloned())
    }

    pub fn full_context(&self) -> ContextSnapshot {
        let mut current = self.context.clone();
        for key in ["last_message", "last_response", "last_timestamp"] {
            if let Some(value) = self.current_context(key) {
                current.insert(key.to_string(), value);
            }
        }
        ContextSnapshot {
            turns: self.turns.iter().cloned().collect(),
            current,
            summary: self.summary.clone(),
        }
    }
}
