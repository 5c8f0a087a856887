// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for operations that go beyond the generic record mapping.

pub mod contacts;
pub mod interactions;
pub mod knowledge;
pub mod summaries;

/// Timestamp expression matching the schema defaults.
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";
