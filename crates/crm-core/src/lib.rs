// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the CRM agent.
//!
//! Provides the error type, the adapter traits for the three externally
//! owned capabilities (embedding, text generation, persistent store), and
//! the domain records shared by every other crate.

pub mod error;
pub mod traits;
pub mod types;

pub use error::CrmError;
pub use types::{AdapterType, HealthStatus, Metadata};

pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Contact, ProviderRequest};

    #[test]
    fn error_kind_helpers() {
        let embedding = CrmError::Embedding {
            message: "401".into(),
            source: None,
        };
        assert!(embedding.is_embedding());
        assert!(!embedding.is_archive());

        let archive = CrmError::Archive {
            message: "summary write failed".into(),
            source: None,
        };
        assert!(archive.is_archive());
        assert!(!archive.is_provider());

        let storage = CrmError::storage(std::io::Error::other("disk"));
        assert_eq!(storage.to_string(), "storage error: disk");
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Provider, AdapterType::Storage, AdapterType::Embedding] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn contact_header_includes_company_only_when_present() {
        let mut contact = Contact {
            id: 1,
            name: "Ana".into(),
            email: None,
            company: Some("Clinic".into()),
            status: "lead".into(),
            last_contact_at: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        assert_eq!(contact.header(), "Contact: Ana (Clinic) - Status: lead");

        contact.company = None;
        assert_eq!(contact.header(), "Contact: Ana - Status: lead");
    }

    #[test]
    fn single_turn_request_has_one_user_message() {
        let req = ProviderRequest::single_turn("m", "sys", "hello", 100);
        assert_eq!(req.system_prompt.as_deref(), Some("sys"));
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.messages[0].content, "hello");
    }

    #[test]
    fn all_adapter_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_embedding_adapter<T: EmbeddingAdapter>() {}
    }
}
