// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::{CrmConfig, KNOWN_EMBEDDING_PROVIDERS};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CrmConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !KNOWN_EMBEDDING_PROVIDERS.contains(&config.embedding.provider.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "embedding.provider `{}` is not supported (expected one of: {})",
                config.embedding.provider,
                KNOWN_EMBEDDING_PROVIDERS.join(", ")
            ),
        });
    }

    let memory = &config.memory;

    if memory.short_term_window < 1 {
        errors.push(ConfigError::Validation {
            message: "memory.short_term_window must be at least 1".to_string(),
        });
    }

    if memory.archive_keep >= memory.archive_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.archive_keep ({}) must be less than memory.archive_threshold ({})",
                memory.archive_keep, memory.archive_threshold
            ),
        });
    }

    if !(-1.0..=1.0).contains(&memory.similarity_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.similarity_threshold must be within [-1, 1], got {}",
                memory.similarity_threshold
            ),
        });
    }

    if config.generation.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "generation.max_tokens must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = CrmConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = CrmConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn unknown_embedding_provider_fails_validation() {
        let mut config = CrmConfig::default();
        config.embedding.provider = "cohere".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("cohere"))
        ));
    }

    #[test]
    fn keep_must_be_below_threshold() {
        let mut config = CrmConfig::default();
        config.memory.archive_keep = 20;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("archive_keep"))
        ));
    }

    #[test]
    fn collects_all_errors_without_failing_fast() {
        let mut config = CrmConfig::default();
        config.memory.short_term_window = 0;
        config.memory.similarity_threshold = 1.5;
        config.embedding.provider = "nope".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn partial_memory_section_validates() {
        let toml_str = r#"
[memory]
archive_threshold = 50
archive_keep = 25
"#;
        let config: CrmConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.memory.short_term_window, 10);
    }

    #[test]
    fn parsed_inverted_archive_bounds_fail_validation() {
        let toml_str = r#"
[memory]
archive_threshold = 5
archive_keep = 8
"#;
        let config: CrmConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn unknown_key_is_rejected_at_parse_time() {
        let toml_str = r#"
[memory]
archive_treshold = 30
"#;
        assert!(toml::from_str::<CrmConfig>(toml_str).is_err());
    }
}
