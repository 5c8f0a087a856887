// SPDX-FileCopyrightText: 2026 CRM Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./crm.toml` > `~/.config/crm/crm.toml` > `/etc/crm/crm.toml`
//! with environment variable overrides via the `CRM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CrmConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/crm/crm.toml` (system-wide)
/// 3. `~/.config/crm/crm.toml` (user XDG config)
/// 4. `./crm.toml` (local directory)
/// 5. Vendor key variables (`OPENAI_API_KEY`, `GOOGLE_GEMINI_KEY`)
/// 6. `CRM_*` environment variables
pub fn load_config() -> Result<CrmConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CrmConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CrmConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CrmConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CrmConfig::default()))
        .merge(Toml::file(path))
        .merge(vendor_key_providers())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(CrmConfig::default()))
        .merge(Toml::file("/etc/crm/crm.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("crm/crm.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("crm.toml"))
        .merge(vendor_key_providers())
        .merge(env_provider())
}

/// Conventional vendor variables, applied below `CRM_*` so explicit settings win.
///
/// `OPENAI_API_KEY` feeds both the OpenAI embedder and the generation provider.
fn vendor_key_providers() -> Figment {
    Figment::new()
        .merge(
            Env::raw()
                .only(&["OPENAI_API_KEY"])
                .map(|_| "embedding.openai_api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["OPENAI_API_KEY"])
                .map(|_| "generation.api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["GOOGLE_GEMINI_KEY"])
                .map(|_| "embedding.gemini_api_key".into()),
        )
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `CRM_MEMORY_ARCHIVE_KEEP`
/// must map to `memory.archive_keep`, not `memory.archive.keep`. Keys arrive
/// upper-case, so they are lower-cased before the section prefix is matched.
fn env_provider() -> Env {
    Env::prefixed("CRM_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("embedding_", "embedding.", 1)
            .replacen("generation_", "generation.", 1)
            .replacen("memory_", "memory.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_prefix_maps_sections_without_splitting_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CRM_MEMORY_ARCHIVE_KEEP", "7");
            jail.set_env("CRM_EMBEDDING_PROVIDER", "gemini");

            let config: CrmConfig = Figment::new()
                .merge(Serialized::defaults(CrmConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.memory.archive_keep, 7);
            assert_eq!(config.embedding.provider, "gemini");
            Ok(())
        });
    }

    #[test]
    fn vendor_keys_fill_both_openai_slots() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_KEY", "sk-test");
            jail.set_env("GOOGLE_GEMINI_KEY", "g-test");

            let config: CrmConfig = Figment::new()
                .merge(Serialized::defaults(CrmConfig::default()))
                .merge(vendor_key_providers())
                .extract()?;

            assert_eq!(config.embedding.openai_api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.generation.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.embedding.gemini_api_key.as_deref(), Some("g-test"));
            Ok(())
        });
    }

    #[test]
    fn crm_prefixed_key_beats_vendor_key() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_KEY", "sk-vendor");
            jail.set_env("CRM_GENERATION_API_KEY", "sk-explicit");

            let config: CrmConfig = Figment::new()
                .merge(Serialized::defaults(CrmConfig::default()))
                .merge(vendor_key_providers())
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.generation.api_key.as_deref(), Some("sk-explicit"));
            assert_eq!(config.embedding.openai_api_key.as_deref(), Some("sk-vendor"));
            Ok(())
        });
    }

    #[test]
    fn every_section_accepts_crm_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("crm.toml", "[agent]\nname = \"from-file\"\n")?;
            jail.set_env("CRM_AGENT_LOG_LEVEL", "debug");
            jail.set_env("CRM_STORAGE_DATABASE_PATH", "/tmp/env.db");
            jail.set_env("CRM_EMBEDDING_GEMINI_MODEL", "text-embedding-005");
            jail.set_env("CRM_GENERATION_MAX_TOKENS", "256");
            jail.set_env("CRM_MEMORY_RECENT_CONTACT_HOURS", "48");

            let config = load_config_from_path(Path::new("crm.toml"))?;

            assert_eq!(config.agent.name, "from-file");
            assert_eq!(config.agent.log_level, "debug");
            assert_eq!(config.storage.database_path, "/tmp/env.db");
            assert_eq!(config.embedding.gemini_model, "text-embedding-005");
            assert_eq!(config.generation.max_tokens, 256);
            assert_eq!(config.memory.recent_contact_hours, 48);
            Ok(())
        });
    }
}
