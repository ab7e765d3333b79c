//! Wiki configuration management for `logos.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── site       # [site]  (title)
//! │   ├── serve      # [serve] (interface, port, session TTL)
//! │   ├── weaver     # [weaver] (program, args, timeout)
//! │   └── wiki       # [wiki]  (source/dest/static dirs, users file)
//! └── mod.rs         # WikiConfig (this file)
//! ```
//!
//! The file is optional: every field has a default matching the historical
//! deployment (port 8080, `wikidata/src`, `wikidata/dst`, noweave). Override
//! precedence for the port is CLI flag, then `PORT` environment variable,
//! then config file, then default.
//!
//! One `WikiConfig` is constructed at startup and passed by reference into
//! every component; nothing reads configuration ambiently after that.

pub mod section;

pub use section::{ServeConfig, SiteConfig, WeaverConfig, WikiPaths};

use crate::log;
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Root configuration structure representing logos.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Absolute or relative path of the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site presentation
    pub site: SiteConfig,

    /// Server settings
    pub serve: ServeConfig,

    /// Filesystem layout
    pub wiki: WikiPaths,

    /// External weaver settings
    pub weaver: WeaverConfig,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            site: SiteConfig::default(),
            serve: ServeConfig::default(),
            wiki: WikiPaths::default(),
            weaver: WeaverConfig::default(),
        }
    }
}

impl WikiConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. Applies the `PORT` environment override.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_path(path)?
        } else {
            Self::default()
        };

        config.config_path = path.to_path_buf();
        config.apply_port_env(std::env::var("PORT").ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:", path.display());
            for field in &ignored {
                eprintln!("- {field}");
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Apply the `PORT` environment variable, if set and parseable.
    ///
    /// Split out from [`load`](Self::load) so tests can drive it without
    /// touching the process environment.
    pub fn apply_port_env(&mut self, var: Option<String>) {
        if let Some(raw) = var
            && let Ok(port) = raw.trim().parse::<u16>()
        {
            self.serve.port = port;
        }
    }

    /// Validate field combinations that serde defaults cannot catch.
    fn validate(&self) -> Result<()> {
        if self.weaver.program.trim().is_empty() {
            return Err(ConfigError::Validation("weaver.program is empty".into()).into());
        }
        if self.wiki.extension.is_empty()
            || !self
                .wiki
                .extension
                .bytes()
                .all(|b| b.is_ascii_alphanumeric())
        {
            return Err(ConfigError::Validation(format!(
                "wiki.extension `{}` must be alphanumeric",
                self.wiki.extension
            ))
            .into());
        }
        Ok(())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> WikiConfig {
    let (parsed, ignored) = WikiConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {ignored:?}"
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
