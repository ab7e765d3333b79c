//! `[site]` section configuration.

use serde::Deserialize;

/// Site presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Title shown in every page shell.
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "λόγος — wiki for literate programming".into(),
        }
    }
}
