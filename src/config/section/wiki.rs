//! `[wiki]` section configuration.
//!
//! All paths are relative to the process working directory unless given
//! absolute.
//!
//! # Example
//!
//! ```toml
//! [wiki]
//! source_dir = "wikidata/src"
//! dest_dir = "wikidata/dst"
//! static_dir = "static"
//! users_file = "users.json"
//! extension = "nw"
//! ```

use serde::Deserialize;
use std::path::PathBuf;

/// Filesystem layout of the wiki.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikiPaths {
    /// Root directory for literate source documents.
    pub source_dir: PathBuf,

    /// Root directory for woven HTML artifacts.
    pub dest_dir: PathBuf,

    /// Directory of static assets served under `/static/`.
    pub static_dir: PathBuf,

    /// Credentials file (JSON object of username to password).
    pub users_file: PathBuf,

    /// Source file extension, without the dot.
    pub extension: String,
}

impl Default for WikiPaths {
    fn default() -> Self {
        Self {
            source_dir: "wikidata/src".into(),
            dest_dir: "wikidata/dst".into(),
            static_dir: "static".into(),
            users_file: "users.json".into(),
            extension: "nw".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use std::path::Path;

    #[test]
    fn test_wiki_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.wiki.source_dir, Path::new("wikidata/src"));
        assert_eq!(config.wiki.dest_dir, Path::new("wikidata/dst"));
        assert_eq!(config.wiki.extension, "nw");
    }

    #[test]
    fn test_wiki_override() {
        let config =
            test_parse_config("[wiki]\nsource_dir = \"/srv/wiki/src\"\nextension = \"noweb\"");

        assert_eq!(config.wiki.source_dir, Path::new("/srv/wiki/src"));
        assert_eq!(config.wiki.extension, "noweb");
    }
}
