//! The component bundle behind every request handler.
//!
//! Everything is constructed once at startup from the loaded configuration
//! and then only read; handlers receive the bundle by reference. There is
//! deliberately no global config handle.

use crate::artifact::ArtifactStore;
use crate::config::WikiConfig;
use crate::session::SessionStore;
use crate::store::SourceStore;
use crate::users::UserDirectory;
use crate::weave::Weaver;
use anyhow::Result;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

pub struct App {
    pub config: Arc<WikiConfig>,
    pub users: UserDirectory,
    pub sessions: SessionStore,
    pub store: SourceStore,
    pub artifacts: ArtifactStore,
    pub weaver: Weaver,

    /// One mutex per file stem: save+weave for a given title is a critical
    /// section, while distinct titles weave in parallel.
    submit_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl App {
    /// Build all components. Fails fast on an unreadable credentials file.
    pub fn new(config: Arc<WikiConfig>) -> Result<Self> {
        let users = UserDirectory::load(&config.wiki.users_file)?;
        let sessions = SessionStore::new(config.serve.session_ttl());
        let store = SourceStore::new(&config.wiki.source_dir, config.wiki.extension.clone());
        let artifacts = ArtifactStore::new(&config.wiki.dest_dir);
        let weaver = config.weaver.weaver();

        Ok(Self {
            config,
            users,
            sessions,
            store,
            artifacts,
            weaver,
            submit_locks: DashMap::new(),
        })
    }

    /// The per-title submit lock, created on first use.
    pub fn submit_lock(&self, stem: &str) -> Arc<Mutex<()>> {
        self.submit_locks
            .entry(stem.to_owned())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fails_without_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WikiConfig::default();
        config.wiki.users_file = dir.path().join("absent.json");

        assert!(App::new(Arc::new(config)).is_err());
    }

    #[test]
    fn test_submit_lock_is_shared_per_stem() {
        let dir = tempfile::tempdir().unwrap();
        let users = dir.path().join("users.json");
        std::fs::write(&users, r#"{"ada": "pw"}"#).unwrap();

        let mut config = WikiConfig::default();
        config.wiki.users_file = users;
        let app = App::new(Arc::new(config)).unwrap();

        let a = app.submit_lock("Intro");
        let b = app.submit_lock("Intro");
        let c = app.submit_lock("Other");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
