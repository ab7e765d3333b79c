//! Credential directory loaded once at startup.
//!
//! `users.json` is a flat object of username to password, kept exactly as
//! the surrounding deployment writes it. Credential storage hardening is an
//! external concern; this module only answers "does this pair match".

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// In-memory username → password mapping.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: FxHashMap<String, String>,
}

impl UserDirectory {
    /// Load the credentials file. Any failure here is fatal to startup:
    /// a wiki without a readable user list cannot gate writes.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("unable to read credentials file `{}`", path.display()))?;
        Self::from_json(&data)
            .with_context(|| format!("unable to parse credentials file `{}`", path.display()))
    }

    fn from_json(data: &str) -> Result<Self> {
        let users: FxHashMap<String, String> = serde_json::from_str(data)?;
        Ok(Self { users })
    }

    /// Check a username/password pair against the directory.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.users.get(username).is_some_and(|p| p == password)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
