//! Cookie-backed session table.
//!
//! The rest of the pipeline only ever asks one question of this module:
//! "which principal, if any, does this request carry". Tokens are random
//! 256-bit values handed out at login, kept in-memory, and expire after a
//! sliding idle TTL. A restart logs everyone out; that is acceptable for a
//! single-process wiki.

use dashmap::DashMap;
use rand::RngCore;
use std::time::{Duration, Instant};

/// Cookie name carrying the session token.
pub const COOKIE_NAME: &str = "logos_session";

/// Token length in bytes, before hex encoding.
const TOKEN_BYTES: usize = 32;

#[derive(Debug)]
struct Session {
    user: String,
    last_seen: Instant,
}

/// Concurrent token → principal table with idle expiry.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Open a session for an authenticated user and return its token.
    pub fn open(&self, user: &str) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        self.sessions.insert(
            token.clone(),
            Session {
                user: user.to_owned(),
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Resolve a token to its principal, refreshing the idle timer.
    ///
    /// Expired tokens are removed on the spot and resolve to `None`.
    pub fn principal(&self, token: &str) -> Option<String> {
        let mut entry = self.sessions.get_mut(token)?;
        if entry.last_seen.elapsed() > self.ttl {
            drop(entry);
            self.sessions.remove(token);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.user.clone())
    }

    /// Remove a session (logout). Unknown tokens are a no-op.
    pub fn close(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Drop all expired sessions, returning how many were removed.
    pub fn sweep(&self) -> usize {
        let before = self.sessions.len();
        let ttl = self.ttl;
        self.sessions.retain(|_, s| s.last_seen.elapsed() <= ttl);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ============================================================================
// Cookie encoding
// ============================================================================

/// `Set-Cookie` value installing a session token.
pub fn set_cookie(token: &str) -> String {
    format!("{COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session token from a `Cookie` request header value.
pub fn token_from_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == COOKIE_NAME).then_some(value)
    })
}
