//! Token revocation set.
//!
//! The single piece of stateful token machinery: a concurrency-safe map of
//! revoked token fingerprints, each kept until the token's natural expiry.
//! Constructed by the caller and injected into the decoder, never reached
//! through an ambient global.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Minimum retention for a revoked token whose expiry is already past or
/// unreadable.
const MIN_RETENTION_SECONDS: i64 = 60;

/// Process-wide revocation set ("blacklist") for bearer tokens.
///
/// Keys are SHA-256 fingerprints of the token string, so the set never
/// holds usable credentials. Values are the instant the entry may be
/// garbage-collected.
#[derive(Debug, Default)]
pub struct TokenBlocklist {
    /// Fingerprint → unix timestamp after which the entry is collectable.
    entries: DashMap<String, i64>,
}

impl TokenBlocklist {
    /// Create an empty blocklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, keyed until `expires_at` (unix seconds).
    ///
    /// Idempotent: re-inserting the same token has no additional effect.
    /// The insertion is visible to concurrent readers before this returns.
    pub fn insert(&self, token: &str, expires_at: i64) {
        let retain_until = expires_at.max(Utc::now().timestamp() + MIN_RETENTION_SECONDS);
        self.entries.insert(fingerprint(token), retain_until);
    }

    /// Whether the token has been revoked.
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&fingerprint(token))
    }

    /// Drop entries whose retention window has passed. Returns the number
    /// of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now().timestamp();
        let before = self.entries.len();
        self.entries.retain(|_, retain_until| *retain_until > now);
        before - self.entries.len()
    }

    /// Number of revoked tokens currently retained.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawn a background task that purges expired entries on a timer.
    ///
    /// Request-path membership checks are never blocked by the sweep.
    pub fn start_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let purged = self.purge_expired();
                if purged > 0 {
                    debug!(purged, retained = self.len(), "Purged expired revocations");
                }
            }
        })
    }
}

/// SHA-256 fingerprint of a token string, hex-encoded.
pub(crate) fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let blocklist = TokenBlocklist::new();
        let exp = Utc::now().timestamp() + 3600;

        assert!(!blocklist.contains("token-a"));
        blocklist.insert("token-a", exp);
        assert!(blocklist.contains("token-a"));
        assert!(!blocklist.contains("token-b"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let blocklist = TokenBlocklist::new();
        let exp = Utc::now().timestamp() + 3600;

        blocklist.insert("token-a", exp);
        blocklist.insert("token-a", exp);
        assert_eq!(blocklist.len(), 1);
        assert!(blocklist.contains("token-a"));
    }

    #[test]
    fn test_purge_removes_only_expired() {
        let blocklist = TokenBlocklist::new();
        let now = Utc::now().timestamp();

        // Entry whose retention window is already over.
        blocklist
            .entries
            .insert(fingerprint("old-token"), now - 10);
        blocklist.insert("live-token", now + 3600);

        let purged = blocklist.purge_expired();
        assert_eq!(purged, 1);
        assert!(!blocklist.contains("old-token"));
        assert!(blocklist.contains("live-token"));
    }

    #[test]
    fn test_already_expired_token_retained_briefly() {
        // Revoking a token that has already expired still records it for a
        // minimum window instead of dropping it immediately.
        let blocklist = TokenBlocklist::new();
        blocklist.insert("expired-token", 0);
        assert!(blocklist.contains("expired-token"));
        assert_eq!(blocklist.purge_expired(), 0);
    }

    #[tokio::test]
    async fn test_sweeper_purges_in_background() {
        let blocklist = Arc::new(TokenBlocklist::new());
        blocklist
            .entries
            .insert(fingerprint("stale-token"), Utc::now().timestamp() - 10);

        let handle = Arc::clone(&blocklist).start_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!blocklist.contains("stale-token"));
        handle.abort();
    }

    #[test]
    fn test_fingerprint_is_stable_and_distinct() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
        assert_eq!(fingerprint("abc").len(), 64);
    }
}
