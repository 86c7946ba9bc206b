//! Read-through TTL cache in front of an [`IssueFetcher`].
//!
//! Entries are keyed by identifier and hold either an issue or "not found";
//! both are served from memory until the TTL expires. Failed fetches are never
//! stored, so a stale entry survives until a refresh succeeds.
//!
//! # Concurrency
//!
//! The map lock is taken only to read or replace an entry, never across the
//! remote call. Two callers that miss on the same key at the same time will
//! both fetch, and whichever finishes last owns the entry. Entries are never
//! evicted; the identifier space is small and bounded by process lifetime.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::IssueFetcher;
use super::error::TrackerError;
use crate::types::Issue;

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    issue: Option<Issue>,
    fetched_at: Instant,
}

/// Caches issue lookups for a fixed TTL.
#[derive(Debug)]
pub struct IssueCache<F> {
    fetcher: F,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<F: IssueFetcher> IssueCache<F> {
    pub fn new(fetcher: F, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the issue for `identifier`, fetching it if the cached entry is
    /// missing or older than the TTL.
    pub async fn get(&self, identifier: &str) -> Result<Option<Issue>, TrackerError> {
        if let Some(issue) = self.fresh(identifier) {
            debug!(identifier, "Issue cache hit");
            return Ok(issue);
        }

        let issue = self.fetcher.fetch_issue(identifier).await?;

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                identifier.to_string(),
                CacheEntry {
                    issue: issue.clone(),
                    fetched_at: Instant::now(),
                },
            );

        Ok(issue)
    }

    /// Number of cached entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached value if it is still within the TTL. The outer `Option` is
    /// the hit/miss; the inner one is found/not-found.
    fn fresh(&self, identifier: &str) -> Option<Option<Issue>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(identifier)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.issue.clone())
    }
}
