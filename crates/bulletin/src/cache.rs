//! Short-lived cache for board reads.
//!
//! Listing posts, opening a post, and loading the category labels are
//! read far more often than posts change. The client keeps the raw
//! response body of each read for a while and answers repeats from memory.
//!
//! # Freshness
//!
//! Each entry remembers when it was stored. A lookup older than the
//! entry's TTL is a miss and drops the entry:
//!
//! ```text
//!   put ──→ [fresh] ──ttl elapsed──→ [stale] ──get──→ miss, refetch
//!              │
//!     create/update/delete, login, logout
//!              ▼
//!          [evicted]
//! ```
//!
//! Categories change rarely and get their own, longer TTL. A TTL of zero
//! disables caching for that kind of read.
//!
//! # Invalidation
//!
//! Writes evict what they make stale: every post list after any write, and
//! the single post after an update or delete. Login and logout clear
//! everything, so one user never sees pages fetched for another.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use bulletin_protocol::BoardId;

/// How long cached reads stay fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// TTL for post lists and single posts.
    pub ttl: Duration,

    /// TTL for the category label map.
    pub categories_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            categories_ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl CachePolicy {
    /// Every read goes to the server.
    pub fn disabled() -> Self {
        Self {
            ttl: Duration::ZERO,
            categories_ttl: Duration::ZERO,
        }
    }
}

/// Which read a cached body answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum QueryKey {
    Boards { page: u32, size: u32 },
    Board(BoardId),
    Categories,
}

struct Entry {
    body: Vec<u8>,
    stored_at: Instant,
}

/// Response bodies keyed by the read that produced them.
pub(crate) struct QueryCache {
    policy: CachePolicy,
    entries: Mutex<HashMap<QueryKey, Entry>>,
}

impl QueryCache {
    pub(crate) fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn policy(&self) -> CachePolicy {
        self.policy
    }

    fn ttl_for(&self, key: &QueryKey) -> Duration {
        match key {
            QueryKey::Categories => self.policy.categories_ttl,
            QueryKey::Boards { .. } | QueryKey::Board(_) => self.policy.ttl,
        }
    }

    /// Returns the cached body if it is still fresh.
    pub(crate) fn get(&self, key: &QueryKey) -> Option<Vec<u8>> {
        let ttl = self.ttl_for(key);
        let mut entries = self.lock();
        let fresh = entries.get(key)?.stored_at.elapsed() < ttl;
        if fresh {
            entries.get(key).map(|e| e.body.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub(crate) fn put(&self, key: QueryKey, body: Vec<u8>) {
        if self.ttl_for(&key).is_zero() {
            return;
        }
        self.lock().insert(
            key,
            Entry {
                body,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every cached page of the post list.
    pub(crate) fn invalidate_boards(&self) {
        self.lock()
            .retain(|key, _| !matches!(key, QueryKey::Boards { .. }));
    }

    pub(crate) fn invalidate_board(&self, id: BoardId) {
        self.lock().remove(&QueryKey::Board(id));
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> QueryCache {
        QueryCache::new(CachePolicy::default())
    }

    #[test]
    fn test_get_returns_fresh_entry() {
        let cache = cache();
        cache.put(QueryKey::Categories, b"{}".to_vec());

        assert_eq!(cache.get(&QueryKey::Categories), Some(b"{}".to_vec()));
        assert_eq!(cache.get(&QueryKey::Board(BoardId(1))), None);
    }

    #[test]
    fn test_zero_ttl_never_stores() {
        let cache = QueryCache::new(CachePolicy::disabled());
        cache.put(QueryKey::Categories, b"{}".to_vec());

        assert_eq!(cache.get(&QueryKey::Categories), None);
    }

    #[test]
    fn test_stale_entry_is_a_miss_and_dropped() {
        let cache = QueryCache::new(CachePolicy {
            ttl: Duration::from_millis(10),
            categories_ttl: Duration::from_secs(60),
        });
        let key = QueryKey::Board(BoardId(7));
        cache.put(key, b"old".to_vec());
        cache.put(QueryKey::Categories, b"{}".to_vec());

        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.get(&key), None);
        assert!(!cache.lock().contains_key(&key));
        assert!(cache.get(&QueryKey::Categories).is_some(), "longer TTL survives");
    }

    #[test]
    fn test_invalidate_boards_keeps_posts_and_categories() {
        let cache = cache();
        cache.put(QueryKey::Boards { page: 0, size: 10 }, b"p0".to_vec());
        cache.put(QueryKey::Boards { page: 1, size: 10 }, b"p1".to_vec());
        cache.put(QueryKey::Board(BoardId(3)), b"b3".to_vec());
        cache.put(QueryKey::Categories, b"{}".to_vec());

        cache.invalidate_boards();

        assert_eq!(cache.get(&QueryKey::Boards { page: 0, size: 10 }), None);
        assert_eq!(cache.get(&QueryKey::Boards { page: 1, size: 10 }), None);
        assert!(cache.get(&QueryKey::Board(BoardId(3))).is_some());
        assert!(cache.get(&QueryKey::Categories).is_some());
    }

    #[test]
    fn test_invalidate_board_only_drops_that_post() {
        let cache = cache();
        cache.put(QueryKey::Board(BoardId(3)), b"b3".to_vec());
        cache.put(QueryKey::Board(BoardId(4)), b"b4".to_vec());

        cache.invalidate_board(BoardId(3));

        assert_eq!(cache.get(&QueryKey::Board(BoardId(3))), None);
        assert!(cache.get(&QueryKey::Board(BoardId(4))).is_some());
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = cache();
        cache.put(QueryKey::Categories, b"{}".to_vec());
        cache.put(QueryKey::Board(BoardId(1)), b"b1".to_vec());

        cache.clear();

        assert!(cache.lock().is_empty());
    }
}
