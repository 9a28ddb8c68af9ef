//! Transaction Cache
//!
//! Thread-safe TTL cache of generated dashboard transactions, keyed by id, so
//! a listed transaction can be fetched again for its detail view.
//! DashMap gives concurrent access without a global lock. Capacity is bounded;
//! once full, expired entries go first and then the oldest ones.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::types::EnhancedTransaction;

/// Cache entry with its insertion time for TTL checks
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub transaction: EnhancedTransaction,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Seconds left before expiry
    pub fn remaining_ttl(&self) -> u64 {
        self.ttl.saturating_sub(self.created_at.elapsed()).as_secs()
    }
}

#[derive(Clone)]
pub struct TransactionCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl TransactionCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Cached transaction if present and not expired; expired entries are evicted
    pub fn get(&self, id: &str) -> Option<EnhancedTransaction> {
        if let Some(entry) = self.store.get(id) {
            if entry.is_expired() {
                drop(entry); // release the shard read lock before removing
                self.store.remove(id);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("📭 CACHE MISS (expired): {}", id);
                None
            } else {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("✅ CACHE HIT: {} (TTL: {}s remaining)", id, entry.remaining_ttl());
                Some(entry.transaction.clone())
            }
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", id);
            None
        }
    }

    pub fn insert(&self, transaction: EnhancedTransaction) {
        if !self.store.contains_key(&transaction.id) {
            self.make_room(1);
        }
        self.store_entry(transaction);
    }

    /// Cache a batch; a batch larger than the capacity keeps only its tail
    pub fn insert_many(&self, transactions: &[EnhancedTransaction]) {
        let skip = transactions.len().saturating_sub(self.max_entries);
        let batch = &transactions[skip..];

        self.make_room(batch.len());
        for transaction in batch {
            self.store_entry(transaction.clone());
        }
        info!(
            "💾 CACHE SET: {} transactions (TTL: {}s)",
            batch.len(),
            self.ttl.as_secs()
        );
    }

    fn store_entry(&self, transaction: EnhancedTransaction) {
        let entry = CacheEntry {
            created_at: Instant::now(),
            ttl: self.ttl,
            transaction,
        };
        self.store.insert(entry.transaction.id.clone(), entry);
    }

    /// Free space for `incoming` entries: expired first, then oldest
    fn make_room(&self, incoming: usize) {
        if self.store.len() + incoming <= self.max_entries {
            return;
        }
        self.cleanup_expired();

        let excess = (self.store.len() + incoming).saturating_sub(self.max_entries);
        if excess == 0 {
            return;
        }

        let mut by_age: Vec<(String, Instant)> = self
            .store
            .iter()
            .map(|entry| (entry.key().clone(), entry.created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);

        let mut evicted = 0;
        for (id, _) in by_age.into_iter().take(excess) {
            if self.store.remove(&id).is_some() {
                evicted += 1;
            }
        }
        info!(
            "♻️ CACHE EVICT: {} oldest entries (capacity {})",
            evicted, self.max_entries
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            info!("🧹 CACHE CLEANUP: {} expired entries removed", removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl.as_secs(),
            max_entries: self.max_entries,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Percentage of lookups that hit
    pub hit_rate: f64,
    pub ttl_secs: u64,
    pub max_entries: usize,
}
