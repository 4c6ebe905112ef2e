//! TTL cache of decoded curves, keyed by curve account
//!
//! Sits in front of the pricing core: a hit skips the RPC read, an expired or
//! evicted entry forces a re-read of ground truth.

use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use curve_model::ReserveCurve;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    curve: ReserveCurve,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct CurveCache {
    ttl: Duration,
    entries: HashMap<Pubkey, CacheEntry>,
}

impl CurveCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    /// Fresh curve for `address` as of `now`
    pub fn get(&self, address: &Pubkey, now: Instant) -> Option<ReserveCurve> {
        let entry = self.entries.get(address)?;
        if now.saturating_duration_since(entry.fetched_at) < self.ttl {
            Some(entry.curve)
        } else {
            None
        }
    }

    pub fn insert(&mut self, address: Pubkey, curve: ReserveCurve, now: Instant) {
        self.entries.insert(address, CacheEntry { curve, fetched_at: now });
    }

    /// Drop the entry for `address`; returns whether one existed
    pub fn evict(&mut self, address: &Pubkey) -> bool {
        self.entries.remove(address).is_some()
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
