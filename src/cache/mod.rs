// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded, expiring memoization store for routing results.
//!
//! A [`ResultCache`] holds at most `max_entries` values. Entries older than `max_age` are
//! treated as absent and dropped on lookup; a full cache evicts the least recently
//! accessed quarter before admitting a new key. [`CacheSweeper`] removes expired entries
//! in the background so idle caches do not hold stale values.

mod key;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::debug;

pub use key::{CacheKey, Fingerprint};

/// A cached value plus its access bookkeeping.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    value: T,
    created_at: Instant,
    last_accessed_at: Instant,
    access_count: u64,
    access_seq: u64,
}

impl<T> CacheEntry<T> {
    fn new(value: T, now: Instant, seq: u64) -> Self {
        Self { value, created_at: now, last_accessed_at: now, access_count: 0, access_seq: seq }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> Instant {
        self.last_accessed_at
    }

    /// Hits served from this entry; a freshly inserted entry reads 0.
    ///
    /// Hit rates come from the cache-wide counters in [`CacheStats`], not from this count.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > max_age
    }
}

/// Point-in-time counters for one cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// `hits / (hits + misses)`, or `0.0` before the first lookup.
    pub hit_rate: f64,
}

#[derive(Debug)]
struct CacheState<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    seq: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            seq: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
        }
    }
}

impl<T> CacheState<T> {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn purge_expired(&mut self, now: Instant, max_age: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, max_age));
        let removed = before - self.entries.len();
        self.expirations += removed as u64;
        removed
    }

    /// Drops `ceil(len / 4)` entries, least recently accessed first.
    fn evict_coldest(&mut self) -> usize {
        let count = self.entries.len().div_ceil(4);
        let mut ranked = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_accessed_at, entry.access_seq, key.clone()))
            .collect::<Vec<_>>();
        ranked.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        for (_, _, key) in ranked.into_iter().take(count) {
            self.entries.remove(&key);
        }
        self.evictions += count as u64;
        count
    }
}

/// Thread-safe bounded cache, generic over the stored value.
///
/// All bookkeeping sits behind one mutex; values are cloned out, so store `Arc`s for
/// anything large.
#[derive(Debug)]
pub struct ResultCache<T> {
    name: &'static str,
    max_entries: usize,
    max_age: Duration,
    state: Mutex<CacheState<T>>,
}

impl<T: Clone> ResultCache<T> {
    pub fn new(name: &'static str, max_entries: usize, max_age: Duration) -> Self {
        Self { name, max_entries: max_entries.max(1), max_age, state: Mutex::default() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a clone of the live value for `key`, recording the access.
    pub fn get(&self, key: &CacheKey) -> Option<T> {
        let now = Instant::now();
        let mut guard = self.lock();
        let state = &mut *guard;
        let seq = state.next_seq();
        match state.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now, self.max_age) => {
                entry.last_accessed_at = now;
                entry.access_count += 1;
                entry.access_seq = seq;
                state.hits += 1;
                debug!(cache = self.name, %key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => {
                state.entries.remove(key);
                state.expirations += 1;
                debug!(cache = self.name, %key, "cache entry expired");
            }
            None => {}
        }
        state.misses += 1;
        debug!(cache = self.name, %key, "cache miss");
        None
    }

    /// True when `key` holds a live entry. Does not count as an access.
    pub fn has(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        let mut guard = self.lock();
        let state = &mut *guard;
        let expired = match state.entries.get(key) {
            None => return false,
            Some(entry) => entry.is_expired(now, self.max_age),
        };
        if expired {
            state.entries.remove(key);
            state.expirations += 1;
        }
        !expired
    }

    /// Stores `value` under `key`, evicting the coldest quarter first when a new key
    /// would overflow the cache.
    pub fn set(&self, key: CacheKey, value: T) {
        let now = Instant::now();
        let mut state = self.lock();
        if !state.entries.contains_key(&key) && state.entries.len() >= self.max_entries {
            state.purge_expired(now, self.max_age);
            if state.entries.len() >= self.max_entries {
                let evicted = state.evict_coldest();
                debug!(cache = self.name, evicted, "cache full, evicted coldest entries");
            }
        }
        let seq = state.next_seq();
        state.entries.insert(key, CacheEntry::new(value, now, seq));
    }

    /// Returns the cached value or computes, stores and returns a fresh one.
    ///
    /// `compute` runs without the lock held, so two racing callers may both compute;
    /// the later `set` wins. Errors are returned as-is and nothing is stored.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &CacheKey,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key.clone(), value.clone());
        Ok(value)
    }

    /// Snapshot of the entry for `key` without touching its access bookkeeping.
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry<T>> {
        self.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every expired entry; returns how many were removed.
    pub fn clean_expired(&self) -> usize {
        let removed = self.lock().purge_expired(Instant::now(), self.max_age);
        if removed > 0 {
            debug!(cache = self.name, removed, "swept expired cache entries");
        }
        removed
    }

    /// Drops all entries. Counters are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let lookups = state.hits + state.misses;
        CacheStats {
            size: state.entries.len(),
            max_entries: self.max_entries,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
            expirations: state.expirations,
            hit_rate: if lookups == 0 { 0.0 } else { state.hits as f64 / lookups as f64 },
        }
    }
}

/// A cache that can drop its expired entries on demand.
pub trait Sweep: Send + Sync {
    fn sweep_name(&self) -> &str;

    fn sweep(&self) -> usize;
}

impl<T: Clone + Send> Sweep for ResultCache<T> {
    fn sweep_name(&self) -> &str {
        self.name
    }

    fn sweep(&self) -> usize {
        self.clean_expired()
    }
}

/// Background task that sweeps a set of caches on a fixed interval.
///
/// Dropping the sweeper aborts the task.
#[derive(Debug)]
pub struct CacheSweeper {
    handle: JoinHandle<()>,
}

impl CacheSweeper {
    /// Spawns the sweep loop on the current tokio runtime.
    pub fn spawn(caches: Vec<Arc<dyn Sweep>>, interval: Duration) -> Self {
        let period = interval.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                for cache in &caches {
                    let removed = cache.sweep();
                    if removed > 0 {
                        debug!(cache = cache.sweep_name(), removed, "periodic sweep");
                    }
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for CacheSweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
