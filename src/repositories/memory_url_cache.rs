// src/repositories/memory_url_cache.rs - In-process cache store
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use super::{Result, UrlCacheRepositoryTrait};
use crate::errors::RepositoryError;

/// How often `create` sweeps out expired entries nobody asked for again
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct Entry {
    long_url: String,
    expires_at: Instant,
}

impl Entry {
    fn new(long_url: &str, ttl: Duration) -> Self {
        Self {
            long_url: long_url.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Cache store kept in process memory.
///
/// Meant for tests and single-instance deployments: the sequence and the
/// mappings are lost on restart. Expired entries are dropped on read, and
/// `create` sweeps the whole map at most once per sweep interval.
#[derive(Debug)]
pub struct MemoryUrlCacheRepository {
    entries: DashMap<u64, Entry>,
    sequence: AtomicU64,
    sweep_interval: Duration,
    last_sweep: Mutex<Instant>,
}

impl Default for MemoryUrlCacheRepository {
    fn default() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }
}

impl MemoryUrlCacheRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            sequence: AtomicU64::new(0),
            sweep_interval,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Drops every expired entry if the last sweep is old enough. Callers
    /// racing a sweep in progress skip it instead of waiting.
    fn sweep_expired(&self) {
        let Ok(mut last_sweep) = self.last_sweep.try_lock() else {
            return;
        };
        if last_sweep.elapsed() < self.sweep_interval {
            return;
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        *last_sweep = Instant::now();
        debug!("Swept {} expired urls", before.saturating_sub(self.entries.len()));
    }

    /// Entries held, live or not yet swept
    #[cfg(test)]
    fn stored(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl UrlCacheRepositoryTrait for MemoryUrlCacheRepository {
    async fn create(&self, long_url: &str, ttl: Duration) -> Result<u64> {
        self.sweep_expired();

        // First id is 1, same as INCR on a missing key
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries.insert(id, Entry::new(long_url, ttl));
        debug!("Stored url {} with ttl {:?}", id, ttl);
        Ok(id)
    }

    async fn get(&self, id: u64) -> Result<String> {
        let live = self
            .entries
            .get(&id)
            .and_then(|entry| (!entry.is_expired()).then(|| entry.long_url.clone()));

        match live {
            Some(long_url) => Ok(long_url),
            None => {
                self.entries.remove_if(&id, |_, entry| entry.is_expired());
                Err(RepositoryError::NotFound(format!(
                    "url {} not found or expired",
                    id
                )))
            }
        }
    }

    async fn set(&self, id: u64, long_url: &str, ttl: Duration) -> Result<()> {
        self.entries.insert(id, Entry::new(long_url, ttl));
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.entries.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
