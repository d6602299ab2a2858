// src/repositories/mod.rs - Store ports and their adapters
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::errors::RepositoryError;
use crate::models::{NewUrlAnalytic, UrlAnalytic};

mod memory_url_analytic;
mod memory_url_cache;
mod pg_url_analytic;
mod redis_url_cache;


pub use memory_url_analytic::MemoryUrlAnalyticRepository;
pub use memory_url_cache::MemoryUrlCacheRepository;
pub use pg_url_analytic::PgUrlAnalyticRepository;
pub use redis_url_cache::RedisUrlCacheRepository;

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Ephemeral id -> long URL mappings with per-key expiry.
///
/// Implementations must allocate identifiers from an atomic, globally
/// ordered counter: concurrent callers never see the same id twice.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UrlCacheRepositoryTrait: Send + Sync {
    /// Allocates a fresh identifier and stores the mapping under it
    ///
    /// ### Arguments
    /// * `long_url` - The URL to map
    /// * `ttl` - How long the mapping stays readable
    ///
    /// ### Returns
    /// * `Result<u64>` - The allocated identifier
    ///
    /// ### Errors
    /// * `RepositoryError::Cache` - If allocation or the write fails. An
    ///   identifier allocated before a failed write is never handed out again.
    async fn create(&self, long_url: &str, ttl: Duration) -> Result<u64>;

    /// Looks up the long URL for an identifier
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If the mapping never existed or has expired
    async fn get(&self, id: u64) -> Result<String>;

    /// Writes a mapping directly, replacing any existing one
    async fn set(&self, id: u64, long_url: &str, ttl: Duration) -> Result<()>;

    /// Removes a mapping before its natural expiry
    async fn delete(&self, id: u64) -> Result<()>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<()>;
}

/// One analytic record per identifier, independent of cache expiry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UrlAnalyticRepositoryTrait: Send + Sync {
    /// Persists a fresh record with a zero click count
    ///
    /// ### Returns
    /// * `Result<i64>` - The row id assigned by the store
    ///
    /// ### Errors
    /// * `RepositoryError::Conflict` - If a record already exists for the identifier
    /// * `RepositoryError::Database` - If a database error occurs
    async fn create(&self, analytic: &NewUrlAnalytic) -> Result<i64>;

    /// Fetches the record for an identifier
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If no record exists
    /// * `RepositoryError::Database` - If a database error occurs
    async fn find_by_url_id(&self, url_id: u64) -> Result<UrlAnalytic>;

    /// Counts one visit observed at `observed_at`.
    ///
    /// The increment happens atomically inside the store, so concurrent
    /// visits are never lost. `last_accessed_at` never moves backwards.
    ///
    /// ### Errors
    /// * `RepositoryError::NotFound` - If no record exists
    /// * `RepositoryError::Database` - If a database error occurs
    async fn update_stat(&self, url_id: u64, observed_at: DateTime<Utc>) -> Result<()>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<()>;
}
