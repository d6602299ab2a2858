// src/repositories/redis_url_cache.rs - Redis-backed cache store
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use redis::{aio::ConnectionManager, AsyncCommands};

use super::{Result, UrlCacheRepositoryTrait};
use crate::cache::RedisCache;
use crate::errors::RepositoryError;

const URL_ID_SEQUENCE_KEY: &str = "url_id_sequence";
const URL_KEY_PREFIX: &str = "url:";

fn url_key(id: u64) -> String {
    format!("{}{}", URL_KEY_PREFIX, id)
}

/// Redis keeps the expiry natively; sub-second TTLs round up to one second
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

pub struct RedisUrlCacheRepository {
    conn: ConnectionManager,
}

impl RedisUrlCacheRepository {
    pub fn new(cache: &RedisCache) -> Self {
        Self {
            conn: cache.connection(),
        }
    }
}

#[async_trait]
impl UrlCacheRepositoryTrait for RedisUrlCacheRepository {
    async fn create(&self, long_url: &str, ttl: Duration) -> Result<u64> {
        let mut conn = self.conn.clone();

        let id: u64 = conn.incr(URL_ID_SEQUENCE_KEY, 1).await.map_err(|e| {
            error!("Failed to allocate url id: {}", e);
            RepositoryError::Cache(e)
        })?;

        // The id is spent even if this write fails; it is never retried
        // under the same id.
        let _: () = conn
            .set_ex(url_key(id), long_url, ttl_seconds(ttl))
            .await
            .map_err(|e| {
                error!("Failed to store url {} (id is now unused): {}", id, e);
                RepositoryError::Cache(e)
            })?;

        debug!("Stored url {} with ttl {:?}", id, ttl);
        Ok(id)
    }

    async fn get(&self, id: u64) -> Result<String> {
        let mut conn = self.conn.clone();
        let long_url: Option<String> = conn.get(url_key(id)).await?;

        long_url.ok_or_else(|| RepositoryError::NotFound(format!("url {} not found or expired", id)))
    }

    async fn set(&self, id: u64, long_url: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(url_key(id), long_url, ttl_seconds(ttl)).await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(url_key(id)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
