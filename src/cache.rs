use log::{info, warn};
use redis::{aio::ConnectionManager, Client, RedisError};

use crate::config::RedisConfig;

/// Represents an established, auto-reconnecting Redis connection
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with a PING
    pub async fn connect(config: &RedisConfig) -> Result<Self, RedisError> {
        info!("Initializing Redis connection");

        let client = Client::open(config.url.as_str())?;
        let mut manager = ConnectionManager::new(client).await.map_err(|e| {
            warn!("Failed to connect to Redis: {}", e);
            e
        })?;

        let _: String = redis::cmd("PING").query_async(&mut manager).await?;
        info!("Successfully connected to Redis");

        Ok(Self { manager })
    }

    /// Get a handle to the shared connection; clones are cheap
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }
}
