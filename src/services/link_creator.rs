// src/services/link_creator.rs - Short link creation
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use log::{info, warn};

use super::Result;
use crate::models::NewUrlAnalytic;
use crate::repositories::{UrlAnalyticRepositoryTrait, UrlCacheRepositoryTrait};
use crate::utils::encode;
use crate::validations::{resolve_ttl, validate_long_url};

#[async_trait]
pub trait LinkCreatorServiceTrait {
    /// Validates the input, stores the mapping and seeds its analytics.
    ///
    /// ### Arguments
    /// * `long_url` - Absolute http(s) URL, at most 2048 characters
    /// * `ttl_seconds` - Lifetime of the link; 24 hours when absent
    ///
    /// ### Returns
    /// * `Result<String>` - The short code for the new link
    ///
    /// ### Errors
    /// * `ServiceError::UrlTooLong` / `ServiceError::InvalidUrl` / `ServiceError::InvalidTtl`
    /// * `ServiceError::Store` - If either store write fails. A cache entry
    ///   written before a failed durable write is left in place.
    async fn create(&self, long_url: &str, ttl_seconds: Option<i64>) -> Result<String>;
}

pub struct LinkCreatorService<C: ?Sized, A: ?Sized> {
    cache: Arc<C>,
    analytics: Arc<A>,
}

impl<C: ?Sized, A: ?Sized> LinkCreatorService<C, A> {
    pub fn new(cache: Arc<C>, analytics: Arc<A>) -> Self {
        Self { cache, analytics }
    }
}

#[async_trait]
impl<C, A> LinkCreatorServiceTrait for LinkCreatorService<C, A>
where
    C: UrlCacheRepositoryTrait + ?Sized,
    A: UrlAnalyticRepositoryTrait + ?Sized,
{
    async fn create(&self, long_url: &str, ttl_seconds: Option<i64>) -> Result<String> {
        validate_long_url(long_url)?;
        let ttl = resolve_ttl(ttl_seconds)?;

        let created_at = Utc::now();
        let expires_at = created_at + ChronoDuration::seconds(ttl.as_secs() as i64);

        let url_id = self.cache.create(long_url, ttl).await?;

        let seed = NewUrlAnalytic {
            url_id,
            long_url: long_url.to_string(),
            created_at,
            expires_at,
        };
        if let Err(e) = self.analytics.create(&seed).await {
            warn!(
                "Analytics seed failed for url {}; its cache entry stays live until {}: {}",
                url_id, expires_at, e
            );
            return Err(e.into());
        }

        let short_code = encode(url_id);
        info!("Created short code '{}' expiring at {}", short_code, expires_at);
        Ok(short_code)
    }
}
