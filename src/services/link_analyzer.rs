// src/services/link_analyzer.rs - Click analytics lookup
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::{lookup_error, Result};
use crate::errors::ServiceError;
use crate::models::UrlAnalytic;
use crate::repositories::UrlAnalyticRepositoryTrait;
use crate::utils::decode;

#[async_trait]
pub trait LinkAnalyzerServiceTrait {
    /// Fetches the analytic record behind a short code. Works after the
    /// link itself has expired.
    ///
    /// ### Errors
    /// * `ServiceError::NotFound` - If the code does not decode or has no record
    /// * `ServiceError::Store` - If the durable store cannot be read
    async fn analyze(&self, short_code: &str) -> Result<UrlAnalytic>;
}

pub struct LinkAnalyzerService<A: ?Sized> {
    analytics: Arc<A>,
}

impl<A: ?Sized> LinkAnalyzerService<A> {
    pub fn new(analytics: Arc<A>) -> Self {
        Self { analytics }
    }
}

#[async_trait]
impl<A> LinkAnalyzerServiceTrait for LinkAnalyzerService<A>
where
    A: UrlAnalyticRepositoryTrait + ?Sized,
{
    async fn analyze(&self, short_code: &str) -> Result<UrlAnalytic> {
        let url_id = decode(short_code).map_err(|_| ServiceError::NotFound)?;

        let analytic = self
            .analytics
            .find_by_url_id(url_id)
            .await
            .map_err(lookup_error)?;

        debug!(
            "Stats for '{}': {} clicks",
            short_code, analytic.click_count
        );
        Ok(analytic)
    }
}
