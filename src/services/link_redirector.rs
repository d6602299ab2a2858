// src/services/link_redirector.rs - Code resolution and visit recording
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error};

use super::{lookup_error, Result};
use crate::errors::ServiceError;
use crate::metrics::Metrics;
use crate::repositories::{UrlAnalyticRepositoryTrait, UrlCacheRepositoryTrait};
use crate::utils::decode;

#[async_trait]
pub trait LinkRedirectorServiceTrait {
    /// Resolves a short code to its long URL.
    ///
    /// The visit is recorded in the background; its outcome never reaches
    /// the caller and a failed update is not retried.
    ///
    /// ### Errors
    /// * `ServiceError::NotFound` - If the code does not decode, never existed or has expired
    /// * `ServiceError::Store` - If the cache cannot be read
    async fn redirect(&self, short_code: &str) -> Result<String>;
}

pub struct LinkRedirectorService<C: ?Sized, A: ?Sized> {
    cache: Arc<C>,
    analytics: Arc<A>,
    metrics: Arc<Metrics>,
}

impl<C: ?Sized, A: ?Sized> LinkRedirectorService<C, A> {
    pub fn new(cache: Arc<C>, analytics: Arc<A>, metrics: Arc<Metrics>) -> Self {
        Self {
            cache,
            analytics,
            metrics,
        }
    }
}

impl<C, A> LinkRedirectorService<C, A>
where
    C: ?Sized,
    A: UrlAnalyticRepositoryTrait + ?Sized + 'static,
{
    /// Detached from the request: the task keeps running if the client goes away
    fn record_visit(&self, url_id: u64) {
        let analytics = Arc::clone(&self.analytics);
        let metrics = Arc::clone(&self.metrics);
        let observed_at = Utc::now();

        metrics.analytics_updates_in_flight.inc();
        tokio::spawn(async move {
            if let Err(e) = analytics.update_stat(url_id, observed_at).await {
                error!("Dropped visit for url {} at {}: {}", url_id, observed_at, e);
                metrics.analytics_update_failures_total.inc();
            }
            metrics.analytics_updates_in_flight.dec();
        });
    }
}

#[async_trait]
impl<C, A> LinkRedirectorServiceTrait for LinkRedirectorService<C, A>
where
    C: UrlCacheRepositoryTrait + ?Sized,
    A: UrlAnalyticRepositoryTrait + ?Sized + 'static,
{
    async fn redirect(&self, short_code: &str) -> Result<String> {
        let url_id = decode(short_code).map_err(|_| {
            debug!("Rejected undecodable code '{}'", short_code);
            ServiceError::NotFound
        })?;

        let long_url = self.cache.get(url_id).await.map_err(lookup_error)?;

        self.record_visit(url_id);
        Ok(long_url)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::errors::RepositoryError;
    use crate::repositories::{MockUrlAnalyticRepositoryTrait, MockUrlCacheRepositoryTrait};

    fn service(
        cache: MockUrlCacheRepositoryTrait,
        analytics: MockUrlAnalyticRepositoryTrait,
        metrics: Arc<Metrics>,
    ) -> LinkRedirectorService<MockUrlCacheRepositoryTrait, MockUrlAnalyticRepositoryTrait> {
        LinkRedirectorService::new(Arc::new(cache), Arc::new(analytics), metrics)
    }

    #[tokio::test]
    async fn test_redirect_returns_url_and_records_visit() {
        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache
            .expect_get()
            .withf(|id| *id == 4096)
            .times(1)
            .returning(|_| Ok("https://example.com".to_string()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut analytics = MockUrlAnalyticRepositoryTrait::new();
        analytics
            .expect_update_stat()
            .withf(|id, _| *id == 4096)
            .times(1)
            .returning(move |_, observed_at| {
                let _ = tx.send(observed_at);
                Ok(())
            });

        let before = Utc::now();
        let svc = service(cache, analytics, Arc::new(Metrics::new().unwrap()));
        let long_url = svc.redirect("hggg").await.unwrap();
        assert_eq!(long_url, "https://example.com");

        let observed_at = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(observed_at >= before);
    }

    #[tokio::test]
    async fn test_undecodable_code_touches_no_store() {
        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache.expect_get().never();
        let mut analytics = MockUrlAnalyticRepositoryTrait::new();
        analytics.expect_update_stat().never();

        let svc = service(cache, analytics, Arc::new(Metrics::new().unwrap()));
        for code in ["", "xyz", "0", "g1", "AB"] {
            assert!(matches!(svc.redirect(code).await, Err(ServiceError::NotFound)));
        }
    }

    #[tokio::test]
    async fn test_cache_miss_is_not_found_and_records_nothing() {
        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache
            .expect_get()
            .returning(|id| Err(RepositoryError::NotFound(format!("url {}", id))));
        let mut analytics = MockUrlAnalyticRepositoryTrait::new();
        analytics.expect_update_stat().never();

        let svc = service(cache, analytics, Arc::new(Metrics::new().unwrap()));
        assert!(matches!(svc.redirect("fffff").await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_cache_outage_is_a_store_error() {
        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache
            .expect_get()
            .returning(|_| Err(RepositoryError::Unavailable("cache down".into())));
        let analytics = MockUrlAnalyticRepositoryTrait::new();

        let svc = service(cache, analytics, Arc::new(Metrics::new().unwrap()));
        assert!(matches!(svc.redirect("2").await, Err(ServiceError::Store(_))));
    }

    #[tokio::test]
    async fn test_failed_update_still_redirects_and_is_counted() {
        let mut cache = MockUrlCacheRepositoryTrait::new();
        cache
            .expect_get()
            .returning(|_| Ok("https://example.com".to_string()));
        let mut analytics = MockUrlAnalyticRepositoryTrait::new();
        analytics
            .expect_update_stat()
            .times(1)
            .returning(|_, _| Err(RepositoryError::Unavailable("db down".into())));

        let metrics = Arc::new(Metrics::new().unwrap());
        let svc = service(cache, analytics, metrics.clone());
        assert_eq!(svc.redirect("2").await.unwrap(), "https://example.com");

        for _ in 0..200 {
            if metrics.analytics_update_failures_total.get() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(metrics.analytics_update_failures_total.get(), 1);
    }
}
