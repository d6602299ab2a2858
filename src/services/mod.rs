use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

mod link_analyzer;
mod link_creator;
mod link_redirector;

pub use link_analyzer::{LinkAnalyzerService, LinkAnalyzerServiceTrait};
pub use link_creator::{LinkCreatorService, LinkCreatorServiceTrait};
pub use link_redirector::{LinkRedirectorService, LinkRedirectorServiceTrait};

use crate::errors::{RepositoryError, ServiceError};
use crate::metrics::Metrics;
use crate::repositories::{UrlAnalyticRepositoryTrait, UrlCacheRepositoryTrait};

/// TTL applied when the caller does not ask for one
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const MIN_TTL: Duration = Duration::from_secs(60 * 60);
pub const MAX_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Longest accepted long URL, in characters
pub const MAX_URL_LEN: usize = 2048;

pub type Result<T> = std::result::Result<T, ServiceError>;

pub type LinkCreatorServiceType =
    LinkCreatorService<dyn UrlCacheRepositoryTrait, dyn UrlAnalyticRepositoryTrait>;
pub type LinkRedirectorServiceType =
    LinkRedirectorService<dyn UrlCacheRepositoryTrait, dyn UrlAnalyticRepositoryTrait>;
pub type LinkAnalyzerServiceType = LinkAnalyzerService<dyn UrlAnalyticRepositoryTrait>;

/// A miss in either store means the code does not resolve
fn lookup_error(err: RepositoryError) -> ServiceError {
    if err.is_not_found() {
        ServiceError::NotFound
    } else {
        ServiceError::Store(err)
    }
}

/// Service Register
pub fn register(
    cache: Arc<dyn UrlCacheRepositoryTrait>,
    analytics: Arc<dyn UrlAnalyticRepositoryTrait>,
    metrics: Arc<Metrics>,
    cfg: &mut web::ServiceConfig,
) {
    let creator: LinkCreatorServiceType =
        LinkCreatorService::new(Arc::clone(&cache), Arc::clone(&analytics));
    let redirector: LinkRedirectorServiceType =
        LinkRedirectorService::new(cache, Arc::clone(&analytics), metrics);
    let analyzer: LinkAnalyzerServiceType = LinkAnalyzerService::new(analytics);

    cfg.app_data(web::Data::new(creator))
        .app_data(web::Data::new(redirector))
        .app_data(web::Data::new(analyzer));
}
