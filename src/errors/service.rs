use thiserror::Error;

use super::RepositoryError;

/// Failures of the link lifecycle operations.
///
/// Validation variants are raised before any store is touched. `NotFound`
/// covers undecodable codes, cache misses, expired links and missing
/// analytic rows alike.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid URL: must be a valid HTTP or HTTPS URL")]
    InvalidUrl,

    #[error("URL too long: maximum length is 2048 characters")]
    UrlTooLong,

    #[error("invalid TTL: must be between 1 hour and 1 week")]
    InvalidTtl,

    #[error("short code not found or expired")]
    NotFound,

    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidUrl | Self::UrlTooLong | Self::InvalidTtl)
    }
}
