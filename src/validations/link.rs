use std::time::Duration;

use url::Url;

use crate::errors::ServiceError;
use crate::services::{DEFAULT_TTL, MAX_TTL, MAX_URL_LEN, MIN_TTL};

/// Validates a long URL before anything is stored:
/// - At most 2048 characters
/// - No control characters and no surrounding whitespace, which the parser
///   would strip but the stored string would keep
/// - Absolute, with an `http` or `https` scheme and a non-empty host
pub fn validate_long_url(url_str: &str) -> Result<(), ServiceError> {
    if url_str.chars().count() > MAX_URL_LEN {
        return Err(ServiceError::UrlTooLong);
    }

    if url_str.trim() != url_str || url_str.chars().any(|c| c.is_control()) {
        return Err(ServiceError::InvalidUrl);
    }

    let url = Url::parse(url_str).map_err(|_| ServiceError::InvalidUrl)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ServiceError::InvalidUrl);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ServiceError::InvalidUrl),
    }
}

/// Turns the requested TTL into a duration; both bounds are inclusive
pub fn resolve_ttl(ttl_seconds: Option<i64>) -> Result<Duration, ServiceError> {
    let Some(seconds) = ttl_seconds else {
        return Ok(DEFAULT_TTL);
    };

    let seconds = u64::try_from(seconds).map_err(|_| ServiceError::InvalidTtl)?;
    let ttl = Duration::from_secs(seconds);
    if ttl < MIN_TTL || ttl > MAX_TTL {
        return Err(ServiceError::InvalidTtl);
    }

    Ok(ttl)
}
