// src/models/url_analytic.rs - Durable click analytics
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted analytics for one link, keyed by its identifier.
///
/// Outlives the cache entry: it is still readable after the short link
/// itself has expired.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UrlAnalytic {
    /// Row id assigned by the durable store
    pub id: i64,

    /// Identifier allocated by the cache store; the short code encodes it
    #[sqlx(try_from = "i64")]
    pub url_id: u64,

    /// Long URL as it was at creation time
    pub long_url: String,

    pub created_at: DateTime<Utc>,

    /// When the cache entry was scheduled to expire
    pub expires_at: DateTime<Utc>,

    /// Number of recorded redirects, never decreases
    #[sqlx(try_from = "i64")]
    pub click_count: u64,

    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// Seed for a fresh analytic record; click count starts at zero
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlAnalytic {
    pub url_id: u64,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewUrlAnalytic {
    /// Materialise the record with the row id the store assigned
    pub fn into_record(self, id: i64) -> UrlAnalytic {
        UrlAnalytic {
            id,
            url_id: self.url_id,
            long_url: self.long_url,
            created_at: self.created_at,
            expires_at: self.expires_at,
            click_count: 0,
            last_accessed_at: None,
        }
    }
}
