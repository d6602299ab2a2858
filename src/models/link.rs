// src/models/link.rs - Request/response payloads
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UrlAnalytic;

/// Body of `POST /s`
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateLinkDto {
    #[validate(length(min = 1, message = "long_url is required"))]
    pub long_url: String,

    pub ttl_seconds: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponseDto {
    pub short_code: String,
}

/// Body of `GET /stats/{short_code}`
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkStatsResponseDto {
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub click_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl From<UrlAnalytic> for LinkStatsResponseDto {
    fn from(analytic: UrlAnalytic) -> Self {
        LinkStatsResponseDto {
            long_url: analytic.long_url,
            created_at: analytic.created_at,
            expires_at: analytic.expires_at,
            click_count: analytic.click_count,
            last_accessed_at: analytic.last_accessed_at,
        }
    }
}
