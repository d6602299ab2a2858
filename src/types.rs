use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::repositories::{UrlAnalyticRepositoryTrait, UrlCacheRepositoryTrait};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// Define an AppState struct to hold shared application state
pub struct AppState {
    pub start_time: Instant,
    pub version: String,
    pub cache: Arc<dyn UrlCacheRepositoryTrait>,
    pub analytics: Arc<dyn UrlAnalyticRepositoryTrait>,
}
