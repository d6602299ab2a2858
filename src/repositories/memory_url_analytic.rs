// src/repositories/memory_url_analytic.rs - In-process analytic store
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};

use super::{Result, UrlAnalyticRepositoryTrait};
use crate::errors::RepositoryError;
use crate::models::{NewUrlAnalytic, UrlAnalytic};

/// Analytic store kept in process memory, keyed by identifier.
///
/// Each record is mutated under its shard lock, which gives the same
/// no-lost-increment guarantee as the single-statement SQL update.
#[derive(Debug, Default)]
pub struct MemoryUrlAnalyticRepository {
    records: DashMap<u64, UrlAnalytic>,
    row_ids: AtomicI64,
}

impl MemoryUrlAnalyticRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlAnalyticRepositoryTrait for MemoryUrlAnalyticRepository {
    async fn create(&self, analytic: &NewUrlAnalytic) -> Result<i64> {
        match self.records.entry(analytic.url_id) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "analytics for url {} already exist",
                analytic.url_id
            ))),
            Entry::Vacant(slot) => {
                let id = self.row_ids.fetch_add(1, Ordering::SeqCst) + 1;
                slot.insert(analytic.clone().into_record(id));
                Ok(id)
            }
        }
    }

    async fn find_by_url_id(&self, url_id: u64) -> Result<UrlAnalytic> {
        self.records
            .get(&url_id)
            .map(|record| record.clone())
            .ok_or_else(|| RepositoryError::NotFound(format!("analytics for url {}", url_id)))
    }

    async fn update_stat(&self, url_id: u64, observed_at: DateTime<Utc>) -> Result<()> {
        let mut record = self
            .records
            .get_mut(&url_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("analytics for url {}", url_id)))?;

        record.click_count += 1;
        record.last_accessed_at = Some(match record.last_accessed_at {
            Some(previous) => previous.max(observed_at),
            None => observed_at,
        });
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
