use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{Observation, SiteTotal};
use crate::domain::error::DomainError;
use crate::domain::window::Window;
use crate::infra::storage::entity;

/// Domain service for the usage ledger.
///
/// Holds the injected connection pool; all shared mutable state lives in
/// the storage layer, so calls may run concurrently without coordination.
pub struct Service {
    db: DatabaseConnection,
}

impl Service {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record that `user_id` spent `obs.seconds` additional seconds on
    /// `obs.website_url` today (UTC calendar day).
    #[instrument(name = "usage_tracking.service.record", skip(self, obs), fields(user_id = %user_id, website_url = %obs.website_url))]
    pub async fn record(&self, user_id: Uuid, obs: Observation) -> Result<(), DomainError> {
        debug!("Recording observation");

        self.validate_observation(&obs)?;

        // Resolve the day once so a track call straddling midnight lands
        // entirely in one bucket.
        let today = Utc::now().date_naive();

        entity::upsert_observation(
            &self.db,
            entity::NewObservationEntity {
                user_id,
                website_url: obs.website_url,
                website_title: obs.website_title,
                visit_date: today,
                seconds: obs.seconds,
            },
        )
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        debug!("Observation recorded");
        Ok(())
    }

    /// Per-site totals for the given window, ordered by descending total.
    /// An empty window yields an empty list, not an error.
    #[instrument(name = "usage_tracking.service.dashboard", skip(self), fields(user_id = %user_id))]
    pub async fn dashboard(
        &self,
        user_id: Uuid,
        window: Window,
    ) -> Result<Vec<SiteTotal>, DomainError> {
        let today = Utc::now().date_naive();
        let (from, to) = window.date_range(today);
        debug!(%from, %to, "Aggregating usage");

        let rows = entity::aggregate_totals(&self.db, user_id, from, to)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Aggregated {} sites in window", rows.len());
        Ok(rows
            .into_iter()
            .map(|r| SiteTotal {
                website_url: r.website_url,
                total_time: r.total_time,
            })
            .collect())
    }

    // --- validation helpers ---

    fn validate_observation(&self, obs: &Observation) -> Result<(), DomainError> {
        if obs.website_url.trim().is_empty() {
            return Err(DomainError::missing_website_url());
        }
        if obs.seconds < 0 {
            return Err(DomainError::invalid_duration());
        }
        Ok(())
    }
}
