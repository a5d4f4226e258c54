//! Database snapshot issuance.

use chrono::{DateTime, Utc};
use tracing::info;

use super::Deployer;
use crate::cloud::{DatabaseClient, LogClient, OrchestrationClient};
use crate::error::Result;

/// Build a snapshot identifier of the form `prefix-YYYYMMDD-HHMMSS`.
#[must_use]
pub fn snapshot_identifier(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}", now.format("%Y%m%d-%H%M%S"))
}

impl<D, O, L> Deployer<'_, D, O, L>
where
    D: DatabaseClient + ?Sized,
    O: OrchestrationClient + ?Sized,
    L: LogClient + ?Sized,
{
    /// Start a snapshot of the configured cluster and return its identifier.
    pub(super) async fn start_snapshot(&self) -> Result<String> {
        let rds = &self.config.rds;
        let snapshot_id = snapshot_identifier(&rds.snapshot_prefix, Utc::now());
        let snapshot = self
            .database
            .create_cluster_snapshot(&snapshot_id, &rds.cluster_id)
            .await?;
        info!(response = ?snapshot, "creating database snapshot");
        Ok(snapshot_id)
    }
}
