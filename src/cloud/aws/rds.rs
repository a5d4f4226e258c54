//! RDS cluster snapshot operations.

use aws_sdk_rds::types::DbClusterSnapshot;

use super::request_failed;
use crate::cloud::{CloudFuture, DatabaseClient, SnapshotDescription};
use crate::error::RemoteError;

const CREATE_SNAPSHOT: &str = "CreateDBClusterSnapshot";
const DESCRIBE_SNAPSHOTS: &str = "DescribeDBClusterSnapshots";

impl DatabaseClient for aws_sdk_rds::Client {
    fn create_cluster_snapshot(
        &self,
        snapshot_id: &str,
        cluster_id: &str,
    ) -> CloudFuture<'_, SnapshotDescription> {
        let snapshot_id_owned = String::from(snapshot_id);
        let cluster_id_owned = String::from(cluster_id);
        Box::pin(async move {
            let output = Self::create_db_cluster_snapshot(self)
                .db_cluster_snapshot_identifier(&snapshot_id_owned)
                .db_cluster_identifier(cluster_id_owned)
                .send()
                .await
                .map_err(|e| request_failed(CREATE_SNAPSHOT, e))?;

            output
                .db_cluster_snapshot()
                .map(|snapshot| snapshot_from_sdk(snapshot, &snapshot_id_owned))
                .ok_or(RemoteError::MissingField {
                    operation: CREATE_SNAPSHOT,
                    field: "DBClusterSnapshot",
                })
        })
    }

    fn describe_cluster_snapshot(&self, snapshot_id: &str) -> CloudFuture<'_, SnapshotDescription> {
        let snapshot_id_owned = String::from(snapshot_id);
        Box::pin(async move {
            let output = Self::describe_db_cluster_snapshots(self)
                .db_cluster_snapshot_identifier(&snapshot_id_owned)
                .send()
                .await
                .map_err(|e| request_failed(DESCRIBE_SNAPSHOTS, e))?;

            output
                .db_cluster_snapshots()
                .first()
                .map(|snapshot| snapshot_from_sdk(snapshot, &snapshot_id_owned))
                .ok_or(RemoteError::MissingField {
                    operation: DESCRIBE_SNAPSHOTS,
                    field: "DBClusterSnapshots",
                })
        })
    }
}

fn snapshot_from_sdk(snapshot: &DbClusterSnapshot, requested_id: &str) -> SnapshotDescription {
    SnapshotDescription {
        identifier: snapshot
            .db_cluster_snapshot_identifier()
            .unwrap_or(requested_id)
            .to_owned(),
        status: snapshot.status().map(String::from),
    }
}
