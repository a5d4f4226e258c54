//! AWS SDK implementations of the cloud capability traits.
//!
//! [`DatabaseClient`](super::DatabaseClient) is implemented for the RDS
//! client, [`OrchestrationClient`](super::OrchestrationClient) for the ECS
//! client and [`LogClient`](super::LogClient) for the `CloudWatch` Logs client.
//! SDK responses are converted into the types in [`super::model`] so the rest
//! of the crate stays SDK-agnostic.

mod ecs;
mod logs;
mod rds;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ecs::error::DisplayErrorContext;

use crate::config::DeployConfig;
use crate::error::RemoteError;

/// The three long-lived service clients shared by every step.
#[derive(Debug, Clone)]
pub struct AwsClients {
    /// RDS client in the database region.
    pub database: aws_sdk_rds::Client,
    /// ECS client in the orchestration region.
    pub orchestration: aws_sdk_ecs::Client,
    /// `CloudWatch` Logs client in the orchestration region.
    pub logs: aws_sdk_cloudwatchlogs::Client,
}

impl AwsClients {
    /// Build clients from the default credential chain.
    ///
    /// ECS and `CloudWatch` Logs share the ECS region; RDS uses its own.
    pub async fn connect(config: &DeployConfig) -> Self {
        let ecs_config = load_sdk_config(&config.ecs.region).await;
        let rds_config = load_sdk_config(&config.rds.region).await;

        Self {
            database: aws_sdk_rds::Client::new(&rds_config),
            orchestration: aws_sdk_ecs::Client::new(&ecs_config),
            logs: aws_sdk_cloudwatchlogs::Client::new(&ecs_config),
        }
    }
}

async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_owned()))
        .load()
        .await
}

/// Render an SDK error with its full cause chain.
fn request_failed(operation: &'static str, error: impl std::error::Error) -> RemoteError {
    RemoteError::RequestFailed {
        operation,
        message: DisplayErrorContext(error).to_string(),
    }
}
