//! Capability seams for the managed cloud services.
//!
//! Deployment logic never talks to an SDK directly. It depends on three small
//! traits: [`DatabaseClient`] for cluster snapshots, [`OrchestrationClient`]
//! for one-off tasks and service updates, and [`LogClient`] for container
//! logs. The [`aws`] module implements them on the AWS SDK; tests substitute
//! mocks or recording fakes.
//!
//! Methods return boxed futures so implementors stay object-safe and
//! mockable. Implementations copy borrowed arguments into the future.

pub mod aws;
#[cfg(test)]
pub(crate) mod mocks;
mod model;

use futures_util::future::BoxFuture;

pub use model::{
    ContainerDefinition, ContainerOverride, ContainerState, LogConfiguration, LogEvent,
    RemoteFailure, RunTaskOutput, RunTaskRequest, ServiceDescription, ServiceDescriptions,
    SnapshotDescription, TaskDescription, TaskDescriptions, TaskNetwork,
};

use crate::error::RemoteError;

/// Boxed future returned by every cloud client method.
pub type CloudFuture<'a, T> = BoxFuture<'a, Result<T, RemoteError>>;

/// Database service operations.
pub trait DatabaseClient {
    /// Start a snapshot of `cluster_id` named `snapshot_id`.
    fn create_cluster_snapshot(
        &self,
        snapshot_id: &str,
        cluster_id: &str,
    ) -> CloudFuture<'_, SnapshotDescription>;

    /// Fetch the current state of a cluster snapshot.
    fn describe_cluster_snapshot(&self, snapshot_id: &str) -> CloudFuture<'_, SnapshotDescription>;
}

/// Container orchestration service operations.
pub trait OrchestrationClient {
    /// Launch a one-off task.
    fn run_task(&self, request: &RunTaskRequest) -> CloudFuture<'_, RunTaskOutput>;

    /// Describe tasks by ARN.
    fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: &[String],
    ) -> CloudFuture<'_, TaskDescriptions>;

    /// Return the container definitions of a task definition.
    fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> CloudFuture<'_, Vec<ContainerDefinition>>;

    /// Force a new deployment of a service.
    fn update_service(&self, cluster: &str, service: &str) -> CloudFuture<'_, ServiceDescription>;

    /// Describe services by name.
    fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> CloudFuture<'_, ServiceDescriptions>;
}

/// Log service operations.
pub trait LogClient {
    /// Fetch the events of one log stream, oldest first.
    fn get_log_events(&self, log_group: &str, log_stream: &str) -> CloudFuture<'_, Vec<LogEvent>>;
}
