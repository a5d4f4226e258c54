//! Service-agnostic request and response types exchanged with cloud clients.
//!
//! These carry only the fields the deployment steps read or log.

use std::collections::HashMap;
use std::fmt;

/// State of a database cluster snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDescription {
    /// Snapshot identifier.
    pub identifier: String,
    /// Reported status, e.g. `creating` or `available`.
    pub status: Option<String>,
}

/// Networking for an `awsvpc` task with no public IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNetwork {
    /// Subnet ids.
    pub subnets: Vec<String>,
    /// Security group ids.
    pub security_groups: Vec<String>,
}

/// Replacement command for one container of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerOverride {
    /// Container name within the task definition.
    pub name: String,
    /// Command to run instead of the image default.
    pub command: Vec<String>,
}

/// Parameters for launching a one-off task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTaskRequest {
    /// Cluster to run in.
    pub cluster: String,
    /// Task definition to instantiate.
    pub task_definition: String,
    /// Task networking.
    pub network: TaskNetwork,
    /// Per-container command overrides.
    pub overrides: Vec<ContainerOverride>,
}

/// A failure entry reported by the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteFailure {
    /// Resource the failure refers to.
    pub arn: Option<String>,
    /// Short reason code, e.g. `MISSING`.
    pub reason: Option<String>,
    /// Free-form detail.
    pub detail: Option<String>,
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = self.reason.as_deref().unwrap_or("unknown reason");
        write!(f, "{reason}")?;
        if let Some(ref arn) = self.arn {
            write!(f, " ({arn})")?;
        }
        if let Some(ref detail) = self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

/// Result of a run-task request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunTaskOutput {
    /// ARNs of the started tasks.
    pub task_arns: Vec<String>,
    /// Failures reported instead of, or alongside, started tasks.
    pub failures: Vec<RemoteFailure>,
}

/// Final or current state of one container in a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerState {
    /// Container name.
    pub name: String,
    /// Exit code once stopped.
    pub exit_code: Option<i32>,
    /// Reason reported for the container stopping.
    pub reason: Option<String>,
}

/// State of one task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDescription {
    /// Task ARN.
    pub task_arn: String,
    /// Last reported lifecycle status, e.g. `RUNNING` or `STOPPED`.
    pub last_status: Option<String>,
    /// Stop code, e.g. `EssentialContainerExited`.
    pub stop_code: Option<String>,
    /// Human-readable stop reason.
    pub stopped_reason: Option<String>,
    /// Containers in the task.
    pub containers: Vec<ContainerState>,
}

/// Result of a describe-tasks request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDescriptions {
    /// Found tasks.
    pub tasks: Vec<TaskDescription>,
    /// Failures for tasks that could not be described.
    pub failures: Vec<RemoteFailure>,
}

/// Logging configuration of a container definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfiguration {
    /// Log driver name, e.g. `awslogs`.
    pub driver: String,
    /// Driver options.
    pub options: HashMap<String, String>,
}

/// One container definition of a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerDefinition {
    /// Container name.
    pub name: String,
    /// Logging configuration, if any.
    pub log_configuration: Option<LogConfiguration>,
}

/// State of one service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceDescription {
    /// Service name.
    pub service_name: String,
    /// Service status, e.g. `ACTIVE` or `DRAINING`.
    pub status: Option<String>,
    /// Desired task count.
    pub desired_count: i32,
    /// Running task count.
    pub running_count: i32,
    /// Number of deployments in progress or primary.
    pub deployment_count: usize,
}

/// Result of a describe-services request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceDescriptions {
    /// Found services.
    pub services: Vec<ServiceDescription>,
    /// Failures for services that could not be described.
    pub failures: Vec<RemoteFailure>,
}

/// One log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Log line.
    pub message: String,
}
