//! Configuration data types.

use std::time::Duration;

use crate::deploy::Step;

/// Container overridden by the one-off management tasks when `ECS_CONTAINER`
/// is not set.
pub const DEFAULT_CONTAINER: &str = "django-be";

/// Orchestration-side settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcsConfig {
    /// Region hosting the cluster and its log groups.
    pub region: String,

    /// Cluster name.
    pub cluster: String,

    /// Service redeployed by the final step.
    pub service: String,

    /// Task definition used for the one-off management tasks.
    pub task_definition: String,

    /// Subnets for `awsvpc` task networking.
    pub subnets: Vec<String>,

    /// Security groups for `awsvpc` task networking.
    pub security_groups: Vec<String>,

    /// Application container whose command is overridden and whose exit code
    /// decides task success.
    pub container: String,
}

/// Database-side settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdsConfig {
    /// Region hosting the cluster.
    pub region: String,

    /// Cluster identifier to snapshot.
    pub cluster_id: String,

    /// Prefix for generated snapshot identifiers.
    pub snapshot_prefix: String,
}

/// Total wait budget per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudgets {
    /// Budget for the snapshot to become available.
    pub backup: Duration,

    /// Budget for the migration task to stop.
    pub migrate: Duration,

    /// Budget for the collect-static task to stop.
    pub collect_static: Duration,

    /// Budget for the service to become stable.
    pub deploy_service: Duration,
}

impl StepBudgets {
    /// Returns the budget configured for `step`.
    #[must_use]
    pub const fn for_step(&self, step: Step) -> Duration {
        match step {
            Step::BackupDatabase => self.backup,
            Step::MigrateDatabase => self.migrate,
            Step::CollectStatic => self.collect_static,
            Step::DeployService => self.deploy_service,
        }
    }
}

impl Default for StepBudgets {
    fn default() -> Self {
        Self {
            backup: Duration::from_secs(600),
            migrate: Duration::from_secs(180),
            collect_static: Duration::from_secs(240),
            deploy_service: Duration::from_secs(360),
        }
    }
}

/// Complete, validated configuration for one deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Orchestration settings.
    pub ecs: EcsConfig,

    /// Database settings.
    pub rds: RdsConfig,

    /// Per-step wait budgets.
    pub budgets: StepBudgets,
}
