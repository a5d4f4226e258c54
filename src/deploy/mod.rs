//! Deployment steps and the sequencer that runs them.
//!
//! Every step is split into two phases. Issuing it starts one remote
//! operation and returns a [`PendingStep`] holding the operation handle.
//! Waiting on that handle with a budget blocks until the operation reaches a
//! terminal state. The sequencer issues and waits on each step in turn, except
//! for collect-static and deploy-service, which are both issued before either
//! is waited on so the two remote operations overlap.
//!
//! Any failure aborts the run. Nothing is rolled back: a snapshot taken by
//! the first step is kept as the safety net.

mod diagnostics;
mod snapshot;
mod task;

use std::cell::Cell;
use std::fmt;
use std::time::Duration;

use tracing::{error, info};

pub use diagnostics::{
    LogStreamLocation, fetch_container_logs, format_log_event, format_log_event_in,
    resolve_log_stream, task_id,
};
pub use snapshot::snapshot_identifier;
pub use task::{
    COLLECT_STATIC_COMMAND, ESSENTIAL_CONTAINER_EXITED, MIGRATE_COMMAND, check_task_outcome,
};

use crate::cloud::{DatabaseClient, LogClient, OrchestrationClient};
use crate::config::DeployConfig;
use crate::error::{DeployError, Result};
use crate::wait::{PollIntervals, PollPolicy, wait_service_stable, wait_snapshot_available};

/// The named steps of a deployment, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Snapshot the database cluster.
    BackupDatabase,
    /// Run the schema migration task.
    MigrateDatabase,
    /// Run the static asset collection task.
    CollectStatic,
    /// Force a new deployment of the service.
    DeployService,
}

impl Step {
    /// Human-readable step name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BackupDatabase => "Backup Database",
            Self::MigrateDatabase => "Migrate Database",
            Self::CollectStatic => "Collect Static",
            Self::DeployService => "Deploy Service",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position of the sequencer in the deployment state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    /// Nothing has been issued yet.
    Init,
    /// Taking the database snapshot.
    BackingUp,
    /// Running the migration task.
    Migrating,
    /// Collect-static and the service redeployment are both in flight.
    CollectingAndDeploying,
    /// Every step completed.
    Done,
    /// A step failed; the run was aborted.
    Failed,
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Init => "init",
            Self::BackingUp => "backing-up",
            Self::Migrating => "migrating",
            Self::CollectingAndDeploying => "collecting-and-deploying",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Handle of the remote operation started by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A cluster snapshot being created.
    Snapshot {
        /// Snapshot identifier.
        snapshot_id: String,
    },
    /// A one-off task running.
    Task {
        /// Task ARN.
        task_arn: String,
    },
    /// A service rolling out a new deployment.
    ServiceDeployment {
        /// Service name.
        service: String,
    },
}

/// An issued step whose completion has not yet been awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending step does nothing unless waited on"]
pub struct PendingStep {
    step: Step,
    operation: Operation,
}

impl PendingStep {
    /// The step that issued the operation.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// The operation handle.
    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }
}

/// Runs deployment steps against injected cloud clients.
///
/// The clients are borrowed for the lifetime of the run and shared by every
/// step.
pub struct Deployer<'a, D: ?Sized, O: ?Sized, L: ?Sized> {
    database: &'a D,
    orchestration: &'a O,
    logs: &'a L,
    config: &'a DeployConfig,
    intervals: PollIntervals,
    state: Cell<DeploymentState>,
}

impl<'a, D, O, L> Deployer<'a, D, O, L>
where
    D: DatabaseClient + ?Sized,
    O: OrchestrationClient + ?Sized,
    L: LogClient + ?Sized,
{
    /// Create a deployer using the default poll intervals.
    #[must_use]
    pub fn new(
        database: &'a D,
        orchestration: &'a O,
        logs: &'a L,
        config: &'a DeployConfig,
    ) -> Self {
        Self {
            database,
            orchestration,
            logs,
            config,
            intervals: PollIntervals::default(),
            state: Cell::new(DeploymentState::Init),
        }
    }

    /// Replace the poll intervals.
    #[must_use]
    pub const fn with_poll_intervals(mut self, intervals: PollIntervals) -> Self {
        self.intervals = intervals;
        self
    }

    /// Current state of the sequencer.
    #[must_use]
    pub const fn state(&self) -> DeploymentState {
        self.state.get()
    }

    /// Issue the backup step: start a cluster snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Remote` if the snapshot cannot be started.
    pub async fn backup_database(&self) -> Result<PendingStep> {
        let snapshot_id = self.start_snapshot().await?;
        Ok(PendingStep {
            step: Step::BackupDatabase,
            operation: Operation::Snapshot { snapshot_id },
        })
    }

    /// Issue the migration step: start the `migrate` task.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StepFailed` if the task cannot be started.
    pub async fn migrate_database(&self) -> Result<PendingStep> {
        self.issue_task(Step::MigrateDatabase, MIGRATE_COMMAND).await
    }

    /// Issue the collect-static step: start the `collectstatic` task.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StepFailed` if the task cannot be started.
    pub async fn collect_static(&self) -> Result<PendingStep> {
        self.issue_task(Step::CollectStatic, COLLECT_STATIC_COMMAND).await
    }

    /// Issue the deploy step: force a new deployment of the service.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Remote` if the service update is rejected.
    pub async fn deploy_service(&self) -> Result<PendingStep> {
        let ecs = &self.config.ecs;
        let service = self
            .orchestration
            .update_service(&ecs.cluster, &ecs.service)
            .await?;
        info!(response = ?service, "redeploying service");
        Ok(PendingStep {
            step: Step::DeployService,
            operation: Operation::ServiceDeployment {
                service: ecs.service.clone(),
            },
        })
    }

    /// Wait for a pending step using its configured budget.
    ///
    /// # Errors
    ///
    /// See [`Self::wait_with_budget`].
    pub async fn wait(&self, pending: &PendingStep) -> Result<()> {
        let budget = self.config.budgets.for_step(pending.step);
        self.wait_with_budget(pending, budget).await
    }

    /// Wait for a pending step to reach a terminal state within `budget`.
    ///
    /// # Errors
    ///
    /// Snapshot and service waits return `DeployError::Wait` on timeout or a
    /// terminal failure state. Task waits return `DeployError::StepFailed`
    /// wrapping the timeout, remote error, or `TaskError::Failed` cause.
    pub async fn wait_with_budget(&self, pending: &PendingStep, budget: Duration) -> Result<()> {
        match pending.operation {
            Operation::Snapshot { ref snapshot_id } => {
                let policy = PollPolicy::from_budget(budget, self.intervals.snapshot);
                wait_snapshot_available(self.database, snapshot_id, policy).await?;
                info!(snapshot_id = %snapshot_id, "snapshot created");
            }
            Operation::Task { ref task_arn } => {
                let policy = PollPolicy::from_budget(budget, self.intervals.task);
                self.wait_task_complete(task_arn, policy)
                    .await
                    .map_err(|e| DeployError::step_failed(pending.step, e))?;
                info!(step = %pending.step, "task completed");
            }
            Operation::ServiceDeployment { ref service } => {
                let policy = PollPolicy::from_budget(budget, self.intervals.service);
                let cluster = &self.config.ecs.cluster;
                wait_service_stable(self.orchestration, cluster, service, policy).await?;
                info!(service = %service, "service redeployed");
            }
        }
        Ok(())
    }

    /// Run every step in order, failing fast.
    ///
    /// # Errors
    ///
    /// Returns the first step or wait failure. Steps after the failing one
    /// are never issued.
    pub async fn run(&self) -> Result<()> {
        info!("starting deployment");
        match self.run_sequence().await {
            Ok(()) => {
                self.advance(DeploymentState::Done);
                info!("deployment completed");
                Ok(())
            }
            Err(e) => {
                let failed_in = self.state.replace(DeploymentState::Failed);
                error!(state = %failed_in, "deployment failed");
                Err(e)
            }
        }
    }

    async fn run_sequence(&self) -> Result<()> {
        self.advance(DeploymentState::BackingUp);
        let backup = self.backup_database().await?;
        self.wait(&backup).await?;

        self.advance(DeploymentState::Migrating);
        let migrate = self.migrate_database().await?;
        self.wait(&migrate).await?;

        self.advance(DeploymentState::CollectingAndDeploying);
        let collect = self.collect_static().await?;
        let deploy = self.deploy_service().await?;
        self.wait(&collect).await?;
        self.wait(&deploy).await
    }

    fn advance(&self, next: DeploymentState) {
        let previous = self.state.replace(next);
        info!(from = %previous, to = %next, "deployment state changed");
    }
}

/// Create the single-threaded runtime that drives a deployment.
///
/// # Errors
///
/// Returns `DeployError::RuntimeCreationFailed` if the runtime cannot be
/// built.
pub fn create_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| DeployError::RuntimeCreationFailed {
            message: e.to_string(),
        })
}
