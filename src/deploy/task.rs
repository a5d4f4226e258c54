//! One-off management tasks: issuance, completion and outcome checks.

use tracing::info;

use super::diagnostics::fetch_container_logs;
use super::{Deployer, Operation, PendingStep, Step};
use crate::cloud::{
    ContainerOverride, DatabaseClient, LogClient, OrchestrationClient, RunTaskRequest,
    TaskDescriptions, TaskNetwork,
};
use crate::error::{DeployError, RemoteError, Result, TaskError};
use crate::wait::{PollPolicy, wait_tasks_stopped};

/// Command run by the migration task.
pub const MIGRATE_COMMAND: &[&str] = &["python", "manage.py", "migrate"];

/// Command run by the collect-static task.
pub const COLLECT_STATIC_COMMAND: &[&str] = &[
    "python",
    "manage.py",
    "collectstatic",
    "--no-input",
    "--clear",
];

/// Stop code of a task whose essential container exited on its own.
pub const ESSENTIAL_CONTAINER_EXITED: &str = "EssentialContainerExited";

/// Decide whether a stopped task succeeded.
///
/// # Errors
///
/// Returns `TaskError::NotFound` if the description holds no task or no
/// `container`, and `TaskError::Failed` if the describe call reported
/// failures, the stop code is not [`ESSENTIAL_CONTAINER_EXITED`], or the
/// container's exit code is not zero.
pub fn check_task_outcome(
    described: &TaskDescriptions,
    container: &str,
) -> std::result::Result<(), TaskError> {
    let task = described.tasks.first().ok_or_else(|| TaskError::NotFound {
        what: String::from("task"),
    })?;
    let state = task
        .containers
        .iter()
        .find(|c| c.name == container)
        .ok_or_else(|| TaskError::NotFound {
            what: format!("container '{container}'"),
        })?;

    let succeeded = described.failures.is_empty()
        && task.stop_code.as_deref() == Some(ESSENTIAL_CONTAINER_EXITED)
        && state.exit_code == Some(0);
    if succeeded {
        Ok(())
    } else {
        Err(TaskError::Failed)
    }
}

impl<D, O, L> Deployer<'_, D, O, L>
where
    D: DatabaseClient + ?Sized,
    O: OrchestrationClient + ?Sized,
    L: LogClient + ?Sized,
{
    /// Start the management task for `step`, wrapping any failure.
    pub(super) async fn issue_task(&self, step: Step, command: &[&str]) -> Result<PendingStep> {
        info!(step = %step, "running task");
        let request = self.task_request(command);
        let task_arn = self
            .start_task(&request)
            .await
            .map_err(|e| DeployError::step_failed(step, e))?;
        Ok(PendingStep {
            step,
            operation: Operation::Task { task_arn },
        })
    }

    fn task_request(&self, command: &[&str]) -> RunTaskRequest {
        let ecs = &self.config.ecs;
        RunTaskRequest {
            cluster: ecs.cluster.clone(),
            task_definition: ecs.task_definition.clone(),
            network: TaskNetwork {
                subnets: ecs.subnets.clone(),
                security_groups: ecs.security_groups.clone(),
            },
            overrides: vec![ContainerOverride {
                name: ecs.container.clone(),
                command: command.iter().map(|arg| String::from(*arg)).collect(),
            }],
        }
    }

    async fn start_task(&self, request: &RunTaskRequest) -> Result<String> {
        let output = self.orchestration.run_task(request).await?;
        info!(response = ?output, "created tasks");

        if !output.failures.is_empty() {
            let failures = output
                .failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TaskError::Rejected { failures }.into());
        }
        output.task_arns.into_iter().next().ok_or_else(|| {
            RemoteError::MissingField {
                operation: "RunTask",
                field: "tasks",
            }
            .into()
        })
    }

    /// Wait for a task to stop, log its diagnostics, then check its outcome.
    pub(super) async fn wait_task_complete(
        &self,
        task_arn: &str,
        policy: PollPolicy,
    ) -> Result<()> {
        let ecs = &self.config.ecs;
        let task_arns = [task_arn.to_owned()];
        wait_tasks_stopped(self.orchestration, &ecs.cluster, &task_arns, policy).await?;

        let described = self
            .orchestration
            .describe_tasks(&ecs.cluster, &task_arns)
            .await?;
        info!(detail = ?described, "task detail");

        let lines = fetch_container_logs(
            self.orchestration,
            self.logs,
            &ecs.task_definition,
            task_arn,
            &ecs.container,
        )
        .await?;
        info!("container logs:\n{}", lines.join("\n"));

        check_task_outcome(&described, &ecs.container)?;
        Ok(())
    }
}
