//! Bounded polling waiters for remote operations.
//!
//! Each waiter polls a describe call at a fixed interval until the operation
//! reaches a terminal state or the attempt ceiling is hit. The ceiling is
//! derived from a total budget as `budget / interval + 1`; there is no
//! backoff and no cancellation once a wait has begun.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cloud::{
    DatabaseClient, OrchestrationClient, ServiceDescriptions, SnapshotDescription,
    TaskDescriptions,
};
use crate::error::{RemoteError, WaitError};

const SNAPSHOT_AVAILABLE: &str = "db_cluster_snapshot_available";
const TASKS_STOPPED: &str = "tasks_stopped";
const SERVICES_STABLE: &str = "services_stable";

const SNAPSHOT_FAILURE_STATES: &[&str] = &[
    "deleted",
    "deleting",
    "failed",
    "incompatible-restore",
    "incompatible-parameters",
];

/// Poll intervals used by the waiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// Interval between snapshot status checks.
    pub snapshot: Duration,
    /// Interval between task status checks.
    pub task: Duration,
    /// Interval between service status checks.
    pub service: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            snapshot: Duration::from_secs(30),
            task: Duration::from_secs(6),
            service: Duration::from_secs(15),
        }
    }
}

/// Interval and attempt ceiling for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between consecutive polls.
    pub interval: Duration,
    /// Maximum number of polls, at least one.
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Derive the attempt ceiling from a total `budget`.
    ///
    /// A zero interval yields a single attempt.
    #[must_use]
    pub fn from_budget(budget: Duration, interval: Duration) -> Self {
        let whole_intervals = budget
            .as_millis()
            .checked_div(interval.as_millis())
            .unwrap_or(0);
        let max_attempts = u32::try_from(whole_intervals)
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Classification of one poll response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// The operation reached its success state.
    Ready,
    /// The operation is still in progress.
    Pending,
    /// The operation reached a state from which it cannot succeed.
    Failed(String),
}

/// Call `poll` until it reports a terminal state or the budget runs out.
async fn poll_until<F, Fut>(
    waiter: &'static str,
    policy: PollPolicy,
    mut poll: F,
) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollState, RemoteError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        match poll().await? {
            PollState::Ready => return Ok(()),
            PollState::Failed(reason) => return Err(WaitError::FailureState { waiter, reason }),
            PollState::Pending => {
                debug!(waiter, attempt, max_attempts, "not yet in terminal state");
            }
        }
        if attempt < max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(WaitError::Timeout {
        waiter,
        attempts: max_attempts,
    })
}

/// Classify a snapshot description.
#[must_use]
pub fn snapshot_state(snapshot: &SnapshotDescription) -> PollState {
    match snapshot.status.as_deref() {
        Some("available") => PollState::Ready,
        Some(status) if SNAPSHOT_FAILURE_STATES.contains(&status) => {
            PollState::Failed(format!("snapshot status {status}"))
        }
        _ => PollState::Pending,
    }
}

/// Classify a task description: ready once every task is `STOPPED`.
#[must_use]
pub fn tasks_state(described: &TaskDescriptions) -> PollState {
    let all_stopped = !described.tasks.is_empty()
        && described
            .tasks
            .iter()
            .all(|task| task.last_status.as_deref() == Some("STOPPED"));
    if all_stopped {
        PollState::Ready
    } else {
        PollState::Pending
    }
}

/// Classify a service description: ready once every service has a single
/// deployment and as many running tasks as desired.
#[must_use]
pub fn services_state(described: &ServiceDescriptions) -> PollState {
    if let Some(failure) = described
        .failures
        .iter()
        .find(|failure| failure.reason.as_deref() == Some("MISSING"))
    {
        return PollState::Failed(format!("service failure {failure}"));
    }
    if let Some(status) = described
        .services
        .iter()
        .filter_map(|service| service.status.as_deref())
        .find(|status| matches!(*status, "DRAINING" | "INACTIVE"))
    {
        return PollState::Failed(format!("service status {status}"));
    }

    let all_stable = !described.services.is_empty()
        && described.services.iter().all(|service| {
            service.deployment_count == 1 && service.running_count == service.desired_count
        });
    if all_stable {
        PollState::Ready
    } else {
        PollState::Pending
    }
}

/// Wait until a cluster snapshot is `available`.
///
/// # Errors
///
/// Returns `WaitError::FailureState` if the snapshot enters a failure state,
/// `WaitError::Timeout` if the budget runs out, and `WaitError::Remote` if a
/// poll request fails.
pub async fn wait_snapshot_available<D: DatabaseClient + ?Sized>(
    client: &D,
    snapshot_id: &str,
    policy: PollPolicy,
) -> Result<(), WaitError> {
    poll_until(SNAPSHOT_AVAILABLE, policy, move || async move {
        let snapshot = client.describe_cluster_snapshot(snapshot_id).await?;
        Ok::<_, RemoteError>(snapshot_state(&snapshot))
    })
    .await
}

/// Wait until every task in `task_arns` is `STOPPED`.
///
/// # Errors
///
/// Returns `WaitError::Timeout` if the budget runs out and
/// `WaitError::Remote` if a poll request fails.
pub async fn wait_tasks_stopped<O: OrchestrationClient + ?Sized>(
    client: &O,
    cluster: &str,
    task_arns: &[String],
    policy: PollPolicy,
) -> Result<(), WaitError> {
    poll_until(TASKS_STOPPED, policy, move || async move {
        let described = client.describe_tasks(cluster, task_arns).await?;
        Ok::<_, RemoteError>(tasks_state(&described))
    })
    .await
}

/// Wait until a service is stable.
///
/// # Errors
///
/// Returns `WaitError::FailureState` if the service is missing, draining or
/// inactive, `WaitError::Timeout` if the budget runs out, and
/// `WaitError::Remote` if a poll request fails.
pub async fn wait_service_stable<O: OrchestrationClient + ?Sized>(
    client: &O,
    cluster: &str,
    service: &str,
    policy: PollPolicy,
) -> Result<(), WaitError> {
    let services = [service.to_owned()];
    let services_ref = &services;
    poll_until(SERVICES_STABLE, policy, move || async move {
        let described = client.describe_services(cluster, services_ref).await?;
        Ok::<_, RemoteError>(services_state(&described))
    })
    .await
}
