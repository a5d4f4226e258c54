//! Container log retrieval for task diagnostics.
//!
//! Logs are fetched only to be logged. A container that does not ship its
//! output to `CloudWatch` through the `awslogs` driver yields no lines rather
//! than an error.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::cloud::{ContainerDefinition, LogClient, LogEvent, OrchestrationClient};
use crate::error::RemoteError;

const AWSLOGS_DRIVER: &str = "awslogs";
const AWSLOGS_GROUP: &str = "awslogs-group";
const AWSLOGS_STREAM_PREFIX: &str = "awslogs-stream-prefix";

/// Where a container's log events are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamLocation {
    /// Log group name.
    pub group: String,
    /// Log stream name.
    pub stream: String,
}

/// Extract the task id, the last `/`-separated segment of a task ARN.
#[must_use]
pub fn task_id(task_arn: &str) -> &str {
    task_arn.rsplit('/').next().unwrap_or(task_arn)
}

/// Resolve the log stream of `container` for the task `task_arn`.
///
/// Returns `None` unless the container definition exists, uses the `awslogs`
/// driver, and sets both the group and stream prefix options.
#[must_use]
pub fn resolve_log_stream(
    definitions: &[ContainerDefinition],
    container: &str,
    task_arn: &str,
) -> Option<LogStreamLocation> {
    let log_config = definitions
        .iter()
        .find(|definition| definition.name == container)?
        .log_configuration
        .as_ref()
        .filter(|config| config.driver == AWSLOGS_DRIVER)?;

    let group = log_config.options.get(AWSLOGS_GROUP)?;
    let prefix = log_config.options.get(AWSLOGS_STREAM_PREFIX)?;
    Some(LogStreamLocation {
        group: group.clone(),
        stream: format!("{prefix}/{container}/{}", task_id(task_arn)),
    })
}

/// Format an event as `  [YYYY-MM-DDTHH:MM:SS] message` in local time.
#[must_use]
pub fn format_log_event(event: &LogEvent) -> String {
    format_log_event_in(event, &Local)
}

/// Format an event with its timestamp rendered in `tz`.
#[must_use]
pub fn format_log_event_in<Tz>(event: &LogEvent, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let seconds = event.timestamp_ms.div_euclid(1000);
    DateTime::from_timestamp(seconds, 0).map_or_else(
        || format!("  [{}] {}", event.timestamp_ms, event.message),
        |utc| {
            format!(
                "  [{}] {}",
                utc.with_timezone(tz).format("%Y-%m-%dT%H:%M:%S"),
                event.message
            )
        },
    )
}

/// Fetch and format the log lines of `container` in the task `task_arn`.
///
/// # Errors
///
/// Returns `RemoteError` if the task definition or the log events cannot be
/// fetched.
pub async fn fetch_container_logs<O, L>(
    orchestration: &O,
    logs: &L,
    task_definition: &str,
    task_arn: &str,
    container: &str,
) -> Result<Vec<String>, RemoteError>
where
    O: OrchestrationClient + ?Sized,
    L: LogClient + ?Sized,
{
    let definitions = orchestration
        .describe_task_definition(task_definition)
        .await?;
    let Some(location) = resolve_log_stream(&definitions, container, task_arn) else {
        return Ok(Vec::new());
    };

    let LogStreamLocation { group, stream } = location;
    let events = logs.get_log_events(&group, &stream).await?;
    Ok(events.iter().map(format_log_event).collect())
}
