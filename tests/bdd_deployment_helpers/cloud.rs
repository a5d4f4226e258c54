//! Recording fake for the three cloud capability traits.
//!
//! Every call appends a short label to a shared journal so scenarios can
//! assert on remote call order. Responses are scripted per scenario.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ecs_redeploy::cloud::{
    CloudFuture, ContainerDefinition, ContainerState, DatabaseClient, LogClient, LogConfiguration,
    LogEvent, OrchestrationClient, RemoteFailure, RunTaskOutput, RunTaskRequest,
    ServiceDescription, ServiceDescriptions, SnapshotDescription, TaskDescription,
    TaskDescriptions,
};
use ecs_redeploy::deploy::ESSENTIAL_CONTAINER_EXITED;

const TASK_ARN_PREFIX: &str = "arn:aws:ecs:eu-west-1:123456789012:task/backend/";

/// Scripted remote behaviour.
#[derive(Debug, Clone)]
pub(crate) struct Script {
    pub(crate) snapshot_status: String,
    pub(crate) reject_tasks: bool,
    pub(crate) exit_codes: HashMap<String, i32>,
    pub(crate) service_running: i32,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            snapshot_status: String::from("available"),
            reject_tasks: false,
            exit_codes: HashMap::new(),
            service_running: 2,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    script: Script,
    journal: Vec<String>,
}

/// Shared handle to the fake cloud; clones observe the same journal.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCloud {
    inner: Arc<Mutex<Inner>>,
}

const SERVICE_DESIRED: i32 = 2;

impl FakeCloud {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, entry: String) -> Script {
        let mut inner = self.lock();
        inner.journal.push(entry);
        inner.script.clone()
    }

    /// Adjust the scripted behaviour.
    pub(crate) fn script(&self, update: impl FnOnce(&mut Script)) {
        update(&mut self.lock().script);
    }

    /// Every call made so far, in order.
    pub(crate) fn journal(&self) -> Vec<String> {
        self.lock().journal.clone()
    }
}

/// Label a run-task request by its management command.
fn command_label(request: &RunTaskRequest) -> String {
    request
        .overrides
        .first()
        .and_then(|o| o.command.get(2))
        .cloned()
        .unwrap_or_default()
}

fn label_of(task_arn: &str) -> &str {
    task_arn.strip_prefix(TASK_ARN_PREFIX).unwrap_or(task_arn)
}

fn ready<T: Send + 'static>(value: T) -> CloudFuture<'static, T> {
    Box::pin(async move { Ok(value) })
}

impl DatabaseClient for FakeCloud {
    fn create_cluster_snapshot(
        &self,
        snapshot_id: &str,
        _cluster_id: &str,
    ) -> CloudFuture<'_, SnapshotDescription> {
        self.record(String::from("create-snapshot"));
        ready(SnapshotDescription {
            identifier: snapshot_id.to_owned(),
            status: Some(String::from("creating")),
        })
    }

    fn describe_cluster_snapshot(&self, snapshot_id: &str) -> CloudFuture<'_, SnapshotDescription> {
        let script = self.record(String::from("describe-snapshot"));
        ready(SnapshotDescription {
            identifier: snapshot_id.to_owned(),
            status: Some(script.snapshot_status),
        })
    }
}

impl OrchestrationClient for FakeCloud {
    fn run_task(&self, request: &RunTaskRequest) -> CloudFuture<'_, RunTaskOutput> {
        let label = command_label(request);
        let script = self.record(format!("run-task {label}"));
        if script.reject_tasks {
            return ready(RunTaskOutput {
                task_arns: vec![],
                failures: vec![RemoteFailure {
                    arn: None,
                    reason: Some(String::from("RESOURCE:CPU")),
                    detail: None,
                }],
            });
        }
        ready(RunTaskOutput {
            task_arns: vec![format!("{TASK_ARN_PREFIX}{label}")],
            failures: vec![],
        })
    }

    fn describe_tasks(
        &self,
        _cluster: &str,
        task_arns: &[String],
    ) -> CloudFuture<'_, TaskDescriptions> {
        let labels: Vec<&str> = task_arns.iter().map(|arn| label_of(arn)).collect();
        let script = self.record(format!("describe-tasks {}", labels.join(",")));
        let tasks = task_arns
            .iter()
            .map(|arn| TaskDescription {
                task_arn: arn.clone(),
                last_status: Some(String::from("STOPPED")),
                stop_code: Some(String::from(ESSENTIAL_CONTAINER_EXITED)),
                stopped_reason: None,
                containers: vec![ContainerState {
                    name: String::from("django-be"),
                    exit_code: Some(script.exit_codes.get(label_of(arn)).copied().unwrap_or(0)),
                    reason: None,
                }],
            })
            .collect();
        ready(TaskDescriptions {
            tasks,
            failures: vec![],
        })
    }

    fn describe_task_definition(
        &self,
        _task_definition: &str,
    ) -> CloudFuture<'_, Vec<ContainerDefinition>> {
        self.record(String::from("describe-task-definition"));
        ready(vec![ContainerDefinition {
            name: String::from("django-be"),
            log_configuration: Some(LogConfiguration {
                driver: String::from("awslogs"),
                options: HashMap::from([
                    (String::from("awslogs-group"), String::from("/ecs/backend")),
                    (String::from("awslogs-stream-prefix"), String::from("ecs")),
                ]),
            }),
        }])
    }

    fn update_service(&self, _cluster: &str, service: &str) -> CloudFuture<'_, ServiceDescription> {
        self.record(String::from("update-service"));
        ready(ServiceDescription {
            service_name: service.to_owned(),
            status: Some(String::from("ACTIVE")),
            desired_count: SERVICE_DESIRED,
            running_count: SERVICE_DESIRED,
            deployment_count: 2,
        })
    }

    fn describe_services(
        &self,
        _cluster: &str,
        services: &[String],
    ) -> CloudFuture<'_, ServiceDescriptions> {
        let script = self.record(String::from("describe-services"));
        ready(ServiceDescriptions {
            services: services
                .iter()
                .map(|name| ServiceDescription {
                    service_name: name.clone(),
                    status: Some(String::from("ACTIVE")),
                    desired_count: SERVICE_DESIRED,
                    running_count: script.service_running,
                    deployment_count: 1,
                })
                .collect(),
            failures: vec![],
        })
    }
}

impl LogClient for FakeCloud {
    fn get_log_events(&self, _log_group: &str, log_stream: &str) -> CloudFuture<'_, Vec<LogEvent>> {
        self.record(format!("get-log-events {log_stream}"));
        ready(vec![LogEvent {
            timestamp_ms: 1_700_000_000_000,
            message: String::from("ok"),
        }])
    }
}
