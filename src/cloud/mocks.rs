//! `mockall` doubles for the cloud capability traits and response builders
//! shared by unit tests.

use mockall::mock;

use super::{
    CloudFuture, ContainerDefinition, ContainerState, DatabaseClient, LogClient, LogEvent,
    OrchestrationClient, RunTaskOutput, RunTaskRequest, ServiceDescription, ServiceDescriptions,
    SnapshotDescription, TaskDescription, TaskDescriptions,
};

mock! {
    #[derive(Debug)]
    pub Database {}

    impl DatabaseClient for Database {
        fn create_cluster_snapshot<'a>(
            &'a self,
            snapshot_id: &str,
            cluster_id: &str,
        ) -> CloudFuture<'a, SnapshotDescription>;

        fn describe_cluster_snapshot<'a>(
            &'a self,
            snapshot_id: &str,
        ) -> CloudFuture<'a, SnapshotDescription>;
    }
}

mock! {
    #[derive(Debug)]
    pub Orchestration {}

    impl OrchestrationClient for Orchestration {
        fn run_task<'a>(&'a self, request: &RunTaskRequest) -> CloudFuture<'a, RunTaskOutput>;

        fn describe_tasks<'a>(
            &'a self,
            cluster: &str,
            task_arns: &[String],
        ) -> CloudFuture<'a, TaskDescriptions>;

        fn describe_task_definition<'a>(
            &'a self,
            task_definition: &str,
        ) -> CloudFuture<'a, Vec<ContainerDefinition>>;

        fn update_service<'a>(
            &'a self,
            cluster: &str,
            service: &str,
        ) -> CloudFuture<'a, ServiceDescription>;

        fn describe_services<'a>(
            &'a self,
            cluster: &str,
            services: &[String],
        ) -> CloudFuture<'a, ServiceDescriptions>;
    }
}

mock! {
    #[derive(Debug)]
    pub Logs {}

    impl LogClient for Logs {
        fn get_log_events<'a>(
            &'a self,
            log_group: &str,
            log_stream: &str,
        ) -> CloudFuture<'a, Vec<LogEvent>>;
    }
}

/// A future that resolves immediately to `Ok(value)`.
pub(crate) fn ok<T: Send + 'static>(value: T) -> CloudFuture<'static, T> {
    Box::pin(async move { Ok(value) })
}

/// A snapshot description with the given status.
pub(crate) fn snapshot(identifier: &str, status: &str) -> SnapshotDescription {
    SnapshotDescription {
        identifier: String::from(identifier),
        status: Some(String::from(status)),
    }
}

/// A stopped task whose `container` exited with `exit_code`.
pub(crate) fn stopped_task(
    task_arn: &str,
    stop_code: &str,
    container: &str,
    exit_code: Option<i32>,
) -> TaskDescriptions {
    TaskDescriptions {
        tasks: vec![TaskDescription {
            task_arn: String::from(task_arn),
            last_status: Some(String::from("STOPPED")),
            stop_code: Some(String::from(stop_code)),
            stopped_reason: Some(String::from("Essential container in task exited")),
            containers: vec![ContainerState {
                name: String::from(container),
                exit_code,
                reason: None,
            }],
        }],
        failures: vec![],
    }
}

/// A service with one deployment and `running` of `desired` tasks.
pub(crate) fn service(name: &str, desired: i32, running: i32) -> ServiceDescription {
    ServiceDescription {
        service_name: String::from(name),
        status: Some(String::from("ACTIVE")),
        desired_count: desired,
        running_count: running,
        deployment_count: 1,
    }
}
