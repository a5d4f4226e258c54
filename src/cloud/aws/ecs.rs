//! ECS task and service operations.

use aws_sdk_ecs::types as sdk;

use super::request_failed;
use crate::cloud::{
    CloudFuture, ContainerDefinition, ContainerState, LogConfiguration, OrchestrationClient,
    RemoteFailure, RunTaskOutput, RunTaskRequest, ServiceDescription, ServiceDescriptions,
    TaskDescription, TaskDescriptions,
};
use crate::error::RemoteError;

const RUN_TASK: &str = "RunTask";
const DESCRIBE_TASKS: &str = "DescribeTasks";
const DESCRIBE_TASK_DEFINITION: &str = "DescribeTaskDefinition";
const UPDATE_SERVICE: &str = "UpdateService";
const DESCRIBE_SERVICES: &str = "DescribeServices";

impl OrchestrationClient for aws_sdk_ecs::Client {
    fn run_task(&self, request: &RunTaskRequest) -> CloudFuture<'_, RunTaskOutput> {
        let RunTaskRequest {
            cluster,
            task_definition,
            network,
            overrides,
        } = request.clone();
        Box::pin(async move {
            let vpc = sdk::AwsVpcConfiguration::builder()
                .set_subnets(Some(network.subnets))
                .set_security_groups(Some(network.security_groups))
                .assign_public_ip(sdk::AssignPublicIp::Disabled)
                .build()
                .map_err(|e| RemoteError::InvalidRequest {
                    operation: RUN_TASK,
                    message: e.to_string(),
                })?;
            let container_overrides = overrides
                .into_iter()
                .map(|o| {
                    sdk::ContainerOverride::builder()
                        .name(o.name)
                        .set_command(Some(o.command))
                        .build()
                })
                .collect();

            let output = Self::run_task(self)
                .cluster(cluster)
                .task_definition(task_definition)
                .launch_type(sdk::LaunchType::Fargate)
                .network_configuration(
                    sdk::NetworkConfiguration::builder()
                        .awsvpc_configuration(vpc)
                        .build(),
                )
                .overrides(
                    sdk::TaskOverride::builder()
                        .set_container_overrides(Some(container_overrides))
                        .build(),
                )
                .propagate_tags(sdk::PropagateTags::TaskDefinition)
                .send()
                .await
                .map_err(|e| request_failed(RUN_TASK, e))?;

            Ok(RunTaskOutput {
                task_arns: output
                    .tasks()
                    .iter()
                    .filter_map(sdk::Task::task_arn)
                    .map(String::from)
                    .collect(),
                failures: output.failures().iter().map(failure_from_sdk).collect(),
            })
        })
    }

    fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: &[String],
    ) -> CloudFuture<'_, TaskDescriptions> {
        let cluster_owned = String::from(cluster);
        let task_arns_owned = task_arns.to_vec();
        Box::pin(async move {
            let output = Self::describe_tasks(self)
                .cluster(cluster_owned)
                .set_tasks(Some(task_arns_owned))
                .send()
                .await
                .map_err(|e| request_failed(DESCRIBE_TASKS, e))?;

            Ok(TaskDescriptions {
                tasks: output.tasks().iter().map(task_from_sdk).collect(),
                failures: output.failures().iter().map(failure_from_sdk).collect(),
            })
        })
    }

    fn describe_task_definition(
        &self,
        task_definition: &str,
    ) -> CloudFuture<'_, Vec<ContainerDefinition>> {
        let task_definition_owned = String::from(task_definition);
        Box::pin(async move {
            let output = Self::describe_task_definition(self)
                .task_definition(task_definition_owned)
                .send()
                .await
                .map_err(|e| request_failed(DESCRIBE_TASK_DEFINITION, e))?;

            let definition = output.task_definition().ok_or(RemoteError::MissingField {
                operation: DESCRIBE_TASK_DEFINITION,
                field: "taskDefinition",
            })?;
            Ok(definition
                .container_definitions()
                .iter()
                .map(container_definition_from_sdk)
                .collect())
        })
    }

    fn update_service(&self, cluster: &str, service: &str) -> CloudFuture<'_, ServiceDescription> {
        let cluster_owned = String::from(cluster);
        let service_owned = String::from(service);
        Box::pin(async move {
            let output = Self::update_service(self)
                .cluster(cluster_owned)
                .service(service_owned)
                .force_new_deployment(true)
                .send()
                .await
                .map_err(|e| request_failed(UPDATE_SERVICE, e))?;

            output
                .service()
                .map(service_from_sdk)
                .ok_or(RemoteError::MissingField {
                    operation: UPDATE_SERVICE,
                    field: "service",
                })
        })
    }

    fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> CloudFuture<'_, ServiceDescriptions> {
        let cluster_owned = String::from(cluster);
        let services_owned = services.to_vec();
        Box::pin(async move {
            let output = Self::describe_services(self)
                .cluster(cluster_owned)
                .set_services(Some(services_owned))
                .send()
                .await
                .map_err(|e| request_failed(DESCRIBE_SERVICES, e))?;

            Ok(ServiceDescriptions {
                services: output.services().iter().map(service_from_sdk).collect(),
                failures: output.failures().iter().map(failure_from_sdk).collect(),
            })
        })
    }
}

fn failure_from_sdk(failure: &sdk::Failure) -> RemoteFailure {
    RemoteFailure {
        arn: failure.arn().map(String::from),
        reason: failure.reason().map(String::from),
        detail: failure.detail().map(String::from),
    }
}

fn task_from_sdk(task: &sdk::Task) -> TaskDescription {
    TaskDescription {
        task_arn: task.task_arn().unwrap_or_default().to_owned(),
        last_status: task.last_status().map(String::from),
        stop_code: task.stop_code().map(|code| code.as_str().to_owned()),
        stopped_reason: task.stopped_reason().map(String::from),
        containers: task
            .containers()
            .iter()
            .map(|container| ContainerState {
                name: container.name().unwrap_or_default().to_owned(),
                exit_code: container.exit_code(),
                reason: container.reason().map(String::from),
            })
            .collect(),
    }
}

fn container_definition_from_sdk(definition: &sdk::ContainerDefinition) -> ContainerDefinition {
    ContainerDefinition {
        name: definition.name().unwrap_or_default().to_owned(),
        log_configuration: definition
            .log_configuration()
            .map(|config| LogConfiguration {
                driver: config.log_driver().as_str().to_owned(),
                options: config.options().cloned().unwrap_or_default(),
            }),
    }
}

fn service_from_sdk(service: &sdk::Service) -> ServiceDescription {
    ServiceDescription {
        service_name: service.service_name().unwrap_or_default().to_owned(),
        status: service.status().map(String::from),
        desired_count: service.desired_count(),
        running_count: service.running_count(),
        deployment_count: service.deployments().len(),
    }
}
