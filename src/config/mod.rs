//! Configuration system for the redeployment orchestrator.
//!
//! Configuration comes exclusively from environment variables and is loaded
//! once at process start. Every required variable is checked before any cloud
//! call is made; the error lists all missing names at once.
//!
//! # Example Environment
//!
//! ```sh
//! ECS_REGION=eu-west-1
//! ECS_CLUSTER=backend
//! ECS_SERVICE=backend-web
//! ECS_TASK=backend-web:42
//! ECS_SUBNETS=subnet-0a1,subnet-0b2
//! ECS_SECURITY_GROUPS=sg-0c3
//! RDS_REGION=eu-west-1
//! RDS_CLUSTER_ID=backend-db
//! RDS_SNAPSHOT_PREFIX=backend-predeploy
//! # optional
//! ECS_CONTAINER=django-be
//! DEPLOY_MIGRATE_WAIT_SECS=300
//! ```

mod loader;
mod types;


pub use loader::{env_var_names, load_config, required_env_var_names};
pub use types::{DEFAULT_CONTAINER, DeployConfig, EcsConfig, RdsConfig, StepBudgets};
