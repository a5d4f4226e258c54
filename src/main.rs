//! `ecs-redeploy` application entry point.
//!
//! The binary takes no arguments. Settings are read from the environment, the
//! cloud clients are built from the ambient AWS credential chain, and the
//! deployment runs to completion on a single-threaded runtime. Domain errors
//! are converted into an `eyre::Report` here, so any failure exits non-zero.

use ecs_redeploy::cloud::aws::AwsClients;
use ecs_redeploy::config::{DeployConfig, load_config};
use ecs_redeploy::deploy::{Deployer, create_runtime};
use ecs_redeploy::error::Result as DeployResult;
use ecs_redeploy::logging;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;

fn main() -> EyreResult<()> {
    let env = DefaultEnv::new();
    logging::init(&env).map_err(Report::from)?;

    let config = load_config(&env).map_err(Report::from)?;
    run(&config).map_err(Report::from)
}

/// Drive one deployment, keeping semantic errors until the process boundary.
fn run(config: &DeployConfig) -> DeployResult<()> {
    let runtime = create_runtime()?;
    runtime.block_on(async {
        let clients = AwsClients::connect(config).await;
        Deployer::new(
            &clients.database,
            &clients.orchestration,
            &clients.logs,
            config,
        )
        .run()
        .await
    })
}
