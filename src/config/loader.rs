//! Configuration loading from environment variables.
//!
//! All variables are described by [`ENV_VAR_SPECS`] and read in a single pass
//! through a `mockable::Env`, so tests can supply an in-memory environment.
//!
//! # Environment Variable Handling
//!
//! A variable that is unset or blank counts as absent. Absent required
//! variables are collected and reported together in one
//! [`ConfigError::MissingRequired`]. That error takes precedence over
//! malformed optional values, which are reported as
//! [`ConfigError::InvalidValue`].

use std::collections::HashMap;
use std::time::Duration;

use crate::config::{DEFAULT_CONTAINER, DeployConfig, EcsConfig, RdsConfig, StepBudgets};
use crate::error::ConfigError;

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// Plain string value.
    String,
    /// Comma-separated list; entries are trimmed and blanks dropped.
    List,
    /// Whole number of seconds.
    Seconds,
}

/// Specification for a single environment variable.
struct EnvVarSpec {
    /// The environment variable name.
    env_var: &'static str,
    /// The expected value type.
    var_type: EnvVarType,
    /// Whether startup fails when the variable is absent.
    required: bool,
}

impl EnvVarSpec {
    const fn required(env_var: &'static str, var_type: EnvVarType) -> Self {
        Self {
            env_var,
            var_type,
            required: true,
        }
    }

    const fn optional(env_var: &'static str, var_type: EnvVarType) -> Self {
        Self {
            env_var,
            var_type,
            required: false,
        }
    }
}

const ECS_REGION: &str = "ECS_REGION";
const ECS_CLUSTER: &str = "ECS_CLUSTER";
const ECS_SERVICE: &str = "ECS_SERVICE";
const ECS_TASK: &str = "ECS_TASK";
const ECS_SUBNETS: &str = "ECS_SUBNETS";
const ECS_SECURITY_GROUPS: &str = "ECS_SECURITY_GROUPS";
const ECS_CONTAINER: &str = "ECS_CONTAINER";
const RDS_REGION: &str = "RDS_REGION";
const RDS_CLUSTER_ID: &str = "RDS_CLUSTER_ID";
const RDS_SNAPSHOT_PREFIX: &str = "RDS_SNAPSHOT_PREFIX";
const DEPLOY_BACKUP_WAIT_SECS: &str = "DEPLOY_BACKUP_WAIT_SECS";
const DEPLOY_MIGRATE_WAIT_SECS: &str = "DEPLOY_MIGRATE_WAIT_SECS";
const DEPLOY_COLLECT_STATIC_WAIT_SECS: &str = "DEPLOY_COLLECT_STATIC_WAIT_SECS";
const DEPLOY_SERVICE_WAIT_SECS: &str = "DEPLOY_SERVICE_WAIT_SECS";

/// Table of all environment variables read at startup.
///
/// Adding a variable is a single-line change here plus its use in
/// [`load_config`]. Missing required variables are reported in table order.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec::required(ECS_REGION, EnvVarType::String),
    EnvVarSpec::required(ECS_CLUSTER, EnvVarType::String),
    EnvVarSpec::required(ECS_SERVICE, EnvVarType::String),
    EnvVarSpec::required(ECS_TASK, EnvVarType::String),
    EnvVarSpec::required(ECS_SUBNETS, EnvVarType::List),
    EnvVarSpec::required(ECS_SECURITY_GROUPS, EnvVarType::List),
    EnvVarSpec::required(RDS_REGION, EnvVarType::String),
    EnvVarSpec::required(RDS_CLUSTER_ID, EnvVarType::String),
    EnvVarSpec::required(RDS_SNAPSHOT_PREFIX, EnvVarType::String),
    EnvVarSpec::optional(ECS_CONTAINER, EnvVarType::String),
    EnvVarSpec::optional(DEPLOY_BACKUP_WAIT_SECS, EnvVarType::Seconds),
    EnvVarSpec::optional(DEPLOY_MIGRATE_WAIT_SECS, EnvVarType::Seconds),
    EnvVarSpec::optional(DEPLOY_COLLECT_STATIC_WAIT_SECS, EnvVarType::Seconds),
    EnvVarSpec::optional(DEPLOY_SERVICE_WAIT_SECS, EnvVarType::Seconds),
];

/// Returns every environment variable name recognised by the loader.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Returns the names of the variables that must be set.
#[must_use]
pub fn required_env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS
        .iter()
        .filter(|spec| spec.required)
        .map(|spec| spec.env_var)
        .collect()
}

/// A parsed environment value.
enum EnvValue {
    String(String),
    List(Vec<String>),
    Seconds(Duration),
}

/// Parsed values keyed by variable name.
struct EnvValues {
    values: HashMap<&'static str, EnvValue>,
}

impl EnvValues {
    fn string(&self, key: &'static str) -> Result<String, ConfigError> {
        match self.values.get(key) {
            Some(EnvValue::String(value)) => Ok(value.clone()),
            _ => Err(missing(key)),
        }
    }

    fn string_or(&self, key: &'static str, default: &str) -> String {
        match self.values.get(key) {
            Some(EnvValue::String(value)) => value.clone(),
            _ => String::from(default),
        }
    }

    fn list(&self, key: &'static str) -> Result<Vec<String>, ConfigError> {
        match self.values.get(key) {
            Some(EnvValue::List(items)) => Ok(items.clone()),
            _ => Err(missing(key)),
        }
    }

    fn seconds_or(&self, key: &'static str, default: Duration) -> Duration {
        match self.values.get(key) {
            Some(EnvValue::Seconds(value)) => *value,
            _ => default,
        }
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingRequired {
        fields: vec![key.to_owned()],
    }
}

/// Load and validate the deployment configuration.
///
/// # Errors
///
/// Returns `ConfigError::MissingRequired` naming every required variable that
/// is unset or blank.
///
/// Returns `ConfigError::InvalidValue` if a list variable has no entries or a
/// wait budget is not an unsigned integer.
pub fn load_config<E: mockable::Env>(env: &E) -> Result<DeployConfig, ConfigError> {
    let vars = collect_env_vars(env)?;
    let base = StepBudgets::default();

    Ok(DeployConfig {
        ecs: EcsConfig {
            region: vars.string(ECS_REGION)?,
            cluster: vars.string(ECS_CLUSTER)?,
            service: vars.string(ECS_SERVICE)?,
            task_definition: vars.string(ECS_TASK)?,
            subnets: vars.list(ECS_SUBNETS)?,
            security_groups: vars.list(ECS_SECURITY_GROUPS)?,
            container: vars.string_or(ECS_CONTAINER, DEFAULT_CONTAINER),
        },
        rds: RdsConfig {
            region: vars.string(RDS_REGION)?,
            cluster_id: vars.string(RDS_CLUSTER_ID)?,
            snapshot_prefix: vars.string(RDS_SNAPSHOT_PREFIX)?,
        },
        budgets: StepBudgets {
            backup: vars.seconds_or(DEPLOY_BACKUP_WAIT_SECS, base.backup),
            migrate: vars.seconds_or(DEPLOY_MIGRATE_WAIT_SECS, base.migrate),
            collect_static: vars.seconds_or(DEPLOY_COLLECT_STATIC_WAIT_SECS, base.collect_static),
            deploy_service: vars.seconds_or(DEPLOY_SERVICE_WAIT_SECS, base.deploy_service),
        },
    })
}

/// Read every variable in [`ENV_VAR_SPECS`] and parse it by type.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<EnvValues, ConfigError> {
    let mut values = HashMap::new();
    let mut missing_fields = Vec::new();
    let mut first_invalid = None;

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env
            .string(spec.env_var)
            .filter(|value| !value.trim().is_empty())
        else {
            if spec.required {
                missing_fields.push(spec.env_var.to_owned());
            }
            continue;
        };

        match parse_value(spec, &raw_value) {
            Ok(value) => {
                values.insert(spec.env_var, value);
            }
            Err(error) => {
                first_invalid.get_or_insert(error);
            }
        }
    }

    if !missing_fields.is_empty() {
        return Err(ConfigError::MissingRequired {
            fields: missing_fields,
        });
    }
    if let Some(error) = first_invalid {
        return Err(error);
    }
    Ok(EnvValues { values })
}

fn parse_value(spec: &EnvVarSpec, raw_value: &str) -> Result<EnvValue, ConfigError> {
    match spec.var_type {
        EnvVarType::String => Ok(EnvValue::String(raw_value.trim().to_owned())),
        EnvVarType::List => {
            let items: Vec<String> = raw_value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect();
            if items.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: spec.env_var.to_owned(),
                    reason: format!("expected a comma-separated list, got '{raw_value}'"),
                });
            }
            Ok(EnvValue::List(items))
        }
        EnvVarType::Seconds => raw_value
            .trim()
            .parse::<u64>()
            .map(|secs| EnvValue::Seconds(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue {
                field: spec.env_var.to_owned(),
                reason: format!("expected unsigned integer, got '{raw_value}'"),
            }),
    }
}
