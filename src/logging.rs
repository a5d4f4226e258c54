//! Log subscriber setup.
//!
//! Progress is written to stderr through `tracing-subscriber`'s `fmt` layer.
//! The filter comes from `RUST_LOG` when it is set and not blank, and
//! otherwise logs this crate at `info`.

use mockable::Env;
use tracing_subscriber::EnvFilter;

use crate::error::{DeployError, Result};

/// Filter directives used when `RUST_LOG` is unset or blank.
pub const DEFAULT_DIRECTIVES: &str = "info";

const RUST_LOG: &str = "RUST_LOG";

/// Pick the filter directives from the environment.
#[must_use]
pub fn filter_directives<E: Env>(env: &E) -> String {
    env.string(RUST_LOG)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| String::from(DEFAULT_DIRECTIVES))
}

/// Install the global log subscriber.
///
/// # Errors
///
/// Returns `DeployError::LoggingInitFailed` if a global subscriber is already
/// installed.
pub fn init<E: Env>(env: &E) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directives(env)))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| DeployError::LoggingInitFailed {
            message: e.to_string(),
        })
}
