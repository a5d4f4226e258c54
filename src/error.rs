//! Semantic error types for the redeployment orchestrator.
//!
//! Conditions a caller might inspect are modelled as `thiserror` enums. The
//! binary converts the top-level [`DeployError`] into an `eyre::Report` at the
//! process boundary.

use thiserror::Error;

use crate::deploy::Step;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required environment variables are absent or empty.
    #[error("missing required configuration: {}", fields.join(", "))]
    MissingRequired {
        /// Every missing variable, in declaration order.
        fields: Vec<String>,
    },

    /// An environment variable holds a value that cannot be used.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The offending variable.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors reported by a cloud service call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request itself failed (transport, throttling, service error).
    #[error("{operation} request failed: {message}")]
    RequestFailed {
        /// The API operation that failed, e.g. `RunTask`.
        operation: &'static str,
        /// The rendered error chain from the client.
        message: String,
    },

    /// The response lacked a field the caller depends on.
    #[error("{operation} response is missing {field}")]
    MissingField {
        /// The API operation whose response was incomplete.
        operation: &'static str,
        /// Description of the absent field.
        field: &'static str,
    },

    /// The request could not be built from the supplied parameters.
    #[error("invalid {operation} request: {message}")]
    InvalidRequest {
        /// The API operation being prepared.
        operation: &'static str,
        /// Builder error message.
        message: String,
    },
}

/// Errors raised by a bounded polling waiter.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The poll budget ran out before a terminal state was observed.
    #[error("waiter {waiter} timed out after {attempts} attempts")]
    Timeout {
        /// Name of the waiter, e.g. `services_stable`.
        waiter: &'static str,
        /// The number of polls made.
        attempts: u32,
    },

    /// The remote operation reached a state from which it cannot succeed.
    #[error("waiter {waiter} encountered a terminal failure state: {reason}")]
    FailureState {
        /// Name of the waiter.
        waiter: &'static str,
        /// The observed state.
        reason: String,
    },

    /// A poll request failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Errors describing an unsuccessful one-off task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The orchestration service refused to start the task.
    #[error("task could not be started: {failures}")]
    Rejected {
        /// The failures reported by the service, rendered for display.
        failures: String,
    },

    /// The task stopped without completing successfully.
    ///
    /// Diagnostics are logged separately before this is raised.
    #[error("task failed")]
    Failed,

    /// The task, or its application container, was absent from a describe
    /// response.
    #[error("{what} not found in task description")]
    NotFound {
        /// What was looked up.
        what: String,
    },
}

/// Top-level error type for a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A cloud call failed outside of any step-scoped context.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A waiter failed outside of any step-scoped context.
    #[error(transparent)]
    Wait(#[from] WaitError),

    /// A task was unsuccessful.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// A named step failed; the cause is chained as the source.
    #[error("{step} step failed")]
    StepFailed {
        /// The step that failed.
        step: Step,
        /// The underlying failure.
        #[source]
        source: Box<Self>,
    },

    /// The async runtime could not be created.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// The I/O error message.
        message: String,
    },

    /// The global log subscriber could not be installed.
    #[error("failed to initialise logging: {message}")]
    LoggingInitFailed {
        /// The subscriber error message.
        message: String,
    },
}

impl DeployError {
    /// Wrap `source` in a step-scoped failure for `step`.
    #[must_use]
    pub fn step_failed(step: Step, source: impl Into<Self>) -> Self {
        Self::StepFailed {
            step,
            source: Box::new(source.into()),
        }
    }
}

/// A specialised `Result` type for deployment operations.
pub type Result<T> = std::result::Result<T, DeployError>;
