//! Zero-downtime redeployment of a containerised backend.
//!
//! `ecs-redeploy` snapshots the production database cluster, runs the schema
//! migration as a one-off task, then runs static asset collection while
//! forcing a rolling redeployment of the long-running service. Each step waits
//! for its remote operation to reach a terminal state within a bounded budget,
//! and the first failure aborts the run.
//!
//! # Modules
//!
//! - [`config`]: Deployment settings loaded from environment variables
//! - [`cloud`]: Capability traits over the database, orchestration and log
//!   services, with AWS SDK implementations
//! - [`wait`]: Bounded polling waiters for remote operations
//! - [`deploy`]: Steps, diagnostics and the sequencer
//! - [`logging`]: Log subscriber setup
//! - [`error`]: Semantic error types for the application

pub mod cloud;
pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod wait;
