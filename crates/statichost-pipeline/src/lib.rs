//! Deploy orchestration for the statichost deploy agent.
//!
//! This crate contains:
//! - `DeployPipeline`: the ordered fetch, build, publish sequence
//! - `DeployLogSink`: durable, append-only per-deploy logs
//! - `StatusQuery`: read-only status, log retrieval and the existence
//!   check backing on-demand TLS issuance

pub mod deploy;
pub mod logsink;
pub mod status;

#[cfg(test)]
pub(crate) mod testutil;

pub use deploy::{DeployFailure, DeployOutcome, DeployPipeline, Step};
pub use logsink::DeployLogSink;
pub use status::{StatusQuery, StatusReport};
