//! Core domain types and traits for the statichost deploy agent.
//!
//! This crate contains:
//! - The validated `Domain` identifier and timestamp-derived `DeployId`
//! - The per-domain filesystem layout resolver
//! - Job types and the `Executor` trait for isolated job runs
//! - Site compiler configuration
//! - The shared error taxonomy

pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod layout;

pub use config::CompilerConfig;
pub use domain::{DeployId, Domain};
pub use error::{Error, Result};
pub use layout::PathLayout;
