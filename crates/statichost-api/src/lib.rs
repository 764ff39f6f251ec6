//! HTTP API for the statichost deploy agent.
//!
//! Deploys are triggered over HTTP, logs and status are read back over
//! HTTP, and a reverse proxy's on-demand TLS hook asks here whether a
//! domain is served at all.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;
