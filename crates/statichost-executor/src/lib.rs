//! Docker-backed job execution for the statichost deploy agent.

mod docker;

pub use docker::DockerExecutor;
