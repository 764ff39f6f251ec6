//! Job types and the `Executor` trait.
//!
//! Executors run a single command in a disposable, isolated environment
//! (a container) with explicit filesystem bindings and no retained state
//! across invocations.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;

use crate::Result;

/// User id every job runs as. Nothing the agent launches runs as root.
pub const JOB_UID: &str = "1000";

/// A host directory bound into the job's filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindMount {
    pub host_path: PathBuf,
    pub container_path: String,
    pub read_only: bool,
}

/// Specification for one isolated job run. A value object; built by the
/// pipeline, consumed by the executor, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSpec {
    /// Short label naming the job, used in error reports and container
    /// naming.
    pub name: String,
    /// Container image to run.
    pub image: String,
    /// Command to execute.
    pub command: Vec<String>,
    /// Entrypoint override, if any.
    pub entrypoint: Option<Vec<String>>,
    /// Working directory inside the container.
    pub working_dir: Option<String>,
    /// User to run as.
    pub user: String,
    /// Host paths bound into the container.
    pub binds: Vec<BindMount>,
}

impl JobSpec {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
            command: Vec::new(),
            entrypoint: None,
            working_dir: None,
            user: JOB_UID.to_string(),
            binds: Vec::new(),
        }
    }

    pub fn command(mut self, command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn entrypoint(mut self, entrypoint: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.entrypoint = Some(entrypoint.into_iter().map(Into::into).collect());
        self
    }

    pub fn working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn bind(
        mut self,
        host_path: impl Into<PathBuf>,
        container_path: impl Into<String>,
        read_only: bool,
    ) -> Self {
        self.binds.push(BindMount {
            host_path: host_path.into(),
            container_path: container_path.into(),
            read_only,
        });
        self
    }
}

/// Captured result of a completed job: the combined, decoded
/// stdout+stderr text. Consumed immediately by the caller.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub output: String,
}

/// Trait for isolated job executors.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Name of this executor.
    fn name(&self) -> &'static str;

    /// Whether the backing runtime is reachable right now.
    async fn ping(&self) -> bool;

    /// Run a job to completion and capture its combined output.
    ///
    /// A non-zero exit reports `Error::JobExecutionFailed` with the
    /// captured output attached; an unreachable runtime reports
    /// `Error::ExecutorUnavailable`. No retries are performed here.
    async fn run(&self, spec: JobSpec) -> Result<JobOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder_defaults() {
        let spec = JobSpec::new("fetch", "alpine/git:latest")
            .command(["pull", "origin", "release"])
            .working_dir("/repo")
            .bind("/data/example.com/repository", "/repo", false);

        assert_eq!(spec.user, JOB_UID);
        assert!(spec.entrypoint.is_none());
        assert_eq!(spec.binds.len(), 1);
        assert!(!spec.binds[0].read_only);
        assert_eq!(spec.command, vec!["pull", "origin", "release"]);
    }
}
