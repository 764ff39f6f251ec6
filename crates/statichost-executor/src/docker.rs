//! Docker executor implementation.

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, LogOutput, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, WaitContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::HostConfig;
use chrono::Utc;
use futures::StreamExt;
use statichost_core::executor::{Executor, JobOutput, JobSpec};
use statichost_core::{Error, Result};
use tracing::{debug, info, warn};

/// Runs jobs as disposable containers against the local Docker daemon.
/// Each job gets a fresh container which is removed after it exits;
/// nothing persists between invocations except the bind-mounted host
/// paths.
pub struct DockerExecutor {
    docker: Docker,
}

impl DockerExecutor {
    /// Connect to the local Docker daemon.
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| Error::ExecutorUnavailable(e.to_string()))?;
        Ok(Self { docker })
    }

    /// Create with a custom Docker client.
    pub fn with_client(docker: Docker) -> Self {
        Self { docker }
    }

    fn container_name(spec: &JobSpec) -> String {
        // Timestamp suffix keeps concurrent jobs of the same kind apart.
        format!(
            "statichost-{}-{}",
            spec.name,
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        )
    }

    /// Best-effort image pull. Missing layers are fetched; pull errors are
    /// logged and left for container creation to surface properly.
    async fn pull_image(&self, image: &str) {
        info!(image = %image, "Pulling image");
        let options = CreateImageOptions {
            from_image: image.to_string(),
            ..Default::default()
        };

        let mut pull_stream = self.docker.create_image(Some(options), None, None);
        while let Some(result) = pull_stream.next().await {
            match result {
                Ok(progress) => {
                    if let Some(status) = progress.status {
                        debug!(status = %status, "Pull progress");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Pull warning");
                }
            }
        }
    }

    /// Collect the container's full combined stdout+stderr as decoded text.
    async fn collect_output(&self, container_name: &str) -> String {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            follow: false,
            ..Default::default()
        };

        let mut stream = self.docker.logs(container_name, Some(options));
        let mut output = String::new();
        while let Some(result) = stream.next().await {
            match result {
                Ok(LogOutput::StdOut { message })
                | Ok(LogOutput::StdErr { message })
                | Ok(LogOutput::Console { message })
                | Ok(LogOutput::StdIn { message }) => {
                    output.push_str(&String::from_utf8_lossy(&message));
                }
                Err(e) => {
                    warn!(error = %e, "Log read error");
                }
            }
        }
        output
    }

    async fn remove_container(&self, container_name: &str) {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        if let Err(e) = self.docker.remove_container(container_name, Some(options)).await {
            warn!(container = %container_name, error = %e, "Failed to remove container");
        }
    }
}

#[async_trait]
impl Executor for DockerExecutor {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn ping(&self) -> bool {
        self.docker.ping().await.is_ok()
    }

    async fn run(&self, spec: JobSpec) -> Result<JobOutput> {
        let container_name = Self::container_name(&spec);

        self.pull_image(&spec.image).await;

        let binds: Option<Vec<String>> = if spec.binds.is_empty() {
            None
        } else {
            Some(
                spec.binds
                    .iter()
                    .map(|b| {
                        let mode = if b.read_only { "ro" } else { "rw" };
                        format!("{}:{}:{}", b.host_path.display(), b.container_path, mode)
                    })
                    .collect(),
            )
        };

        let host_config = HostConfig {
            binds,
            ..Default::default()
        };

        let config = Config {
            image: Some(spec.image.clone()),
            cmd: if spec.command.is_empty() {
                None
            } else {
                Some(spec.command.clone())
            },
            entrypoint: spec.entrypoint.clone(),
            user: Some(spec.user.clone()),
            working_dir: spec.working_dir.clone(),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            tty: Some(false),
            host_config: Some(host_config),
            ..Default::default()
        };

        let create_options = CreateContainerOptions {
            name: container_name.clone(),
            platform: None,
        };

        info!(container = %container_name, image = %spec.image, "Creating container");
        self.docker
            .create_container(Some(create_options), config)
            .await
            .map_err(|e| Error::Unexpected(format!("failed to create container: {e}")))?;

        info!(container = %container_name, "Starting container");
        if let Err(e) = self
            .docker
            .start_container(&container_name, None::<StartContainerOptions<String>>)
            .await
        {
            self.remove_container(&container_name).await;
            return Err(Error::Unexpected(format!("failed to start container: {e}")));
        }

        // Block until the container exits. A non-zero exit surfaces either
        // as a wait response status code or as a daemon-side wait error.
        let mut wait_stream = self
            .docker
            .wait_container(&container_name, None::<WaitContainerOptions<String>>);
        let exit_code = match wait_stream.next().await {
            Some(Ok(response)) => response.status_code,
            Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => code,
            Some(Err(e)) => {
                let output = self.collect_output(&container_name).await;
                self.remove_container(&container_name).await;
                return Err(Error::Unexpected(format!("wait failed: {e}: {output}")));
            }
            None => {
                self.remove_container(&container_name).await;
                return Err(Error::Unexpected("wait stream ended without a result".to_string()));
            }
        };

        let output = self.collect_output(&container_name).await;
        self.remove_container(&container_name).await;

        if exit_code == 0 {
            debug!(container = %container_name, "Job completed");
            Ok(JobOutput { output })
        } else {
            Err(Error::JobExecutionFailed {
                job: spec.name,
                output,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_names_are_distinct_per_invocation() {
        let spec = JobSpec::new("fetch", "alpine/git:latest");
        let a = DockerExecutor::container_name(&spec);
        let b = DockerExecutor::container_name(&spec);
        assert!(a.starts_with("statichost-fetch-"));
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Requires a reachable Docker daemon.
    #[tokio::test]
    #[ignore]
    async fn runs_a_job_and_captures_output() {
        let executor = DockerExecutor::connect().expect("connect to Docker");
        assert!(executor.ping().await);

        let spec = JobSpec::new("echo", "alpine:latest").command(["echo", "hello"]);
        let result = executor.run(spec).await.expect("job should succeed");
        assert!(result.output.contains("hello"));
    }

    #[tokio::test]
    #[ignore]
    async fn nonzero_exit_reports_job_failure() {
        let executor = DockerExecutor::connect().expect("connect to Docker");

        let spec = JobSpec::new("false", "alpine:latest").command(["sh", "-c", "echo boom; exit 3"]);
        match executor.run(spec).await {
            Err(Error::JobExecutionFailed { job, output }) => {
                assert_eq!(job, "false");
                assert!(output.contains("boom"));
            }
            other => panic!("expected JobExecutionFailed, got {other:?}"),
        }
    }
}
