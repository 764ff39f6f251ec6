//! The deploy pipeline: fetch → build → publish.
//!
//! One deploy runs three isolated jobs against the domain's directory
//! set, in strict order, recording every stage's attempt and outcome in
//! the per-deploy log before returning. A fetch failure is tolerable
//! (first deploys start from a directory that is not yet a git checkout);
//! everything else aborts.
//!
//! There is no locking: concurrent deploys of one domain race on the same
//! directories. Accepted limitation.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use statichost_core::executor::{Executor, JobSpec};
use statichost_core::{CompilerConfig, DeployId, Domain, Error, PathLayout};
use tracing::{error, info, warn};

use crate::DeployLogSink;

/// Image used for the fetch stage and for commit metadata lookups.
pub const GIT_IMAGE: &str = "alpine/git:latest";

/// Image used for the publish mirror sync.
pub const SYNC_IMAGE: &str = "secoresearch/rsync:latest";

/// Branch the fetch stage pulls.
const RELEASE_BRANCH: &str = "release";

/// In-container mount point for the repository checkout.
const REPO_MOUNT: &str = "/repo";

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Fetch,
    Build,
    Publish,
}

impl Step {
    pub fn label(self) -> &'static str {
        match self {
            Step::Fetch => "fetch",
            Step::Build => "build",
            Step::Publish => "publish",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything a successful deploy reports back.
#[derive(Debug, Clone, Serialize)]
pub struct DeployOutcome {
    pub domain: Domain,
    pub deploy_id: DeployId,
    pub repository_path: PathBuf,
    pub public_path: PathBuf,
    pub steps_completed: Vec<Step>,
    pub compiler_image: String,
}

/// A failed deploy, with the deploy id so operators can correlate the
/// response with the durable log.
#[derive(Debug)]
pub struct DeployFailure {
    pub error: Error,
    pub deploy_id: DeployId,
}

/// Orchestrates deploys for all domains under one root.
pub struct DeployPipeline {
    executor: Arc<dyn Executor>,
    root: PathBuf,
    compiler: CompilerConfig,
}

impl DeployPipeline {
    pub fn new(executor: Arc<dyn Executor>, root: PathBuf, compiler: CompilerConfig) -> Self {
        Self {
            executor,
            root,
            compiler,
        }
    }

    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    /// Run the full pipeline for one domain.
    ///
    /// The domain is already validated by construction; a deploy id is
    /// allocated here, so every failure past this point carries one.
    pub async fn deploy(&self, domain: &Domain) -> Result<DeployOutcome, DeployFailure> {
        let deploy_id = DeployId::now();
        let layout = PathLayout::resolve(&self.root, domain);
        let log = DeployLogSink::new(&layout, &deploy_id);

        info!(domain = %domain, deploy_id = %deploy_id, "Starting deploy");
        log.append(
            "deploy_start",
            Some(&format!(
                "Deploy started for domain: {domain}\nDeploy-ID: {deploy_id}\nRepository: {}",
                layout.repository_dir.display()
            )),
            None,
        );

        let fail = |error: Error| DeployFailure {
            error,
            deploy_id: deploy_id.clone(),
        };

        if !self.executor.ping().await {
            let message = format!("{} runtime not reachable", self.executor.name());
            log.append("error", None, Some(&message));
            error!(domain = %domain, "Deploy aborted: {message}");
            return Err(fail(Error::ExecutorUnavailable(message)));
        }

        if let Err(e) = layout.ensure_repository() {
            log.append("error", None, Some(&e.to_string()));
            return Err(fail(e.into()));
        }

        self.fetch(domain, &layout, &log).await.map_err(fail)?;
        self.build(domain, &layout, &log).await.map_err(fail)?;
        self.publish(domain, &layout, &log).await.map_err(fail)?;

        log.append(
            "deploy_success",
            Some(&format!(
                "Deploy completed\nPublic path: {}",
                layout.public_dir.display()
            )),
            None,
        );
        info!(domain = %domain, deploy_id = %deploy_id, "Deploy completed");

        Ok(DeployOutcome {
            domain: domain.clone(),
            deploy_id,
            repository_path: layout.repository_dir,
            public_path: layout.public_dir,
            steps_completed: vec![Step::Fetch, Step::Build, Step::Publish],
            compiler_image: self.compiler.image.clone(),
        })
    }

    /// Fetch stage: pull the release branch into the repository checkout.
    /// A failed pull is tolerable (the directory may not be a git
    /// checkout yet on first deploy) and downgrades to a warning.
    async fn fetch(
        &self,
        domain: &Domain,
        layout: &PathLayout,
        log: &DeployLogSink,
    ) -> Result<(), Error> {
        let spec = JobSpec::new(Step::Fetch.label(), GIT_IMAGE)
            .command(["pull", "origin", RELEASE_BRANCH])
            .working_dir(REPO_MOUNT)
            .bind(&layout.repository_dir, REPO_MOUNT, false);

        match self.executor.run(spec).await {
            Ok(result) => {
                log.append(Step::Fetch.label(), Some(&result.output), None);
                info!(domain = %domain, "Fetch completed");
                Ok(())
            }
            Err(Error::JobExecutionFailed { output, .. }) => {
                log.append(
                    "fetch_warning",
                    Some("Fetch failed (repository may not be a git checkout yet)"),
                    Some(&output),
                );
                warn!(domain = %domain, "Fetch failed, continuing: {output}");
                Ok(())
            }
            Err(e) => {
                log.append("fetch_error", None, Some(&e.to_string()));
                error!(domain = %domain, error = %e, "Fetch stage error");
                Err(e)
            }
        }
    }

    /// Build stage: run the site generator against the checkout. Output
    /// is expected at `repository/public`. Any failure is fatal.
    async fn build(
        &self,
        domain: &Domain,
        layout: &PathLayout,
        log: &DeployLogSink,
    ) -> Result<(), Error> {
        let command = self.compiler.render_command(domain);
        let spec = JobSpec::new(Step::Build.label(), &self.compiler.image)
            .entrypoint([&self.compiler.entrypoint])
            .command(["-c", command.as_str()])
            .working_dir(&self.compiler.working_dir)
            .bind(&layout.repository_dir, REPO_MOUNT, false);

        match self.executor.run(spec).await {
            Ok(result) => {
                log.append(Step::Build.label(), Some(&result.output), None);
                info!(domain = %domain, "Build completed");
                Ok(())
            }
            Err(e) => {
                log.append("build_error", None, Some(&e.to_string()));
                error!(domain = %domain, error = %e, "Build stage failed");
                Err(e)
            }
        }
    }

    /// Publish stage: mirror the build output into the served directory.
    /// The destination tree is made to exactly match the source, wholesale.
    async fn publish(
        &self,
        domain: &Domain,
        layout: &PathLayout,
        log: &DeployLogSink,
    ) -> Result<(), Error> {
        let source = layout.build_output_dir();
        if !source.is_dir() {
            // The build claimed success but left nothing where we expect
            // it; the generator may write elsewhere. Distinct failure, not
            // a silent no-op.
            let message = format!("Build output not found at {}", source.display());
            log.append("error", None, Some(&message));
            warn!(domain = %domain, "{message}");
            return Err(Error::PublishSourceMissing(source));
        }

        if let Err(e) = layout.ensure_public() {
            log.append("publish_error", None, Some(&e.to_string()));
            return Err(e.into());
        }

        let spec = JobSpec::new(Step::Publish.label(), SYNC_IMAGE)
            .command(["rsync", "-a", "--delete", "/source/", "/destination/"])
            .bind(&source, "/source", true)
            .bind(&layout.public_dir, "/destination", false);

        match self.executor.run(spec).await {
            Ok(result) => {
                log.append(Step::Publish.label(), Some(&result.output), None);
                info!(domain = %domain, source = %source.display(), dest = %layout.public_dir.display(), "Publish completed");
                Ok(())
            }
            Err(e) => {
                log.append("publish_error", None, Some(&e.to_string()));
                error!(domain = %domain, error = %e, "Publish stage failed");
                Err(e)
            }
        }
    }
}
