//! Error types for statichost.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The requested domain contains characters outside `[A-Za-z0-9.-]`.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// The container runtime cannot be reached at all. Checked as a
    /// precondition before any job is attempted.
    #[error("container runtime unavailable: {0}")]
    ExecutorUnavailable(String),

    /// An isolated job ran but exited non-zero. Carries the job name and
    /// the captured combined output.
    #[error("job '{job}' failed: {output}")]
    JobExecutionFailed { job: String, output: String },

    /// The build reported success but its expected output directory is
    /// absent, so there is nothing to publish.
    #[error("build output not found at {0}")]
    PublishSourceMissing(PathBuf),

    #[error("not found: {0}")]
    NotFound(String),

    /// Catch-all for filesystem and other mid-pipeline surprises.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
