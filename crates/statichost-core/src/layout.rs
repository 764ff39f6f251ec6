//! Per-domain filesystem layout.
//!
//! Everything the agent knows about a site lives under
//! `{root}/{domain}/`: the git checkout in `repository/`, the served tree
//! in `public/`, and deploy logs in `logs/`. The generator writes its
//! output to `repository/public/`, which the publish stage mirrors into
//! the served `public/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{DeployId, Domain};

/// The canonical directory set for one domain. Computing a layout never
/// touches disk; directories are created on demand via the `ensure_*`
/// methods and never deleted by this system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    pub repository_dir: PathBuf,
    pub public_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl PathLayout {
    /// Resolve the layout for a domain under the given root. Pure and
    /// deterministic.
    pub fn resolve(root: &Path, domain: &Domain) -> Self {
        let base = root.join(domain.as_str());
        Self {
            repository_dir: base.join("repository"),
            public_dir: base.join("public"),
            logs_dir: base.join("logs"),
        }
    }

    /// Where the generator is expected to leave its output.
    pub fn build_output_dir(&self) -> PathBuf {
        self.repository_dir.join("public")
    }

    /// Log file for one deploy attempt.
    pub fn log_file(&self, id: &DeployId) -> PathBuf {
        self.logs_dir.join(format!("deploy_{id}.log"))
    }

    pub fn ensure_repository(&self) -> io::Result<()> {
        fs::create_dir_all(&self.repository_dir)
    }

    pub fn ensure_public(&self) -> io::Result<()> {
        fs::create_dir_all(&self.public_dir)
    }

    pub fn ensure_logs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.logs_dir)
    }
}
