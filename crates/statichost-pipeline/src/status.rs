//! Read-only domain inspection: status documents, deploy log retrieval
//! and the public-directory existence check.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use statichost_core::executor::{Executor, JobSpec};
use statichost_core::{CompilerConfig, DeployId, Domain, Error, PathLayout, Result};
use tracing::debug;

use crate::deploy::GIT_IMAGE;

/// Most recent deploy attempt, by log file modification time.
#[derive(Debug, Clone, Serialize)]
pub struct LatestDeploy {
    pub deploy_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Latest commit metadata read from the repository checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub date: String,
}

/// The status document for one domain.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub domain: Domain,
    pub repository_exists: bool,
    pub public_exists: bool,
    pub logs_exists: bool,
    pub repository_path: PathBuf,
    pub public_path: PathBuf,
    pub logs_path: PathBuf,
    pub compiler_config: CompilerConfig,
    pub log_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_deploy: Option<LatestDeploy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<CommitInfo>,
}

/// Answers operator inspection queries. Read-only; the only business
/// logic is "most recent by modification time".
pub struct StatusQuery {
    executor: Arc<dyn Executor>,
    root: PathBuf,
    compiler: CompilerConfig,
}

impl StatusQuery {
    pub fn new(executor: Arc<dyn Executor>, root: PathBuf, compiler: CompilerConfig) -> Self {
        Self {
            executor,
            root,
            compiler,
        }
    }

    /// Assemble the status document for a domain. Infallible: filesystem
    /// hiccups degrade individual fields instead of failing the query.
    pub async fn status(&self, domain: &Domain) -> StatusReport {
        let layout = PathLayout::resolve(&self.root, domain);
        let logs = list_logs(&layout.logs_dir);

        let latest_deploy = logs
            .iter()
            .max_by_key(|entry| entry.modified)
            .map(|entry| LatestDeploy {
                deploy_id: entry.deploy_id.clone(),
                timestamp: DateTime::<Utc>::from(entry.modified),
            });

        let last_commit = if layout.repository_dir.is_dir() {
            self.last_commit(&layout).await
        } else {
            None
        };

        StatusReport {
            domain: domain.clone(),
            repository_exists: layout.repository_dir.exists(),
            public_exists: layout.public_dir.exists(),
            logs_exists: layout.logs_dir.exists(),
            repository_path: layout.repository_dir.clone(),
            public_path: layout.public_dir.clone(),
            logs_path: layout.logs_dir.clone(),
            compiler_config: self.compiler.clone(),
            log_count: logs.len(),
            latest_deploy,
            last_commit,
        }
    }

    /// Content of the most recent deploy log for a domain.
    pub fn latest_log(&self, domain: &Domain) -> Result<String> {
        let layout = PathLayout::resolve(&self.root, domain);
        let latest = list_logs(&layout.logs_dir)
            .into_iter()
            .max_by_key(|entry| entry.modified)
            .ok_or_else(|| Error::NotFound(format!("deploy logs for {domain}")))?;
        fs::read_to_string(&latest.path).map_err(Into::into)
    }

    /// Content of one specific deploy log.
    pub fn log(&self, domain: &Domain, deploy_id: &DeployId) -> Result<String> {
        let layout = PathLayout::resolve(&self.root, domain);
        let path = layout.log_file(deploy_id);
        if !path.is_file() {
            return Err(Error::NotFound(format!("deploy log '{deploy_id}' for {domain}")));
        }
        fs::read_to_string(&path).map_err(Into::into)
    }

    /// Whether a domain has a served public directory. Strips a leading
    /// `www.` prefix first; gates on-demand TLS certificate issuance.
    /// Pure predicate; invalid domains are simply absent.
    pub fn exists(&self, raw_domain: &str) -> bool {
        let cleaned = Domain::strip_www(raw_domain);
        match Domain::parse(cleaned) {
            Ok(domain) => PathLayout::resolve(&self.root, &domain).public_dir.is_dir(),
            Err(_) => false,
        }
    }

    /// Best-effort commit metadata lookup via a read-only git job.
    /// Explicitly allowed to yield nothing; never an error.
    async fn last_commit(&self, layout: &PathLayout) -> Option<CommitInfo> {
        let spec = JobSpec::new("git_log", GIT_IMAGE)
            .command(["log", "-1", "--pretty=format:%H,%an,%ad", "--date=iso"])
            .working_dir("/repo")
            .bind(&layout.repository_dir, "/repo", true);

        match self.executor.run(spec).await {
            Ok(result) => parse_commit_line(&result.output),
            Err(e) => {
                debug!(error = %e, "Commit metadata lookup failed");
                None
            }
        }
    }
}

fn parse_commit_line(output: &str) -> Option<CommitInfo> {
    let mut parts = output.trim().splitn(3, ',');
    let hash = parts.next()?.to_string();
    let author = parts.next()?.to_string();
    let date = parts.next()?.to_string();
    if hash.is_empty() {
        return None;
    }
    Some(CommitInfo { hash, author, date })
}

struct LogEntry {
    deploy_id: String,
    path: PathBuf,
    modified: SystemTime,
}

/// Deploy log files in a logs directory, unordered. Unreadable entries
/// are skipped.
fn list_logs(logs_dir: &Path) -> Vec<LogEntry> {
    let Ok(entries) = fs::read_dir(logs_dir) else {
        return Vec::new();
    };

    entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let deploy_id = name.strip_prefix("deploy_")?.strip_suffix(".log")?.to_string();
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some(LogEntry {
                deploy_id,
                path: entry.path(),
                modified,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Scripted, ScriptedExecutor};
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    fn query_with(root: &TempDir, executor: ScriptedExecutor) -> StatusQuery {
        StatusQuery::new(
            Arc::new(executor),
            root.path().to_path_buf(),
            CompilerConfig::default(),
        )
    }

    fn domain() -> Domain {
        Domain::parse("example.com").unwrap()
    }

    fn write_log(root: &TempDir, deploy_id: &str, content: &str) {
        let logs = root.path().join("example.com").join("logs");
        fs::create_dir_all(&logs).unwrap();
        fs::write(logs.join(format!("deploy_{deploy_id}.log")), content).unwrap();
    }

    #[tokio::test]
    async fn status_for_untouched_domain() {
        let root = TempDir::new().unwrap();
        let query = query_with(&root, ScriptedExecutor::all_ok());

        let report = query.status(&domain()).await;

        assert!(!report.repository_exists);
        assert!(!report.public_exists);
        assert!(!report.logs_exists);
        assert_eq!(report.log_count, 0);
        assert!(report.latest_deploy.is_none());
        assert!(report.last_commit.is_none());
    }

    #[tokio::test]
    async fn status_reports_latest_deploy_by_mtime() {
        let root = TempDir::new().unwrap();
        write_log(&root, "20250101_080000", "older");
        sleep(Duration::from_millis(20));
        write_log(&root, "20250101_090000", "newer");

        let query = query_with(&root, ScriptedExecutor::all_ok());
        let report = query.status(&domain()).await;

        assert_eq!(report.log_count, 2);
        assert_eq!(
            report.latest_deploy.unwrap().deploy_id,
            "20250101_090000"
        );
    }

    #[tokio::test]
    async fn status_includes_commit_info_when_git_job_succeeds() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("example.com").join("repository")).unwrap();

        let executor = ScriptedExecutor::all_ok().with(
            "git_log",
            Scripted::Ok("abc123,Alice,2025-01-01 12:00:00 +0000"),
        );
        let query = query_with(&root, executor);
        let report = query.status(&domain()).await;

        assert_eq!(
            report.last_commit,
            Some(CommitInfo {
                hash: "abc123".to_string(),
                author: "Alice".to_string(),
                date: "2025-01-01 12:00:00 +0000".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn commit_lookup_failure_is_swallowed() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("example.com").join("repository")).unwrap();

        let executor =
            ScriptedExecutor::all_ok().with("git_log", Scripted::Fail("fatal: not a git repository"));
        let query = query_with(&root, executor);
        let report = query.status(&domain()).await;

        assert!(report.last_commit.is_none());
    }

    #[tokio::test]
    async fn latest_log_returns_most_recent_content() {
        let root = TempDir::new().unwrap();
        write_log(&root, "20250101_080000", "older content");
        sleep(Duration::from_millis(20));
        write_log(&root, "20250101_090000", "newer content");

        let query = query_with(&root, ScriptedExecutor::all_ok());
        assert_eq!(query.latest_log(&domain()).unwrap(), "newer content");
    }

    #[tokio::test]
    async fn missing_logs_report_not_found() {
        let root = TempDir::new().unwrap();
        let query = query_with(&root, ScriptedExecutor::all_ok());

        assert!(matches!(
            query.latest_log(&domain()),
            Err(Error::NotFound(_))
        ));
        let id = DeployId::parse("20250101_120000").unwrap();
        assert!(matches!(
            query.log(&domain(), &id),
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn exists_strips_www_prefix() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("example.com").join("public")).unwrap();

        let query = query_with(&root, ScriptedExecutor::all_ok());
        assert!(query.exists("example.com"));
        assert!(query.exists("www.example.com"));
        assert!(!query.exists("other.com"));
        assert!(!query.exists("bad domain!"));
    }

    #[test]
    fn commit_line_parsing() {
        assert!(parse_commit_line("").is_none());
        assert!(parse_commit_line("abc,only-author").is_none());
        let info = parse_commit_line("abc,Alice,2025-01-01 12:00:00 +0000").unwrap();
        assert_eq!(info.author, "Alice");
        // Dates carry commas through intact because only the first two
        // separators split.
        let info = parse_commit_line("abc,Alice,a,b,c").unwrap();
        assert_eq!(info.date, "a,b,c");
    }
}
