//! Durable per-deploy logging.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use statichost_core::{DeployId, PathLayout};
use tracing::error;

/// Appends timestamped, step-labeled records to one deploy attempt's log
/// file. Purely additive; existing content is never rewritten.
///
/// Write failures are reported to the operator log and swallowed; a
/// broken log disk must not abort a deploy.
pub struct DeployLogSink {
    logs_dir: PathBuf,
    log_file: PathBuf,
}

impl DeployLogSink {
    pub fn new(layout: &PathLayout, deploy_id: &DeployId) -> Self {
        Self {
            logs_dir: layout.logs_dir.clone(),
            log_file: layout.log_file(deploy_id),
        }
    }

    /// Append one record for a pipeline step. Either output channel may be
    /// absent.
    pub fn append(&self, step: &str, stdout: Option<&str>, stderr: Option<&str>) {
        if let Err(e) = self.try_append(step, stdout, stderr) {
            error!(log = %self.log_file.display(), error = %e, "Failed to write deploy log");
        }
    }

    fn try_append(&self, step: &str, stdout: Option<&str>, stderr: Option<&str>) -> io::Result<()> {
        fs::create_dir_all(&self.logs_dir)?;

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let mut record = format!("\n=== {} - {} ===\n", step.to_uppercase(), timestamp);
        if let Some(out) = stdout {
            record.push_str("STDOUT:\n");
            record.push_str(out);
            record.push('\n');
        }
        if let Some(err) = stderr {
            record.push_str("STDERR:\n");
            record.push_str(err);
            record.push('\n');
        }
        record.push_str(&"=".repeat(50));
        record.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;
        file.write_all(record.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statichost_core::Domain;
    use std::path::Path;
    use tempfile::TempDir;

    fn sink_in(root: &Path) -> (DeployLogSink, PathBuf) {
        let domain = Domain::parse("example.com").unwrap();
        let layout = PathLayout::resolve(root, &domain);
        let id = DeployId::parse("20250101_120000").unwrap();
        let file = layout.log_file(&id);
        (DeployLogSink::new(&layout, &id), file)
    }

    #[test]
    fn creates_log_dir_and_appends_records_in_order() {
        let root = TempDir::new().unwrap();
        let (sink, file) = sink_in(root.path());

        sink.append("deploy_start", Some("starting"), None);
        sink.append("fetch", Some("pulled"), None);
        sink.append("build_error", None, Some("boom"));

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content.matches("=== ").count(), 3);
        let start = content.find("=== DEPLOY_START").unwrap();
        let fetch = content.find("=== FETCH").unwrap();
        let build = content.find("=== BUILD_ERROR").unwrap();
        assert!(start < fetch && fetch < build);
        assert!(content.contains("STDOUT:\npulled\n"));
        assert!(content.contains("STDERR:\nboom\n"));
    }

    #[test]
    fn append_never_rewrites_prior_records() {
        let root = TempDir::new().unwrap();
        let (sink, file) = sink_in(root.path());

        sink.append("deploy_start", Some("first"), None);
        let before = fs::read_to_string(&file).unwrap();

        sink.append("fetch", Some("second"), None);
        let after = fs::read_to_string(&file).unwrap();
        assert!(after.starts_with(&before));
        assert!(after.len() > before.len());
    }

    #[test]
    fn write_failure_is_swallowed() {
        // Point the sink at an unwritable location: a file where the logs
        // directory should be.
        let root = TempDir::new().unwrap();
        let domain = Domain::parse("example.com").unwrap();
        let layout = PathLayout::resolve(root.path(), &domain);
        fs::create_dir_all(layout.logs_dir.parent().unwrap()).unwrap();
        fs::write(&layout.logs_dir, b"not a directory").unwrap();

        let id = DeployId::parse("20250101_120000").unwrap();
        let sink = DeployLogSink::new(&layout, &id);
        sink.append("deploy_start", Some("ignored"), None);
    }
}
