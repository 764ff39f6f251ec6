//! Site identifiers.

use chrono::Utc;
use serde::Serialize;

use crate::{Error, Result};

/// A validated site domain. Keys all per-domain filesystem state.
///
/// Valid domains are non-empty, contain only ASCII alphanumerics plus
/// `.` and `-`, and have at least one alphanumeric character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Validate and wrap a raw domain string.
    pub fn parse(raw: &str) -> Result<Self> {
        let charset_ok = raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        let has_alnum = raw.chars().any(|c| c.is_ascii_alphanumeric());
        if raw.is_empty() || !charset_ok || !has_alnum {
            return Err(Error::InvalidDomain(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip a leading `www.` prefix from a raw domain string. Used by the
    /// on-demand-TLS existence check, which treats `www.example.com` and
    /// `example.com` as the same site.
    pub fn strip_www(raw: &str) -> &str {
        raw.strip_prefix("www.").unwrap_or(raw)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for one deploy attempt, grouping its log records.
///
/// Timestamp-derived at second granularity; two deploys started within the
/// same second share an id and append to the same log file. Accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeployId(String);

impl DeployId {
    /// Allocate a deploy id from the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now().format("%Y%m%d_%H%M%S").to_string())
    }

    /// Accept a client-supplied deploy id for log lookup. Rejects anything
    /// that could escape the logs directory; a malformed id cannot name an
    /// existing log, so the miss is reported as `NotFound`.
    pub fn parse(raw: &str) -> Result<Self> {
        let ok = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !ok {
            return Err(Error::NotFound(format!("deploy log '{raw}'")));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeployId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
