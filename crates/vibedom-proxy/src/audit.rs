//! Append-only JSON-lines audit log for outbound requests.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Serialize)]
pub struct AuditFinding {
    pub pattern: String,
    pub category: String,
    pub original: String,
    pub replaced_with: String,
}

impl From<&vibedom_scrub::Finding> for AuditFinding {
    fn from(f: &vibedom_scrub::Finding) -> Self {
        AuditFinding {
            pattern: f.pattern_id.clone(),
            category: f.category.clone(),
            original: f.original.clone(),
            replaced_with: f.replaced_with.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub method: String,
    pub url: String,
    pub host: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scrubbed: Vec<AuditFinding>,
}

/// Appends one JSON line per request to `network.jsonl`. The proxy opens the
/// file fresh on every append (simplest correct behaviour across restarts);
/// if the session mount is missing, the first failure is logged loudly and
/// every subsequent one is swallowed so the proxy never aborts traffic over
/// a logging problem.
pub struct AuditLog {
    path: PathBuf,
    warned: AtomicBool,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        AuditLog { path, warned: AtomicBool::new(false) }
    }

    pub fn append(&self, entry: &AuditEntry) {
        if let Err(err) = self.try_append(entry) {
            if !self.warned.swap(true, Ordering::SeqCst) {
                tracing::warn!(path = %self.path.display(), error = %err, "audit log write failed; further failures are silent");
            }
        }
    }

    fn try_append(&self, entry: &AuditEntry) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let line = serde_json::to_string(entry).map_err(std::io::Error::other)?;
        writeln!(file, "{line}")?;
        file.flush()
    }
}

pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}
