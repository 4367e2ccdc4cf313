//! The persisted session record (`state.json`) and its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use vibedom_core::{Runtime, SessionStatus, VibedomError};

/// Typed, explicit-nullability record persisted as `<session_dir>/state.json`.
///
/// Invariants enforced by construction and by every mutator in this module:
/// `ended_at` is `None` iff `status == Running`; `bundle_path` is `Some` iff
/// `status == Complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub workspace: String,
    pub runtime: Runtime,
    pub container_name: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub bundle_path: Option<String>,
}

impl SessionState {
    /// Build a fresh `running` record for `workspace`. `workspace` must be an
    /// absolute path whose basename becomes both the session id's first
    /// segment and the container name.
    pub fn create(workspace: &Path, runtime: Runtime) -> Self {
        let basename = workspace
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| workspace.to_string_lossy().into_owned());
        let session_id = vibedom_words::generate_session_id(&basename);
        Self {
            session_id,
            workspace: workspace.to_string_lossy().into_owned(),
            runtime,
            container_name: format!("vibedom-{basename}"),
            status: SessionStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
            bundle_path: None,
        }
    }

    /// Read and parse `<session_dir>/state.json`.
    pub fn load(session_dir: &Path) -> Result<Self, VibedomError> {
        let path = session_dir.join("state.json");
        let content = fs::read_to_string(&path).map_err(|_| {
            VibedomError::NotFound(session_dir.display().to_string())
        })?;
        serde_json::from_str(&content).map_err(|e| VibedomError::Corrupt {
            path,
            reason: e.to_string(),
        })
    }

    /// Atomically write `<session_dir>/state.json` via a temp file in the
    /// same directory followed by a rename, so concurrent readers never see
    /// a partially-written file.
    pub fn save(&self, session_dir: &Path) -> Result<(), VibedomError> {
        let path = session_dir.join("state.json");
        let tmp_path = session_dir.join(".state.json.tmp");
        let content = serde_json::to_string_pretty(self).map_err(|e| VibedomError::Corrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&tmp_path, content).map_err(|e| VibedomError::AuditWriteFailed(e.to_string()))?;
        fs::rename(&tmp_path, &path).map_err(|e| VibedomError::AuditWriteFailed(e.to_string()))?;
        Ok(())
    }

    /// Transition `running -> complete` and persist. Calling this on a
    /// terminal state is a programmer error.
    pub fn mark_complete(&mut self, bundle_path: &Path, session_dir: &Path) -> Result<(), VibedomError> {
        assert!(
            self.status == SessionStatus::Running,
            "mark_complete called on non-running session '{}' (status: {})",
            self.session_id,
            self.status
        );
        self.status = SessionStatus::Complete;
        self.ended_at = Some(Utc::now());
        self.bundle_path = Some(bundle_path.to_string_lossy().into_owned());
        self.save(session_dir)
    }

    /// Transition `running -> abandoned` and persist. Calling this on a
    /// terminal state is a programmer error.
    pub fn mark_abandoned(&mut self, session_dir: &Path) -> Result<(), VibedomError> {
        assert!(
            self.status == SessionStatus::Running,
            "mark_abandoned called on non-running session '{}' (status: {})",
            self.session_id,
            self.status
        );
        self.status = SessionStatus::Abandoned;
        self.ended_at = Some(Utc::now());
        self.save(session_dir)
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }
}
