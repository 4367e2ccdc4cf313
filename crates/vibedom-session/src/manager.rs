//! Session discovery, filtering, and resolution (the registry, C3).

use crate::state::SessionState;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use vibedom_core::VibedomError;

/// One session directory paired with its parsed state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub dir: PathBuf,
    pub state: SessionState,
}

impl Session {
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.state.started_at
    }

    fn workspace_basename(&self) -> String {
        Path::new(&self.state.workspace)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.state.workspace.clone())
    }
}

/// List every `session-*` subdirectory of `logs_base` that has a loadable
/// `state.json`, newest first. Subdirectories that don't parse (missing or
/// corrupt `state.json`) are silently skipped: the registry's job is to
/// report what's legible, not to repair what isn't.
pub fn all(logs_base: &Path) -> Vec<Session> {
    let mut sessions = Vec::new();
    let Ok(entries) = std::fs::read_dir(logs_base) else {
        return sessions;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_session_dir = path.is_dir()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("session-"));
        if !is_session_dir {
            continue;
        }
        if let Ok(state) = SessionState::load(&path) {
            sessions.push(Session { dir: path, state });
        } else {
            tracing::warn!(dir = %path.display(), "skipping session with unreadable state.json");
        }
    }
    sessions.sort_by(|a, b| b.state.started_at.cmp(&a.state.started_at));
    sessions
}

/// `all()` filtered to sessions whose on-disk status is `running`.
pub fn running(logs_base: &Path) -> Vec<Session> {
    all(logs_base).into_iter().filter(|s| s.state.is_running()).collect()
}

/// First session, newest first, whose `session_id` equals `id_or_name` or
/// whose workspace basename equals `id_or_name`.
pub fn find(logs_base: &Path, id_or_name: &str) -> Option<Session> {
    all(logs_base)
        .into_iter()
        .find(|s| s.state.session_id == id_or_name || s.workspace_basename() == id_or_name)
}

/// Resolve a session either by explicit id/workspace name, or — when
/// `id_or_name` is `None` — from the set of candidate sessions, prompting
/// interactively via `pick` when more than one candidate exists.
///
/// `pick` receives the candidate list (newest first) and returns the index
/// of the chosen session, or an error (e.g. `Cancelled` on Ctrl-C). Injecting
/// the picker keeps this function testable without a terminal.
pub fn resolve(
    logs_base: &Path,
    id_or_name: Option<&str>,
    running_only: bool,
    pick: impl FnOnce(&[Session]) -> Result<usize, VibedomError>,
) -> Result<Session, VibedomError> {
    if let Some(id_or_name) = id_or_name {
        return find(logs_base, id_or_name)
            .ok_or_else(|| VibedomError::NotFound(id_or_name.to_string()));
    }

    let candidates = if running_only { running(logs_base) } else { all(logs_base) };
    match candidates.len() {
        0 => Err(VibedomError::NoSessions),
        1 => Ok(candidates.into_iter().next().expect("len checked")),
        _ => {
            let index = pick(&candidates)?;
            candidates
                .into_iter()
                .nth(index)
                .ok_or_else(|| VibedomError::NotFound("selection out of range".to_string()))
        }
    }
}

/// `state.json` is authoritative for lifecycle decisions: if the record
/// isn't `running`, report not-running without ever invoking the runtime.
/// Only a `running` record consults the live container list — a crashed
/// container still marked `running` is treated as running by cleanup
/// commands, so the safe failure mode is to under-delete, not over-delete.
pub fn is_container_running(session: &Session, runtime_reports_running: impl FnOnce(&str) -> bool) -> bool {
    if !session.state.is_running() {
        return false;
    }
    runtime_reports_running(&session.state.container_name)
}

/// Create a new session directory under `logs_base`, named
/// `session-<YYYYMMDD-HHMMSS-microseconds>` to match `started_at`'s wall
/// clock and sort lexicographically with it, then persist the initial
/// `running` record.
pub fn create_session(
    logs_base: &Path,
    workspace: &Path,
    runtime: vibedom_core::Runtime,
) -> Result<Session, VibedomError> {
    let state = SessionState::create(workspace, runtime);
    let dir_name = format!("session-{}", state.started_at.format("%Y%m%d-%H%M%S-%6f"));
    let dir = logs_base.join(dir_name);
    std::fs::create_dir_all(&dir).map_err(|e| VibedomError::AuditWriteFailed(e.to_string()))?;
    state.save(&dir)?;
    Ok(Session { dir, state })
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}
