//! Cleanup predicates (C9): age filter, status filter, deletion.

use crate::manager::Session;
use chrono::Duration;

/// Keep sessions started more than `days` ago. A future-dated `started_at`
/// (clock skew) is excluded by construction since its age is negative.
pub fn filter_by_age(sessions: Vec<Session>, days: i64) -> Vec<Session> {
    let threshold = Duration::days(days);
    sessions.into_iter().filter(|s| s.age() > threshold).collect()
}

/// Keep sessions whose on-disk status is not `running`. Relies on the
/// registry's "`state.json` is authoritative" invariant: no runtime call.
pub fn filter_not_running(sessions: Vec<Session>) -> Vec<Session> {
    sessions.into_iter().filter(|s| !s.state.is_running()).collect()
}

/// Remove a session directory recursively, swallowing errors: a cleanup
/// pass over many sessions should not abort because one directory vanished
/// underneath it.
pub fn delete_session(session_dir: &std::path::Path) {
    let _ = std::fs::remove_dir_all(session_dir);
}
