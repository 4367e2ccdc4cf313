//! `review` and `merge`: pull a session's work back into the host tree via
//! its bundle (or, if finalize failed, the live `repo/` directory).

use std::path::{Path, PathBuf};
use vibedom_core::VibedomError;
use vibedom_process::run_and_capture;
use vibedom_session::manager::find;

fn git(args: &[&str], cwd: &Path) -> Result<vibedom_process::ExecutionResult, VibedomError> {
    run_and_capture("git", args, Some(cwd)).map_err(|e| VibedomError::BundleFailed(e.to_string()))
}

fn remote_name() -> String {
    format!("vibedom-{}", chrono::Utc::now().format("%Y%m%d%H%M%S%6f"))
}

/// The bundle if finalize succeeded, otherwise the live `repo/` directory as
/// the documented fallback.
fn remote_source(session_dir: &Path, bundle_path: Option<&str>) -> PathBuf {
    match bundle_path {
        Some(path) => PathBuf::from(path),
        None => session_dir.join("repo"),
    }
}

fn host_tree_is_clean(host_workspace: &Path) -> Result<bool, VibedomError> {
    let result = git(&["status", "--porcelain"], host_workspace)?;
    Ok(result.stdout.trim().is_empty())
}

pub fn handle_review(session_id: &str, branch: Option<&str>, logs_base: &Path) -> anyhow::Result<()> {
    let session = find(logs_base, session_id).ok_or_else(|| VibedomError::NotFound(session_id.to_string()))?;
    let host_workspace = PathBuf::from(&session.state.workspace);
    let source = remote_source(&session.dir, session.state.bundle_path.as_deref());
    let remote = remote_name();

    git(&["remote", "add", &remote, &source.to_string_lossy()], &host_workspace)?;
    let fetch = git(&["fetch", &remote], &host_workspace);
    if fetch.is_err() || !fetch.as_ref().map(|r| r.success()).unwrap_or(false) {
        let _ = git(&["remote", "remove", &remote], &host_workspace);
        anyhow::bail!("failed to fetch session {} for review", session.state.session_id);
    }

    let base_branch = branch.map(str::to_string).unwrap_or_else(|| "HEAD".to_string());
    let log = git(&["log", "--oneline", &format!("{base_branch}..{remote}/HEAD")], &host_workspace)?;
    println!("{}", log.stdout);
    let diff = git(&["diff", &format!("{base_branch}...{remote}/HEAD")], &host_workspace)?;
    println!("{}", diff.stdout);

    git(&["remote", "remove", &remote], &host_workspace)?;
    Ok(())
}

pub fn handle_merge(session_id: &str, branch: Option<&str>, full_history: bool, logs_base: &Path) -> anyhow::Result<()> {
    let session = find(logs_base, session_id).ok_or_else(|| VibedomError::NotFound(session_id.to_string()))?;
    let host_workspace = PathBuf::from(&session.state.workspace);

    if !host_tree_is_clean(&host_workspace)? {
        return Err(VibedomError::DirtyTree.into());
    }

    let source = remote_source(&session.dir, session.state.bundle_path.as_deref());
    let remote = remote_name();
    git(&["remote", "add", &remote, &source.to_string_lossy()], &host_workspace)?;

    let merge_result = (|| -> Result<(), VibedomError> {
        let fetch = git(&["fetch", &remote], &host_workspace)?;
        if !fetch.success() {
            return Err(VibedomError::BundleFailed(fetch.summary));
        }

        let target_branch = branch.unwrap_or(&remote);
        let merge_ref = format!("{remote}/HEAD");
        let merge = if full_history {
            git(&["merge", "--no-ff", &merge_ref], &host_workspace)?
        } else {
            git(&["merge", "--squash", &merge_ref], &host_workspace)?
        };
        if !merge.success() {
            return Err(VibedomError::BundleFailed(merge.summary));
        }
        let _ = target_branch;
        Ok(())
    })();

    git(&["remote", "remove", &remote], &host_workspace)?;
    merge_result?;

    println!("merged session {} into {}", session.state.session_id, host_workspace.display());
    Ok(())
}
