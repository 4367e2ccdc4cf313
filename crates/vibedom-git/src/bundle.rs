//! Session finalization: package the session's repo into a verified git
//! bundle that the host can fetch from.

use std::path::{Path, PathBuf};
use vibedom_core::VibedomError;
use vibedom_process::run_and_capture;

const BUNDLE_FILE_NAME: &str = "repo.bundle";

fn git(args: &[&str], cwd: &Path) -> Result<vibedom_process::ExecutionResult, VibedomError> {
    run_and_capture("git", args, Some(cwd)).map_err(|e| VibedomError::BundleFailed(e.to_string()))
}

/// Bundle every ref in `repo_dir` into `<session_dir>/repo.bundle` and verify
/// it. On success returns the bundle path; the caller transitions the session
/// to `complete`. On failure the half-written bundle is removed and
/// `repo_dir` is left untouched so it can serve as a fallback; the caller
/// transitions the session to `abandoned` instead.
pub fn finalize_bundle(repo_dir: &Path, session_dir: &Path) -> Result<PathBuf, VibedomError> {
    let bundle_path = session_dir.join(BUNDLE_FILE_NAME);

    let create = git(
        &["bundle", "create", &bundle_path.to_string_lossy(), "--all"],
        repo_dir,
    );
    let create_ok = matches!(&create, Ok(r) if r.success());
    if !create_ok {
        let _ = std::fs::remove_file(&bundle_path);
        let reason = match create {
            Ok(r) => r.summary,
            Err(e) => e.to_string(),
        };
        return Err(VibedomError::BundleFailed(format!("bundle create failed: {reason}")));
    }

    let verify = git(&["bundle", "verify", &bundle_path.to_string_lossy()], repo_dir);
    let verify_ok = matches!(&verify, Ok(r) if r.success());
    if !verify_ok {
        let reason = match verify {
            Ok(r) => r.summary,
            Err(e) => e.to_string(),
        };
        let _ = std::fs::remove_file(&bundle_path);
        tracing::warn!(%reason, dir = %repo_dir.display(), "discarding bundle that failed verification");
        return Err(VibedomError::BundleFailed(format!("bundle verify failed: {reason}")));
    }

    Ok(bundle_path)
}
