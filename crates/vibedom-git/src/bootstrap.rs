//! Workspace isolation: clone the host repo into a session-scoped working
//! copy, or snapshot a non-git workspace into a fresh repo.

use std::path::Path;
use vibedom_core::VibedomError;
use vibedom_process::run_and_capture;

/// Fixed identity committed into every session clone, so the agent's commits
/// never depend on host git config.
pub const AGENT_NAME: &str = "vibedom-agent";
pub const AGENT_EMAIL: &str = "agent@vibedom.local";

const SNAPSHOT_MESSAGE: &str = "Initial snapshot";

/// How the session's working copy was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Cloned from the host's `.git`, checked out onto `branch`.
    ClonedFromGit { branch: String },
    /// The workspace had no `.git`; a fresh repo was snapshotted in.
    SnapshotInit,
}

fn git(args: &[&str], cwd: &Path) -> Result<vibedom_process::ExecutionResult, VibedomError> {
    run_and_capture("git", args, Some(cwd)).map_err(|e| VibedomError::BundleFailed(e.to_string()))
}

fn set_agent_identity(repo: &Path) -> Result<(), VibedomError> {
    git(&["config", "user.name", AGENT_NAME], repo)?;
    git(&["config", "user.email", AGENT_EMAIL], repo)?;
    Ok(())
}

fn host_current_branch(workspace: &Path) -> Result<String, VibedomError> {
    let result = run_and_capture(
        "git",
        &["-C", &workspace.to_string_lossy(), "rev-parse", "--abbrev-ref", "HEAD"],
        None,
    )
    .map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
    let branch = result.stdout.trim();
    if branch.is_empty() || branch == "HEAD" {
        Ok("main".to_string())
    } else {
        Ok(branch.to_string())
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), VibedomError> {
    std::fs::create_dir_all(dst).map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
    for entry in std::fs::read_dir(src).map_err(|e| VibedomError::BundleFailed(e.to_string()))? {
        let entry = entry.map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
        let dest_path = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
        if file_type.is_dir() {
            copy_tree(&entry.path(), &dest_path)?;
        } else if file_type.is_file() {
            std::fs::copy(entry.path(), &dest_path).map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
        }
    }
    Ok(())
}

/// Populate `target` (normally `<session_dir>/repo`) from `workspace`.
///
/// If `workspace/.git` exists, clones it and checks out the host's current
/// branch (creating it locally if the clone doesn't have it yet, which
/// happens for a branch created on the host after the last fetchable ref).
/// Otherwise copies the workspace contents into a freshly initialized repo
/// with one "Initial snapshot" commit. Either way, the session's fixed agent
/// identity is set in the new clone's config before returning.
pub fn bootstrap_repo(workspace: &Path, target: &Path) -> Result<BootstrapOutcome, VibedomError> {
    let host_git_dir = workspace.join(".git");
    if host_git_dir.exists() {
        git(
            &["clone", &host_git_dir.to_string_lossy(), &target.to_string_lossy()],
            workspace,
        )?;
        let branch = host_current_branch(workspace)?;

        let branch_exists = git(&["rev-parse", "--verify", &branch], target)
            .map(|r| r.success())
            .unwrap_or(false);
        if branch_exists {
            git(&["checkout", &branch], target)?;
        } else {
            git(&["checkout", "-b", &branch], target)?;
        }

        set_agent_identity(target)?;
        tracing::debug!(%branch, target = %target.display(), "cloned host repo for session");
        Ok(BootstrapOutcome::ClonedFromGit { branch })
    } else {
        copy_tree(workspace, target)?;
        git(&["init"], target)?;
        set_agent_identity(target)?;
        git(&["add", "-A"], target)?;
        git(&["commit", "-m", SNAPSHOT_MESSAGE], target)?;
        tracing::debug!(target = %target.display(), "workspace had no .git; snapshotted into a fresh repo");
        Ok(BootstrapOutcome::SnapshotInit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn init_host_repo(dir: &Path) {
        git(&["init", "-q"], dir).unwrap();
        git(&["config", "user.name", "host"], dir).unwrap();
        git(&["config", "user.email", "host@example.com"], dir).unwrap();
        std::fs::write(dir.join("README.md"), "hello").unwrap();
        git(&["add", "-A"], dir).unwrap();
        git(&["commit", "-q", "-m", "initial"], dir).unwrap();
    }

    #[test]
    fn git_workspace_clones_and_checks_out_branch() {
        let workspace = tempdir().unwrap();
        init_host_repo(workspace.path());
        git(&["checkout", "-q", "-b", "feature/x"], workspace.path()).unwrap();

        let target = tempdir().unwrap();
        let target_repo = target.path().join("repo");
        let outcome = bootstrap_repo(workspace.path(), &target_repo).unwrap();

        assert_eq!(outcome, BootstrapOutcome::ClonedFromGit { branch: "feature/x".to_string() });
        assert!(target_repo.join("README.md").exists());

        let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"], &target_repo).unwrap();
        assert_eq!(branch.stdout.trim(), "feature/x");
    }

    #[test]
    fn git_workspace_sets_fixed_agent_identity() {
        let workspace = tempdir().unwrap();
        init_host_repo(workspace.path());

        let target_repo = tempdir().unwrap().path().join("repo");
        bootstrap_repo(workspace.path(), &target_repo).unwrap();

        let name = git(&["config", "user.name"], &target_repo).unwrap();
        assert_eq!(name.stdout.trim(), AGENT_NAME);
    }

    #[test]
    fn non_git_workspace_produces_single_snapshot_commit() {
        let workspace = tempdir().unwrap();
        std::fs::write(workspace.path().join("hello.txt"), "hi").unwrap();

        let target_repo = tempdir().unwrap().path().join("repo");
        let outcome = bootstrap_repo(workspace.path(), &target_repo).unwrap();

        assert_eq!(outcome, BootstrapOutcome::SnapshotInit);
        assert!(target_repo.join("hello.txt").exists());

        let log = git(&["log", "--oneline"], &target_repo).unwrap();
        assert_eq!(log.stdout.lines().count(), 1);
        assert!(log.stdout.contains(SNAPSHOT_MESSAGE));
    }

    #[test]
    fn host_git_is_never_written_to() {
        let workspace = tempdir().unwrap();
        init_host_repo(workspace.path());
        let before = git(&["rev-parse", "HEAD"], workspace.path()).unwrap().stdout;

        let target_repo = tempdir().unwrap().path().join("repo");
        bootstrap_repo(workspace.path(), &target_repo).unwrap();

        let after = git(&["rev-parse", "HEAD"], workspace.path()).unwrap().stdout;
        assert_eq!(before, after);
    }
}
