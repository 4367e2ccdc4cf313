//! Session VM lifecycle: teardown, mount/env composition, launch, and the
//! readiness handshake.

use crate::adapter::RuntimeKind;
use std::path::Path;
use std::time::Duration;
use vibedom_core::VibedomError;
use vibedom_process::run_and_capture;

const IMAGE: &str = "vibedom-agent:latest";
const READY_FILE: &str = "/tmp/.vm-ready";
const READY_ATTEMPTS: u32 = 10;
const READY_INTERVAL: Duration = Duration::from_secs(1);

/// Individually-mountable files under `~/.claude` that may exist on the
/// host. The whole directory is never mounted: its agent binary must stay
/// the one baked into the image.
const CLAUDE_HOME_FILES: &[&str] = &["api_key", "settings.json", "skills"];

pub fn container_name(workspace_basename: &str) -> String {
    format!("vibedom-{workspace_basename}")
}

/// Build the bind-mount list for a session launch. `claude_home`, if given,
/// is probed for the individually-mountable files listed above.
pub fn compose_mounts(
    workspace: &Path,
    config_dir: &Path,
    session_dir: &Path,
    claude_home: Option<&Path>,
) -> Vec<String> {
    let mut mounts = vec![
        format!("{}:/mnt/workspace:ro", workspace.display()),
        format!("{}:/mnt/config:ro", config_dir.display()),
        format!("{}:/work/repo", session_dir.join("repo").display()),
        format!("{}:/mnt/session", session_dir.display()),
    ];

    if let Some(claude_home) = claude_home {
        for file in CLAUDE_HOME_FILES {
            let host_path = claude_home.join(file);
            if host_path.exists() {
                mounts.push(format!("{}:/root/.claude/{file}:ro", host_path.display()));
            }
        }
    }

    mounts
}

/// Env vars set unconditionally on every session container, both upper and
/// lowercase proxy variables per the HTTP_PROXY convention.
pub fn compose_env() -> Vec<(String, String)> {
    vec![
        ("HTTP_PROXY".to_string(), "http://127.0.0.1:8080".to_string()),
        ("HTTPS_PROXY".to_string(), "http://127.0.0.1:8080".to_string()),
        ("NO_PROXY".to_string(), "localhost,127.0.0.1,::1".to_string()),
        ("http_proxy".to_string(), "http://127.0.0.1:8080".to_string()),
        ("https_proxy".to_string(), "http://127.0.0.1:8080".to_string()),
        ("no_proxy".to_string(), "localhost,127.0.0.1,::1".to_string()),
    ]
}

/// Names of the runtime artifacts copied from the installed config into the
/// session's mounted config directory before launch.
const RUNTIME_ARTIFACTS: &[&str] = &["proxy_addon.py", "scrubber.py", "patterns.toml"];

fn copy_runtime_artifacts(installed_config: &Path, config_dir: &Path) -> Result<(), VibedomError> {
    std::fs::create_dir_all(config_dir).map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
    for artifact in RUNTIME_ARTIFACTS {
        let src = installed_config.join(artifact);
        if src.exists() {
            std::fs::copy(&src, config_dir.join(artifact)).map_err(|e| VibedomError::BundleFailed(e.to_string()))?;
        }
    }
    Ok(())
}

/// Poll `is_ready` up to `max_attempts` times, sleeping `interval` between
/// attempts, succeeding on the first `true`. Exposed separately from `start`
/// so the timeout/backoff behaviour is testable without a real container.
pub fn poll_ready(mut is_ready: impl FnMut() -> bool, max_attempts: u32, interval: Duration) -> Result<(), VibedomError> {
    for attempt in 0..max_attempts {
        if is_ready() {
            return Ok(());
        }
        if attempt + 1 < max_attempts {
            std::thread::sleep(interval);
        }
    }
    Err(VibedomError::NotReady { attempts: max_attempts })
}

fn remove_container(runtime: RuntimeKind, name: &str) {
    for step in runtime.remove_args(name) {
        let refs: Vec<&str> = step.iter().map(String::as_str).collect();
        let _ = run_and_capture(runtime.binary(), &refs, None);
    }
}

fn is_ready_via_exec(runtime: RuntimeKind, name: &str) -> bool {
    let args = runtime.exec_args(name, &["test", "-f", READY_FILE]);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    matches!(run_and_capture(runtime.binary(), &refs, None), Ok(r) if r.success())
}

/// Launch the session container: idempotent teardown, artifact copy, mount
/// and env composition, launch, then block on the readiness probe.
pub fn start(
    workspace: &Path,
    config_dir: &Path,
    installed_config: &Path,
    session_dir: &Path,
    claude_home: Option<&Path>,
    runtime: RuntimeKind,
) -> Result<String, VibedomError> {
    let workspace_basename = workspace
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());
    let name = container_name(&workspace_basename);

    remove_container(runtime, &name);
    copy_runtime_artifacts(installed_config, config_dir)?;

    let mounts = compose_mounts(workspace, config_dir, session_dir, claude_home);
    let env = compose_env();
    let args = runtime.run_args(&name, IMAGE, &mounts, &env);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let result = run_and_capture(runtime.binary(), &refs, None)
        .map_err(|e| VibedomError::BundleFailed(format!("container launch failed: {e}")))?;
    if !result.success() {
        return Err(VibedomError::BundleFailed(format!(
            "container launch exited {}: {}",
            result.exit_code, result.summary
        )));
    }

    poll_ready(|| is_ready_via_exec(runtime, &name), READY_ATTEMPTS, READY_INTERVAL)?;
    Ok(name)
}

/// Tear down the session container. Treated as idempotent: removing an
/// already-gone container is not an error.
pub fn stop(runtime: RuntimeKind, name: &str) {
    remove_container(runtime, name);
}

/// Run `cmd` inside the named container, returning its captured output.
pub fn exec(runtime: RuntimeKind, name: &str, cmd: &[&str]) -> Result<vibedom_process::ExecutionResult, VibedomError> {
    let args = runtime.exec_args(name, cmd);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run_and_capture(runtime.binary(), &refs, None).map_err(|e| VibedomError::BundleFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::tempdir;

    #[test]
    fn container_name_prefixes_workspace_basename() {
        assert_eq!(container_name("myapp"), "vibedom-myapp");
    }

    #[test]
    fn compose_mounts_includes_required_four() {
        let workspace = Path::new("/ws");
        let config = Path::new("/cfg");
        let session = Path::new("/sess");
        let mounts = compose_mounts(workspace, config, session, None);
        assert_eq!(mounts.len(), 4);
        assert!(mounts.contains(&"/ws:/mnt/workspace:ro".to_string()));
        assert!(mounts.contains(&"/cfg:/mnt/config:ro".to_string()));
        assert!(mounts.contains(&"/sess/repo:/work/repo".to_string()));
        assert!(mounts.contains(&"/sess:/mnt/session".to_string()));
    }

    #[test]
    fn compose_mounts_adds_existing_claude_files_individually() {
        let workspace = tempdir().unwrap();
        let config = tempdir().unwrap();
        let session = tempdir().unwrap();
        let claude_home = tempdir().unwrap();
        std::fs::write(claude_home.path().join("api_key"), "secret").unwrap();

        let mounts = compose_mounts(workspace.path(), config.path(), session.path(), Some(claude_home.path()));
        assert_eq!(mounts.len(), 5);
        assert!(mounts.iter().any(|m| m.ends_with(":/root/.claude/api_key:ro")));
        assert!(!mounts.iter().any(|m| m.contains("settings.json")));
    }

    #[test]
    fn compose_mounts_never_mounts_whole_claude_home() {
        let workspace = Path::new("/ws");
        let config = Path::new("/cfg");
        let session = Path::new("/sess");
        let claude_home = Path::new("/home/user/.claude");
        let mounts = compose_mounts(workspace, config, session, Some(claude_home));
        assert!(!mounts.iter().any(|m| m.starts_with("/home/user/.claude:")));
    }

    #[test]
    fn compose_env_sets_upper_and_lowercase_proxy_vars() {
        let env = compose_env();
        let keys: Vec<&str> = env.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"HTTP_PROXY"));
        assert!(keys.contains(&"http_proxy"));
        assert!(keys.contains(&"NO_PROXY"));
        assert!(keys.contains(&"no_proxy"));
    }

    #[test]
    fn poll_ready_succeeds_on_first_true() {
        let calls = AtomicU32::new(0);
        let result = poll_ready(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                true
            },
            10,
            Duration::ZERO,
        );
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn poll_ready_retries_until_ready() {
        let calls = AtomicU32::new(0);
        let result = poll_ready(
            || calls.fetch_add(1, Ordering::SeqCst) >= 2,
            10,
            Duration::ZERO,
        );
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn poll_ready_fails_after_max_attempts() {
        let result = poll_ready(|| false, 10, Duration::ZERO);
        assert!(matches!(result, Err(VibedomError::NotReady { attempts: 10 })));
    }

    #[test]
    fn copy_runtime_artifacts_skips_missing_files() {
        let installed = tempdir().unwrap();
        let config_dir = tempdir().unwrap();
        std::fs::write(installed.path().join("patterns.toml"), "[[rules]]").unwrap();

        copy_runtime_artifacts(installed.path(), config_dir.path()).unwrap();
        assert!(config_dir.path().join("patterns.toml").exists());
        assert!(!config_dir.path().join("proxy_addon.py").exists());
    }
}
