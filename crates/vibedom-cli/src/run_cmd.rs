//! `vibedom run <workspace>`: pre-flight scan, session creation, workspace
//! bootstrap, VM launch. Any failure after the session record exists
//! transitions it to `abandoned` rather than leaving it dangling as `running`.

use std::path::{Path, PathBuf};
use vibedom_core::{Runtime, VibedomError};
use vibedom_process::is_on_path;
use vibedom_runtime::RuntimeKind;
use vibedom_session::manager::{create_session, Session};

/// Run the host's pre-flight secret scanner over the workspace before it is
/// ever bind-mounted into a container. Absence of the scanner binary is not
/// itself a failure — it's logged and treated as an implicit pass, since the
/// egress filter is the system's actual security boundary; this is a
/// defense-in-depth convenience, not the control it backs up.
pub fn run_preflight_scan(workspace: &Path, config_base: &Path) -> bool {
    if !is_on_path("gitleaks") {
        tracing::warn!("gitleaks not found on PATH; skipping pre-flight scan");
        return true;
    }
    let config_path = config_base.join("gitleaks.toml");
    let workspace_str = workspace.to_string_lossy().into_owned();
    let config_str = config_path.to_string_lossy().into_owned();
    let mut args = vec!["detect", "--no-banner", "--source", workspace_str.as_str()];
    if config_path.exists() {
        args.push("--config");
        args.push(config_str.as_str());
    }

    match vibedom_process::run_and_capture("gitleaks", &args, None) {
        Ok(result) => result.success(),
        Err(err) => {
            tracing::warn!(%err, "pre-flight scan could not run; proceeding");
            true
        }
    }
}

fn runtime_to_core(kind: RuntimeKind) -> Runtime {
    match kind {
        RuntimeKind::Docker => Runtime::Docker,
        RuntimeKind::Apple => Runtime::Apple,
    }
}

fn resolve_runtime(requested: Option<&str>) -> Result<RuntimeKind, VibedomError> {
    match requested {
        Some("docker") => Ok(RuntimeKind::Docker),
        Some("apple") => Ok(RuntimeKind::Apple),
        Some(other) => Err(VibedomError::NotFound(format!("unknown runtime '{other}'"))),
        None => RuntimeKind::detect(),
    }
}

/// Full effect of `run`: on any failure after the session exists, the
/// session is marked `abandoned` so `list`/`prune` see it instead of a
/// record stuck at `running` forever.
pub fn handle_run(
    workspace: PathBuf,
    runtime_flag: Option<String>,
    logs_base: &Path,
    config_base: &Path,
    installed_config: &Path,
    claude_home: Option<&Path>,
) -> anyhow::Result<()> {
    let workspace = workspace.canonicalize().unwrap_or(workspace);

    if !run_preflight_scan(&workspace, config_base) {
        anyhow::bail!("pre-flight scan found findings; aborting before any container is started");
    }

    let runtime_kind = resolve_runtime(runtime_flag.as_deref())?;
    let mut session = create_session(logs_base, &workspace, runtime_to_core(runtime_kind))?;

    if let Err(err) = launch(&workspace, config_base, installed_config, claude_home, runtime_kind, &session) {
        session.state.mark_abandoned(&session.dir)?;
        return Err(err.into());
    }

    println!("session {} started for {}", session.state.session_id, workspace.display());
    Ok(())
}

fn launch(
    workspace: &Path,
    config_base: &Path,
    installed_config: &Path,
    claude_home: Option<&Path>,
    runtime_kind: RuntimeKind,
    session: &Session,
) -> Result<(), VibedomError> {
    vibedom_git::bootstrap_repo(workspace, &session.dir.join("repo"))?;
    vibedom_runtime::vm::start(workspace, config_base, installed_config, &session.dir, claude_home, runtime_kind)?;
    Ok(())
}
