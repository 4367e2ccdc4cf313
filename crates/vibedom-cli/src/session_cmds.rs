//! `stop`, `list`, `attach`, `reload-whitelist`, `prune`, `housekeeping`.

use std::io::{self, Write};
use std::path::Path;
use vibedom_core::VibedomError;
use vibedom_runtime::RuntimeKind;
use vibedom_session::cleanup::{delete_session, filter_by_age, filter_not_running};
use vibedom_session::manager::{all, is_container_running, resolve, running, Session};

/// Prompt the user to pick among several candidate sessions. The real
/// terminal prompt; `resolve`'s picker parameter exists precisely so this is
/// the only place that touches stdin/stdout for session selection.
fn interactive_pick(candidates: &[Session]) -> Result<usize, VibedomError> {
    println!("multiple sessions match; choose one:");
    for (i, session) in candidates.iter().enumerate() {
        println!("  [{i}] {} ({}, {})", session.state.session_id, session.state.workspace, session.state.status);
    }
    print!("> ");
    io::stdout().flush().ok();

    let mut line = String::new();
    io::stdin().read_line(&mut line).map_err(|_| VibedomError::Cancelled)?;
    line.trim().parse::<usize>().map_err(|_| VibedomError::Cancelled)
}

fn runtime_kind_of(session: &Session) -> RuntimeKind {
    match session.state.runtime {
        vibedom_core::Runtime::Docker => RuntimeKind::Docker,
        vibedom_core::Runtime::Apple => RuntimeKind::Apple,
    }
}

pub fn handle_stop(session_id: Option<String>, logs_base: &Path) -> anyhow::Result<()> {
    let mut session = resolve(logs_base, session_id.as_deref(), false, interactive_pick)?;
    let runtime = runtime_kind_of(&session);

    let repo_dir = session.dir.join("repo");
    match vibedom_git::finalize_bundle(&repo_dir, &session.dir) {
        Ok(_bundle_path) => {
            session.state.mark_complete(&session.dir.join("repo.bundle"), &session.dir)?;
            println!("session {} complete", session.state.session_id);
        }
        Err(err) => {
            session.state.mark_abandoned(&session.dir)?;
            eprintln!("warning: bundle finalize failed ({err}); repo/ is preserved as a fallback");
        }
    }

    vibedom_runtime::vm::stop(runtime, &session.state.container_name);
    Ok(())
}

pub fn handle_list(logs_base: &Path) -> anyhow::Result<()> {
    let sessions = all(logs_base);
    if sessions.is_empty() {
        println!("no sessions found");
        return Ok(());
    }
    for session in sessions {
        let age = session.age();
        println!(
            "{}  {}  {}  {}d{}h",
            session.state.session_id,
            session.state.workspace,
            session.state.status,
            age.num_days(),
            age.num_hours() % 24
        );
    }
    Ok(())
}

pub fn handle_attach(session_id: Option<String>, logs_base: &Path) -> anyhow::Result<()> {
    let session = resolve(logs_base, session_id.as_deref(), true, interactive_pick)?;
    let runtime = runtime_kind_of(&session);

    let running = is_container_running(&session, |name| {
        vibedom_process::run_and_capture(runtime.binary(), &runtime.list_args().iter().map(String::as_str).collect::<Vec<_>>(), None)
            .map(|r| r.stdout.lines().any(|line| line.trim() == name))
            .unwrap_or(false)
    });
    if !running {
        anyhow::bail!("session {} has no running container", session.state.session_id);
    }

    let args = runtime.exec_args_with_opts(&session.state.container_name, &["-it", "-w", "/work/repo"], &["bash"]);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let status = std::process::Command::new(runtime.binary()).args(&refs).status()?;
    if !status.success() {
        anyhow::bail!("attach exited with status {status}");
    }
    Ok(())
}

pub fn handle_reload_whitelist(session_id: String, logs_base: &Path) -> anyhow::Result<()> {
    let session = vibedom_session::manager::find(logs_base, &session_id)
        .ok_or_else(|| VibedomError::NotFound(session_id.clone()))?;
    let runtime = runtime_kind_of(&session);
    let result = vibedom_runtime::vm::exec(runtime, &session.state.container_name, &["pkill", "-HUP", "mitmdump"])?;
    if !result.success() {
        anyhow::bail!("reload-whitelist failed: {}", result.summary);
    }
    println!("whitelist reload signal sent to session {}", session.state.session_id);
    Ok(())
}

fn prune_sessions(candidates: Vec<Session>, force: bool, dry_run: bool) -> anyhow::Result<()> {
    if candidates.is_empty() {
        println!("nothing to prune");
        return Ok(());
    }
    for session in &candidates {
        println!("{}  {}  {}", session.state.session_id, session.state.workspace, session.state.status);
    }
    if dry_run {
        println!("(dry run: {} session(s) would be deleted)", candidates.len());
        return Ok(());
    }
    if !force {
        print!("delete {} session(s)? [y/N] ", candidates.len());
        io::stdout().flush().ok();
        let mut line = String::new();
        io::stdin().read_line(&mut line).ok();
        if !line.trim().eq_ignore_ascii_case("y") {
            println!("aborted");
            return Ok(());
        }
    }
    for session in candidates {
        delete_session(&session.dir);
    }
    Ok(())
}

pub fn handle_prune(force: bool, dry_run: bool, logs_base: &Path) -> anyhow::Result<()> {
    let candidates = filter_not_running(all(logs_base));
    prune_sessions(candidates, force, dry_run)
}

pub fn handle_housekeeping(days: i64, force: bool, dry_run: bool, logs_base: &Path) -> anyhow::Result<()> {
    let candidates = filter_by_age(filter_not_running(all(logs_base)), days);
    prune_sessions(candidates, force, dry_run)
}

#[allow(dead_code)]
fn running_session_count(logs_base: &Path) -> usize {
    running(logs_base).len()
}
