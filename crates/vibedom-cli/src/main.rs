use clap::Parser;
use std::path::PathBuf;

mod cli;
mod review_cmd;
mod run_cmd;
mod session_cmds;

use cli::{Cli, Commands};

/// Where the release installed `proxy_addon.py`, `scrubber.py`, and
/// `patterns.toml` — the directory `vm::start` copies from into the
/// session's mounted config dir. Resolved relative to the running binary so
/// a packaged install and a `cargo install` both find their assets.
fn installed_config_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("runtime-assets")))
        .unwrap_or_else(|| PathBuf::from("runtime-assets"))
}

fn claude_home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".claude"))
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logs_base = vibedom_config::paths::logs_base().ok_or_else(|| anyhow::anyhow!("could not resolve a data directory for session logs"))?;
    let config_base = vibedom_config::paths::config_base().ok_or_else(|| anyhow::anyhow!("could not resolve a config directory"))?;
    std::fs::create_dir_all(&logs_base)?;
    std::fs::create_dir_all(&config_base)?;

    match cli.command {
        Commands::Run { workspace, runtime } => {
            run_cmd::handle_run(workspace, runtime, &logs_base, &config_base, &installed_config_dir(), claude_home_dir().as_deref())
        }
        Commands::Stop { session } => session_cmds::handle_stop(session, &logs_base),
        Commands::List => session_cmds::handle_list(&logs_base),
        Commands::Attach { session } => session_cmds::handle_attach(session, &logs_base),
        Commands::Review { session, branch } => review_cmd::handle_review(&session, branch.as_deref(), &logs_base),
        Commands::Merge { session, branch, merge } => review_cmd::handle_merge(&session, branch.as_deref(), merge, &logs_base),
        Commands::ReloadWhitelist { session } => session_cmds::handle_reload_whitelist(session, &logs_base),
        Commands::Prune { force, dry_run } => session_cmds::handle_prune(force, dry_run, &logs_base),
        Commands::Housekeeping { days, force, dry_run } => session_cmds::handle_housekeeping(days, force, dry_run, &logs_base),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
