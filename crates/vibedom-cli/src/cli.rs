use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vibedom_core::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "vibedom", version, about = "Run untrusted coding agents inside isolated container VMs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for commands that print structured data.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new session: pre-flight scan, bootstrap the workspace, launch the VM.
    Run {
        workspace: PathBuf,
        #[arg(long)]
        runtime: Option<String>,
    },
    /// Finalize a session: bundle its repo and tear down the VM.
    Stop { session: Option<String> },
    /// List every known session.
    List,
    /// Open an interactive shell inside a running session's container.
    Attach { session: Option<String> },
    /// Fetch a session's bundle as a remote and show its log and diff.
    Review {
        session: String,
        #[arg(long)]
        branch: Option<String>,
    },
    /// Merge a session's bundle into the host's working tree.
    Merge {
        session: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        merge: bool,
    },
    /// Send SIGHUP to a session's egress filter to reload the domain whitelist.
    ReloadWhitelist { session: String },
    /// Delete every non-running session.
    Prune {
        #[arg(long)]
        force: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete non-running sessions older than a retention window.
    Housekeeping {
        #[arg(long, default_value_t = 7)]
        days: i64,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        dry_run: bool,
    },
}
