#[derive(thiserror::Error, Debug)]
pub enum VibedomError {
    #[error("no session matching '{0}'")]
    NotFound(String),

    #[error("no container runtime found on PATH (looked for docker, container)")]
    NoRuntime,

    #[error("container readiness probe timed out after {attempts} attempts")]
    NotReady { attempts: u32 },

    #[error("git bundle operation failed: {0}")]
    BundleFailed(String),

    #[error("refusing to merge: host working tree has uncommitted changes")]
    DirtyTree,

    #[error("pattern '{id}' failed to compile: {reason}")]
    PatternCompileWarn { id: String, reason: String },

    #[error("whitelist file not found at {0}")]
    WhitelistMissing(std::path::PathBuf),

    #[error("failed to write audit log entry: {0}")]
    AuditWriteFailed(String),

    #[error("cancelled")]
    Cancelled,

    #[error("no sessions found")]
    NoSessions,

    #[error("invalid session id '{0}': must match ^[A-Za-z0-9_.-]+-[a-z]+-[a-z-]+$")]
    InvalidSessionId(String),

    #[error("session state file corrupt at {path}: {reason}")]
    Corrupt { path: std::path::PathBuf, reason: String },

    #[error("illegal state transition from '{from}' on event '{event}'")]
    IllegalTransition { from: String, event: String },
}
