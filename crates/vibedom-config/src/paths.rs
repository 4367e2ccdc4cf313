use std::path::PathBuf;

/// XDG app name used for config and log base directories.
pub const APP_NAME: &str = "vibedom";

/// Base directory under which every `session-<timestamp>/` lives.
pub fn logs_base() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_local_dir().to_path_buf())
}

/// Base directory holding `trusted_domains.txt`, `gitleaks.toml`, and
/// `keys/`.
pub fn config_base() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}
