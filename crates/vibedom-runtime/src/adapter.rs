//! Hides the CLI differences between the two supported container runtimes
//! behind a single tagged enum, per the detection and command-form table.

use vibedom_core::VibedomError;
use vibedom_process::is_on_path;

const APPLE_BINARY: &str = "container";
const DOCKER_BINARY: &str = "docker";

/// Which container CLI is driving sessions on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    Docker,
    Apple,
}

impl RuntimeKind {
    /// Prefer the Apple runtime if its binary is on `PATH`, else Docker,
    /// else report that no supported runtime is available.
    pub fn detect() -> Result<Self, VibedomError> {
        Self::detect_with(is_on_path)
    }

    /// Test seam for `detect`: takes the PATH-lookup predicate as a
    /// parameter so detection can be exercised without a real container CLI
    /// installed.
    pub fn detect_with(on_path: impl Fn(&str) -> bool) -> Result<Self, VibedomError> {
        if on_path(APPLE_BINARY) {
            Ok(RuntimeKind::Apple)
        } else if on_path(DOCKER_BINARY) {
            Ok(RuntimeKind::Docker)
        } else {
            Err(VibedomError::NoRuntime)
        }
    }

    pub fn binary(self) -> &'static str {
        match self {
            RuntimeKind::Docker => DOCKER_BINARY,
            RuntimeKind::Apple => APPLE_BINARY,
        }
    }

    fn detached_flag(self) -> &'static str {
        match self {
            RuntimeKind::Docker => "-d",
            RuntimeKind::Apple => "--detach",
        }
    }

    /// Build the `run` invocation: program plus full argument list.
    pub fn run_args(self, name: &str, image: &str, mounts: &[String], env: &[(String, String)]) -> Vec<String> {
        let mut args = vec!["run".to_string(), self.detached_flag().to_string(), "--name".to_string(), name.to_string()];
        for mount in mounts {
            args.push("-v".to_string());
            args.push(mount.clone());
        }
        for (key, value) in env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(image.to_string());
        args
    }

    /// Build the `exec` invocation: program plus full argument list.
    pub fn exec_args(self, name: &str, cmd: &[&str]) -> Vec<String> {
        self.exec_args_with_opts(name, &[], cmd)
    }

    /// Build an `exec` invocation with runtime options (e.g. `-it`, `-w
    /// <dir>`). Both supported runtimes require options to precede the
    /// container name positional — `exec -it -w /work/repo vibedom-x bash`,
    /// never `exec vibedom-x -it -w /work/repo bash`.
    pub fn exec_args_with_opts(self, name: &str, opts: &[&str], cmd: &[&str]) -> Vec<String> {
        let mut args = vec!["exec".to_string()];
        args.extend(opts.iter().map(|s| s.to_string()));
        args.push(name.to_string());
        args.extend(cmd.iter().map(|s| s.to_string()));
        args
    }

    /// Build the `list` invocation used by the cleanup routine to find
    /// vibedom-managed containers.
    pub fn list_args(self) -> Vec<String> {
        match self {
            RuntimeKind::Docker => vec![
                "ps".to_string(),
                "-a".to_string(),
                "--filter".to_string(),
                "name=vibedom-".to_string(),
                "--format".to_string(),
                "{{.Names}}".to_string(),
            ],
            RuntimeKind::Apple => vec![
                "list".to_string(),
                "--all".to_string(),
                "--format".to_string(),
                "{{.Names}}".to_string(),
            ],
        }
    }

    /// Build the command(s) that remove a container. Docker does this in one
    /// call; Apple requires a stop followed by a delete, represented here as
    /// two argument lists the caller runs in sequence as one logical remove.
    pub fn remove_args(self, name: &str) -> Vec<Vec<String>> {
        match self {
            RuntimeKind::Docker => vec![vec!["rm".to_string(), "-f".to_string(), name.to_string()]],
            RuntimeKind::Apple => vec![
                vec!["stop".to_string(), name.to_string()],
                vec!["delete".to_string(), "--force".to_string(), name.to_string()],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_apple_over_docker() {
        let kind = RuntimeKind::detect_with(|bin| bin == APPLE_BINARY || bin == DOCKER_BINARY).unwrap();
        assert_eq!(kind, RuntimeKind::Apple);
    }

    #[test]
    fn detect_falls_back_to_docker() {
        let kind = RuntimeKind::detect_with(|bin| bin == DOCKER_BINARY).unwrap();
        assert_eq!(kind, RuntimeKind::Docker);
    }

    #[test]
    fn detect_fails_with_no_runtime_when_neither_present() {
        let result = RuntimeKind::detect_with(|_| false);
        assert!(matches!(result, Err(VibedomError::NoRuntime)));
    }

    #[test]
    fn docker_run_args_use_dash_d() {
        let args = RuntimeKind::Docker.run_args("vibedom-x", "vibedom-agent:latest", &[], &[]);
        assert!(args.contains(&"-d".to_string()));
        assert!(!args.contains(&"--detach".to_string()));
    }

    #[test]
    fn apple_run_args_use_detach_flag() {
        let args = RuntimeKind::Apple.run_args("vibedom-x", "vibedom-agent:latest", &[], &[]);
        assert!(args.contains(&"--detach".to_string()));
    }

    #[test]
    fn run_args_include_mounts_and_env() {
        let mounts = vec!["/a:/b:ro".to_string()];
        let env = vec![("HTTP_PROXY".to_string(), "http://127.0.0.1:8080".to_string())];
        let args = RuntimeKind::Docker.run_args("vibedom-x", "img", &mounts, &env);
        assert!(args.windows(2).any(|w| w == ["-v", "/a:/b:ro"]));
        assert!(args.windows(2).any(|w| w == ["-e", "HTTP_PROXY=http://127.0.0.1:8080"]));
    }

    #[test]
    fn exec_args_prefix_differs_by_runtime() {
        assert_eq!(RuntimeKind::Docker.binary(), "docker");
        assert_eq!(RuntimeKind::Apple.binary(), "container");
        let docker_exec = RuntimeKind::Docker.exec_args("vibedom-x", &["git", "status"]);
        assert_eq!(docker_exec, vec!["exec", "vibedom-x", "git", "status"]);
    }

    #[test]
    fn exec_args_with_opts_places_options_before_container_name() {
        let args = RuntimeKind::Docker.exec_args_with_opts("vibedom-x", &["-it", "-w", "/work/repo"], &["bash"]);
        assert_eq!(args, vec!["exec", "-it", "-w", "/work/repo", "vibedom-x", "bash"]);
    }

    #[test]
    fn list_args_filter_by_vibedom_prefix_for_docker() {
        let args = RuntimeKind::Docker.list_args();
        assert!(args.contains(&"name=vibedom-".to_string()));
    }

    #[test]
    fn remove_args_is_single_step_for_docker() {
        let steps = RuntimeKind::Docker.remove_args("vibedom-x");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0], vec!["rm", "-f", "vibedom-x"]);
    }

    #[test]
    fn remove_args_is_two_step_for_apple() {
        let steps = RuntimeKind::Apple.remove_args("vibedom-x");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], vec!["stop", "vibedom-x"]);
        assert_eq!(steps[1], vec!["delete", "--force", "vibedom-x"]);
    }
}
