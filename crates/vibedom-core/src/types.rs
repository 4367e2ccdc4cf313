use serde::{Deserialize, Serialize};

/// Which container CLI a session's VM was launched through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Docker,
    Apple,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Apple => "apple",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal and non-terminal lifecycle states of a session record.
///
/// `Running` is the only non-terminal state; `Complete` and `Abandoned`
/// are both terminal and no further transition out of them is legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Complete,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format for CLI responses.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_display_round_trip() {
        assert_eq!(Runtime::Docker.to_string(), "docker");
        assert_eq!(Runtime::Apple.to_string(), "apple");
    }

    #[test]
    fn runtime_serde_round_trip() {
        let s = serde_json::to_string(&Runtime::Apple).unwrap();
        assert_eq!(s, "\"apple\"");
        let back: Runtime = serde_json::from_str(&s).unwrap();
        assert_eq!(back, Runtime::Apple);
    }

    #[test]
    fn session_status_is_terminal() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Complete.is_terminal());
        assert!(SessionStatus::Abandoned.is_terminal());
    }

    #[test]
    fn session_status_serde_round_trip() {
        for status in [
            SessionStatus::Running,
            SessionStatus::Complete,
            SessionStatus::Abandoned,
        ] {
            let s = serde_json::to_string(&status).unwrap();
            let back: SessionStatus = serde_json::from_str(&s).unwrap();
            assert_eq!(back, status);
        }
    }
}
