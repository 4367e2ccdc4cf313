pub mod dictionary;

use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::OnceLock;
use vibedom_core::VibedomError;

fn session_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+-[a-z]+-[a-z-]+$").expect("static regex"))
}

/// Generate a `<workspace_name>-<adjective>-<noun>` session id.
///
/// The workspace name is used verbatim (it may itself contain hyphens, in
/// which case the id simply has more segments). No collision detection is
/// performed here: the session registry disambiguates identically-named
/// sessions by directory timestamp.
pub fn generate_session_id(workspace_name: &str) -> String {
    let mut rng = rand::thread_rng();
    let adjective = dictionary::ADJECTIVES
        .choose(&mut rng)
        .expect("ADJECTIVES is non-empty");
    let noun = dictionary::NOUNS.choose(&mut rng).expect("NOUNS is non-empty");
    format!("{workspace_name}-{adjective}-{noun}")
}

/// Validate a session id against the bundled format:
/// `^[A-Za-z0-9_.-]+-[a-z]+-[a-z-]+$`.
pub fn validate_session_id(id: &str) -> Result<(), VibedomError> {
    if session_id_pattern().is_match(id) {
        Ok(())
    } else {
        Err(VibedomError::InvalidSessionId(id.to_string()))
    }
}
