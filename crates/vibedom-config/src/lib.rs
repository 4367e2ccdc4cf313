//! Whitelist and pattern library loading shared by the host CLI and the
//! in-container egress filter.

pub mod patterns;
pub mod paths;
pub mod whitelist;

pub use patterns::{builtin_pii_patterns, load_pattern_library, placeholder_for, CompiledPattern, PatternLibrary};
pub use paths::APP_NAME;
pub use whitelist::{default_whitelist_path, Whitelist};
