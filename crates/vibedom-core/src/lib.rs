pub mod error;
pub mod types;

pub use error::VibedomError;
pub use types::{OutputFormat, Runtime, SessionStatus};
