//! Session lifecycle state machine and registry.

pub mod cleanup;
pub mod manager;
pub mod state;

pub use cleanup::{delete_session, filter_by_age, filter_not_running};
pub use manager::{all, create_session, find, is_container_running, resolve, running, Session};
pub use state::SessionState;
