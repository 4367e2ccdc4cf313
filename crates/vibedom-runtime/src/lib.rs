pub mod adapter;
pub mod vm;

pub use adapter::RuntimeKind;
pub use vm::{compose_env, compose_mounts, container_name, exec, poll_ready, start, stop};
