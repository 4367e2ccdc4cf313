pub mod addon;
pub mod audit;
pub mod handler;
pub mod whitelist_store;

pub use addon::{evaluate_request, extract_host, scrub_body, scrub_url, should_scrub_content_type, EgressFilter, RequestDecision};
pub use audit::{AuditEntry, AuditFinding, AuditLog};
pub use whitelist_store::WhitelistStore;
