//! Shared event model and context types for the Flare client crates

pub mod breadcrumb;
pub mod event;
pub mod exception;
pub mod level;
pub mod request;
pub mod scope;
pub mod severity;
pub mod user;

mod types;

// Re-export commonly used types
pub use breadcrumb::Breadcrumb;
pub use event::{Event, EventId, EventPayload};
pub use exception::ExceptionInfo;
pub use level::Level;
pub use request::RequestInfo;
pub use scope::Scope;
pub use severity::SeverityCode;
pub use user::UserInfo;

// Re-export external dependencies
pub use chrono;
pub use serde;
pub use serde_json;
pub use uuid;

// Re-export standard datetime type for use across all crates
pub use types::UtcDateTime;
