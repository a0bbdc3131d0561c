//! Event-assembly pipeline for the Flare instrumentation client
//!
//! Turns application-level signals (messages, exceptions, explicit payloads)
//! into normalized [`flare_core::Event`] records and hands them to a
//! [`Transport`] for delivery to the collector:
//! - a priority-weighted [`MiddlewareStack`] that enriches or vetoes the
//!   event under construction,
//! - a LIFO [`TransactionStack`] naming the operation in flight,
//! - a [`SeverityTranslator`] mapping engine severity codes to event levels,
//! - a [`BreadcrumbRecorder`] feeding the caller-owned scope's trail,
//! - the [`Client`] orchestration tying the stages together.

pub mod breadcrumbs;
pub mod client;
pub mod dsn;
pub mod interfaces;
pub mod middleware;
pub mod options;
pub mod severity;
pub mod transaction;
pub mod transport;

// Re-export commonly used types
pub use breadcrumbs::BreadcrumbRecorder;
pub use client::Client;
pub use dsn::{Dsn, DsnParseError};
pub use middleware::{Middleware, MiddlewareContext, MiddlewareStack, Next};
pub use options::{BeforeBreadcrumb, ClientOptions, DEFAULT_MAX_BREADCRUMBS};
pub use severity::SeverityTranslator;
pub use transaction::TransactionStack;
pub use transport::{MemoryTransport, NoopTransport, Transport};

// Re-export the shared event model
pub use flare_core;
