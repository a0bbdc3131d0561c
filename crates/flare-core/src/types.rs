//! Custom types for common data structures

use chrono::{DateTime, Utc};

/// Standard UTC DateTime type used across all Flare crates
///
/// This is the canonical datetime type for event and breadcrumb timestamps.
/// Serializes as ISO 8601 with offset via chrono's serde support.
pub type UtcDateTime = DateTime<Utc>;
