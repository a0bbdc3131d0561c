//! The normalized event record and the raw capture payload

use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::breadcrumb::Breadcrumb;
use crate::exception::ExceptionInfo;
use crate::level::Level;
use crate::request::RequestInfo;
use crate::types::UtcDateTime;
use crate::user::UserInfo;

/// Identifier assigned to an event at creation time
///
/// Rendered and serialized in the collector's format: 32 lowercase hex
/// characters, no hyphens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0.simple())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Uuid::parse_str(&s)
            .map(EventId)
            .map_err(|_| serde::de::Error::custom("invalid event id"))
    }
}

/// The normalized record describing one capture, destined for the collector
///
/// Mutable while the assembly pipeline runs; treated as immutable once it is
/// handed to the transport. Created per capture call and consumed exactly
/// once, or discarded when the pipeline vetoes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub timestamp: UtcDateTime,
    pub platform: String,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exceptions: Vec<ExceptionInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestInfo>,
}

impl Event {
    /// Fresh skeleton event with a new id and the current time
    pub fn new() -> Self {
        Event {
            event_id: EventId::new(),
            timestamp: Utc::now(),
            platform: "rust".to_string(),
            level: Level::default(),
            logger: None,
            transaction: None,
            server_name: None,
            release: None,
            environment: None,
            message: None,
            exceptions: Vec::new(),
            breadcrumbs: Vec::new(),
            tags: BTreeMap::new(),
            user: None,
            extra: BTreeMap::new(),
            request: None,
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw capture request handed to the assembly pipeline
///
/// Entry points fill in only what they know; the middleware chain and the
/// assembler resolve everything else.
#[derive(Debug, Clone, Default)]
pub struct EventPayload {
    pub message: Option<String>,
    pub level: Option<Level>,
    pub logger: Option<String>,
    pub transaction: Option<String>,
    pub exception: Option<ExceptionInfo>,
    pub tags: BTreeMap<String, String>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EventPayload {
    pub fn from_message(message: impl Into<String>) -> Self {
        EventPayload {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn from_exception(exception: ExceptionInfo) -> Self {
        EventPayload {
            exception: Some(exception),
            ..Default::default()
        }
    }
}
