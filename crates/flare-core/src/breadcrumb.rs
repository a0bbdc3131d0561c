//! Breadcrumb trail entries

use std::collections::BTreeMap;

use chrono::Utc;
use serde_derive::{Deserialize, Serialize};

use crate::level::Level;
use crate::types::UtcDateTime;

/// A single entry in the bounded trail of occurrences leading up to an event
///
/// Breadcrumbs are immutable once recorded; they are only ever appended to a
/// scope through the recorder, which enforces the capacity bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub level: Level,
    pub timestamp: UtcDateTime,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Breadcrumb {
            ty: "default".to_string(),
            category: None,
            message: None,
            level: Level::Info,
            timestamp: Utc::now(),
            data: BTreeMap::new(),
        }
    }
}

impl Breadcrumb {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Breadcrumb {
            category: Some(category.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}
