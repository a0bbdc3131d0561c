//! Read-only snapshot of the inbound request

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Snapshot of the inbound request active when the client was created
///
/// Captured once, treated as read-only; the pipeline borrows it during a
/// capture call and never retains it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
}

impl RequestInfo {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        RequestInfo {
            method: method.into(),
            url: url.into(),
            query_string: None,
            headers: BTreeMap::new(),
            remote_addr: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = Some(query.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_set_fields_only() {
        let request = RequestInfo::new("GET", "https://shop.example/checkout")
            .with_header("user-agent", "integration-test");
        let json = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(json["method"], "GET");
        assert_eq!(json["headers"]["user-agent"], "integration-test");
        assert!(json.get("query_string").is_none());
        assert!(json.get("remote_addr").is_none());
    }
}
