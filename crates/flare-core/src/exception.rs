//! Captured exception details

use serde::{Deserialize, Serialize};

use crate::severity::SeverityCode;

/// Description of one captured exception
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Engine severity code, set when the exception came from an error
    /// handler. Used to derive the event level; not part of the wire form.
    #[serde(skip, default)]
    pub severity: Option<SeverityCode>,
}

impl ExceptionInfo {
    pub fn new(ty: impl Into<String>) -> Self {
        ExceptionInfo {
            ty: ty.into(),
            value: None,
            module: None,
            severity: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_severity(mut self, severity: SeverityCode) -> Self {
        self.severity = Some(severity);
        self
    }
}
