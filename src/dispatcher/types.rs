//! Request/response wire format for the file dispatcher

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of input: an action name plus its payload
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

/// One line of output; `status` is always present, the rest is action-specific
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl Response {
    pub fn success(payload: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            payload,
        }
    }

    pub fn success_with_message(message: impl Into<String>, payload: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            payload: Value::Object(Default::default()),
        }
    }
}

/// Directory entry returned by the `list` action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
    /// Unix seconds of last modification
    pub modified: i64,
}
