//! Shared chat request types

use serde::{Deserialize, Serialize};

/// Author of one chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role/content pair in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Tunables for one chat call
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Sampling temperature; provider default when unset
    pub temperature: Option<f32>,
    /// Response length cap; provider default when unset
    pub max_tokens: Option<u32>,
    /// System prompt, carried out-of-band for providers that want it separate
    pub system: Option<String>,
}
