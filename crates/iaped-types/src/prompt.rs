//! Prompt types for the model backend.
//!
//! A prompt is an ordered list of role-tagged text entries assembled from
//! the stored conversation history plus the configured instruction prefix.

use serde::{Deserialize, Serialize};

use crate::session::MessageRole;

/// One role-tagged entry in the prompt sequence sent to the model backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
