//! Chat message value type

use crate::error::ChatError;
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// A single immutable entry in a conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
    /// Set only on the seeded greeting, which has no copy affordance
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    welcome: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            welcome: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            welcome: false,
        }
    }

    /// The greeting a fresh session is seeded with
    pub fn welcome(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            welcome: true,
        }
    }

    /// Validate raw user input: surrounding whitespace is dropped and
    /// blank input is rejected.
    pub fn parse_user_input(raw: &str) -> Result<Self, ChatError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        Ok(Self::user(text))
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    pub fn is_welcome(&self) -> bool {
        self.welcome
    }

    /// Whether the view offers a copy button for this message
    pub fn is_copyable(&self) -> bool {
        self.is_bot() && !self.welcome
    }
}
