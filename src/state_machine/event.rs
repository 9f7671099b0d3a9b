//! Events that can occur in a chat

use crate::error::{ClipboardError, GenerationError};
use crate::session::{CopyTicket, Generation};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User intents
    Submit { text: String },
    NewConversation,
    ToggleHistory,
    SelectPast { index: usize },
    Copy { index: usize },

    // Response capability
    ResponseReady {
        generation: Generation,
        text: String,
    },
    ResponseFailed {
        generation: Generation,
        error: GenerationError,
    },

    // Clipboard capability
    CopySucceeded {
        generation: Generation,
        index: usize,
    },
    CopyFailed {
        generation: Generation,
        index: usize,
        error: ClipboardError,
    },

    // Copy feedback timer
    CopyExpired { ticket: CopyTicket },
}

impl Event {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Event::Submit { .. } => "submit",
            Event::NewConversation => "new_conversation",
            Event::ToggleHistory => "toggle_history",
            Event::SelectPast { .. } => "select_past",
            Event::Copy { .. } => "copy",
            Event::ResponseReady { .. } => "response_ready",
            Event::ResponseFailed { .. } => "response_failed",
            Event::CopySucceeded { .. } => "copy_succeeded",
            Event::CopyFailed { .. } => "copy_failed",
            Event::CopyExpired { .. } => "copy_expired",
        }
    }
}
