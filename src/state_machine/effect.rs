//! Effects produced by state transitions

use crate::message::Message;
use crate::session::{CopyTicket, Generation};

/// Effects to be executed by the controller after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append the accepted question to the session log
    AppendUserMessage { text: String },

    /// Ask the response capability for an answer (spawned, completes as an event)
    RequestResponse { generation: Generation, query: String },

    /// Append a bot reply, closing the pending exchange
    AppendBotMessage { text: String },

    /// Store a completed exchange in the history archive
    ArchiveExchange { user: Message, bot: Message },

    /// Back to the seeded welcome log
    ResetSession,

    /// Replace the log with an archived conversation
    RestoreConversation { index: usize },

    SetHistoryVisible(bool),

    /// Hand text to the clipboard capability (spawned, completes as an event)
    WriteClipboard {
        generation: Generation,
        index: usize,
        text: String,
    },

    /// Show the "copied" confirmation and arm its expiry timer
    MarkCopied { index: usize },

    /// Hide the "copied" confirmation set under `ticket`
    ClearCopied { ticket: CopyTicket },

    /// Publish a fresh snapshot to observers
    NotifyView,
}

impl Effect {
    pub fn append_bot_message(text: impl Into<String>) -> Self {
        Effect::AppendBotMessage { text: text.into() }
    }

    pub fn archive_exchange(query: &str, answer: &str) -> Self {
        Effect::ArchiveExchange {
            user: Message::user(query),
            bot: Message::bot(answer),
        }
    }
}
