//! The live conversation shown in the widget

use crate::error::ChatError;
use crate::message::Message;
use serde::{Deserialize, Serialize};

/// Reset epoch of a session.
///
/// Bumped whenever the log is reset or replaced, so responses requested
/// under an older generation can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Identifies one copy action; only the clear scheduled under the current
/// ticket may remove the copy mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CopyMark {
    index: usize,
    ticket: CopyTicket,
}

/// Currently displayed message log plus its transient flags
#[derive(Debug, Clone)]
pub struct ConversationSession {
    welcome: String,
    log: Vec<Message>,
    awaiting_response: bool,
    last_copied: Option<CopyMark>,
    copy_seq: u64,
    generation: Generation,
}

impl ConversationSession {
    /// Create a session seeded with the welcome message
    pub fn new(welcome: impl Into<String>) -> Self {
        let welcome = welcome.into();
        Self {
            log: vec![Message::welcome(welcome.clone())],
            welcome,
            awaiting_response: false,
            last_copied: None,
            copy_seq: 0,
            generation: Generation::default(),
        }
    }

    pub fn log(&self) -> &[Message] {
        &self.log
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn last_copied_index(&self) -> Option<usize> {
        self.last_copied.map(|mark| mark.index)
    }

    pub fn copy_ticket(&self) -> Option<CopyTicket> {
        self.last_copied.map(|mark| mark.ticket)
    }

    /// Append a user message and start waiting for its reply.
    ///
    /// Blank input is rejected and leaves the session untouched.
    pub fn append_user_message(&mut self, text: &str) -> Result<Message, ChatError> {
        let message = Message::parse_user_input(text)?;
        self.log.push(message.clone());
        self.awaiting_response = true;
        Ok(message)
    }

    /// Append the reply to the pending user message
    pub fn receive_bot_message(&mut self, text: impl Into<String>) -> Result<Message, ChatError> {
        if !self.awaiting_response {
            return Err(ChatError::NoPendingExchange);
        }
        let message = Message::bot(text);
        self.log.push(message.clone());
        self.awaiting_response = false;
        Ok(message)
    }

    /// Back to the seeded welcome state
    pub fn reset(&mut self) {
        self.log = vec![Message::welcome(self.welcome.clone())];
        self.clear_transient();
    }

    /// Show a restored conversation in place of the current log
    pub fn replace_log(&mut self, messages: Vec<Message>) -> Result<(), ChatError> {
        if messages.is_empty() {
            return Err(ChatError::EmptyConversation);
        }
        self.log = messages;
        self.clear_transient();
        Ok(())
    }

    /// Record that the message at `index` was copied.
    ///
    /// Any earlier mark is superseded; the returned ticket is the only one
    /// that [`clear_copied`](Self::clear_copied) will honour.
    pub fn mark_copied(&mut self, index: usize) -> CopyTicket {
        self.copy_seq += 1;
        let ticket = CopyTicket(self.copy_seq);
        self.last_copied = Some(CopyMark { index, ticket });
        ticket
    }

    /// Clear the copy mark if it still belongs to `ticket`
    pub fn clear_copied(&mut self, ticket: CopyTicket) -> bool {
        match self.last_copied {
            Some(mark) if mark.ticket == ticket => {
                self.last_copied = None;
                true
            }
            _ => false,
        }
    }

    fn clear_transient(&mut self) {
        self.awaiting_response = false;
        self.last_copied = None;
        self.generation = self.generation.next();
    }
}
