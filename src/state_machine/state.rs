//! Chat state types

use crate::message::Message;
use crate::session::{ConversationSession, CopyTicket, Generation};
use serde::{Deserialize, Serialize};

/// Request/response phase of the widget.
///
/// History visibility is tracked separately: it can be open in either phase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatPhase {
    /// Ready for user input, no pending request
    #[default]
    Idle,

    /// A question was sent and its answer has not arrived
    AwaitingResponse {
        /// Session generation the request was made under
        generation: Generation,
        /// The accepted (trimmed) question
        query: String,
    },
}

impl ChatPhase {
    pub fn is_awaiting(&self) -> bool {
        matches!(self, ChatPhase::AwaitingResponse { .. })
    }

    /// Whether a completion tagged with `generation` answers the pending request
    pub fn expects(&self, generation: Generation) -> bool {
        matches!(self, ChatPhase::AwaitingResponse { generation: g, .. } if *g == generation)
    }
}

/// Read-only snapshot of everything a transition may inspect
#[derive(Debug, Clone, Copy)]
pub struct ChatView<'a> {
    pub log: &'a [Message],
    pub generation: Generation,
    pub archived: usize,
    pub history_visible: bool,
    pub copy_ticket: Option<CopyTicket>,
}

impl<'a> ChatView<'a> {
    pub fn new(session: &'a ConversationSession, archived: usize, history_visible: bool) -> Self {
        Self {
            log: session.log(),
            generation: session.generation(),
            archived,
            history_visible,
            copy_ticket: session.copy_ticket(),
        }
    }
}
