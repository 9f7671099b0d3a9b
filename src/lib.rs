//! DSA Chat - a question-and-answer chat widget
//!
//! The widget keeps one live conversation, archives every completed
//! exchange, and lets the user restore past exchanges or copy bot answers.
//! State changes go through a pure state machine; answers and clipboard
//! writes are pluggable capabilities driven by [`runtime::ChatController`].

pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod message;
pub mod runtime;
pub mod session;
pub mod state_machine;

pub use config::{ChatConfig, ClipboardKind};
pub use error::{ChatError, ClipboardError, GenerationError};
pub use history::{ExchangeGroup, HistoryArchive};
pub use message::{Message, Sender};
pub use runtime::{
    spawn_chat, CannedResponder, ChatController, ChatHandle, ChatSnapshot, ChatUpdate,
    ClipboardSink, Intent, MemoryClipboard, ResponseGenerator, SystemClipboard,
};
pub use session::{ConversationSession, CopyTicket, Generation};
