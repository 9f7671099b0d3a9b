//! Runtime for driving a chat widget
//!
//! The [`ChatController`] owns all state. It can be driven directly through
//! its methods, or spawned behind a [`ChatHandle`] that carries intents in
//! over an mpsc channel and publishes [`ChatUpdate`]s over a broadcast
//! channel.

mod controller;
mod copy_timer;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use controller::ChatController;
pub use copy_timer::CopyFeedbackTimer;
pub use traits::*;

use crate::message::Message;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Controller wired to the canned responder and a runtime-chosen clipboard
pub type ProductionController = ChatController<CannedResponder, Arc<dyn ClipboardSink>>;

/// A user action, as sent over a [`ChatHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Submit(String),
    NewConversation,
    ToggleHistory,
    SelectPast(usize),
    Copy(usize),
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub log: Vec<Message>,
    /// Drives the "Thinking..." indicator
    pub awaiting_response: bool,
    pub history_visible: bool,
    pub history_titles: Vec<String>,
    /// Drives the "copied" confirmation
    pub last_copied_index: Option<usize>,
}

/// Notifications published by a running controller
#[derive(Debug, Clone)]
pub enum ChatUpdate {
    Snapshot(ChatSnapshot),
    /// An intent was refused; state is unchanged
    Rejected { message: String },
}

#[derive(Debug, Clone, Copy, Error)]
#[error("chat controller has stopped")]
pub struct ChatClosed;

/// Handle to interact with a spawned controller
#[derive(Clone)]
pub struct ChatHandle {
    intent_tx: mpsc::Sender<Intent>,
    updates_tx: broadcast::Sender<ChatUpdate>,
}

impl ChatHandle {
    pub async fn send(&self, intent: Intent) -> Result<(), ChatClosed> {
        self.intent_tx.send(intent).await.map_err(|_| ChatClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatUpdate> {
        self.updates_tx.subscribe()
    }
}

/// Run `controller` on its own task.
///
/// The task ends once every clone of the returned handle is dropped.
pub fn spawn_chat<G, C>(controller: ChatController<G, C>) -> (ChatHandle, JoinHandle<()>)
where
    G: ResponseGenerator + 'static,
    C: ClipboardSink + 'static,
{
    let (intent_tx, intent_rx) = mpsc::channel(32);
    let handle = ChatHandle {
        intent_tx,
        updates_tx: controller.updates_sender(),
    };
    let task = tokio::spawn(controller.run(intent_rx));
    (handle, task)
}
