//! Error types for the chat core

use thiserror::Error;

/// Errors returned by chat operations.
///
/// None of these are fatal: the state that produced them is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyInput,
    #[error("still waiting for a response, try again when it arrives")]
    AwaitingResponse,
    #[error("no past conversation at index {index} (have {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("no message at index {index} (log has {len})")]
    IndexNotFound { index: usize, len: usize },
    #[error("cannot restore an empty conversation")]
    EmptyConversation,
    #[error("no user message is waiting for a reply")]
    NoPendingExchange,
    #[error("an exchange must be a user message followed by a bot message")]
    MalformedExchange,
}

/// Failure of the response capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The generator could not be reached at all
    #[error("response service unavailable: {0}")]
    Unavailable(String),
    /// The generator answered with nothing usable
    #[error("response was empty")]
    EmptyResponse,
    #[error("response failed: {0}")]
    Failed(String),
}

/// Failure of the clipboard capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}
