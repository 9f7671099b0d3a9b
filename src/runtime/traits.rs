//! Trait abstractions for the chat's external capabilities
//!
//! These traits enable testing the controller with mock implementations.

use crate::config::ChatConfig;
use crate::error::{ClipboardError, GenerationError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Produces an answer for a user question
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, query: &str) -> Result<String, GenerationError>;
}

/// Places text on a clipboard
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ResponseGenerator + ?Sized> ResponseGenerator for Arc<T> {
    async fn generate(&self, query: &str) -> Result<String, GenerationError> {
        (**self).generate(query).await
    }
}

#[async_trait]
impl<T: ClipboardSink + ?Sized> ClipboardSink for Arc<T> {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write(text).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Answers every question with the same text after a fixed delay
#[derive(Debug, Clone)]
pub struct CannedResponder {
    response: String,
    delay: Duration,
}

impl CannedResponder {
    pub fn new(response: impl Into<String>, delay: Duration) -> Self {
        Self {
            response: response.into(),
            delay,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.canned_response.clone(), config.response_delay)
    }
}

#[async_trait]
impl ResponseGenerator for CannedResponder {
    async fn generate(&self, query: &str) -> Result<String, GenerationError> {
        tracing::debug!(
            query_chars = query.chars().count(),
            delay_ms = %self.delay.as_millis(),
            "Simulating response"
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

/// The desktop clipboard
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// Check that a clipboard can be opened at all (no display, no clipboard)
    pub fn probe() -> Result<Self, ClipboardError> {
        arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self)
    }
}

#[async_trait]
impl ClipboardSink for SystemClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            clipboard
                .set_text(text)
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
        .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?
    }
}

/// In-process clipboard for headless sessions
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl ClipboardSink for MemoryClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().await = Some(text.to_string());
        Ok(())
    }
}
