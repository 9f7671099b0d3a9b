//! Runtime configuration

use std::time::Duration;

pub const DEFAULT_WELCOME: &str = "Welcome! Ask a DSA question to begin.";
pub const DEFAULT_RESPONSE: &str =
    "Here's a possible solution for your query. Let me know if you need more details!";
pub const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// Which clipboard the front-end writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipboardKind {
    /// The desktop clipboard, falling back to memory when unavailable
    #[default]
    System,
    Memory,
}

/// Configuration for a chat widget instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Seeded bot greeting
    pub welcome_message: String,
    /// Answer returned by the canned responder
    pub canned_response: String,
    /// Simulated latency of the canned responder
    pub response_delay: Duration,
    /// How long the "copied" confirmation stays visible
    pub copy_feedback_window: Duration,
    pub clipboard: ClipboardKind,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: DEFAULT_WELCOME.to_string(),
            canned_response: DEFAULT_RESPONSE.to_string(),
            response_delay: DEFAULT_RESPONSE_DELAY,
            copy_feedback_window: DEFAULT_COPY_FEEDBACK,
            clipboard: ClipboardKind::default(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            welcome_message: lookup("DSA_CHAT_WELCOME")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.welcome_message),
            canned_response: lookup("DSA_CHAT_RESPONSE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.canned_response),
            response_delay: millis(&lookup, "DSA_CHAT_RESPONSE_DELAY_MS")
                .unwrap_or(defaults.response_delay),
            copy_feedback_window: millis(&lookup, "DSA_CHAT_COPY_FEEDBACK_MS")
                .unwrap_or(defaults.copy_feedback_window),
            clipboard: match lookup("DSA_CHAT_CLIPBOARD").as_deref() {
                Some("memory") => ClipboardKind::Memory,
                Some("system") | None => ClipboardKind::System,
                Some(other) => {
                    tracing::warn!(value = %other, "Unknown DSA_CHAT_CLIPBOARD, using system");
                    ClipboardKind::System
                }
            },
        }
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring unparseable duration");
            None
        }
    }
}
