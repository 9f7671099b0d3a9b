//! Archive of completed exchanges for the "Previous Conversations" list

use crate::error::ChatError;
use crate::message::Message;
use serde::Serialize;

const MAX_TITLE_CHARS: usize = 60;

/// One archived thread: alternating user/bot messages, always whole pairs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeGroup {
    messages: Vec<Message>,
}

impl ExchangeGroup {
    fn new(user: Message, bot: Message) -> Self {
        Self {
            messages: vec![user, bot],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn exchange_count(&self) -> usize {
        self.messages.len() / 2
    }

    /// One-line label built from the opening question
    pub fn title(&self) -> String {
        self.messages
            .iter()
            .find(|m| m.is_user())
            .map_or_else(|| "Untitled conversation".to_string(), |m| summarize(m.text()))
    }
}

/// Collapse whitespace and cut long text at a word boundary
fn summarize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_TITLE_CHARS {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    if let Some(last_space) = cut.rfind(' ') {
        if last_space > 0 {
            cut.truncate(last_space);
        }
    }
    format!("{cut}...")
}

/// Past exchanges in the order they completed.
///
/// Every exchange becomes its own entry. An earlier revision appended a
/// pair to the newest entry whenever that entry held an even number of
/// messages, which is always true, so all history collapsed into one entry.
#[derive(Debug, Clone, Default)]
pub struct HistoryArchive {
    entries: Vec<ExchangeGroup>,
}

impl HistoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a completed exchange as a new entry
    pub fn archive_exchange(&mut self, user: Message, bot: Message) -> Result<(), ChatError> {
        if !user.is_user() || !bot.is_bot() {
            return Err(ChatError::MalformedExchange);
        }
        self.entries.push(ExchangeGroup::new(user, bot));
        Ok(())
    }

    /// Entries oldest first. Clone the iterator to walk them again.
    pub fn list_entries(&self) -> std::slice::Iter<'_, ExchangeGroup> {
        self.entries.iter()
    }

    pub fn get_entry(&self, index: usize) -> Result<&ExchangeGroup, ChatError> {
        self.entries.get(index).ok_or(ChatError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
