//! Mock implementations for testing
//!
//! These mocks enable controller tests without real clipboards or delays
//! beyond the paused tokio clock.

use super::traits::*;
use crate::error::{ClipboardError, GenerationError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock Response Generator
// ============================================================================

/// Generator that returns queued responses, or echoes when configured to
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    echo: bool,
    delay: Duration,
    /// Record of all queries received
    pub queries: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            echo: false,
            delay: Duration::ZERO,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Answer every query with `"Answer: <query>"` once the queue is empty
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::new()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn queue_response(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_error(&self, error: GenerationError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for MockGenerator {
    async fn generate(&self, query: &str) -> Result<String, GenerationError> {
        self.queries.lock().unwrap().push(query.to_string());
        let queued = self.responses.lock().unwrap().pop_front();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match queued {
            Some(result) => result,
            None if self.echo => Ok(format!("Answer: {query}")),
            None => Err(GenerationError::Unavailable(
                "No mock response queued".to_string(),
            )),
        }
    }
}

/// Generator whose task dies mid-request
pub struct PanickingGenerator;

#[async_trait]
impl ResponseGenerator for PanickingGenerator {
    async fn generate(&self, _query: &str) -> Result<String, GenerationError> {
        panic!("generator exploded");
    }
}

// ============================================================================
// Mock Clipboard
// ============================================================================

/// Clipboard that records writes and can be told to fail
pub struct MockClipboard {
    failure: Option<ClipboardError>,
    /// Record of all successful writes
    pub writes: Mutex<Vec<String>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            failure: None,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ClipboardError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub fn recorded_writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardSink for MockClipboard {
    async fn write(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatConfig;
    use crate::error::ChatError;
    use crate::message::{Message, Sender};
    use crate::runtime::{spawn_chat, ChatController, ChatUpdate, Intent};
    use crate::state_machine::transition::error_notice;
    use std::sync::Arc;

    const WELCOME: &str = "Welcome! Ask a DSA question to begin.";
    const WINDOW: Duration = Duration::from_secs(2);

    type TestController = ChatController<Arc<MockGenerator>, Arc<MockClipboard>>;

    fn test_controller(
        generator: MockGenerator,
        clipboard: MockClipboard,
    ) -> (TestController, Arc<MockGenerator>, Arc<MockClipboard>) {
        let generator = Arc::new(generator);
        let clipboard = Arc::new(clipboard);
        let controller =
            ChatController::new(ChatConfig::default(), generator.clone(), clipboard.clone());
        (controller, generator, clipboard)
    }

    /// Run one complete exchange through the controller
    async fn exchange(controller: &mut TestController, question: &str) {
        controller.submit(question).unwrap();
        controller.next_completion().await;
        assert!(!controller.is_awaiting_response());
    }

    /// Copy message `index` and let the clipboard write land
    async fn copy(controller: &mut TestController, index: usize) {
        controller.copy_message(index).unwrap();
        controller.next_completion().await;
    }

    // ========================================================================
    // Sending
    // ========================================================================

    #[tokio::test]
    async fn test_binary_search_tree_scenario() {
        let generator = MockGenerator::new();
        generator.queue_response("A BST keeps smaller keys left and larger keys right.");
        let (mut controller, generator, _) = test_controller(generator, MockClipboard::new());

        controller.submit("What is a binary search tree?").unwrap();
        assert!(controller.is_awaiting_response());
        assert_eq!(controller.current_log().len(), 2);

        controller.next_completion().await;

        let expected = vec![
            Message::welcome(WELCOME),
            Message::user("What is a binary search tree?"),
            Message::bot("A BST keeps smaller keys left and larger keys right."),
        ];
        assert_eq!(controller.current_log(), expected.as_slice());
        assert!(!controller.is_awaiting_response());

        let entries: Vec<_> = controller.history_entries().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].messages(), &expected[1..]);
        assert_eq!(
            generator.recorded_queries(),
            vec!["What is a binary search tree?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_blank_submit_changes_nothing() {
        let (mut controller, generator, _) =
            test_controller(MockGenerator::echo(), MockClipboard::new());

        assert_eq!(controller.submit("   \t"), Err(ChatError::EmptyInput));
        assert_eq!(controller.current_log().len(), 1);
        assert!(!controller.is_awaiting_response());
        assert!(generator.recorded_queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_double_submit_rejected() {
        let generator = MockGenerator::echo().with_delay(WINDOW);
        let (mut controller, generator, _) = test_controller(generator, MockClipboard::new());

        controller.submit("first").unwrap();
        assert_eq!(controller.submit("second"), Err(ChatError::AwaitingResponse));
        assert_eq!(controller.current_log().len(), 2);

        controller.next_completion().await;

        let senders: Vec<_> = controller.current_log().iter().map(Message::sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
        assert_eq!(generator.recorded_queries(), vec!["first".to_string()]);
        assert_eq!(controller.history_entries().count(), 1);
    }

    #[tokio::test]
    async fn test_each_exchange_grows_log_by_two() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());

        for (n, question) in ["stack?", "queue?", "heap?"].iter().enumerate() {
            exchange(&mut controller, question).await;
            assert_eq!(controller.current_log().len(), 1 + 2 * (n + 1));
        }

        assert_eq!(controller.history_entries().count(), 3);
        assert!(controller
            .history_entries()
            .all(|entry| entry.messages().len() == 2));
    }

    // ========================================================================
    // Failure recovery
    // ========================================================================

    #[tokio::test]
    async fn test_generation_failure_becomes_bot_message() {
        let generator = MockGenerator::new();
        let error = GenerationError::Unavailable("offline".to_string());
        generator.queue_error(error.clone());
        let (mut controller, _, _) = test_controller(generator, MockClipboard::new());

        exchange(&mut controller, "What is a graph?").await;

        let last = controller.current_log().last().unwrap();
        assert!(last.is_bot());
        assert_eq!(last.text(), error_notice(&error));
        assert_eq!(controller.history_entries().count(), 0);

        // Back to Idle: the next question is accepted
        assert!(controller.submit("Try again").is_ok());
    }

    #[tokio::test]
    async fn test_panicking_generator_does_not_wedge() {
        let mut controller = ChatController::new(
            ChatConfig::default(),
            PanickingGenerator,
            MockClipboard::new(),
        );

        controller.submit("boom?").unwrap();
        controller.next_completion().await;

        assert!(!controller.is_awaiting_response());
        assert!(controller.current_log()[2].text().starts_with("Sorry"));
    }

    // ========================================================================
    // New conversation and stale responses
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_new_conversation_drops_pending_response() {
        let generator = MockGenerator::echo().with_delay(WINDOW);
        let (mut controller, _, _) = test_controller(generator, MockClipboard::new());

        controller.submit("What is a trie?").unwrap();
        controller.start_new_conversation();

        assert_eq!(controller.current_log(), &[Message::welcome(WELCOME)]);
        assert!(!controller.is_awaiting_response());

        // The stale answer arrives and is discarded
        controller.next_completion().await;
        assert_eq!(controller.current_log().len(), 1);
        assert_eq!(controller.history_entries().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_reset_gets_only_its_own_answer() {
        let generator = MockGenerator::echo().with_delay(WINDOW);
        let (mut controller, _, _) = test_controller(generator, MockClipboard::new());

        controller.submit("old question").unwrap();
        tokio::time::sleep(WINDOW / 2).await;
        controller.start_new_conversation();
        controller.submit("new question").unwrap();

        controller.next_completion().await; // stale
        controller.next_completion().await; // current

        let texts: Vec<_> = controller.current_log().iter().map(Message::text).collect();
        assert_eq!(texts, vec![WELCOME, "new question", "Answer: new question"]);
        assert_eq!(controller.history_entries().count(), 1);
    }

    #[tokio::test]
    async fn test_new_conversation_keeps_history() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "What is DFS?").await;

        controller.start_new_conversation();

        assert_eq!(controller.current_log().len(), 1);
        assert_eq!(controller.history_entries().count(), 1);
    }

    // ========================================================================
    // History
    // ========================================================================

    #[tokio::test]
    async fn test_select_past_conversation_restores_and_closes() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "What is BFS?").await;
        exchange(&mut controller, "What is DFS?").await;

        controller.toggle_history_view();
        assert!(controller.is_history_visible());

        controller.select_past_conversation(0).unwrap();

        let restored = controller.history_entry(0).unwrap().messages().to_vec();
        assert_eq!(controller.current_log(), restored.as_slice());
        assert_eq!(restored[0].text(), "What is BFS?");
        assert!(!controller.is_history_visible());
    }

    #[tokio::test]
    async fn test_select_invalid_index_changes_nothing() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "What is BFS?").await;
        controller.toggle_history_view();
        let before = controller.snapshot();

        let result = controller.select_past_conversation(3);

        assert_eq!(result, Err(ChatError::OutOfRange { index: 3, len: 1 }));
        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_drops_pending_response() {
        let generator = MockGenerator::echo().with_delay(WINDOW);
        let (mut controller, _, _) = test_controller(generator, MockClipboard::new());
        controller.submit("first").unwrap();
        controller.next_completion().await;

        controller.submit("second").unwrap();
        controller.select_past_conversation(0).unwrap();
        assert!(!controller.is_awaiting_response());

        controller.next_completion().await;
        assert_eq!(controller.current_log().len(), 2);
        assert_eq!(controller.history_entries().count(), 1);
    }

    #[tokio::test]
    async fn test_toggle_history_leaves_log_alone() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "What is a deque?").await;
        let log = controller.current_log().to_vec();

        controller.toggle_history_view();
        controller.toggle_history_view();

        assert!(!controller.is_history_visible());
        assert_eq!(controller.current_log(), log.as_slice());
    }

    // ========================================================================
    // Copy feedback
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_copy_marks_then_clears_after_window() {
        let (mut controller, _, clipboard) =
            test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "What is a heap?").await;

        copy(&mut controller, 2).await;
        assert_eq!(controller.last_copied_index(), Some(2));
        assert_eq!(clipboard.recorded_writes(), vec!["Answer: What is a heap?".to_string()]);

        tokio::time::sleep(WINDOW - Duration::from_millis(1)).await;
        assert_eq!(controller.drain_completions(), 0);
        assert_eq!(controller.last_copied_index(), Some(2));

        controller.next_completion().await;
        assert_eq!(controller.last_copied_index(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_copy_supersedes_first() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "one").await;
        exchange(&mut controller, "two").await;

        copy(&mut controller, 2).await;
        tokio::time::sleep(WINDOW / 2).await;
        copy(&mut controller, 4).await;

        // Past the first copy's window, inside the second's
        tokio::time::sleep(WINDOW * 3 / 4).await;
        controller.drain_completions();
        assert_eq!(controller.last_copied_index(), Some(4));

        controller.next_completion().await;
        assert_eq!(controller.last_copied_index(), None);
    }

    #[tokio::test]
    async fn test_clipboard_failure_shows_nothing() {
        let clipboard = MockClipboard::failing(ClipboardError::WriteFailed("denied".to_string()));
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), clipboard);
        exchange(&mut controller, "What is a B-tree?").await;
        let log_len = controller.current_log().len();

        copy(&mut controller, 2).await;

        assert_eq!(controller.last_copied_index(), None);
        assert_eq!(controller.current_log().len(), log_len);
    }

    #[tokio::test]
    async fn test_copy_unknown_index() {
        let (mut controller, _, clipboard) =
            test_controller(MockGenerator::echo(), MockClipboard::new());

        assert_eq!(
            controller.copy_message(5),
            Err(ChatError::IndexNotFound { index: 5, len: 1 })
        );
        assert!(clipboard.recorded_writes().is_empty());
    }

    #[tokio::test]
    async fn test_copy_landing_after_reset_is_dropped() {
        let (mut controller, _, _) = test_controller(MockGenerator::echo(), MockClipboard::new());
        exchange(&mut controller, "What is hashing?").await;

        controller.copy_message(2).unwrap();
        controller.start_new_conversation();
        controller.next_completion().await;

        assert_eq!(controller.last_copied_index(), None);
    }

    // ========================================================================
    // Spawned controller
    // ========================================================================

    #[tokio::test]
    async fn test_spawned_chat_publishes_updates() {
        let controller = ChatController::new(
            ChatConfig::default(),
            MockGenerator::echo(),
            MockClipboard::new(),
        );
        let (handle, task) = spawn_chat(controller);
        let mut updates = handle.subscribe();

        handle.send(Intent::Submit("What is a heap?".to_string())).await.unwrap();

        let ChatUpdate::Snapshot(thinking) = updates.recv().await.unwrap() else {
            panic!("expected snapshot");
        };
        assert!(thinking.awaiting_response);
        assert_eq!(thinking.log.len(), 2);

        let ChatUpdate::Snapshot(answered) = updates.recv().await.unwrap() else {
            panic!("expected snapshot");
        };
        assert!(!answered.awaiting_response);
        assert_eq!(answered.log.len(), 3);
        assert_eq!(answered.history_titles, vec!["What is a heap?".to_string()]);

        handle.send(Intent::Submit("  ".to_string())).await.unwrap();
        match updates.recv().await.unwrap() {
            ChatUpdate::Rejected { message } => assert_eq!(message, "message is empty"),
            other => panic!("expected rejection, got {other:?}"),
        }

        drop(handle);
        task.await.unwrap();
    }
}
