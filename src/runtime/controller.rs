//! Chat controller: owns the widget state and executes effects

use super::copy_timer::CopyFeedbackTimer;
use super::traits::{ClipboardSink, ResponseGenerator};
use super::{ChatSnapshot, ChatUpdate, Intent};

use crate::config::ChatConfig;
use crate::error::{ChatError, GenerationError};
use crate::history::{ExchangeGroup, HistoryArchive};
use crate::message::Message;
use crate::session::ConversationSession;
use crate::state_machine::{transition, ChatPhase, ChatView, Effect, Event};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Owner of one conversation session and its history archive.
///
/// All mutation goes through the intent methods below. Capability calls
/// are spawned on the tokio runtime and come back as completion events,
/// which [`next_completion`](Self::next_completion) or [`run`](Self::run)
/// apply. Methods that spawn must be called from within a tokio runtime.
pub struct ChatController<G, C>
where
    G: ResponseGenerator + 'static,
    C: ClipboardSink + 'static,
{
    config: ChatConfig,
    phase: ChatPhase,
    session: ConversationSession,
    archive: HistoryArchive,
    history_visible: bool,
    generator: Arc<G>,
    clipboard: Arc<C>,
    event_tx: mpsc::Sender<Event>,
    event_rx: mpsc::Receiver<Event>,
    copy_timer: CopyFeedbackTimer,
    updates_tx: broadcast::Sender<ChatUpdate>,
}

impl<G, C> ChatController<G, C>
where
    G: ResponseGenerator + 'static,
    C: ClipboardSink + 'static,
{
    pub fn new(config: ChatConfig, generator: G, clipboard: C) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (updates_tx, _) = broadcast::channel(128);
        Self {
            session: ConversationSession::new(config.welcome_message.clone()),
            config,
            phase: ChatPhase::Idle,
            archive: HistoryArchive::new(),
            history_visible: false,
            generator: Arc::new(generator),
            clipboard: Arc::new(clipboard),
            event_tx,
            event_rx,
            copy_timer: CopyFeedbackTimer::new(),
            updates_tx,
        }
    }

    // ========================================================================
    // Intents
    // ========================================================================

    /// Send a question. Rejected while an answer is pending or when blank.
    pub fn submit(&mut self, text: &str) -> Result<(), ChatError> {
        self.process_event(Event::Submit {
            text: text.to_string(),
        })
    }

    /// Back to the welcome message; history is kept
    pub fn start_new_conversation(&mut self) {
        if self.phase.is_awaiting() {
            tracing::info!("New conversation while awaiting; pending answer will be dropped");
        }
        self.apply_infallible(Event::NewConversation);
    }

    pub fn toggle_history_view(&mut self) {
        self.apply_infallible(Event::ToggleHistory);
    }

    /// Show archived entry `index` and close the history view
    pub fn select_past_conversation(&mut self, index: usize) -> Result<(), ChatError> {
        self.process_event(Event::SelectPast { index })
    }

    /// Copy the text of message `index` to the clipboard
    pub fn copy_message(&mut self, index: usize) -> Result<(), ChatError> {
        self.process_event(Event::Copy { index })
    }

    /// Route a channel intent to the matching method
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), ChatError> {
        match intent {
            Intent::Submit(text) => self.submit(&text),
            Intent::NewConversation => {
                self.start_new_conversation();
                Ok(())
            }
            Intent::ToggleHistory => {
                self.toggle_history_view();
                Ok(())
            }
            Intent::SelectPast(index) => self.select_past_conversation(index),
            Intent::Copy(index) => self.copy_message(index),
        }
    }

    // ========================================================================
    // Observers
    // ========================================================================

    pub fn current_log(&self) -> &[Message] {
        self.session.log()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.session.is_awaiting_response()
    }

    pub fn history_entries(&self) -> std::slice::Iter<'_, ExchangeGroup> {
        self.archive.list_entries()
    }

    pub fn history_entry(&self, index: usize) -> Result<&ExchangeGroup, ChatError> {
        self.archive.get_entry(index)
    }

    pub fn is_history_visible(&self) -> bool {
        self.history_visible
    }

    pub fn last_copied_index(&self) -> Option<usize> {
        self.session.last_copied_index()
    }

    pub fn phase(&self) -> &ChatPhase {
        &self.phase
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            log: self.session.log().to_vec(),
            awaiting_response: self.session.is_awaiting_response(),
            history_visible: self.history_visible,
            history_titles: self.archive.list_entries().map(ExchangeGroup::title).collect(),
            last_copied_index: self.session.last_copied_index(),
        }
    }

    /// Receive a snapshot after every visible change
    pub fn subscribe(&self) -> broadcast::Receiver<ChatUpdate> {
        self.updates_tx.subscribe()
    }

    pub(crate) fn updates_sender(&self) -> broadcast::Sender<ChatUpdate> {
        self.updates_tx.clone()
    }

    // ========================================================================
    // Completion handling
    // ========================================================================

    /// Wait for the next capability completion or timer expiry and apply it
    pub async fn next_completion(&mut self) {
        if let Some(event) = self.event_rx.recv().await {
            self.apply_completion(event);
        }
    }

    /// Apply every completion that has already arrived, without waiting
    pub fn drain_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply_completion(event);
            applied += 1;
        }
        applied
    }

    /// Drive the controller from an intent channel until it closes
    pub async fn run(mut self, mut intents: mpsc::Receiver<Intent>) {
        tracing::info!("Starting chat controller");

        loop {
            tokio::select! {
                intent = intents.recv() => {
                    let Some(intent) = intent else { break };
                    if let Err(e) = self.dispatch(intent) {
                        let _ = self.updates_tx.send(ChatUpdate::Rejected {
                            message: e.to_string(),
                        });
                    }
                }
                Some(event) = self.event_rx.recv() => {
                    self.apply_completion(event);
                }
            }
        }

        tracing::info!("Chat controller stopped");
    }

    fn apply_completion(&mut self, event: Event) {
        if let Err(e) = self.process_event(event) {
            tracing::error!(error = %e, "Completion event could not be applied");
        }
    }

    fn apply_infallible(&mut self, event: Event) {
        if let Err(e) = self.process_event(event) {
            tracing::error!(error = %e, "Unexpected rejection");
        }
    }

    fn process_event(&mut self, event: Event) -> Result<(), ChatError> {
        let name = event.name();
        let view = ChatView::new(&self.session, self.archive.len(), self.history_visible);

        // Pure state transition
        let result = match transition(&self.phase, &view, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(event = name, error = %e, "Event rejected");
                return Err(e);
            }
        };

        tracing::trace!(event = name, effects = result.effects.len(), "Transition");
        self.phase = result.new_phase;

        for effect in result.effects {
            self.execute_effect(effect)?;
        }
        Ok(())
    }

    fn execute_effect(&mut self, effect: Effect) -> Result<(), ChatError> {
        match effect {
            Effect::AppendUserMessage { text } => {
                self.session.append_user_message(&text)?;
            }

            Effect::RequestResponse { generation, query } => {
                let generator = Arc::clone(&self.generator);
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    tracing::info!(generation = generation.0, "Requesting response (background)");

                    // Run the call in its own task so a panicking generator
                    // still resolves the exchange
                    let outcome = tokio::spawn(async move { generator.generate(&query).await }).await;

                    let event = match outcome {
                        Ok(Ok(text)) => Event::ResponseReady { generation, text },
                        Ok(Err(error)) => {
                            tracing::warn!(error = %error, "Response generation failed");
                            Event::ResponseFailed { generation, error }
                        }
                        Err(join_error) => {
                            tracing::error!(error = %join_error, "Response generator task died");
                            Event::ResponseFailed {
                                generation,
                                error: GenerationError::Failed(join_error.to_string()),
                            }
                        }
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::AppendBotMessage { text } => {
                self.session.receive_bot_message(text)?;
            }

            Effect::ArchiveExchange { user, bot } => {
                self.archive.archive_exchange(user, bot)?;
                tracing::info!(entries = self.archive.len(), "Exchange archived");
            }

            Effect::ResetSession => {
                self.copy_timer.cancel();
                self.session.reset();
            }

            Effect::RestoreConversation { index } => {
                let messages = self.archive.get_entry(index)?.messages().to_vec();
                self.copy_timer.cancel();
                self.session.replace_log(messages)?;
                tracing::info!(index, "Restored past conversation");
            }

            Effect::SetHistoryVisible(visible) => {
                self.history_visible = visible;
            }

            Effect::WriteClipboard {
                generation,
                index,
                text,
            } => {
                let clipboard = Arc::clone(&self.clipboard);
                let event_tx = self.event_tx.clone();

                tokio::spawn(async move {
                    let event = match clipboard.write(&text).await {
                        Ok(()) => Event::CopySucceeded { generation, index },
                        Err(error) => {
                            tracing::warn!(error = %error, index, "Copy to clipboard failed");
                            Event::CopyFailed {
                                generation,
                                index,
                                error,
                            }
                        }
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::MarkCopied { index } => {
                let ticket = self.session.mark_copied(index);
                self.copy_timer.arm(
                    ticket,
                    self.config.copy_feedback_window,
                    self.event_tx.clone(),
                );
            }

            Effect::ClearCopied { ticket } => {
                self.session.clear_copied(ticket);
            }

            Effect::NotifyView => {
                if self.updates_tx.receiver_count() > 0 {
                    let _ = self.updates_tx.send(ChatUpdate::Snapshot(self.snapshot()));
                }
            }
        }
        Ok(())
    }
}
