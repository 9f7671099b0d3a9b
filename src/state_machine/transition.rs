//! Pure state transition function

use super::{ChatPhase, ChatView, Effect, Event};
use crate::error::{ChatError, GenerationError};
use crate::message::Message;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_phase: ChatPhase,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(phase: ChatPhase) -> Self {
        Self {
            new_phase: phase,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Bot-authored text shown in place of an answer that could not be produced
pub fn error_notice(error: &GenerationError) -> String {
    format!("Sorry, I couldn't answer that ({error}). Please try again.")
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs and performs
/// no I/O. Rejected events return an error and imply no state change.
pub fn transition(
    phase: &ChatPhase,
    view: &ChatView<'_>,
    event: Event,
) -> Result<TransitionResult, ChatError> {
    match (phase, event) {
        // ============================================================
        // Sending
        // ============================================================

        // Idle + Submit -> AwaitingResponse
        (ChatPhase::Idle, Event::Submit { text }) => {
            let accepted = Message::parse_user_input(&text)?;
            let query = accepted.text().to_string();
            Ok(TransitionResult::new(ChatPhase::AwaitingResponse {
                generation: view.generation,
                query: query.clone(),
            })
            .with_effect(Effect::AppendUserMessage {
                text: query.clone(),
            })
            .with_effect(Effect::NotifyView)
            .with_effect(Effect::RequestResponse {
                generation: view.generation,
                query,
            }))
        }

        // One exchange in flight at a time
        (ChatPhase::AwaitingResponse { .. }, Event::Submit { .. }) => {
            Err(ChatError::AwaitingResponse)
        }

        // ============================================================
        // Responses
        // ============================================================

        (
            ChatPhase::AwaitingResponse { generation, query },
            Event::ResponseReady {
                generation: tag,
                text,
            },
        ) if *generation == tag => {
            if text.trim().is_empty() {
                return Ok(failed_exchange(&GenerationError::EmptyResponse));
            }
            Ok(TransitionResult::new(ChatPhase::Idle).with_effects([
                Effect::append_bot_message(text.clone()),
                Effect::archive_exchange(query, &text),
                Effect::NotifyView,
            ]))
        }

        (
            ChatPhase::AwaitingResponse { generation, .. },
            Event::ResponseFailed {
                generation: tag,
                error,
            },
        ) if *generation == tag => Ok(failed_exchange(&error)),

        // Answer to a request the session has moved past (reset or restore)
        (_, Event::ResponseReady { .. } | Event::ResponseFailed { .. }) => {
            Ok(TransitionResult::new(phase.clone()))
        }

        // ============================================================
        // Navigation
        // ============================================================

        // Valid in any phase; an in-flight answer becomes stale
        (_, Event::NewConversation) => Ok(TransitionResult::new(ChatPhase::Idle)
            .with_effect(Effect::ResetSession)
            .with_effect(Effect::NotifyView)),

        (_, Event::ToggleHistory) => Ok(TransitionResult::new(phase.clone())
            .with_effect(Effect::SetHistoryVisible(!view.history_visible))
            .with_effect(Effect::NotifyView)),

        (_, Event::SelectPast { index }) => {
            if index >= view.archived {
                return Err(ChatError::OutOfRange {
                    index,
                    len: view.archived,
                });
            }
            Ok(TransitionResult::new(ChatPhase::Idle).with_effects([
                Effect::RestoreConversation { index },
                Effect::SetHistoryVisible(false),
                Effect::NotifyView,
            ]))
        }

        // ============================================================
        // Copy feedback
        // ============================================================

        (_, Event::Copy { index }) => {
            let message = view.log.get(index).ok_or(ChatError::IndexNotFound {
                index,
                len: view.log.len(),
            })?;
            Ok(
                TransitionResult::new(phase.clone()).with_effect(Effect::WriteClipboard {
                    generation: view.generation,
                    index,
                    text: message.text().to_string(),
                }),
            )
        }

        (_, Event::CopySucceeded { generation, index })
            if generation == view.generation && index < view.log.len() =>
        {
            Ok(TransitionResult::new(phase.clone())
                .with_effect(Effect::MarkCopied { index })
                .with_effect(Effect::NotifyView))
        }

        // Failed copies show nothing; copies into a replaced log are dropped
        (_, Event::CopySucceeded { .. } | Event::CopyFailed { .. }) => {
            Ok(TransitionResult::new(phase.clone()))
        }

        (_, Event::CopyExpired { ticket }) => {
            if view.copy_ticket == Some(ticket) {
                Ok(TransitionResult::new(phase.clone())
                    .with_effect(Effect::ClearCopied { ticket })
                    .with_effect(Effect::NotifyView))
            } else {
                Ok(TransitionResult::new(phase.clone()))
            }
        }
    }
}

/// Close a failed exchange with a visible error and nothing archived
fn failed_exchange(error: &GenerationError) -> TransitionResult {
    TransitionResult::new(ChatPhase::Idle)
        .with_effect(Effect::append_bot_message(error_notice(error)))
        .with_effect(Effect::NotifyView)
}
