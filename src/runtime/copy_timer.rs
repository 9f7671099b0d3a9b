//! Expiry timer for the "copied" confirmation

use crate::session::CopyTicket;
use crate::state_machine::Event;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Single owned timer handle.
///
/// Arming replaces (and cancels) whatever was scheduled before, so at most
/// one `CopyExpired` is ever pending. Dropping the timer cancels it.
#[derive(Debug, Default)]
pub struct CopyFeedbackTimer {
    token: Option<CancellationToken>,
}

impl CopyFeedbackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `CopyExpired { ticket }` on `event_tx` once `window` elapses
    pub fn arm(&mut self, ticket: CopyTicket, window: Duration, event_tx: mpsc::Sender<Event>) {
        self.cancel();

        let token = CancellationToken::new();
        self.token = Some(token.clone());

        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::trace!(ticket = ticket.0, "Copy feedback timer cancelled");
                }
                () = tokio::time::sleep(window) => {
                    let _ = event_tx.send(Event::CopyExpired { ticket }).await;
                }
            }
        });
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

impl Drop for CopyFeedbackTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
