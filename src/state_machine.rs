//! Core chat state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! [`transition`] maps the current phase, a read-only view of the session,
//! and an event to a new phase plus the effects the controller must run.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{ChatPhase, ChatView};
pub use transition::{transition, TransitionResult};
