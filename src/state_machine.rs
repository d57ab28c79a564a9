//! Core session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

pub mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Notice};
pub use event::Event;
pub use state::{Activity, ConversationTurn, QuerySettings, SessionState, SettingsPatch};
pub use transition::{transition, TransitionError};
