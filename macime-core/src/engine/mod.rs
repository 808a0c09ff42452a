//! Macime Engine - key event processing
//!
//! This module holds the three state machines (Hangul composer, half-layout
//! key mapper, dual-action key) and the session that routes host events to
//! them.

mod dual_action;
mod half_layout;
mod hangul;
mod input;
mod output;
mod session;
mod state;
mod timer;

pub use dual_action::{DualActionKey, DualActionOutcome};
pub use half_layout::{HalfLayoutMapper, MapperOutcome, RemapTable, HALF_QWERTY_PAIRS};
pub use hangul::HangulComposer;
pub use input::{KeyEvent, KeyPhase, Modifier, ModifierState, RawKeyEvent, Timestamp};
pub use output::{Action, Decision, EngineOutput, Preedit, SyntheticEvent};
pub use session::Session;
pub use timer::{DeadlineTimer, TimerOwner, TimerRequest, TimerToken};

// Re-export error types
pub use crate::error::{Error, Result};
