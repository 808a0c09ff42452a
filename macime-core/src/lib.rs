pub mod config;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod types;

pub use types::*;

// Re-export commonly used types
pub use config::{EngineConfig, SessionVariant};
pub use engine::{
    Action, Decision, EngineOutput, KeyEvent, KeyPhase, Modifier, ModifierState, Preedit,
    RawKeyEvent, Session, SyntheticEvent, Timestamp, TimerOwner, TimerRequest, TimerToken,
};
pub use error::{Error, Result};
pub use types::virtual_keys::VirtualKey;
