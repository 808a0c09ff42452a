//! Output representation for the macime engine

use crate::engine::input::KeyPhase;
use crate::engine::timer::TimerRequest;

/// Result of feeding one event (or one timer) into a session
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    /// Finalized text to insert at the host's insertion point
    pub commit_text: Option<String>,
    /// New marked text; `Some` with empty text clears it
    pub preedit: Option<Preedit>,
    /// What the host does with the original event
    pub decision: Decision,
    pub action: Action,
    /// Deadlines the host must call back at
    pub timers: Vec<TimerRequest>,
}

/// What happens to the original key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The engine consumed the event
    Suppress,
    /// Forward the event unchanged
    PassThrough,
    /// Forward the event with its key code replaced
    Remap(u16),
    /// Post the synthesized events first, then forward the original
    SynthesizeThenPassThrough(Vec<SyntheticEvent>),
}

/// A key event to be re-injected by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    pub code: u16,
    pub phase: KeyPhase,
}

/// Side effect requested by the dual-action key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    /// Short press: toggle the input language
    FireShortAction,
    /// Long press: let the system apply its own toggle
    AllowSystemDefault,
}

/// In-progress text with the caret offset in UTF-16 code units
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preedit {
    pub text: String,
    pub cursor: usize,
}

impl Preedit {
    /// Preedit with the caret at the end
    pub fn new(text: String) -> Self {
        let cursor = text.encode_utf16().count();
        Self { text, cursor }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Decision {
    pub fn synthesized_events(&self) -> &[SyntheticEvent] {
        match self {
            Decision::SynthesizeThenPassThrough(events) => events,
            _ => &[],
        }
    }

    /// True if the original event continues to the application
    pub fn forwards_event(&self) -> bool {
        !matches!(self, Decision::Suppress)
    }
}

impl EngineOutput {
    /// Creates an output with only a decision
    pub fn new(decision: Decision) -> Self {
        Self {
            commit_text: None,
            preedit: None,
            decision,
            action: Action::None,
            timers: Vec::new(),
        }
    }

    pub fn suppress() -> Self {
        Self::new(Decision::Suppress)
    }

    pub fn pass_through() -> Self {
        Self::new(Decision::PassThrough)
    }

    /// Output for an event that did nothing, such as a dropped malformed event
    pub fn noop() -> Self {
        Self::pass_through()
    }

    /// Attach commit text; empty strings are dropped
    pub fn with_commit(mut self, text: String) -> Self {
        if !text.is_empty() {
            self.commit_text = Some(text);
        }
        self
    }

    pub fn with_preedit(mut self, preedit: Preedit) -> Self {
        self.preedit = Some(preedit);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_timer(mut self, timer: Option<TimerRequest>) -> Self {
        self.timers.extend(timer);
        self
    }

    /// True if nothing observable changed
    pub fn is_quiet(&self) -> bool {
        self.commit_text.is_none()
            && self.preedit.is_none()
            && self.action == Action::None
            && self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preedit_cursor_counts_utf16() {
        assert_eq!(Preedit::new("각".to_string()).cursor, 1);
        assert_eq!(Preedit::new("ab".to_string()).cursor, 2);
        assert_eq!(Preedit::new("\u{1F600}".to_string()).cursor, 2);
        assert!(Preedit::default().is_empty());
    }

    #[test]
    fn test_empty_commit_is_dropped() {
        let out = EngineOutput::suppress().with_commit(String::new());
        assert_eq!(out.commit_text, None);
        assert!(out.is_quiet());
    }
}
