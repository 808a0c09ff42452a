//! Input representation for the macime engine

use std::ops::Add;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::VirtualKey;

/// Monotonic host clock value in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is later
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        let ms = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(ms))
    }
}

/// Phase of a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Down,
    Up,
    /// Only the modifier flags changed
    FlagsChanged,
}

impl KeyPhase {
    /// Decode the integer phase used on the C ABI and in raw host events
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(KeyPhase::Down),
            1 => Some(KeyPhase::Up),
            2 => Some(KeyPhase::FlagsChanged),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            KeyPhase::Down => 0,
            KeyPhase::Up => 1,
            KeyPhase::FlagsChanged => 2,
        }
    }
}

/// A single modifier flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Shift,
    Control,
    Option,
    Command,
    CapsLock,
}

/// State of modifier keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierState {
    pub shift: bool,
    pub control: bool,
    pub option: bool,
    pub command: bool,
    pub caps_lock: bool,
}

impl ModifierState {
    pub const SHIFT: u32 = 1 << 0;
    pub const CONTROL: u32 = 1 << 1;
    pub const OPTION: u32 = 1 << 2;
    pub const COMMAND: u32 = 1 << 3;
    pub const CAPS_LOCK: u32 = 1 << 4;

    /// Creates an empty modifier state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bits(bits: u32) -> Self {
        Self {
            shift: bits & Self::SHIFT != 0,
            control: bits & Self::CONTROL != 0,
            option: bits & Self::OPTION != 0,
            command: bits & Self::COMMAND != 0,
            caps_lock: bits & Self::CAPS_LOCK != 0,
        }
    }

    pub fn bits(&self) -> u32 {
        let mut bits = 0;
        if self.shift {
            bits |= Self::SHIFT;
        }
        if self.control {
            bits |= Self::CONTROL;
        }
        if self.option {
            bits |= Self::OPTION;
        }
        if self.command {
            bits |= Self::COMMAND;
        }
        if self.caps_lock {
            bits |= Self::CAPS_LOCK;
        }
        bits
    }

    pub fn is_active(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Shift => self.shift,
            Modifier::Control => self.control,
            Modifier::Option => self.option,
            Modifier::Command => self.command,
            Modifier::CapsLock => self.caps_lock,
        }
    }

    pub fn set(&mut self, modifier: Modifier, active: bool) {
        match modifier {
            Modifier::Shift => self.shift = active,
            Modifier::Control => self.control = active,
            Modifier::Option => self.option = active,
            Modifier::Command => self.command = active,
            Modifier::CapsLock => self.caps_lock = active,
        }
    }

    /// Control, option or command is held; the key is meant as a shortcut
    pub fn has_shortcut_modifier(&self) -> bool {
        self.control || self.option || self.command
    }
}

/// Represents a keyboard event as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Physical key code
    pub code: u16,
    pub phase: KeyPhase,
    pub timestamp: Timestamp,
    /// Modifier flags active after this event
    pub modifiers: ModifierState,
    /// Text the host resolved for the key, if any
    pub character: Option<char>,
}

impl KeyEvent {
    pub fn new(code: u16, phase: KeyPhase, timestamp: Timestamp) -> Self {
        Self {
            code,
            phase,
            timestamp,
            modifiers: ModifierState::default(),
            character: None,
        }
    }

    pub fn down(key: VirtualKey, timestamp: Timestamp) -> Self {
        Self::new(key.code(), KeyPhase::Down, timestamp)
    }

    pub fn up(key: VirtualKey, timestamp: Timestamp) -> Self {
        Self::new(key.code(), KeyPhase::Up, timestamp)
    }

    pub fn flags(key: VirtualKey, modifiers: ModifierState, timestamp: Timestamp) -> Self {
        Self::new(key.code(), KeyPhase::FlagsChanged, timestamp).with_modifiers(modifiers)
    }

    pub fn with_modifiers(mut self, modifiers: ModifierState) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_char(mut self, ch: char) -> Self {
        self.character = Some(ch);
        self
    }

    pub fn key(&self) -> Option<VirtualKey> {
        VirtualKey::from_code(self.code)
    }

    /// Character typed by this event: the host's text if given, else the US ANSI key
    pub fn typed_char(&self) -> Option<char> {
        self.character
            .or_else(|| self.key().and_then(|k| k.to_char(self.modifiers.shift)))
    }
}

/// Untrusted event fields as they arrive over the C ABI or from a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub code: i64,
    pub phase: i32,
    pub timestamp_ms: i64,
    pub modifier_bits: u32,
}

impl TryFrom<RawKeyEvent> for KeyEvent {
    type Error = Error;

    fn try_from(raw: RawKeyEvent) -> Result<Self> {
        let code = u16::try_from(raw.code)
            .map_err(|_| Error::MalformedEvent(format!("key code out of range: {}", raw.code)))?;
        let phase = KeyPhase::from_raw(raw.phase)
            .ok_or_else(|| Error::MalformedEvent(format!("unknown phase: {}", raw.phase)))?;
        let timestamp = u64::try_from(raw.timestamp_ms)
            .map_err(|_| Error::MalformedEvent(format!("negative timestamp: {}", raw.timestamp_ms)))?;

        Ok(KeyEvent::new(code, phase, Timestamp::from_millis(timestamp))
            .with_modifiers(ModifierState::from_bits(raw.modifier_bits)))
    }
}
