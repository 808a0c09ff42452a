//! Half-layout key mapper
//!
//! While the hold key is down, every other key is mirrored to its partner on
//! the opposite hand. The hold key itself is swallowed on Down and replayed on
//! Up only if nothing else was typed in between, so it still works as a
//! normal key when tapped alone.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, trace};

use super::input::{KeyEvent, KeyPhase, Timestamp};
use super::output::{Decision, SyntheticEvent};
use super::timer::{DeadlineTimer, TimerOwner, TimerRequest, TimerToken};
use crate::error::{Error, Result};
use crate::types::VirtualKey;

/// Left/right mirror pairs of the half-qwerty layout
pub const HALF_QWERTY_PAIRS: &[(VirtualKey, VirtualKey)] = &[
    (VirtualKey::KeyA, VirtualKey::Semicolon),
    (VirtualKey::KeyS, VirtualKey::KeyL),
    (VirtualKey::KeyD, VirtualKey::KeyK),
    (VirtualKey::KeyF, VirtualKey::KeyJ),
    (VirtualKey::KeyG, VirtualKey::KeyH),
    (VirtualKey::KeyZ, VirtualKey::Slash),
    (VirtualKey::KeyX, VirtualKey::Period),
    (VirtualKey::KeyC, VirtualKey::Comma),
    (VirtualKey::KeyV, VirtualKey::KeyM),
    (VirtualKey::KeyB, VirtualKey::KeyN),
    (VirtualKey::KeyQ, VirtualKey::KeyP),
    (VirtualKey::KeyW, VirtualKey::KeyO),
    (VirtualKey::KeyE, VirtualKey::KeyI),
    (VirtualKey::KeyR, VirtualKey::KeyU),
    (VirtualKey::KeyT, VirtualKey::KeyY),
];

/// Symmetric key-to-key table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTable {
    map: HashMap<u16, u16>,
}

impl RemapTable {
    /// Build from unordered pairs; each pair maps both ways
    pub fn from_pairs(pairs: &[(VirtualKey, VirtualKey)]) -> Result<Self> {
        let mut table = Self::default();
        for &(a, b) in pairs {
            table.insert_pair(a, b)?;
        }
        Ok(table)
    }

    pub fn half_qwerty() -> Self {
        let mut table = Self::default();
        for &(a, b) in HALF_QWERTY_PAIRS {
            table.map.insert(a.code(), b.code());
            table.map.insert(b.code(), a.code());
        }
        table
    }

    pub fn insert_pair(&mut self, a: VirtualKey, b: VirtualKey) -> Result<()> {
        if a == b {
            return Err(Error::InvalidConfig(format!(
                "remap pair maps {} to itself",
                a.name()
            )));
        }
        for key in [a, b] {
            if self.map.contains_key(&key.code()) {
                return Err(Error::InvalidConfig(format!(
                    "{} appears in more than one remap pair",
                    key.name()
                )));
            }
        }
        self.map.insert(a.code(), b.code());
        self.map.insert(b.code(), a.code());
        Ok(())
    }

    pub fn get(&self, code: u16) -> Option<u16> {
        self.map.get(&code).copied()
    }

    pub fn contains(&self, key: VirtualKey) -> bool {
        self.map.contains_key(&key.code())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Decision for one event plus any deadline to arm
#[derive(Debug, Clone, PartialEq)]
pub struct MapperOutcome {
    pub decision: Decision,
    pub timer: Option<TimerRequest>,
}

impl MapperOutcome {
    fn decide(decision: Decision) -> Self {
        Self { decision, timer: None }
    }
}

#[derive(Debug, Clone)]
pub struct HalfLayoutMapper {
    hold_key: VirtualKey,
    table: RemapTable,
    repeat_delay: Duration,

    is_held: bool,
    used_while_held: bool,
    repeat_unlocked: bool,
    literal_repeat_sent: bool,
    timer: DeadlineTimer,
    // Keys whose Down was remapped, so their Up is remapped the same way
    remapped_down: HashMap<u16, u16>,
}

impl HalfLayoutMapper {
    pub fn new(hold_key: VirtualKey, table: RemapTable, repeat_delay: Duration) -> Self {
        Self {
            hold_key,
            table,
            repeat_delay,
            is_held: false,
            used_while_held: false,
            repeat_unlocked: false,
            literal_repeat_sent: false,
            timer: DeadlineTimer::new(TimerOwner::HoldRepeat),
            remapped_down: HashMap::new(),
        }
    }

    pub fn hold_key(&self) -> VirtualKey {
        self.hold_key
    }

    pub fn table(&self) -> &RemapTable {
        &self.table
    }

    pub fn is_held(&self) -> bool {
        self.is_held
    }

    pub fn used_while_held(&self) -> bool {
        self.used_while_held
    }

    pub fn repeat_unlocked(&self) -> bool {
        self.repeat_unlocked
    }

    pub fn pending_deadline(&self) -> Option<Timestamp> {
        self.timer.deadline()
    }

    pub fn process(&mut self, event: &KeyEvent) -> MapperOutcome {
        let outcome = match event.phase {
            KeyPhase::FlagsChanged => MapperOutcome::decide(Decision::PassThrough),
            _ if event.code == self.hold_key.code() => self.process_hold_key(event),
            _ => MapperOutcome::decide(self.process_other_key(event)),
        };
        trace!("half-layout {:?} {:#04x} -> {:?}", event.phase, event.code, outcome.decision);
        outcome
    }

    fn process_hold_key(&mut self, event: &KeyEvent) -> MapperOutcome {
        match event.phase {
            KeyPhase::Down if !self.is_held => {
                self.is_held = true;
                self.used_while_held = false;
                self.repeat_unlocked = false;
                self.literal_repeat_sent = false;
                let request = self.timer.arm(event.timestamp + self.repeat_delay);
                debug!("hold key engaged at {}ms", event.timestamp.as_millis());
                MapperOutcome {
                    decision: Decision::Suppress,
                    timer: Some(request),
                }
            }
            KeyPhase::Down => {
                // Auto-repeat; the host may deliver it before the callback.
                if let Some(token) = self.timer.due(event.timestamp) {
                    self.on_timer(token);
                }
                if self.repeat_unlocked && !self.used_while_held {
                    self.literal_repeat_sent = true;
                    MapperOutcome::decide(Decision::PassThrough)
                } else {
                    MapperOutcome::decide(Decision::Suppress)
                }
            }
            KeyPhase::Up if self.is_held => {
                let decision = if self.literal_repeat_sent {
                    Decision::PassThrough
                } else if self.used_while_held {
                    Decision::Suppress
                } else {
                    Decision::SynthesizeThenPassThrough(vec![SyntheticEvent {
                        code: self.hold_key.code(),
                        phase: KeyPhase::Down,
                    }])
                };
                debug!("hold key released, used as modifier: {}", self.used_while_held);
                self.release();
                MapperOutcome::decide(decision)
            }
            _ => MapperOutcome::decide(Decision::PassThrough),
        }
    }

    fn process_other_key(&mut self, event: &KeyEvent) -> Decision {
        if event.phase == KeyPhase::Up {
            if let Some(mapped) = self.remapped_down.remove(&event.code) {
                if self.is_held {
                    self.mark_used();
                }
                return Decision::Remap(mapped);
            }
            // Its Down went out unmapped, so the Up must too.
            return Decision::PassThrough;
        }

        if !self.is_held {
            return Decision::PassThrough;
        }

        self.mark_used();
        match self.table.get(event.code) {
            Some(mapped) => {
                if event.phase == KeyPhase::Down {
                    self.remapped_down.insert(event.code, mapped);
                }
                Decision::Remap(mapped)
            }
            None => Decision::PassThrough,
        }
    }

    fn mark_used(&mut self) {
        self.used_while_held = true;
        self.repeat_unlocked = false;
        self.timer.cancel();
    }

    /// Handle an elapsed deadline; stale tokens are ignored
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if let Err(err) = self.timer.fire(token) {
            debug!("ignoring hold-repeat timer: {}", err);
            return false;
        }
        if !self.is_held || self.used_while_held {
            return false;
        }
        self.repeat_unlocked = true;
        debug!("hold key auto-repeat unlocked");
        true
    }

    pub fn due(&self, now: Timestamp) -> Option<TimerToken> {
        self.timer.due(now)
    }

    fn release(&mut self) {
        self.is_held = false;
        self.used_while_held = false;
        self.repeat_unlocked = false;
        self.literal_repeat_sent = false;
        self.timer.cancel();
    }

    /// Forget every held key and cancel the timer
    pub fn reset(&mut self) {
        self.release();
        self.remapped_down.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_half_qwerty_is_symmetric() {
        let table = RemapTable::half_qwerty();
        assert_eq!(table.len(), HALF_QWERTY_PAIRS.len() * 2);
        for &(a, b) in HALF_QWERTY_PAIRS {
            assert_eq!(table.get(a.code()), Some(b.code()));
            assert_eq!(table.get(b.code()), Some(a.code()));
        }
    }

    #[test]
    fn test_from_pairs_rejects_bad_pairs() {
        assert!(RemapTable::from_pairs(&[(VirtualKey::KeyA, VirtualKey::KeyA)]).is_err());
        assert!(RemapTable::from_pairs(&[
            (VirtualKey::KeyA, VirtualKey::KeyB),
            (VirtualKey::KeyC, VirtualKey::KeyA),
        ])
        .is_err());
    }

    #[test]
    fn test_remap_up_follows_down_after_release() {
        let mut mapper = HalfLayoutMapper::new(
            VirtualKey::Space,
            RemapTable::half_qwerty(),
            Duration::from_millis(500),
        );
        mapper.process(&KeyEvent::down(VirtualKey::Space, ms(0)));
        let down = mapper.process(&KeyEvent::down(VirtualKey::KeyF, ms(10)));
        assert_eq!(down.decision, Decision::Remap(VirtualKey::KeyJ.code()));

        let space_up = mapper.process(&KeyEvent::up(VirtualKey::Space, ms(20)));
        assert_eq!(space_up.decision, Decision::Suppress);

        let up = mapper.process(&KeyEvent::up(VirtualKey::KeyF, ms(30)));
        assert_eq!(up.decision, Decision::Remap(VirtualKey::KeyJ.code()));
    }

    #[test]
    fn test_stray_hold_key_up_passes() {
        let mut mapper = HalfLayoutMapper::new(
            VirtualKey::Space,
            RemapTable::default(),
            Duration::from_millis(500),
        );
        let out = mapper.process(&KeyEvent::up(VirtualKey::Space, ms(0)));
        assert_eq!(out.decision, Decision::PassThrough);
    }
}
