//! Session controller
//!
//! Routes host events to the configured composer and to the dual-action key,
//! and turns their results into [`EngineOutput`]s.

use log::{debug, trace, warn};

use super::dual_action::{DualActionKey, DualActionOutcome};
use super::half_layout::HalfLayoutMapper;
use super::hangul::HangulComposer;
use super::input::{KeyEvent, KeyPhase, RawKeyEvent, Timestamp};
use super::output::{Action, Decision, EngineOutput, Preedit};
use super::timer::{TimerOwner, TimerToken};
use crate::config::{EngineConfig, SessionVariant};
use crate::error::{Error, Result};
use crate::types::{HangulLayout, VirtualKey};

#[derive(Debug, Clone)]
enum Composer {
    Hangul {
        composer: HangulComposer,
        layout: HangulLayout,
    },
    HalfLayout(HalfLayoutMapper),
}

/// One input context; all state is owned and single-threaded
#[derive(Debug, Clone)]
pub struct Session {
    composer: Composer,
    dual_action: Option<DualActionKey>,
}

impl Session {
    pub fn create(config: &EngineConfig) -> Result<Self> {
        let composer = match config.variant {
            SessionVariant::Hangul => Composer::Hangul {
                composer: HangulComposer::new(),
                layout: config.hangul.resolve_layout()?,
            },
            SessionVariant::HalfLayout => {
                let hold_key = config.half_layout.resolve_hold_key()?;
                let table = config.half_layout.resolve_table(hold_key)?;
                Composer::HalfLayout(HalfLayoutMapper::new(
                    hold_key,
                    table,
                    config.half_layout.repeat_delay(),
                ))
            }
        };

        let dual_action = if config.dual_action.enabled {
            let key = config.dual_action.resolve_key()?;
            if let Composer::HalfLayout(mapper) = &composer {
                if mapper.hold_key() == key {
                    return Err(Error::InvalidConfig(format!(
                        "{} cannot be both the hold key and the dual-action key",
                        key.name()
                    )));
                }
                if mapper.table().contains(key) {
                    return Err(Error::InvalidConfig(format!(
                        "dual-action key {} cannot also be remapped",
                        key.name()
                    )));
                }
            }
            Some(DualActionKey::new(key, config.dual_action.threshold()))
        } else {
            None
        };

        debug!("session created: {:?}", config.variant);
        Ok(Self {
            composer,
            dual_action,
        })
    }

    pub fn variant(&self) -> SessionVariant {
        match self.composer {
            Composer::Hangul { .. } => SessionVariant::Hangul,
            Composer::HalfLayout(_) => SessionVariant::HalfLayout,
        }
    }

    pub fn feed(&mut self, event: KeyEvent) -> EngineOutput {
        if let Some(dual) = self.dual_action.as_mut() {
            if event.code == dual.key().code() {
                let is_now_active = match event.phase {
                    KeyPhase::FlagsChanged => dual
                        .key()
                        .modifier()
                        .map_or(false, |m| event.modifiers.is_active(m)),
                    KeyPhase::Down => true,
                    KeyPhase::Up => false,
                };
                let outcome = dual.on_flag_transition(is_now_active, event.timestamp);
                return Self::dual_action_output(outcome);
            }
        }

        let output = match &mut self.composer {
            Composer::Hangul { composer, layout } => Self::feed_hangul(composer, *layout, &event),
            Composer::HalfLayout(mapper) => {
                let outcome = mapper.process(&event);
                EngineOutput::new(outcome.decision).with_timer(outcome.timer)
            }
        };
        trace!("{:?} {:#04x} -> {:?}", event.phase, event.code, output.decision);
        output
    }

    /// Validate and feed an untrusted event; malformed events are dropped
    pub fn feed_raw(&mut self, raw: RawKeyEvent) -> EngineOutput {
        match KeyEvent::try_from(raw) {
            Ok(event) => self.feed(event),
            Err(err) => {
                warn!("dropping event: {}", err);
                EngineOutput::noop()
            }
        }
    }

    fn dual_action_output(outcome: DualActionOutcome) -> EngineOutput {
        EngineOutput::new(outcome.decision)
            .with_action(outcome.action)
            .with_timer(outcome.timer)
    }

    fn feed_hangul(composer: &mut HangulComposer, layout: HangulLayout, event: &KeyEvent) -> EngineOutput {
        if event.phase != KeyPhase::Down {
            return EngineOutput::pass_through();
        }

        if event.modifiers.has_shortcut_modifier() {
            return Self::flush_output(composer, Decision::PassThrough, "");
        }

        match event.key() {
            Some(VirtualKey::Return) => Self::flush_output(composer, Decision::PassThrough, ""),
            Some(VirtualKey::Space) => Self::flush_output(composer, Decision::Suppress, " "),
            Some(VirtualKey::Escape) => Self::flush_output(composer, Decision::Suppress, ""),
            Some(VirtualKey::Delete) => {
                if composer.is_empty() {
                    return EngineOutput::pass_through();
                }
                composer.backspace();
                Self::composing_output(composer)
            }
            _ => match event.typed_char() {
                Some(ch) if !ch.is_control() => {
                    composer.process(layout.translate(ch));
                    Self::composing_output(composer)
                }
                _ => EngineOutput::pass_through(),
            },
        }
    }

    fn flush_output(composer: &mut HangulComposer, decision: Decision, suffix: &str) -> EngineOutput {
        // Only clear marked text the host is showing.
        let had_preedit = !composer.preedit().is_empty();
        let mut text = composer.flush();
        text.push_str(suffix);

        let output = EngineOutput::new(decision).with_commit(text);
        if had_preedit {
            output.with_preedit(Preedit::default())
        } else {
            output
        }
    }

    fn composing_output(composer: &mut HangulComposer) -> EngineOutput {
        EngineOutput::suppress()
            .with_commit(composer.commit())
            .with_preedit(Preedit::new(composer.preedit()))
    }

    /// Deliver an elapsed deadline
    pub fn on_timer(&mut self, token: TimerToken, now: Timestamp) -> EngineOutput {
        trace!("timer {:?} at {}ms", token, now.as_millis());
        match token.owner {
            TimerOwner::DualAction => {
                let action = self
                    .dual_action
                    .as_mut()
                    .map_or(Action::None, |dual| dual.on_timer(token));
                EngineOutput::suppress().with_action(action)
            }
            TimerOwner::HoldRepeat => {
                if let Composer::HalfLayout(mapper) = &mut self.composer {
                    mapper.on_timer(token);
                }
                EngineOutput::suppress()
            }
        }
    }

    /// Fire every timer due at `now`, earliest deadline first
    pub fn advance_to(&mut self, now: Timestamp) -> Vec<EngineOutput> {
        let mut due: Vec<(Timestamp, TimerToken)> = Vec::new();
        if let Composer::HalfLayout(mapper) = &self.composer {
            if let (Some(token), Some(deadline)) = (mapper.due(now), mapper.pending_deadline()) {
                due.push((deadline, token));
            }
        }
        if let Some(dual) = &self.dual_action {
            if let (Some(token), Some(deadline)) = (dual.due(now), dual.pending_deadline()) {
                due.push((deadline, token));
            }
        }
        due.sort_by_key(|(deadline, _)| *deadline);

        due.into_iter()
            .map(|(_, token)| self.on_timer(token, now))
            .collect()
    }

    /// Earliest armed deadline across both timers
    pub fn next_deadline(&self) -> Option<Timestamp> {
        let hold = match &self.composer {
            Composer::HalfLayout(mapper) => mapper.pending_deadline(),
            Composer::Hangul { .. } => None,
        };
        let dual = self.dual_action.as_ref().and_then(|d| d.pending_deadline());
        match (hold, dual) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Finalize and return any in-progress text
    pub fn flush(&mut self) -> String {
        match &mut self.composer {
            Composer::Hangul { composer, .. } => composer.flush(),
            Composer::HalfLayout(_) => String::new(),
        }
    }

    /// Drop all state without producing output
    pub fn reset(&mut self) {
        match &mut self.composer {
            Composer::Hangul { composer, .. } => composer.reset(),
            Composer::HalfLayout(mapper) => mapper.reset(),
        }
        if let Some(dual) = self.dual_action.as_mut() {
            dual.reset();
        }
        debug!("session reset");
    }

    pub fn preedit(&self) -> Preedit {
        match &self.composer {
            Composer::Hangul { composer, .. } => Preedit::new(composer.preedit()),
            Composer::HalfLayout(_) => Preedit::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_key_cannot_be_dual_action_key() {
        let mut config = EngineConfig::default();
        config.variant = SessionVariant::HalfLayout;
        config.dual_action.key = "SPACE".to_string();
        assert!(Session::create(&config).is_err());
    }

    #[test]
    fn test_unknown_layout_fails_create() {
        let mut config = EngineConfig::default();
        config.hangul.layout = "qwerty".to_string();
        let err = Session::create(&config).unwrap_err();
        assert!(err.is_config_error());
    }
}
