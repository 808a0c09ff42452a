//! Short-press / long-press disambiguation for one control key

use std::time::Duration;

use log::debug;

use super::input::Timestamp;
use super::output::{Action, Decision};
use super::timer::{DeadlineTimer, TimerOwner, TimerRequest, TimerToken};
use crate::types::VirtualKey;

/// What the host does with one flag transition of the dual-action key
#[derive(Debug, Clone, PartialEq)]
pub struct DualActionOutcome {
    pub action: Action,
    pub decision: Decision,
    pub timer: Option<TimerRequest>,
}

impl DualActionOutcome {
    fn new(action: Action, decision: Decision) -> Self {
        Self {
            action,
            decision,
            timer: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DualActionKey {
    key: VirtualKey,
    threshold: Duration,
    press_instant: Option<Timestamp>,
    resolved_long: bool,
    timer: DeadlineTimer,
}

impl DualActionKey {
    pub fn new(key: VirtualKey, threshold: Duration) -> Self {
        Self {
            key,
            threshold,
            press_instant: None,
            resolved_long: false,
            timer: DeadlineTimer::new(TimerOwner::DualAction),
        }
    }

    pub fn key(&self) -> VirtualKey {
        self.key
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// A press is in progress
    pub fn is_pressed(&self) -> bool {
        self.press_instant.is_some()
    }

    pub fn on_flag_transition(&mut self, is_now_active: bool, timestamp: Timestamp) -> DualActionOutcome {
        match (is_now_active, self.press_instant) {
            (true, None) => {
                self.press_instant = Some(timestamp);
                self.resolved_long = false;
                let request = self.timer.arm(timestamp + self.threshold);
                DualActionOutcome {
                    action: Action::None,
                    decision: Decision::Suppress,
                    timer: Some(request),
                }
            }
            (true, Some(_)) if self.resolved_long => {
                DualActionOutcome::new(Action::None, Decision::PassThrough)
            }
            (true, Some(_)) => DualActionOutcome::new(Action::None, Decision::Suppress),
            (false, Some(pressed_at)) => {
                self.timer.cancel();
                self.press_instant = None;
                if std::mem::take(&mut self.resolved_long) {
                    return DualActionOutcome::new(Action::None, Decision::PassThrough);
                }

                let held = timestamp.saturating_duration_since(pressed_at);
                if held < self.threshold {
                    debug!("{} short press ({}ms)", self.key.name(), held.as_millis());
                    DualActionOutcome::new(Action::FireShortAction, Decision::Suppress)
                } else {
                    // The release beat the timer callback to the queue.
                    debug!("{} long press resolved on release ({}ms)", self.key.name(), held.as_millis());
                    DualActionOutcome::new(Action::AllowSystemDefault, Decision::PassThrough)
                }
            }
            (false, None) => DualActionOutcome::new(Action::None, Decision::PassThrough),
        }
    }

    /// Classify a press as long once its deadline elapses
    pub fn on_timer(&mut self, token: TimerToken) -> Action {
        if let Err(err) = self.timer.fire(token) {
            debug!("ignoring dual-action timer: {}", err);
            return Action::None;
        }
        if self.press_instant.is_none() || self.resolved_long {
            return Action::None;
        }
        self.resolved_long = true;
        debug!("{} long press", self.key.name());
        Action::AllowSystemDefault
    }

    pub fn due(&self, now: Timestamp) -> Option<TimerToken> {
        self.timer.due(now)
    }

    pub fn pending_deadline(&self) -> Option<Timestamp> {
        self.timer.deadline()
    }

    pub fn reset(&mut self) {
        self.press_instant = None;
        self.resolved_long = false;
        self.timer.cancel();
    }
}
