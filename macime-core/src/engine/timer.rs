//! Single-shot cancelable deadline timers
//!
//! The engine never owns a clock or a thread. Arming a timer hands the host a
//! [`TimerRequest`]; when the deadline elapses the host gives the token back.
//! Every arm bumps a generation counter, so a token from an earlier arm (or
//! one that was cancelled) is recognised as stale and ignored.

use crate::engine::input::Timestamp;
use crate::error::{Error, Result};

/// Which state machine a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerOwner {
    /// Half-layout hold-key auto-repeat unlock
    HoldRepeat,
    /// Dual-action key long-press classification
    DualAction,
}

impl TimerOwner {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(TimerOwner::HoldRepeat),
            1 => Some(TimerOwner::DualAction),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            TimerOwner::HoldRepeat => 0,
            TimerOwner::DualAction => 1,
        }
    }
}

/// Identifies one arming of one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub owner: TimerOwner,
    pub generation: u64,
}

/// Asks the host to call back at `deadline` with `token`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub deadline: Timestamp,
}

#[derive(Debug, Clone)]
pub struct DeadlineTimer {
    owner: TimerOwner,
    generation: u64,
    armed: Option<Timestamp>,
}

impl DeadlineTimer {
    pub fn new(owner: TimerOwner) -> Self {
        Self {
            owner,
            generation: 0,
            armed: None,
        }
    }

    /// Arm for `deadline`, invalidating any earlier arm
    pub fn arm(&mut self, deadline: Timestamp) -> TimerRequest {
        self.generation += 1;
        self.armed = Some(deadline);
        TimerRequest {
            token: self.current_token(),
            deadline,
        }
    }

    pub fn cancel(&mut self) {
        if self.armed.take().is_some() {
            // A cancelled token must not match a later arm either.
            self.generation += 1;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.armed
    }

    /// Token of the armed timer if its deadline is at or before `now`
    pub fn due(&self, now: Timestamp) -> Option<TimerToken> {
        match self.armed {
            Some(deadline) if deadline <= now => Some(self.current_token()),
            _ => None,
        }
    }

    /// Consume the armed deadline if `token` still refers to it
    pub fn fire(&mut self, token: TimerToken) -> Result<()> {
        if self.armed.is_none() || token != self.current_token() {
            return Err(Error::TimerRaceDetected { token });
        }
        self.armed = None;
        Ok(())
    }

    fn current_token(&self) -> TimerToken {
        TimerToken {
            owner: self.owner,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_arm_and_fire() {
        let mut timer = DeadlineTimer::new(TimerOwner::HoldRepeat);
        let request = timer.arm(ms(500));
        assert!(timer.is_armed());
        assert_eq!(timer.deadline(), Some(ms(500)));
        assert_eq!(timer.due(ms(499)), None);
        assert_eq!(timer.due(ms(500)), Some(request.token));

        timer.fire(request.token).unwrap();
        assert!(!timer.is_armed());

        // Firing twice is a race.
        assert!(matches!(timer.fire(request.token), Err(Error::TimerRaceDetected { .. })));
    }

    #[test]
    fn test_rearm_invalidates_old_token() {
        let mut timer = DeadlineTimer::new(TimerOwner::DualAction);
        let first = timer.arm(ms(100));
        let second = timer.arm(ms(200));
        assert_ne!(first.token, second.token);
        assert!(timer.fire(first.token).is_err());
        assert!(timer.is_armed());
        assert!(timer.fire(second.token).is_ok());
    }

    #[test]
    fn test_cancel_then_rearm() {
        let mut timer = DeadlineTimer::new(TimerOwner::DualAction);
        let first = timer.arm(ms(100));
        timer.cancel();
        assert!(!timer.is_armed());
        assert_eq!(timer.due(ms(1000)), None);

        let second = timer.arm(ms(300));
        assert!(timer.fire(first.token).is_err());
        assert!(timer.fire(second.token).is_ok());
    }

    #[test]
    fn test_foreign_owner_rejected() {
        let mut hold = DeadlineTimer::new(TimerOwner::HoldRepeat);
        let mut dual = DeadlineTimer::new(TimerOwner::DualAction);
        let token = hold.arm(ms(10)).token;
        dual.arm(ms(10));
        assert!(dual.fire(token).is_err());
    }
}
