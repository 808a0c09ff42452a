//! Foreign Function Interface for macime core
//!
//! This module provides a C-compatible API for the native input-method host.
//! Every function takes the session through an opaque handle; strings returned
//! by the engine must be released with `macime_free_string`, and a filled
//! `FeedOutput` with `macime_feed_output_free`.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::Mutex;

use log::warn;

use crate::config::EngineConfig;
use crate::engine::{
    Action, Decision, EngineOutput, KeyEvent, RawKeyEvent, Session, Timestamp, TimerOwner,
    TimerToken,
};

/// Opaque handle to a macime session
pub struct SessionHandle {
    session: Mutex<Session>,
}

/// Result codes for FFI functions
#[repr(C)]
#[derive(Debug, PartialEq)]
pub enum MacimeResult {
    Success = 0,
    ErrorInvalidHandle = -1,
    ErrorInvalidParameter = -2,
    ErrorEngineFailure = -3,
    ErrorUtf8Conversion = -4,
    /// The event was dropped; the output holds a no-op result
    ErrorMalformedEvent = -5,
}

pub const DECISION_SUPPRESS: c_int = 0;
pub const DECISION_PASS_THROUGH: c_int = 1;
pub const DECISION_REMAP: c_int = 2;
pub const DECISION_SYNTHESIZE_THEN_PASS_THROUGH: c_int = 3;

pub const ACTION_NONE: c_int = 0;
pub const ACTION_FIRE_SHORT_ACTION: c_int = 1;
pub const ACTION_ALLOW_SYSTEM_DEFAULT: c_int = 2;

/// Synthesized events carried inline in `FeedOutput`
pub const MAX_SYNTHETIC_EVENTS: usize = 2;

/// Output from feeding an event or a timer
#[repr(C)]
pub struct FeedOutput {
    /// One of the `DECISION_*` codes
    pub decision: c_int,
    /// Replacement key code when `decision` is `DECISION_REMAP`
    pub remap_code: c_int,
    /// Number of valid entries in the synthetic arrays
    pub synthetic_count: c_int,
    pub synthetic_codes: [c_int; MAX_SYNTHETIC_EVENTS],
    /// Phase of each synthesized event: 0=Down, 1=Up
    pub synthetic_phases: [c_int; MAX_SYNTHETIC_EVENTS],
    /// Text to insert (UTF-8, null-terminated), null when there is none
    pub commit_text: *mut c_char,
    /// Whether the marked text changed (0=false, 1=true)
    pub preedit_changed: c_int,
    /// New marked text, null when `preedit_changed` is 0
    pub preedit_text: *mut c_char,
    /// Caret offset in UTF-16 code units
    pub preedit_cursor: c_int,
    /// One of the `ACTION_*` codes
    pub action: c_int,
    /// Whether a timer must be scheduled (0=false, 1=true)
    pub has_timer: c_int,
    pub timer_owner: c_int,
    pub timer_generation: u64,
    pub timer_deadline_ms: u64,
}

impl FeedOutput {
    fn clear(&mut self) {
        self.decision = DECISION_PASS_THROUGH;
        self.remap_code = 0;
        self.synthetic_count = 0;
        self.synthetic_codes = [0; MAX_SYNTHETIC_EVENTS];
        self.synthetic_phases = [0; MAX_SYNTHETIC_EVENTS];
        self.commit_text = ptr::null_mut();
        self.preedit_changed = 0;
        self.preedit_text = ptr::null_mut();
        self.preedit_cursor = 0;
        self.action = ACTION_NONE;
        self.has_timer = 0;
        self.timer_owner = 0;
        self.timer_generation = 0;
        self.timer_deadline_ms = 0;
    }

    fn fill(&mut self, result: &EngineOutput) {
        self.clear();

        match &result.decision {
            Decision::Suppress => self.decision = DECISION_SUPPRESS,
            Decision::PassThrough => self.decision = DECISION_PASS_THROUGH,
            Decision::Remap(code) => {
                self.decision = DECISION_REMAP;
                self.remap_code = *code as c_int;
            }
            Decision::SynthesizeThenPassThrough(events) => {
                self.decision = DECISION_SYNTHESIZE_THEN_PASS_THROUGH;
                for (i, event) in events.iter().take(MAX_SYNTHETIC_EVENTS).enumerate() {
                    self.synthetic_codes[i] = event.code as c_int;
                    self.synthetic_phases[i] = event.phase.to_raw();
                    self.synthetic_count += 1;
                }
            }
        }

        if let Some(text) = &result.commit_text {
            self.commit_text = to_c_string(text);
        }
        if let Some(preedit) = &result.preedit {
            self.preedit_changed = 1;
            self.preedit_text = to_c_string(&preedit.text);
            self.preedit_cursor = preedit.cursor as c_int;
        }

        self.action = action_code(result.action);

        if let Some(timer) = result.timers.first() {
            self.has_timer = 1;
            self.timer_owner = timer.token.owner.to_raw();
            self.timer_generation = timer.token.generation;
            self.timer_deadline_ms = timer.deadline.as_millis();
        }
    }
}

fn action_code(action: Action) -> c_int {
    match action {
        Action::None => ACTION_NONE,
        Action::FireShortAction => ACTION_FIRE_SHORT_ACTION,
        Action::AllowSystemDefault => ACTION_ALLOW_SYSTEM_DEFAULT,
    }
}

fn to_c_string(text: &str) -> *mut c_char {
    match CString::new(text) {
        Ok(c_string) => c_string.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Merge the outputs of several timers into one
fn merge_outputs(outputs: Vec<EngineOutput>) -> EngineOutput {
    let mut merged = EngineOutput::suppress();
    for output in outputs {
        if output.action != Action::None {
            merged.action = output.action;
        }
        merged.timers.extend(output.timers);
    }
    merged
}

fn with_session<T>(
    handle: *mut SessionHandle,
    f: impl FnOnce(&mut Session) -> T,
) -> Result<T, MacimeResult> {
    if handle.is_null() {
        return Err(MacimeResult::ErrorInvalidHandle);
    }
    let handle = unsafe { &*handle };
    match handle.session.lock() {
        Ok(mut session) => Ok(f(&mut session)),
        Err(_) => Err(MacimeResult::ErrorEngineFailure),
    }
}

/// Creates a new session from a TOML config; null config means defaults
///
/// Returns null if the config is invalid.
#[no_mangle]
pub extern "C" fn macime_session_new(config_toml: *const c_char) -> *mut SessionHandle {
    let config = if config_toml.is_null() {
        EngineConfig::default()
    } else {
        let text = match unsafe { CStr::from_ptr(config_toml) }.to_str() {
            Ok(s) => s,
            Err(_) => return ptr::null_mut(),
        };
        match EngineConfig::from_toml_str(text) {
            Ok(config) => config,
            Err(err) => {
                warn!("rejecting session config: {}", err);
                return ptr::null_mut();
            }
        }
    };

    match Session::create(&config) {
        Ok(session) => Box::into_raw(Box::new(SessionHandle {
            session: Mutex::new(session),
        })),
        Err(err) => {
            warn!("rejecting session config: {}", err);
            ptr::null_mut()
        }
    }
}

/// Frees a session
#[no_mangle]
pub extern "C" fn macime_session_free(handle: *mut SessionHandle) {
    if !handle.is_null() {
        unsafe {
            let _ = Box::from_raw(handle);
        }
    }
}

/// Feeds a key event
///
/// `phase` is 0=Down, 1=Up, 2=FlagsChanged. `modifier_bits` uses bit 0 shift,
/// 1 control, 2 option, 3 command, 4 caps lock.
#[no_mangle]
pub extern "C" fn macime_session_feed(
    handle: *mut SessionHandle,
    key_code: c_int,
    phase: c_int,
    timestamp_ms: i64,
    modifier_bits: u32,
    output: *mut FeedOutput,
) -> MacimeResult {
    if handle.is_null() {
        return MacimeResult::ErrorInvalidHandle;
    }
    if output.is_null() {
        return MacimeResult::ErrorInvalidParameter;
    }
    let output = unsafe { &mut *output };

    let raw = RawKeyEvent {
        code: key_code as i64,
        phase,
        timestamp_ms,
        modifier_bits,
    };
    let event = match KeyEvent::try_from(raw) {
        Ok(event) => event,
        Err(err) => {
            warn!("dropping event: {}", err);
            output.fill(&EngineOutput::noop());
            return MacimeResult::ErrorMalformedEvent;
        }
    };

    match with_session(handle, |session| session.feed(event)) {
        Ok(result) => {
            output.fill(&result);
            MacimeResult::Success
        }
        Err(code) => code,
    }
}

/// Delivers an elapsed timer previously requested in a `FeedOutput`
#[no_mangle]
pub extern "C" fn macime_session_on_timer(
    handle: *mut SessionHandle,
    timer_owner: c_int,
    timer_generation: u64,
    now_ms: u64,
    output: *mut FeedOutput,
) -> MacimeResult {
    if output.is_null() {
        return MacimeResult::ErrorInvalidParameter;
    }
    let owner = match TimerOwner::from_raw(timer_owner) {
        Some(owner) => owner,
        None => return MacimeResult::ErrorInvalidParameter,
    };
    let token = TimerToken {
        owner,
        generation: timer_generation,
    };
    let output = unsafe { &mut *output };

    match with_session(handle, |session| session.on_timer(token, Timestamp::from_millis(now_ms))) {
        Ok(result) => {
            output.fill(&result);
            MacimeResult::Success
        }
        Err(code) => code,
    }
}

/// Fires every timer due at `now_ms`
#[no_mangle]
pub extern "C" fn macime_session_advance(
    handle: *mut SessionHandle,
    now_ms: u64,
    output: *mut FeedOutput,
) -> MacimeResult {
    if output.is_null() {
        return MacimeResult::ErrorInvalidParameter;
    }
    let output = unsafe { &mut *output };

    match with_session(handle, |session| session.advance_to(Timestamp::from_millis(now_ms))) {
        Ok(results) => {
            output.fill(&merge_outputs(results));
            MacimeResult::Success
        }
        Err(code) => code,
    }
}

/// Finalizes in-progress text
///
/// Returns a newly allocated C string that must be freed with macime_free_string
#[no_mangle]
pub extern "C" fn macime_session_flush(handle: *mut SessionHandle) -> *mut c_char {
    match with_session(handle, |session| session.flush()) {
        Ok(text) => to_c_string(&text),
        Err(_) => ptr::null_mut(),
    }
}

/// Resets the session state
#[no_mangle]
pub extern "C" fn macime_session_reset(handle: *mut SessionHandle) -> MacimeResult {
    match with_session(handle, |session| session.reset()) {
        Ok(()) => MacimeResult::Success,
        Err(code) => code,
    }
}

/// Gets the current preedit text
///
/// Returns a newly allocated C string that must be freed with macime_free_string
#[no_mangle]
pub extern "C" fn macime_session_get_preedit(handle: *mut SessionHandle) -> *mut c_char {
    match with_session(handle, |session| session.preedit()) {
        Ok(preedit) => to_c_string(&preedit.text),
        Err(_) => ptr::null_mut(),
    }
}

/// Frees a string allocated by the engine
#[no_mangle]
pub extern "C" fn macime_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            let _ = CString::from_raw(s);
        }
    }
}

/// Frees the strings inside a `FeedOutput` and nulls them
///
/// Call before reusing the same `FeedOutput` for another event.
#[no_mangle]
pub extern "C" fn macime_feed_output_free(output: *mut FeedOutput) {
    if output.is_null() {
        return;
    }
    let output = unsafe { &mut *output };
    macime_free_string(output.commit_text);
    macime_free_string(output.preedit_text);
    output.commit_text = ptr::null_mut();
    output.preedit_text = ptr::null_mut();
}

/// Gets the engine version
#[no_mangle]
pub extern "C" fn macime_get_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

impl Default for FeedOutput {
    fn default() -> Self {
        FeedOutput {
            decision: DECISION_PASS_THROUGH,
            remap_code: 0,
            synthetic_count: 0,
            synthetic_codes: [0; MAX_SYNTHETIC_EVENTS],
            synthetic_phases: [0; MAX_SYNTHETIC_EVENTS],
            commit_text: ptr::null_mut(),
            preedit_changed: 0,
            preedit_text: ptr::null_mut(),
            preedit_cursor: 0,
            action: ACTION_NONE,
            has_timer: 0,
            timer_owner: 0,
            timer_generation: 0,
            timer_deadline_ms: 0,
        }
    }
}
