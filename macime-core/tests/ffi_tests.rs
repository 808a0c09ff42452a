//! FFI tests for macime-core

use macime_core::ffi::*;
use macime_core::VirtualKey;
use std::ffi::{CStr, CString};
use std::ptr;

const DOWN: i32 = 0;
const UP: i32 = 1;
const FLAGS: i32 = 2;

unsafe fn c_str(ptr: *const std::os::raw::c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_str().unwrap().to_string())
    }
}

fn feed(handle: *mut SessionHandle, key: VirtualKey, phase: i32, at: i64, bits: u32, out: &mut FeedOutput) -> MacimeResult {
    macime_feed_output_free(out);
    macime_session_feed(handle, key.code() as i32, phase, at, bits, out)
}

#[test]
fn test_session_lifecycle() {
    let handle = macime_session_new(ptr::null());
    assert!(!handle.is_null());
    macime_session_free(handle);
    macime_session_free(ptr::null_mut());
}

#[test]
fn test_version() {
    unsafe {
        let version = macime_get_version();
        assert!(!version.is_null());
        let version_str = CStr::from_ptr(version).to_str().unwrap();
        assert!(!version_str.is_empty());
    }
}

#[test]
fn test_invalid_config_returns_null() {
    let config = CString::new("[dual_action]\nkey = \"NOPE\"").unwrap();
    assert!(macime_session_new(config.as_ptr()).is_null());

    let garbage = CString::new("variant = ").unwrap();
    assert!(macime_session_new(garbage.as_ptr()).is_null());
}

#[test]
fn test_hangul_feed_and_flush() {
    unsafe {
        let handle = macime_session_new(ptr::null());
        let mut out = FeedOutput::default();

        assert_eq!(feed(handle, VirtualKey::KeyG, DOWN, 0, 0, &mut out), MacimeResult::Success);
        assert_eq!(out.decision, DECISION_SUPPRESS);
        assert_eq!(out.preedit_changed, 1);
        assert_eq!(c_str(out.preedit_text), Some("ㅎ".to_string()));

        feed(handle, VirtualKey::KeyK, DOWN, 10, 0, &mut out);
        feed(handle, VirtualKey::KeyS, DOWN, 20, 0, &mut out);
        assert_eq!(c_str(out.preedit_text), Some("한".to_string()));
        assert_eq!(out.preedit_cursor, 1);
        assert!(out.commit_text.is_null());

        feed(handle, VirtualKey::KeyR, DOWN, 30, 0, &mut out);
        assert_eq!(c_str(out.commit_text), Some("한".to_string()));
        macime_feed_output_free(&mut out);

        let preedit = macime_session_get_preedit(handle);
        assert_eq!(c_str(preedit), Some("ㄱ".to_string()));
        macime_free_string(preedit);

        let flushed = macime_session_flush(handle);
        assert_eq!(c_str(flushed), Some("ㄱ".to_string()));
        macime_free_string(flushed);

        let flushed = macime_session_flush(handle);
        assert_eq!(c_str(flushed), Some(String::new()));
        macime_free_string(flushed);

        macime_session_free(handle);
    }
}

#[test]
fn test_half_layout_synthesized_event() {
    let config = CString::new("variant = \"half-layout\"").unwrap();
    let handle = macime_session_new(config.as_ptr());
    assert!(!handle.is_null());
    let mut out = FeedOutput::default();

    feed(handle, VirtualKey::Space, DOWN, 0, 0, &mut out);
    assert_eq!(out.decision, DECISION_SUPPRESS);
    assert_eq!(out.has_timer, 1);
    assert_eq!(out.timer_deadline_ms, 500);

    feed(handle, VirtualKey::Space, UP, 100, 0, &mut out);
    assert_eq!(out.decision, DECISION_SYNTHESIZE_THEN_PASS_THROUGH);
    assert_eq!(out.synthetic_count, 1);
    assert_eq!(out.synthetic_codes[0], VirtualKey::Space.code() as i32);
    assert_eq!(out.synthetic_phases[0], DOWN);

    feed(handle, VirtualKey::Space, DOWN, 200, 0, &mut out);
    feed(handle, VirtualKey::KeyA, DOWN, 210, 0, &mut out);
    assert_eq!(out.decision, DECISION_REMAP);
    assert_eq!(out.remap_code, VirtualKey::Semicolon.code() as i32);

    macime_session_free(handle);
}

#[test]
fn test_dual_action_timer_round_trip() {
    let handle = macime_session_new(ptr::null());
    let mut out = FeedOutput::default();

    let caps_on = 1 << 4;
    feed(handle, VirtualKey::CapsLock, FLAGS, 0, caps_on, &mut out);
    assert_eq!(out.decision, DECISION_SUPPRESS);
    assert_eq!(out.has_timer, 1);
    let (owner, generation, deadline) = (out.timer_owner, out.timer_generation, out.timer_deadline_ms);

    assert_eq!(macime_session_on_timer(handle, owner, generation, deadline, &mut out), MacimeResult::Success);
    assert_eq!(out.action, ACTION_ALLOW_SYSTEM_DEFAULT);

    // Same token again is stale.
    macime_session_on_timer(handle, owner, generation, deadline, &mut out);
    assert_eq!(out.action, ACTION_NONE);

    feed(handle, VirtualKey::CapsLock, FLAGS, 900, 0, &mut out);
    assert_eq!(out.decision, DECISION_PASS_THROUGH);
    assert_eq!(out.action, ACTION_NONE);

    macime_session_free(handle);
}

#[test]
fn test_advance_fires_due_timers() {
    let handle = macime_session_new(ptr::null());
    let mut out = FeedOutput::default();

    feed(handle, VirtualKey::CapsLock, FLAGS, 0, 1 << 4, &mut out);
    assert_eq!(macime_session_advance(handle, 100, &mut out), MacimeResult::Success);
    assert_eq!(out.action, ACTION_NONE);
    macime_session_advance(handle, 500, &mut out);
    assert_eq!(out.action, ACTION_ALLOW_SYSTEM_DEFAULT);

    macime_session_free(handle);
}

#[test]
fn test_short_press_action() {
    let handle = macime_session_new(ptr::null());
    let mut out = FeedOutput::default();

    feed(handle, VirtualKey::CapsLock, FLAGS, 0, 1 << 4, &mut out);
    feed(handle, VirtualKey::CapsLock, FLAGS, 120, 0, &mut out);
    assert_eq!(out.action, ACTION_FIRE_SHORT_ACTION);
    assert_eq!(out.decision, DECISION_SUPPRESS);

    macime_session_free(handle);
}

#[test]
fn test_malformed_event_is_dropped() {
    let handle = macime_session_new(ptr::null());
    let mut out = FeedOutput::default();

    let result = macime_session_feed(handle, VirtualKey::KeyG.code() as i32, 9, 0, 0, &mut out);
    assert_eq!(result, MacimeResult::ErrorMalformedEvent);
    assert_eq!(out.decision, DECISION_PASS_THROUGH);
    assert!(out.preedit_text.is_null());

    let result = macime_session_feed(handle, -4, DOWN, 0, 0, &mut out);
    assert_eq!(result, MacimeResult::ErrorMalformedEvent);

    let preedit = macime_session_get_preedit(handle);
    unsafe { assert_eq!(c_str(preedit), Some(String::new())) };
    macime_free_string(preedit);

    macime_session_free(handle);
}

#[test]
fn test_invalid_parameters() {
    let mut out = FeedOutput::default();
    assert_eq!(
        macime_session_feed(ptr::null_mut(), 0, DOWN, 0, 0, &mut out),
        MacimeResult::ErrorInvalidHandle
    );
    assert_eq!(macime_session_reset(ptr::null_mut()), MacimeResult::ErrorInvalidHandle);
    assert!(macime_session_flush(ptr::null_mut()).is_null());

    let handle = macime_session_new(ptr::null());
    assert_eq!(
        macime_session_feed(handle, 0, DOWN, 0, 0, ptr::null_mut()),
        MacimeResult::ErrorInvalidParameter
    );
    assert_eq!(
        macime_session_on_timer(handle, 7, 1, 0, &mut out),
        MacimeResult::ErrorInvalidParameter
    );
    assert_eq!(macime_session_reset(handle), MacimeResult::Success);
    macime_session_free(handle);
}
