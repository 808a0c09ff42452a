//! Helper functions for driving a session in tests

#![allow(dead_code)]

use macime_core::{
    EngineConfig, EngineOutput, KeyEvent, ModifierState, Session, SessionVariant, Timestamp,
    VirtualKey,
};

pub fn ms(v: u64) -> Timestamp {
    Timestamp::from_millis(v)
}

/// Session with the default config (Hangul, macime layout, caps-lock dual action)
pub fn hangul_session() -> Session {
    Session::create(&EngineConfig::default()).unwrap()
}

pub fn hangul_session_with_layout(layout: &str) -> Session {
    let mut config = EngineConfig::default();
    config.hangul.layout = layout.to_string();
    Session::create(&config).unwrap()
}

/// Half-layout session with space as hold key and the half-qwerty table
pub fn half_layout_session() -> Session {
    let mut config = EngineConfig::default();
    config.variant = SessionVariant::HalfLayout;
    Session::create(&config).unwrap()
}

pub fn down(key: VirtualKey, at: u64) -> KeyEvent {
    KeyEvent::down(key, ms(at))
}

pub fn up(key: VirtualKey, at: u64) -> KeyEvent {
    KeyEvent::up(key, ms(at))
}

pub fn shifted(key: VirtualKey, at: u64) -> KeyEvent {
    KeyEvent::down(key, ms(at)).with_modifiers(ModifierState {
        shift: true,
        ..Default::default()
    })
}

pub fn caps_flags(active: bool, at: u64) -> KeyEvent {
    KeyEvent::flags(
        VirtualKey::CapsLock,
        ModifierState {
            caps_lock: active,
            ..Default::default()
        },
        ms(at),
    )
}

/// Type Latin characters as key downs; returns every output
pub fn type_keys(session: &mut Session, keys: &str) -> Vec<EngineOutput> {
    keys.chars()
        .enumerate()
        .map(|(i, ch)| {
            let key = VirtualKey::from_name(&ch.to_string()).unwrap();
            session.feed(KeyEvent::down(key, ms(i as u64 * 10)).with_char(ch))
        })
        .collect()
}

/// Concatenated commit text of `outputs`
pub fn committed(outputs: &[EngineOutput]) -> String {
    outputs
        .iter()
        .filter_map(|o| o.commit_text.as_deref())
        .collect()
}

/// Preedit text reported by the last output that changed it
pub fn last_preedit(outputs: &[EngineOutput]) -> Option<String> {
    outputs
        .iter()
        .rev()
        .find_map(|o| o.preedit.as_ref().map(|p| p.text.clone()))
}
