//! Key event script parser
//!
//! One event per line:
//!
//! ```text
//! # hold space, type f, release
//! 0    down  SPACE
//! 40   down  F
//! 80   up    F
//! 120  up    SPACE
//! 200  flags CAPSLOCK CAPS
//! 900  tick
//! ```

use anyhow::{bail, Context, Result};
use macime_core::{KeyEvent, KeyPhase, ModifierState, Timestamp, VirtualKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Key(KeyEvent),
    /// Only fire due timers
    Tick,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based line number in the script
    pub line: usize,
    pub at: Timestamp,
    pub command: Command,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    let mut last = Timestamp::ZERO;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let parsed = parse_line(line, content).with_context(|| format!("line {}: {}", line, raw.trim()))?;
        if parsed.at < last {
            bail!("line {}: timestamp {}ms goes backwards", line, parsed.at.as_millis());
        }
        last = parsed.at;
        lines.push(parsed);
    }

    Ok(lines)
}

fn parse_line(line: usize, content: &str) -> Result<ScriptLine> {
    let mut fields = content.split_whitespace();

    let at = fields.next().context("missing timestamp")?;
    let at = at
        .strip_suffix("ms")
        .unwrap_or(at)
        .parse::<u64>()
        .with_context(|| format!("invalid timestamp '{}'", at))?;
    let at = Timestamp::from_millis(at);

    let verb = fields.next().context("missing event kind")?.to_lowercase();
    let phase = match verb.as_str() {
        "tick" => {
            if let Some(extra) = fields.next() {
                bail!("unexpected '{}' after tick", extra);
            }
            return Ok(ScriptLine { line, at, command: Command::Tick });
        }
        "down" => KeyPhase::Down,
        "up" => KeyPhase::Up,
        "flags" => KeyPhase::FlagsChanged,
        other => bail!("unknown event kind '{}'", other),
    };

    let key = fields.next().context("missing key name")?;
    let key = VirtualKey::from_name(key)?;

    let mut modifiers = ModifierState::new();
    for name in fields {
        match name.to_uppercase().as_str() {
            "SHIFT" => modifiers.shift = true,
            "CONTROL" | "CTRL" => modifiers.control = true,
            "OPTION" | "ALT" => modifiers.option = true,
            "COMMAND" | "CMD" => modifiers.command = true,
            "CAPS" | "CAPSLOCK" => modifiers.caps_lock = true,
            other => bail!("unknown modifier '{}'", other),
        }
    }

    let event = KeyEvent::new(key.code(), phase, at).with_modifiers(modifiers);
    Ok(ScriptLine {
        line,
        at,
        command: Command::Key(event),
    })
}
