//! Drives a session through a parsed script

use std::fmt::Write as _;

use log::debug;
use macime_core::{Action, Decision, EngineOutput, KeyPhase, Session, Timestamp, VirtualKey};

use crate::script::{Command, ScriptLine};

/// What produced an output
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Timer,
    Event { phase: KeyPhase, code: u16 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayRecord {
    pub at: Timestamp,
    pub source: Source,
    pub output: EngineOutput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub records: Vec<ReplayRecord>,
    /// Text returned by the final flush
    pub flushed: String,
}

/// Feed every line, firing due timers before each one, then flush
pub fn replay(session: &mut Session, lines: &[ScriptLine]) -> ReplayReport {
    let mut records = Vec::new();

    for line in lines {
        while let Some(deadline) = session.next_deadline().filter(|d| *d <= line.at) {
            for output in session.advance_to(deadline) {
                records.push(ReplayRecord {
                    at: deadline,
                    source: Source::Timer,
                    output,
                });
            }
        }

        if let Command::Key(event) = &line.command {
            debug!("line {}: {:?} {:#04x}", line.line, event.phase, event.code);
            let source = Source::Event {
                phase: event.phase,
                code: event.code,
            };
            records.push(ReplayRecord {
                at: line.at,
                source,
                output: session.feed(event.clone()),
            });
        }
    }

    ReplayReport {
        records,
        flushed: session.flush(),
    }
}

fn key_label(code: u16) -> String {
    VirtualKey::from_code(code)
        .map(|k| k.name().to_string())
        .unwrap_or_else(|| format!("{:#04x}", code))
}

fn decision_label(decision: &Decision) -> String {
    match decision {
        Decision::Suppress => "suppress".to_string(),
        Decision::PassThrough => "pass".to_string(),
        Decision::Remap(code) => format!("remap({})", key_label(*code)),
        Decision::SynthesizeThenPassThrough(events) => {
            let events: Vec<String> = events
                .iter()
                .map(|e| format!("{}:{}", key_label(e.code), phase_label(e.phase)))
                .collect();
            format!("synthesize[{}]+pass", events.join(","))
        }
    }
}

fn phase_label(phase: KeyPhase) -> &'static str {
    match phase {
        KeyPhase::Down => "down",
        KeyPhase::Up => "up",
        KeyPhase::FlagsChanged => "flags",
    }
}

/// One line per record: time, source, decision, then whatever changed
pub fn format_record(record: &ReplayRecord) -> String {
    let mut line = format!("{:>6}ms ", record.at.as_millis());
    match &record.source {
        Source::Timer => line.push_str("timer"),
        Source::Event { phase, code } => {
            let _ = write!(line, "{} {}", phase_label(*phase), key_label(*code));
        }
    }

    let output = &record.output;
    if record.source != Source::Timer {
        let _ = write!(line, " -> {}", decision_label(&output.decision));
    }
    match output.action {
        Action::None => {}
        Action::FireShortAction => line.push_str(" action=short"),
        Action::AllowSystemDefault => line.push_str(" action=system-default"),
    }
    if let Some(text) = &output.commit_text {
        let _ = write!(line, " commit={:?}", text);
    }
    if let Some(preedit) = &output.preedit {
        let _ = write!(line, " preedit={:?}@{}", preedit.text, preedit.cursor);
    }
    for timer in &output.timers {
        let _ = write!(line, " timer@{}ms", timer.deadline.as_millis());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use macime_core::{EngineConfig, SessionVariant};
    use pretty_assertions::assert_eq;

    fn half_layout() -> Session {
        let mut config = EngineConfig::default();
        config.variant = SessionVariant::HalfLayout;
        Session::create(&config).unwrap()
    }

    #[test]
    fn test_replay_hangul_script() {
        let script = parse_script("0 down G\n10 down K\n20 down S\n30 down SPACE\n40 down R\n50 down K").unwrap();
        let mut session = Session::create(&EngineConfig::default()).unwrap();
        let report = replay(&mut session, &script);

        assert_eq!(report.records.len(), 6);
        assert_eq!(report.records[3].output.commit_text, Some("한 ".to_string()));
        assert_eq!(report.flushed, "가");
    }

    #[test]
    fn test_timers_fire_between_lines() {
        let script = parse_script("0 down SPACE\n600 down SPACE\n700 up SPACE").unwrap();
        let mut session = half_layout();
        let report = replay(&mut session, &script);

        let sources: Vec<&Source> = report.records.iter().map(|r| &r.source).collect();
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[1], &Source::Timer);
        assert_eq!(report.records[1].at, Timestamp::from_millis(500));
        assert_eq!(report.records[2].output.decision, Decision::PassThrough);
        assert_eq!(report.records[3].output.decision, Decision::PassThrough);
    }

    #[test]
    fn test_tick_fires_long_press() {
        let script = parse_script("0 flags CAPSLOCK CAPS\n800 tick").unwrap();
        let mut session = half_layout();
        let report = replay(&mut session, &script);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[1].output.action, Action::AllowSystemDefault);
        assert_eq!(format_record(&report.records[1]), "   500ms timer action=system-default");
    }

    #[test]
    fn test_format_record() {
        let script = parse_script("0 down SPACE\n50 up SPACE").unwrap();
        let mut session = half_layout();
        let report = replay(&mut session, &script);

        assert_eq!(
            format_record(&report.records[0]),
            "     0ms down SPACE -> suppress timer@500ms"
        );
        assert_eq!(
            format_record(&report.records[1]),
            "    50ms up SPACE -> synthesize[SPACE:down]+pass"
        );
    }
}
