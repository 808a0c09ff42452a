pub mod replay;
pub mod script;

pub use replay::{format_record, replay, ReplayRecord, ReplayReport, Source};
pub use script::{parse_script, Command, ScriptLine};

use std::fs::read_to_string;
use std::path::Path;

use anyhow::{Context, Result};
use macime_core::{EngineConfig, Session};

/// Load a config and a script from disk, then replay the script
pub fn replay_file(script_path: &Path, config_path: Option<&Path>) -> Result<ReplayReport> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut session = Session::create(&config).context("Invalid engine configuration")?;

    let text = read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let lines = parse_script(&text)?;

    Ok(replay(&mut session, &lines))
}
