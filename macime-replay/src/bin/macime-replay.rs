use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use macime_replay::{format_record, replay_file};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a key event script through a macime session", long_about = None)]
struct Args {
    /// Script file, one event per line
    script: PathBuf,

    /// Engine config (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    Builder::new()
        .format(|buf, record| {
            writeln!(buf, "[{}] {} - {}", record.level(), record.target(), record.args())
        })
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let report = replay_file(&args.script, args.config.as_deref())?;

    for record in &report.records {
        println!("{}", format_record(record));
    }
    if !report.flushed.is_empty() {
        println!("flush commit={:?}", report.flushed);
    }

    Ok(())
}
