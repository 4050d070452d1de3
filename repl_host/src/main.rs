//! # REPL Host
//!
//! Main entry point for the REPL host runtime.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use repl_host::{ConsoleConfig, HostMode, HostRuntime, HostRuntimeConfig};
use std::fs;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    /// Replay a key script
    Sim,
    /// Type each line read from standard input
    Lines,
}

impl From<ModeArg> for HostMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sim => HostMode::Sim,
            ModeArg::Lines => HostMode::Lines,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "repl_host", version, about = "Run the handheld REPL console on the host")]
struct Cli {
    /// Input source
    #[arg(short, long, value_enum, default_value_t = ModeArg::Sim)]
    mode: ModeArg,

    /// Key script to replay (sim mode)
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// JSON console configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum polls to run (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_steps: usize,

    /// Sleep between polls like the device does
    #[arg(long)]
    realtime: bool,

    /// Log filter (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the rendered frames
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let console = match &cli.config {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConsoleConfig::default(),
    };

    let script = match &cli.script {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?,
        ),
        None => None,
    };

    let config = HostRuntimeConfig {
        mode: cli.mode.into(),
        script,
        max_steps: cli.max_steps,
        realtime: cli.realtime,
        console,
    };

    let mut runtime = HostRuntime::new(config).context("starting host runtime")?;
    runtime.run().context("running host runtime")?;
    Ok(())
}
