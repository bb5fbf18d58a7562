//! Headless Strategic 2048 runner (default binary).
//!
//! Reads one command per stdin line (`left`, `undo`, `select 3`, `home`, ...),
//! applies it to a session and writes one JSON line per command to stdout:
//!
//! ```text
//! {"events":[...],"snapshot":{...}}
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` to see them.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use strategic_2048::config::AppConfig;
use strategic_2048::core::{
    MemoryProgressStore, ProgressStore, Session, SessionEvent, SessionSnapshot, SessionState,
};
use strategic_2048::store::SqliteProgressStore;
use strategic_2048::types::{GameCommand, GameMode};

#[derive(Parser, Debug)]
#[command(name = "strategic-2048", about = "3x3 tile-sliding puzzle, driven over stdin")]
struct Args {
    /// Game mode: classic, adventure or swift
    #[arg(long, default_value = "classic", value_parser = parse_mode)]
    mode: GameMode,

    /// Level to start on (must be unlocked)
    #[arg(long)]
    level: Option<u32>,

    /// Fixed RNG seed
    #[arg(long)]
    seed: Option<u32>,

    /// SQLite progress database
    #[arg(long, conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long)]
    memory: bool,

    /// Config file (default: $STRATEGIC_2048_CONFIG or ~/.strategic-2048/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    GameMode::from_str(s).ok_or_else(|| format!("unknown mode '{s}' (classic, adventure, swift)"))
}

#[derive(Serialize)]
struct Frame<'a> {
    events: &'a [SessionEvent],
    snapshot: SessionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn open_store(args: &Args, config: &AppConfig) -> Box<dyn ProgressStore> {
    if args.memory {
        return Box::new(MemoryProgressStore::new());
    }
    match args.db.clone().or_else(|| config.database_path()) {
        Some(path) => Box::new(SqliteProgressStore::open_or_unavailable(path)),
        None => {
            tracing::warn!("No home directory; progress will not be saved");
            Box::new(MemoryProgressStore::new())
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref());
    let mut session_config = config.session_config();
    if args.seed.is_some() {
        session_config.seed = args.seed;
    }

    let store = open_store(&args, &config);
    let mut session = Session::new(args.mode, store, session_config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let start_level = match (args.mode, args.level) {
        (_, Some(level)) => Some(level),
        (GameMode::Classic, None) => Some(1),
        _ => None,
    };
    let events = match start_level {
        Some(level) => session.apply(GameCommand::SelectLevel(level)),
        None => Vec::new(),
    };
    write_frame(&mut out, &events, session.snapshot(), None)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read command from stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut events = session.poll();
        let error = match GameCommand::from_str(line) {
            Some(command) => {
                events.extend(session.apply(command));
                None
            }
            None => {
                tracing::debug!(line, "unrecognized command");
                Some(format!("unrecognized command '{line}'"))
            }
        };
        write_frame(&mut out, &events, session.snapshot(), error)?;

        if session.state() == SessionState::Exited {
            break;
        }
    }

    Ok(())
}

fn write_frame(
    out: &mut impl Write,
    events: &[SessionEvent],
    snapshot: SessionSnapshot,
    error: Option<String>,
) -> Result<()> {
    let frame = Frame {
        events,
        snapshot,
        error,
    };
    serde_json::to_writer(&mut *out, &frame).context("Failed to encode frame")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
