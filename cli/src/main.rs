use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use revealer_core::Coord;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::io;
use std::path::PathBuf;

use config::Config;
use state::State;

mod commands;
mod config;
mod layout;
mod state;

/// Bulk reveal and flood unhide for tile maps
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// World and session state, JSON
    #[arg(short, long, default_value = "revealer.json")]
    state: PathBuf,

    /// TOML file with a `[session]` table
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the state file from a TOML layout
    Init {
        layout: PathBuf,

        /// Replace an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Reveal the map, skipping blocks that could unleash something
    Reveal {
        /// `hell` also reveals hazardous blocks and pauses, `demon` does not pause
        variant: Option<RevealVariant>,
    },

    /// Revert a reveal
    Unreveal,

    /// Unreveal if revealed, reveal otherwise
    #[command(name = "revtoggle")]
    Toggle,

    /// Hide the whole map, then unhide what is reachable from a position
    #[command(name = "revflood")]
    Flood {
        /// Defaults to the cursor, the selected unit or the first citizen
        #[arg(requires_all = ["y", "z"])]
        x: Option<Coord>,
        y: Option<Coord>,
        z: Option<Coord>,
    },

    /// Keep the current reveal, dropping the data needed to revert it
    #[command(name = "revforget")]
    Forget,

    /// Keep the game from pausing (doesn't affect pause forced by reveal)
    Nopause {
        /// 1 to activate, 0 to deactivate
        #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
        on: Option<u8>,
    },

    /// Run one game tick
    Tick,

    /// Print session and world state
    Status,

    /// Draw one z-level, hidden tiles as `*`
    Show { z: Coord },
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum RevealVariant {
    Hell,
    Demon,
}

impl Command {
    const fn changes_state(&self) -> bool {
        !matches!(self, Self::Status | Self::Show { .. })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(log_level) = args.verbose.log_level() {
        TermLogger::init(
            log_level.to_level_filter(),
            simplelog::Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )
        .context("Error initializing logger")?;
    }

    let config = args.config.as_deref().map(Config::load).transpose()?;
    let mut out = io::stdout().lock();

    if let Command::Init { layout, force } = &args.command {
        return commands::init(layout, &args.state, *force, config, &mut out);
    }

    let mut state = State::load(&args.state)?;
    if let Some(config) = config {
        state.session.set_config(config.session);
    }
    commands::run(&args.command, &mut state, &mut out)?;
    if args.command.changes_state() {
        state.save(&args.state)?;
    }
    Ok(())
}
