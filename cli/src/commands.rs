use anyhow::{Context, Result, bail, ensure};
use revealer_core::{
    GridAccessor, RevealMode, RevealReport, RevealSession, TileCoord, ToggleOutcome,
};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::Config;
use crate::layout::Layout;
use crate::state::State;
use crate::{Command, RevealVariant};

const GRAPHICS_NOTE: &str = "\
Note that in graphics mode, tiles that are not adjacent to open
space will not render but can still be examined by hovering over
them with the mouse. Switching to text mode (in the game settings)
will allow the display of the revealed tiles.
";

pub fn init<W: Write>(
    layout: &Path,
    state_path: &Path,
    force: bool,
    config: Option<Config>,
    out: &mut W,
) -> Result<()> {
    ensure!(
        force || !state_path.exists(),
        "{} already exists, pass --force to replace it",
        state_path.display()
    );
    let text = fs::read_to_string(layout)
        .with_context(|| format!("Could not read layout {}", layout.display()))?;
    let world = Layout::parse(&text)?.build()?;
    let size = world.map_size();
    let session = RevealSession::new(config.unwrap_or_default().session);

    State { world, session }.save(state_path)?;
    writeln!(out, "Created {} holding a {size} map.", state_path.display())?;
    Ok(())
}

pub fn run<W: Write>(command: &Command, state: &mut State, out: &mut W) -> Result<()> {
    let State { world, session } = state;

    match *command {
        Command::Init { .. } => bail!("`init` creates a new state file"),
        Command::Reveal { variant } => {
            let mode = match variant {
                None => RevealMode::Safe,
                Some(RevealVariant::Hell) => RevealMode::Full,
                Some(RevealVariant::Demon) => RevealMode::Demon,
            };
            let report = session.reveal(world, mode)?;
            print_reveal(out, &report)?;
        }
        Command::Unreveal => {
            session.unreveal(world)?;
            writeln!(out, "Map hidden!")?;
        }
        Command::Toggle => match session.toggle(world)? {
            ToggleOutcome::Revealed(report) => print_reveal(out, &report)?,
            ToggleOutcome::Unrevealed { .. } => writeln!(out, "Map hidden!")?,
        },
        Command::Flood { x, y, z } => {
            let report = match (x, y, z) {
                (Some(x), Some(y), Some(z)) => {
                    session.reveal_flood_from(world, TileCoord::new(x, y, z))?
                }
                _ => session.reveal_flood(world)?,
            };
            writeln!(out, "Map hidden, {} tiles unhidden around the seed.", report.unhidden)?;
        }
        Command::Forget => {
            session.forget()?;
            writeln!(out, "Reveal data forgotten!")?;
        }
        Command::Nopause { on: Some(on) } => {
            session.set_nopause(on == 1);
            writeln!(out, "nopause {}activated.", if on == 1 { "" } else { "de" })?;
        }
        Command::Nopause { on: None } => {
            writeln!(out, "Disable pausing (doesn't affect pause forced by reveal).")?;
            writeln!(out, "Activate with 'nopause 1', deactivate with 'nopause 0'.")?;
            writeln!(out, "Current state: {}.", u8::from(session.nopause()))?;
        }
        Command::Tick => {
            if session.is_active() {
                session.on_update(world);
            }
            let status = if world.is_paused() { "paused" } else { "running" };
            writeln!(out, "Game {status}.")?;
        }
        Command::Status => {
            writeln!(out, "Reveal state: {:?}", session.state())?;
            writeln!(out, "Saved blocks: {}", session.snapshot_len())?;
            writeln!(out, "nopause: {}", u8::from(session.nopause()))?;
            writeln!(out, "Default mode: {:?}", session.config().default_mode)?;
            writeln!(out, "Map: {} blocks", world.map_size())?;
            writeln!(out, "Hidden tiles: {}", world.hidden_count())?;
            writeln!(out, "Paused: {}", world.is_paused())?;
        }
        Command::Show { z } => {
            ensure!(
                world.contains(TileCoord::new(0, 0, z)),
                "Level {z} is outside the map"
            );
            write!(out, "{}", world.render_layer(z))?;
        }
    }
    Ok(())
}

fn print_reveal<W: Write>(out: &mut W, report: &RevealReport) -> io::Result<()> {
    if !report.restorable {
        return writeln!(out, "Local map revealed.");
    }

    writeln!(out, "Map revealed.")?;
    if report.skipped_blocks > 0 {
        writeln!(
            out,
            "{} blocks left hidden, revealing them could set something loose.",
            report.skipped_blocks
        )?;
    }
    writeln!(out)?;
    if report.graphics_mode {
        writeln!(out, "{GRAPHICS_NOTE}")?;
    }
    if report.paused {
        writeln!(
            out,
            "Unpausing can unleash the forces of hell, so it has been temporarily disabled.\n"
        )?;
    }
    writeln!(out, "Run 'unreveal' to revert to previous state.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use revealer_core::{GameModeSource, PlayMode, RevealError, RevealState};

    fn fort() -> State {
        let layout = Layout::parse(include_str!("../../demos/fort.toml")).unwrap();
        State {
            world: layout.build().unwrap(),
            session: RevealSession::default(),
        }
    }

    fn exec(state: &mut State, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(&command, state, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn safe_reveal_reports_skipped_blocks() {
        let mut state = fort();

        let out = exec(&mut state, Command::Reveal { variant: None }).unwrap();

        assert!(out.starts_with("Map revealed.\n1 blocks left hidden"));
        assert!(out.ends_with("Run 'unreveal' to revert to previous state.\n"));
        assert!(!out.contains("forces of hell"));
        assert_eq!(state.session.state(), RevealState::SafeRevealed);
    }

    #[test]
    fn graphics_mode_adds_the_rendering_note() {
        let mut state = fort();
        let plain = exec(&mut state, Command::Reveal { variant: None }).unwrap();
        assert!(!plain.contains("Note that in graphics mode"));
        exec(&mut state, Command::Unreveal).unwrap();

        state.world.set_graphics_mode(true);
        let out = exec(&mut state, Command::Reveal { variant: None }).unwrap();

        assert!(out.contains(GRAPHICS_NOTE));
        assert!(out.ends_with("Run 'unreveal' to revert to previous state.\n"));
    }

    #[test]
    fn hell_reveal_pauses_until_unrevealed() {
        let mut state = fort();
        exec(&mut state, Command::Nopause { on: Some(1) }).unwrap();

        let out = exec(&mut state, Command::Reveal { variant: Some(RevealVariant::Hell) }).unwrap();
        assert!(out.contains("forces of hell"));
        assert_eq!(exec(&mut state, Command::Tick).unwrap(), "Game paused.\n");

        assert_eq!(exec(&mut state, Command::Unreveal).unwrap(), "Map hidden!\n");
        assert_eq!(exec(&mut state, Command::Tick).unwrap(), "Game running.\n");
    }

    #[test]
    fn demon_needs_the_config_switch() {
        let mut state = fort();
        let demon = || Command::Reveal { variant: Some(RevealVariant::Demon) };

        let err = exec(&mut state, demon()).unwrap_err();
        assert_eq!(err.downcast_ref::<RevealError>(), Some(&RevealError::DemonDisabled));

        state.session.set_config(
            Config::parse("[session]\nallow_demon = true\n").unwrap().session,
        );
        exec(&mut state, demon()).unwrap();
        assert_eq!(state.session.state(), RevealState::DemonRevealed);
    }

    #[test]
    fn flood_from_explicit_position() {
        let mut state = fort();

        let err = exec(&mut state, Command::Flood { x: Some(0), y: Some(0), z: Some(2) })
            .unwrap_err();
        assert_eq!(err.downcast_ref::<RevealError>(), Some(&RevealError::NoUsableSeed));

        let out = exec(&mut state, Command::Flood { x: Some(9), y: Some(2), z: Some(0) }).unwrap();
        assert!(out.starts_with("Map hidden, "));
        assert!(!state.world.is_hidden(TileCoord::new(9, 2, 0)));
        // up the corridor stairs and through the cellar to the hall
        assert!(!state.world.is_hidden(TileCoord::new(3, 2, 2)));
        assert!(state.world.is_hidden(TileCoord::new(9, 2, 1)));
    }

    #[test]
    fn flood_from_cursor_reaches_the_cave() {
        let mut state = fort();

        exec(&mut state, Command::Flood { x: None, y: None, z: None }).unwrap();

        assert!(!state.world.is_hidden(TileCoord::new(6, 5, 1)));
        assert!(!state.world.is_hidden(TileCoord::new(20, 4, 0)));
        assert!(state.world.is_hidden(TileCoord::new(9, 2, 1)));
    }

    #[test]
    fn toggle_forget_and_nopause_help() {
        let mut state = fort();

        exec(&mut state, Command::Toggle).unwrap();
        assert_eq!(exec(&mut state, Command::Forget).unwrap(), "Reveal data forgotten!\n");
        let err = exec(&mut state, Command::Unreveal).unwrap_err();
        assert_eq!(err.to_string(), RevealError::NotRevealed.to_string());

        let help = exec(&mut state, Command::Nopause { on: None }).unwrap();
        assert!(help.ends_with("Current state: 0.\n"));
    }

    #[test]
    fn adventure_reveal_is_local() {
        let mut state = fort();
        state.world.set_play_mode(PlayMode::Adventure);

        let out = exec(&mut state, Command::Toggle).unwrap();

        assert_eq!(out, "Local map revealed.\n");
        assert_eq!(state.world.play_mode(), PlayMode::Adventure);
        assert_eq!(state.session.state(), RevealState::NotRevealed);
    }

    #[test]
    fn show_and_status() {
        let mut state = fort();

        let level = exec(&mut state, Command::Show { z: 2 }).unwrap();
        assert!(level.starts_with("############****"));
        assert!(exec(&mut state, Command::Show { z: 3 }).is_err());

        let status = exec(&mut state, Command::Status).unwrap();
        assert!(status.starts_with("Reveal state: NotRevealed\n"));
        assert!(status.contains("Map: 2x1x3 blocks\n"));
    }
}
