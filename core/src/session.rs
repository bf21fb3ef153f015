use alloc::vec::Vec;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotRevealed -> Revealed
/// - NotRevealed -> SafeRevealed
/// - NotRevealed -> DemonRevealed
/// - any revealed state -> NotRevealed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    #[default]
    NotRevealed,
    /// Everything shown; the game is held paused.
    Revealed,
    /// Everything except hazardous blocks shown.
    SafeRevealed,
    /// Everything shown without holding the game paused.
    DemonRevealed,
}

impl RevealState {
    pub const fn is_revealed(self) -> bool {
        !matches!(self, Self::NotRevealed)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// Skip blocks that could expose the underworld or set off a trigger.
    #[default]
    Safe,
    /// Reveal every block and pause the game.
    Full,
    /// Reveal every block and leave the game running.
    Demon,
}

impl RevealMode {
    pub const fn skips_unsafe_blocks(self) -> bool {
        matches!(self, Self::Safe)
    }

    const fn target_state(self) -> RevealState {
        match self {
            Self::Safe => RevealState::SafeRevealed,
            Self::Full => RevealState::Revealed,
            Self::Demon => RevealState::DemonRevealed,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Allow [`RevealMode::Demon`]; unpausing a fully revealed map can unleash the underworld.
    pub allow_demon: bool,
    /// Mode used by [`RevealSession::toggle`].
    pub default_mode: RevealMode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevealReport {
    pub revealed_blocks: usize,
    pub skipped_blocks: usize,
    /// Whether [`RevealSession::unreveal`] can undo this reveal. Adventure mode reveals are
    /// permanent.
    pub restorable: bool,
    /// Whether the game was paused to hold back the underworld.
    pub paused: bool,
    /// Graphics tilesets will not draw revealed tiles without an open neighbour.
    pub graphics_mode: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Revealed(RevealReport),
    Unrevealed { restored_blocks: usize },
}

/// Bulk reveal bookkeeping for one map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RevealSession {
    config: SessionConfig,
    state: RevealState,
    /// Map size when the snapshot was taken.
    recorded_size: MapSize,
    #[serde(with = "snapshot_entries")]
    snapshot: HashMap<BlockCoord, BlockMask>,
    nopause: bool,
}

impl RevealSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state.is_revealed()
    }

    /// Number of blocks whose hidden flags are held for [`RevealSession::unreveal`].
    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    /// Shows the whole map, or in [`RevealMode::Safe`] everything but hazardous blocks.
    ///
    /// In fortress mode the prior hidden flags are saved for [`RevealSession::unreveal`]. In
    /// adventure mode hazardous blocks are always skipped and nothing is saved.
    pub fn reveal<H: Host>(&mut self, host: &mut H, mode: RevealMode) -> Result<RevealReport> {
        if mode == RevealMode::Demon && !self.config.allow_demon {
            return Err(RevealError::DemonDisabled);
        }
        if self.state.is_revealed() {
            return Err(RevealError::AlreadyRevealed);
        }
        if !host.is_valid_map() {
            return Err(RevealError::MapUnavailable);
        }

        let triggers = TriggerCache::build(&*host);

        match host.play_mode() {
            PlayMode::Fortress => {}
            PlayMode::Adventure => return reveal_adventure(host, &triggers),
            PlayMode::Other => return Err(RevealError::WrongMode),
        }

        let blocks: Vec<BlockCoord> = host.blocks().collect();
        let mut snapshot = HashMap::with_capacity(blocks.len());
        let mut skipped_blocks = 0;
        for block in blocks {
            if mode.skips_unsafe_blocks() && !is_safe(block, host.read_features(block), &triggers) {
                skipped_blocks += 1;
                continue;
            }
            snapshot.insert(block, host.read_hidden_flags(block)?);
        }

        // Committed before writing so a failed write can still be reverted.
        self.recorded_size = host.map_size();
        self.snapshot = snapshot;
        self.state = mode.target_state();

        for &block in self.snapshot.keys() {
            host.write_hidden_flags(block, &ALL_SHOWN)?;
        }

        let paused = self.state == RevealState::Revealed;
        if paused {
            host.set_paused(true);
        }

        log::info!(
            "Map revealed ({:?}): {} blocks shown, {} skipped",
            self.state,
            self.snapshot.len(),
            skipped_blocks
        );
        Ok(RevealReport {
            revealed_blocks: self.snapshot.len(),
            skipped_blocks,
            restorable: true,
            paused,
            graphics_mode: host.in_graphics_mode(),
        })
    }

    /// Restores the hidden flags saved by [`RevealSession::reveal`], returning the number of
    /// blocks written back.
    pub fn unreveal<H: Host>(&mut self, host: &mut H) -> Result<usize> {
        if !self.state.is_revealed() {
            return Err(RevealError::NotRevealed);
        }
        if !host.is_valid_map() {
            return Err(RevealError::MapUnavailable);
        }
        if host.play_mode() != PlayMode::Fortress {
            return Err(RevealError::WrongMode);
        }

        let current = host.map_size();
        if current != self.recorded_size {
            log::warn!(
                "Refusing to unreveal: map was {} when revealed, is {} now",
                self.recorded_size,
                current
            );
            return Err(RevealError::DimensionMismatch {
                recorded: self.recorded_size,
                current,
            });
        }
        if let Some(&missing) = self.snapshot.keys().find(|&&block| !host.has_block(block)) {
            log::warn!("Refusing to unreveal: block {missing} is gone");
            return Err(RevealError::BlockNotFound(missing));
        }

        for (&block, mask) in &self.snapshot {
            host.write_hidden_flags(block, mask)?;
        }

        let restored_blocks = self.snapshot.len();
        self.reset();
        log::info!("Map hidden again, {restored_blocks} blocks restored");
        Ok(restored_blocks)
    }

    /// Drops the saved hidden flags without restoring them, returning how many blocks were held.
    pub fn forget(&mut self) -> Result<usize> {
        if !self.state.is_revealed() {
            return Err(RevealError::NotRevealed);
        }

        let forgotten = self.snapshot.len();
        self.reset();
        log::info!("Reveal data for {forgotten} blocks forgotten");
        Ok(forgotten)
    }

    /// Unreveals a revealed map, reveals an unrevealed one with the configured default mode.
    pub fn toggle<H: Host>(&mut self, host: &mut H) -> Result<ToggleOutcome> {
        if self.state.is_revealed() {
            self.unreveal(host)
                .map(|restored_blocks| ToggleOutcome::Unrevealed { restored_blocks })
        } else {
            self.reveal(host, self.config.default_mode)
                .map(ToggleOutcome::Revealed)
        }
    }

    pub fn nopause(&self) -> bool {
        self.nopause
    }

    /// Keeps the game running from [`RevealSession::on_update`]. Does not lift the pause held
    /// by [`RevealState::Revealed`].
    pub fn set_nopause(&mut self, nopause: bool) {
        self.nopause = nopause;
    }

    /// Whether [`RevealSession::on_update`] has anything to do.
    pub fn is_active(&self) -> bool {
        self.nopause || self.state == RevealState::Revealed
    }

    /// Per-tick hook: holds a fully revealed fortress paused, or keeps it unpaused under
    /// nopause.
    pub fn on_update<H: GameModeSource + PauseControl>(&self, host: &mut H) {
        if host.play_mode() != PlayMode::Fortress {
            return;
        }
        if self.state == RevealState::Revealed {
            host.set_paused(true);
        } else if self.nopause {
            host.set_paused(false);
        }
    }

    fn reset(&mut self) {
        self.snapshot = HashMap::new();
        self.recorded_size = MapSize::default();
        self.state = RevealState::NotRevealed;
    }
}

fn reveal_adventure<H: Host>(host: &mut H, triggers: &TriggerCache) -> Result<RevealReport> {
    let mut blocks = Vec::new();
    let mut skipped_blocks = 0;
    for block in host.blocks() {
        if is_safe(block, host.read_features(block), triggers) {
            blocks.push(block);
        } else {
            skipped_blocks += 1;
        }
    }

    for &block in &blocks {
        host.write_hidden_flags(block, &ALL_SHOWN)?;
        host.mark_visible(block)?;
    }

    log::info!(
        "Local map revealed: {} blocks shown, {} skipped",
        blocks.len(),
        skipped_blocks
    );
    Ok(RevealReport {
        revealed_blocks: blocks.len(),
        skipped_blocks,
        restorable: false,
        paused: false,
        graphics_mode: host.in_graphics_mode(),
    })
}

/// Stores the snapshot as a list, block coordinates are not valid map keys in every format.
mod snapshot_entries {
    use alloc::vec::Vec;
    use core::result::Result;
    use hashbrown::HashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::{BlockCoord, BlockMask};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        block: BlockCoord,
        mask: BlockMask,
    }

    pub fn serialize<S: Serializer>(
        snapshot: &HashMap<BlockCoord, BlockMask>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            snapshot
                .iter()
                .map(|(&block, &mask)| Entry { block, mask }),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<BlockCoord, BlockMask>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.block, entry.mask))
            .collect())
    }
}
