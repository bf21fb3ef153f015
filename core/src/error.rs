use thiserror::Error;

use crate::{BlockCoord, MapSize};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealError {
    #[error("Map is not available")]
    MapUnavailable,
    #[error("Map is already revealed")]
    AlreadyRevealed,
    #[error("Map is not revealed, there is nothing to revert or forget")]
    NotRevealed,
    #[error("Only available in fortress mode")]
    WrongMode,
    #[error("The map is not of the same size: revealed at {recorded}, now {current}")]
    DimensionMismatch { recorded: MapSize, current: MapSize },
    #[error("Select a unit or place the cursor at some open space you want to be unhidden")]
    NoUsableSeed,
    #[error("Demon reveal is disabled")]
    DemonDisabled,
    #[error("Block {0} not found")]
    BlockNotFound(BlockCoord),
    #[error("Could not read features of block {0}")]
    FeatureRead(BlockCoord),
    #[error("World storage does not match declared size {0}")]
    InvalidWorldShape(MapSize),
}

impl RevealError {
    /// Whether the session was already in the state the operation would have left it in.
    pub const fn is_already_in_state(self) -> bool {
        matches!(self, Self::AlreadyRevealed | Self::NotRevealed)
    }
}

pub type Result<T> = core::result::Result<T, RevealError>;
