//! Capabilities the reveal core needs from the world that owns the map.

use crate::*;

/// Read and write access to the tile grid.
///
/// Tiles outside the map report `None`; writes to them are ignored.
pub trait GridAccessor {
    /// Whether a map is loaded and safe to touch.
    fn is_valid_map(&self) -> bool;

    fn map_size(&self) -> MapSize;

    /// Every block of the map, in no particular order.
    fn blocks(&self) -> impl Iterator<Item = BlockCoord> + '_;

    fn has_block(&self, block: BlockCoord) -> bool;

    fn read_hidden_flags(&self, block: BlockCoord) -> Result<BlockMask>;

    fn write_hidden_flags(&mut self, block: BlockCoord, mask: &BlockMask) -> Result<()>;

    /// Sets the adventure-mode visibility marker on every tile of `block`.
    fn mark_visible(&mut self, block: BlockCoord) -> Result<()>;

    fn designation(&self, coords: TileCoord) -> Option<Designation>;

    fn set_designation(&mut self, coords: TileCoord, designation: Designation);

    fn tile_type(&self, coords: TileCoord, layer: TileLayer) -> Option<TileType>;

    fn read_features(&self, block: BlockCoord) -> Result<BlockFeatures>;

    fn contains(&self, coords: TileCoord) -> bool {
        self.designation(coords).is_some()
    }
}

/// One instance of a hazardous structure and the tiles it occupies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HazardSite<'a> {
    pub kind: HazardKind,
    pub tiles: &'a [TileCoord],
}

pub trait HazardSource {
    fn hazards(&self) -> impl Iterator<Item = HazardSite<'_>> + '_;

    fn hazard_count(&self) -> usize {
        self.hazards().count()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Fortress,
    Adventure,
    Other,
}

pub trait GameModeSource {
    fn play_mode(&self) -> PlayMode;

    /// Whether the loaded game is a fortress-style game, independent of the current play mode.
    fn is_fortress_mode(&self) -> bool;

    /// Graphics tilesets do not draw revealed tiles that have no open neighbour.
    fn in_graphics_mode(&self) -> bool {
        false
    }
}

pub trait PauseControl {
    fn set_paused(&mut self, paused: bool);
}

/// Candidate positions for seeding a flood, queried in declaration order.
pub trait PositionResolver {
    fn cursor_position(&self) -> Option<TileCoord>;

    fn selected_unit_position(&self) -> Option<TileCoord>;

    fn first_citizen_position(&self) -> Option<TileCoord>;
}

/// Everything a [`RevealSession`] needs from its world.
pub trait Host: GridAccessor + HazardSource + GameModeSource + PauseControl + PositionResolver {}

impl<T> Host for T where
    T: GridAccessor + HazardSource + GameModeSource + PauseControl + PositionResolver
{
}
