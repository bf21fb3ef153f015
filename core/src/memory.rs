//! In-memory world implementing every host capability, used by the CLI, tests and benches.

use alloc::string::String;
use alloc::vec::Vec;
use ndarray::{Array3, s};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub tiles: Vec<TileCoord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryWorld {
    size: MapSize,
    loaded: bool,
    designations: Array3<Designation>,
    base: Array3<TileType>,
    overlay: Array3<Option<TileType>>,
    /// Indexed by block; `None` fails the feature read.
    features: Array3<Option<BlockFeatures>>,
    hazards: Vec<Hazard>,
    play_mode: PlayMode,
    fortress_game: bool,
    graphics: bool,
    paused: bool,
    cursor: Option<TileCoord>,
    selected_unit: Option<TileCoord>,
    citizens: Vec<TileCoord>,
}

impl MemoryWorld {
    /// Solid hidden stone, loaded in fortress mode.
    pub fn new(size: MapSize) -> Self {
        let tiles = size.tile_extent();
        let blocks = (size.x as usize, size.y as usize, size.z as usize);
        Self {
            size,
            loaded: true,
            designations: Array3::from_elem(tiles, Designation::HIDDEN),
            base: Array3::from_elem(tiles, TileType::STONE_WALL),
            overlay: Array3::from_elem(tiles, None),
            features: Array3::from_elem(blocks, Some(BlockFeatures::default())),
            hazards: Vec::new(),
            play_mode: PlayMode::Fortress,
            fortress_game: true,
            graphics: false,
            paused: false,
            cursor: None,
            selected_unit: None,
            citizens: Vec::new(),
        }
    }

    /// Checks that every array matches the declared size, as a deserialized world may not.
    pub fn validate(&self) -> Result<()> {
        let tiles = self.size.tile_extent();
        let blocks = (self.size.x as usize, self.size.y as usize, self.size.z as usize);
        let consistent = self.designations.dim() == tiles
            && self.base.dim() == tiles
            && self.overlay.dim() == tiles
            && self.features.dim() == blocks;
        if !consistent {
            return Err(RevealError::InvalidWorldShape(self.size));
        }
        Ok(())
    }

    fn tile_index(&self, coords: TileCoord) -> Option<[usize; 3]> {
        let (x, y, z) = self.size.tile_extent();
        (in_range(coords.x, x) && in_range(coords.y, y) && in_range(coords.z, z))
            .then(|| coords.to_nd_index())
    }

    fn block_index(&self, block: BlockCoord) -> Option<[usize; 3]> {
        let MapSize { x, y, z } = self.size;
        let inside = in_range(block.x, x as usize)
            && in_range(block.y, y as usize)
            && in_range(block.z, z as usize);
        inside.then(|| block.to_nd_index())
    }

    /// Tile offset of the block's north-west corner, plus its level.
    fn block_region(&self, block: BlockCoord) -> Result<(usize, usize, usize)> {
        self.block_index(block)
            .map(|[x, y, z]| (x * BLOCK_SIZE, y * BLOCK_SIZE, z))
            .ok_or(RevealError::BlockNotFound(block))
    }

    /// Every tile of the map.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.designations
            .indexed_iter()
            .map(|((x, y, z), _)| TileCoord::new(x as Coord, y as Coord, z as Coord))
    }

    pub fn is_hidden(&self, coords: TileCoord) -> bool {
        self.designation(coords).is_some_and(Designation::is_hidden)
    }

    pub fn set_hidden(&mut self, coords: TileCoord, hidden: bool) {
        if let Some(index) = self.tile_index(coords) {
            self.designations[index].set(Designation::HIDDEN, hidden);
        }
    }

    /// Hidden flag of every tile, indexed `[x, y, z]`.
    pub fn hidden_tiles(&self) -> Array3<bool> {
        self.designations.map(|designation| designation.is_hidden())
    }

    pub fn hidden_count(&self) -> usize {
        self.designations.iter().filter(|d| d.is_hidden()).count()
    }

    /// Sets the tile beneath any overlay.
    pub fn set_tile(&mut self, coords: TileCoord, tile: TileType) {
        if let Some(index) = self.tile_index(coords) {
            self.base[index] = tile;
        }
    }

    /// Places or removes a construction or ice on top of the base tile.
    pub fn set_overlay(&mut self, coords: TileCoord, overlay: Option<TileType>) {
        if let Some(index) = self.tile_index(coords) {
            self.overlay[index] = overlay;
        }
    }

    /// Sets the base tile of every tile in the box spanned by `from` and `to`, inclusive.
    pub fn fill(&mut self, from: TileCoord, to: TileCoord, tile: TileType) {
        for z in from.z.min(to.z)..=from.z.max(to.z) {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                for x in from.x.min(to.x)..=from.x.max(to.x) {
                    self.set_tile(TileCoord::new(x, y, z), tile);
                }
            }
        }
    }

    /// Paints level `z` from glyph rows (see [`TileType::from_glyph`]), row 0 being the
    /// northern edge. Unknown glyphs leave their tile untouched.
    pub fn paint_layer<'a>(&mut self, z: Coord, rows: impl IntoIterator<Item = &'a str>) {
        for (y, row) in rows.into_iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                if let Some(tile) = TileType::from_glyph(glyph) {
                    self.set_tile(TileCoord::new(x as Coord, y as Coord, z), tile);
                }
            }
        }
    }

    /// Draws level `z` using layout glyphs, hidden tiles drawn as `*`.
    pub fn render_layer(&self, z: Coord) -> String {
        let (width, height, _) = self.size.tile_extent();
        let mut out = String::with_capacity((width + 1) * height);
        for y in 0..height {
            for x in 0..width {
                let coords = TileCoord::new(x as Coord, y as Coord, z);
                let glyph = match self.tile_type(coords, TileLayer::Actual) {
                    Some(_) if self.is_hidden(coords) => '*',
                    Some(tile) => tile.glyph(),
                    None => continue,
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }

    pub fn set_block_features(&mut self, block: BlockCoord, features: Option<BlockFeatures>) {
        if let Some(index) = self.block_index(block) {
            self.features[index] = features;
        }
    }

    pub fn add_hazard(&mut self, kind: HazardKind, tiles: impl IntoIterator<Item = TileCoord>) {
        self.hazards.push(Hazard {
            kind,
            tiles: tiles.into_iter().collect(),
        });
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    pub fn set_play_mode(&mut self, play_mode: PlayMode) {
        self.play_mode = play_mode;
    }

    pub fn set_fortress_game(&mut self, fortress_game: bool) {
        self.fortress_game = fortress_game;
    }

    pub fn set_graphics_mode(&mut self, graphics: bool) {
        self.graphics = graphics;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_cursor(&mut self, cursor: Option<TileCoord>) {
        self.cursor = cursor;
    }

    pub fn set_selected_unit(&mut self, position: Option<TileCoord>) {
        self.selected_unit = position;
    }

    pub fn add_citizen(&mut self, position: TileCoord) {
        self.citizens.push(position);
    }
}

fn in_range(value: Coord, len: usize) -> bool {
    usize::try_from(value).is_ok_and(|value| value < len)
}

impl GridAccessor for MemoryWorld {
    fn is_valid_map(&self) -> bool {
        self.loaded
    }

    fn map_size(&self) -> MapSize {
        self.size
    }

    fn blocks(&self) -> impl Iterator<Item = BlockCoord> + '_ {
        let MapSize { x, y, z } = self.size;
        (0..z).flat_map(move |bz| {
            (0..y).flat_map(move |by| {
                (0..x).map(move |bx| BlockCoord::new(bx as Coord, by as Coord, bz as Coord))
            })
        })
    }

    fn has_block(&self, block: BlockCoord) -> bool {
        self.block_index(block).is_some()
    }

    fn read_hidden_flags(&self, block: BlockCoord) -> Result<BlockMask> {
        let (x, y, z) = self.block_region(block)?;
        let mut mask = ALL_SHOWN;
        let region = self
            .designations
            .slice(s![x..x + BLOCK_SIZE, y..y + BLOCK_SIZE, z]);
        for ((dx, dy), designation) in region.indexed_iter() {
            mask[dx][dy] = designation.is_hidden();
        }
        Ok(mask)
    }

    fn write_hidden_flags(&mut self, block: BlockCoord, mask: &BlockMask) -> Result<()> {
        let (x, y, z) = self.block_region(block)?;
        let mut region = self
            .designations
            .slice_mut(s![x..x + BLOCK_SIZE, y..y + BLOCK_SIZE, z]);
        for ((dx, dy), designation) in region.indexed_iter_mut() {
            designation.set(Designation::HIDDEN, mask[dx][dy]);
        }
        Ok(())
    }

    fn mark_visible(&mut self, block: BlockCoord) -> Result<()> {
        let (x, y, z) = self.block_region(block)?;
        self.designations
            .slice_mut(s![x..x + BLOCK_SIZE, y..y + BLOCK_SIZE, z])
            .map_inplace(|designation| designation.insert(Designation::PILE));
        Ok(())
    }

    fn designation(&self, coords: TileCoord) -> Option<Designation> {
        self.tile_index(coords).map(|index| self.designations[index])
    }

    fn set_designation(&mut self, coords: TileCoord, designation: Designation) {
        if let Some(index) = self.tile_index(coords) {
            self.designations[index] = designation;
        }
    }

    fn tile_type(&self, coords: TileCoord, layer: TileLayer) -> Option<TileType> {
        let index = self.tile_index(coords)?;
        let base = self.base[index];
        Some(match layer {
            TileLayer::Base => base,
            TileLayer::Actual => self.overlay[index].unwrap_or(base),
        })
    }

    fn read_features(&self, block: BlockCoord) -> Result<BlockFeatures> {
        self.block_index(block)
            .and_then(|index| self.features[index])
            .ok_or(RevealError::FeatureRead(block))
    }
}

impl HazardSource for MemoryWorld {
    fn hazards(&self) -> impl Iterator<Item = HazardSite<'_>> + '_ {
        self.hazards.iter().map(|hazard| HazardSite {
            kind: hazard.kind,
            tiles: &hazard.tiles,
        })
    }

    fn hazard_count(&self) -> usize {
        self.hazards.len()
    }
}

impl GameModeSource for MemoryWorld {
    fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    fn is_fortress_mode(&self) -> bool {
        self.fortress_game
    }

    fn in_graphics_mode(&self) -> bool {
        self.graphics
    }
}

impl PauseControl for MemoryWorld {
    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

impl PositionResolver for MemoryWorld {
    fn cursor_position(&self) -> Option<TileCoord> {
        self.cursor
    }

    fn selected_unit_position(&self) -> Option<TileCoord> {
        self.selected_unit
    }

    fn first_citizen_position(&self) -> Option<TileCoord> {
        self.citizens.first().copied()
    }
}
