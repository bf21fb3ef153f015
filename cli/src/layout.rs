//! TOML world layouts for `revealer init`.
//!
//! Each `[[level]]` paints one z-level from glyph rows, row 0 being the northern edge. Tiles the
//! rows do not cover stay solid hidden stone. See `demos/fort.toml`.

use anyhow::{Context, Result, bail, ensure};
use revealer_core::memory::MemoryWorld;
use revealer_core::{
    BlockCoord, BlockFeatures, Coord, FeatureType, GridAccessor, HazardKind, MapSize,
    PauseControl, PlayMode, TileCoord, TileType,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Defaults to one above the highest painted level.
    pub levels: Option<u32>,
    #[serde(default)]
    pub mode: PlayMode,
    /// Whether the loaded game is a fortress, as opposed to a fortress-mode view of
    /// something else.
    #[serde(default = "fortress_game_default")]
    pub fortress_game: bool,
    #[serde(default)]
    pub graphics: bool,
    #[serde(default)]
    pub paused: bool,
    pub cursor: Option<[Coord; 3]>,
    pub selected_unit: Option<[Coord; 3]>,
    #[serde(default)]
    pub citizens: Vec<[Coord; 3]>,
    #[serde(default, rename = "level")]
    pub painted: Vec<Level>,
    #[serde(default, rename = "hazard")]
    pub hazards: Vec<HazardEntry>,
    #[serde(default, rename = "feature")]
    pub features: Vec<FeatureEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Level {
    pub z: Coord,
    pub rows: Vec<String>,
    /// Start with the painted tiles already unhidden.
    #[serde(default)]
    pub shown: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HazardEntry {
    pub kind: HazardKind,
    pub tiles: Vec<[Coord; 3]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureEntry {
    pub block: [Coord; 3],
    pub local: Option<FeatureType>,
    pub global: Option<FeatureType>,
    /// Make feature reads of this block fail.
    #[serde(default)]
    pub unreadable: bool,
}

fn fortress_game_default() -> bool {
    true
}

fn tile_at([x, y, z]: [Coord; 3]) -> TileCoord {
    TileCoord::new(x, y, z)
}

impl Layout {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid layout")
    }

    fn size(&self) -> Result<MapSize> {
        ensure!(!self.painted.is_empty(), "Layout has no levels");

        let mut width = 0;
        let mut height = 0;
        let mut top = 0;
        for level in &self.painted {
            ensure!(level.z >= 0, "Level {} is below the bottom of the map", level.z);
            top = top.max(level.z);
            height = height.max(level.rows.len());
            width = level
                .rows
                .iter()
                .map(|row| row.chars().count())
                .fold(width, usize::max);
        }
        ensure!(width > 0 && height > 0, "Layout levels are empty");

        let levels = self.levels.unwrap_or(top as u32 + 1);
        if levels <= top as u32 {
            bail!("Layout has {levels} levels but paints level {top}");
        }
        Ok(MapSize::covering_tiles(width, height, levels as usize))
    }

    pub fn build(&self) -> Result<MemoryWorld> {
        let size = self.size()?;
        let mut world = MemoryWorld::new(size);
        log::debug!("Building {size} world from layout");

        for level in &self.painted {
            for (y, row) in level.rows.iter().enumerate() {
                for (x, glyph) in row.chars().enumerate() {
                    let coords = TileCoord::new(x as Coord, y as Coord, level.z);
                    let tile = TileType::from_glyph(glyph)
                        .with_context(|| format!("Unknown glyph {glyph:?} at {coords}"))?;
                    world.set_tile(coords, tile);
                    if level.shown {
                        world.set_hidden(coords, false);
                    }
                }
            }
        }

        for hazard in &self.hazards {
            world.add_hazard(hazard.kind, hazard.tiles.iter().copied().map(tile_at));
        }

        for feature in &self.features {
            let [x, y, z] = feature.block;
            let block = BlockCoord::new(x, y, z);
            ensure!(world.has_block(block), "Feature block {block} is outside the map");
            let features = (!feature.unreadable)
                .then(|| BlockFeatures::new(feature.local, feature.global));
            world.set_block_features(block, features);
        }

        world.set_play_mode(self.mode);
        world.set_fortress_game(self.fortress_game);
        world.set_graphics_mode(self.graphics);
        world.set_paused(self.paused);
        world.set_cursor(self.cursor.map(tile_at));
        world.set_selected_unit(self.selected_unit.map(tile_at));
        for &citizen in &self.citizens {
            world.add_citizen(tile_at(citizen));
        }

        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revealer_core::{GameModeSource, TileLayer};

    #[test]
    fn demo_fort_builds() {
        let layout = Layout::parse(include_str!("../../demos/fort.toml")).unwrap();
        let world = layout.build().unwrap();

        assert_eq!(world.map_size(), MapSize::new(2, 1, 3));
        assert_eq!(
            world.tile_type(TileCoord::new(6, 6, 1), TileLayer::Base),
            TileType::from_glyph('>')
        );
        assert!(!world.is_hidden(TileCoord::new(3, 2, 2)));
        assert!(world.is_hidden(TileCoord::new(3, 2, 1)));
        assert_eq!(
            world.read_features(BlockCoord::new(1, 0, 0)),
            Ok(BlockFeatures::new(
                Some(FeatureType::Cave),
                Some(FeatureType::SubterraneanFromLayer)
            ))
        );
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        let layout = Layout::parse("[[level]]\nz = 0\nrows = [\"#.@\"]\n").unwrap();

        let err = layout.build().unwrap_err();

        assert_eq!(err.to_string(), "Unknown glyph '@' at (2, 0, 0)");
    }

    #[test]
    fn levels_must_cover_painted_levels() {
        let layout = Layout::parse("levels = 2\n[[level]]\nz = 2\nrows = [\"#\"]\n").unwrap();

        assert!(layout.build().is_err());
        assert!(Layout::parse("levels = 2\n").unwrap().build().is_err());
    }

    #[test]
    fn unreadable_features_and_modes() {
        let text = r#"
            mode = "adventure"
            fortress_game = false
            paused = true
            selected_unit = [1, 1, 0]

            [[level]]
            z = 0
            rows = ["..."]

            [[feature]]
            block = [0, 0, 0]
            unreadable = true
        "#;
        let world = Layout::parse(text).unwrap().build().unwrap();

        assert!(world.read_features(BlockCoord::new(0, 0, 0)).is_err());
        assert_eq!(world.play_mode(), PlayMode::Adventure);
        assert!(!world.is_fortress_mode());
        assert!(world.is_paused());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Layout::parse("colour = \"red\"\n").is_err());
    }
}
