use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Per-tile designation flags.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Designation: u8 {
        /// Not yet shown to the player.
        const HIDDEN = 1 << 0;
        /// Visibility marker used by adventure mode.
        const PILE = 1 << 1;
    }
}

impl Designation {
    pub const fn is_hidden(self) -> bool {
        self.contains(Self::HIDDEN)
    }
}

impl Default for Designation {
    fn default() -> Self {
        Self::HIDDEN
    }
}

/// Geometry of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileShape {
    None,
    Empty,
    Floor,
    Boulder,
    Pebbles,
    Wall,
    Fortification,
    StairUp,
    StairDown,
    StairUpDown,
    Ramp,
    RampTop,
    BrookBed,
    BrookTop,
    Branch,
    TrunkBranch,
    Twig,
    Sapling,
    Shrub,
    EndlessPit,
    /// Host shape with no known geometry.
    Unclassified,
}

impl TileShape {
    /// Stairs that lead down keep their shape even under a construction.
    pub const fn is_descending_stair(self) -> bool {
        matches!(self, Self::StairDown | Self::StairUpDown)
    }
}

/// Base material class of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileMaterial {
    Air,
    #[default]
    Stone,
    Soil,
    Mineral,
    Plant,
    Mushroom,
    Construction,
    FrozenLiquid,
    Other,
}

impl TileMaterial {
    /// Trees and giant mushrooms are seen through like floors.
    pub const fn is_vegetation(self) -> bool {
        matches!(self, Self::Plant | Self::Mushroom)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileType {
    pub shape: TileShape,
    pub material: TileMaterial,
}

impl TileType {
    pub const OPEN_AIR: Self = Self::new(TileShape::Empty, TileMaterial::Air);
    pub const STONE_WALL: Self = Self::new(TileShape::Wall, TileMaterial::Stone);
    pub const STONE_FLOOR: Self = Self::new(TileShape::Floor, TileMaterial::Stone);

    pub const fn new(shape: TileShape, material: TileMaterial) -> Self {
        Self { shape, material }
    }

    pub const fn is_wall(self) -> bool {
        matches!(self.shape, TileShape::Wall)
    }

    /// Parses the single-character notation used by map layouts.
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        use TileMaterial::*;
        use TileShape::*;

        let tile = match glyph {
            '#' => Self::STONE_WALL,
            '.' => Self::STONE_FLOOR,
            ' ' | '_' => Self::OPEN_AIR,
            '<' => Self::new(StairUp, Stone),
            '>' => Self::new(StairDown, Stone),
            'X' => Self::new(StairUpDown, Stone),
            '^' => Self::new(Ramp, Stone),
            'v' => Self::new(RampTop, Air),
            '+' => Self::new(Fortification, Stone),
            'T' => Self::new(Wall, Plant),
            'M' => Self::new(Wall, Mushroom),
            '"' => Self::new(Shrub, Plant),
            ',' => Self::new(Pebbles, Stone),
            'o' => Self::new(Boulder, Stone),
            '=' => Self::new(BrookBed, Stone),
            '~' => Self::new(BrookTop, Air),
            '%' => Self::new(EndlessPit, Air),
            '?' => Self::new(Unclassified, Other),
            _ => return Option::None,
        };
        Some(tile)
    }

    /// Inverse of [`TileType::from_glyph`]; tiles without a glyph render as `'?'`.
    pub const fn glyph(self) -> char {
        use TileMaterial::*;
        use TileShape::*;

        match (self.shape, self.material) {
            (Wall, Plant) => 'T',
            (Wall, Mushroom) => 'M',
            (Wall, _) => '#',
            (Floor, _) => '.',
            (None | Empty, _) => ' ',
            (StairUp, _) => '<',
            (StairDown, _) => '>',
            (StairUpDown, _) => 'X',
            (Ramp, _) => '^',
            (RampTop, _) => 'v',
            (Fortification, _) => '+',
            (Shrub, _) => '"',
            (Pebbles, _) => ',',
            (Boulder, _) => 'o',
            (BrookBed, _) => '=',
            (BrookTop, _) => '~',
            (EndlessPit, _) => '%',
            _ => '?',
        }
    }
}

/// Which tile type to read where a construction or ice covers the ground.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileLayer {
    /// The tile beneath any construction or ice.
    Base,
    /// The tile as it currently stands, overlay included.
    Actual,
}

/// Map feature attached to a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    OutdoorRiver,
    Cave,
    Pit,
    MagmaPool,
    Volcano,
    DeepSpecialTube,
    DeepSurfacePortal,
    SubterraneanFromLayer,
    MagmaCoreFromLayer,
    UnderworldFromLayer,
}

impl FeatureType {
    /// Local features that lead into the underworld.
    pub const fn leads_to_underworld(self) -> bool {
        matches!(self, Self::DeepSpecialTube | Self::DeepSurfacePortal)
    }

    pub const fn is_underworld(self) -> bool {
        matches!(self, Self::UnderworldFromLayer)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFeatures {
    pub local: Option<FeatureType>,
    pub global: Option<FeatureType>,
}

impl BlockFeatures {
    pub const fn new(local: Option<FeatureType>, global: Option<FeatureType>) -> Self {
        Self { local, global }
    }
}

/// Kinds of structure whose blocks must never be bulk revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    EncasedHorror,
    DeepVeinHollow,
    DivineTreasure,
}
