use crate::*;

/// How a tile shape behaves for visibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeClass {
    /// Solid; seen but never seen through.
    Wall,
    /// Nothing in the way in any direction.
    Open,
    /// Seen from the side or from above; blocks the view downward.
    Floor,
    Other,
}

impl TileShape {
    pub const fn class(self) -> ShapeClass {
        use TileShape::*;

        match self {
            Wall => ShapeClass::Wall,
            None | Empty | RampTop | StairUpDown | StairDown | BrookTop => ShapeClass::Open,
            Fortification | StairUp | Ramp | Floor | Branch | TrunkBranch | Twig | Sapling
            | Shrub | Boulder | Pebbles | BrookBed | EndlessPit => ShapeClass::Floor,
            Unclassified => ShapeClass::Other,
        }
    }
}

/// What the flood does with one tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Propagation {
    pub unhide: bool,
    pub above: bool,
    pub below: bool,
    pub sides: bool,
}

impl Propagation {
    pub const NONE: Self = Self {
        unhide: false,
        above: false,
        below: false,
        sides: false,
    };

    /// Rule for a tile reached by the flood. `from_below` is set when the flood climbed into
    /// this tile from the level underneath.
    pub const fn for_tile(tile: TileType, from_below: bool) -> Self {
        let class = if tile.material.is_vegetation() {
            ShapeClass::Floor
        } else {
            tile.shape.class()
        };
        Self::for_class(class, from_below)
    }

    pub const fn for_class(class: ShapeClass, from_below: bool) -> Self {
        match class {
            ShapeClass::Wall => Self {
                unhide: !from_below,
                ..Self::NONE
            },
            ShapeClass::Open => Self {
                unhide: true,
                above: true,
                below: true,
                sides: true,
            },
            ShapeClass::Floor if from_below => Self::NONE,
            ShapeClass::Floor => Self {
                unhide: true,
                above: true,
                sides: true,
                below: false,
            },
            ShapeClass::Other => Self {
                unhide: true,
                ..Self::NONE
            },
        }
    }
}
