use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for tile and block positions.
///
/// Signed so that neighbours of edge tiles can be expressed and then rejected as out of bounds.
pub type Coord = i32;

/// Tiles along one edge of a block.
pub const BLOCK_SIZE: usize = 16;

/// Shift converting a tile x/y coordinate into a block x/y coordinate.
pub const BLOCK_SHIFT: u32 = 4;

/// Hidden flags of one block, indexed `[x][y]` relative to the block origin.
pub type BlockMask = [[bool; BLOCK_SIZE]; BLOCK_SIZE];

/// Every tile of a block hidden.
pub const ALL_HIDDEN: BlockMask = [[true; BLOCK_SIZE]; BLOCK_SIZE];

/// Every tile of a block shown.
pub const ALL_SHOWN: BlockMask = [[false; BLOCK_SIZE]; BLOCK_SIZE];

/// Horizontal neighbour offsets, clockwise starting east (y grows southward).
const HORIZONTAL_DISPLACEMENTS: [(Coord, Coord); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Position of a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl TileCoord {
    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    /// Block containing this tile.
    pub const fn block(self) -> BlockCoord {
        BlockCoord::new(self.x >> BLOCK_SHIFT, self.y >> BLOCK_SHIFT, self.z)
    }

    /// Offset of this tile inside its block.
    pub const fn offset_in_block(self) -> (usize, usize) {
        let mask = (BLOCK_SIZE - 1) as Coord;
        ((self.x & mask) as usize, (self.y & mask) as usize)
    }

    pub const fn above(self) -> Self {
        Self::new(self.x, self.y, self.z + 1)
    }

    pub const fn below(self) -> Self {
        Self::new(self.x, self.y, self.z - 1)
    }

    pub const fn offset(self, dx: Coord, dy: Coord) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z)
    }

    /// The 8 tiles around this one on the same z-level, clockwise starting east.
    pub fn horizontal_neighbors(self) -> impl Iterator<Item = TileCoord> {
        HORIZONTAL_DISPLACEMENTS
            .into_iter()
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl From<(Coord, Coord, Coord)> for TileCoord {
    fn from((x, y, z): (Coord, Coord, Coord)) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Position of a 16x16 block on one z-level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCoord {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl BlockCoord {
    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    /// North-west tile of the block.
    pub const fn origin(self) -> TileCoord {
        TileCoord::new(self.x << BLOCK_SHIFT, self.y << BLOCK_SHIFT, self.z)
    }

    /// Tile at `(dx, dy)` inside the block.
    pub const fn tile(self, (dx, dy): (usize, usize)) -> TileCoord {
        self.origin().offset(dx as Coord, dy as Coord)
    }
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Map dimensions: x and y counted in blocks, z in levels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl MapSize {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Smallest size whose blocks cover `tiles` tiles horizontally.
    pub const fn covering_tiles(tiles_x: usize, tiles_y: usize, levels: usize) -> Self {
        Self::new(
            tiles_x.div_ceil(BLOCK_SIZE) as u32,
            tiles_y.div_ceil(BLOCK_SIZE) as u32,
            levels as u32,
        )
    }

    /// Extent in tiles, `(x, y, z)`.
    pub const fn tile_extent(self) -> (usize, usize, usize) {
        (
            self.x as usize * BLOCK_SIZE,
            self.y as usize * BLOCK_SIZE,
            self.z as usize,
        )
    }

    pub const fn block_count(self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }
}

impl fmt::Display for MapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Only meaningful for coordinates that were bounds-checked first.
impl ToNdIndex for TileCoord {
    type Output = [usize; 3];

    fn to_nd_index(self) -> Self::Output {
        [self.x as usize, self.y as usize, self.z as usize]
    }
}

impl ToNdIndex for BlockCoord {
    type Output = [usize; 3];

    fn to_nd_index(self) -> Self::Output {
        [self.x as usize, self.y as usize, self.z as usize]
    }
}
