use alloc::vec;

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FloodReport {
    /// Hidden tiles the flood examined.
    pub visited: usize,
    /// Tiles the flood unhid.
    pub unhidden: usize,
}

/// Unhides every hidden tile reachable from `seed`.
///
/// Only hidden tiles carry the flood: it must start on a hidden tile, and hidden regions
/// separated by already shown tiles stay hidden. An out-of-bounds or already shown seed is a
/// no-op.
pub fn unhide_flood<G: GridAccessor>(grid: &mut G, seed: TileCoord) -> FloodReport {
    unhide_flood_with(grid, seed, |_| {})
}

/// [`unhide_flood`], calling `on_unhide` for each tile as it is unhidden.
pub fn unhide_flood_with<G, F>(grid: &mut G, seed: TileCoord, mut on_unhide: F) -> FloodReport
where
    G: GridAccessor,
    F: FnMut(TileCoord),
{
    let mut report = FloodReport::default();
    let mut stack = vec![(seed, false)];

    while let Some((current, from_below)) = stack.pop() {
        let Some(designation) = grid.designation(current) else {
            continue;
        };
        if !designation.is_hidden() {
            continue;
        }
        report.visited += 1;

        let Some(tile) = effective_tile(&*grid, current) else {
            continue;
        };
        let rule = Propagation::for_tile(tile, from_below);

        if rule.unhide {
            grid.set_designation(current, designation.difference(Designation::HIDDEN));
            report.unhidden += 1;
            on_unhide(current);
        }
        if rule.sides {
            stack.extend(current.horizontal_neighbors().map(|next| (next, false)));
        }
        if rule.above {
            stack.push((current.above(), true));
        }
        if rule.below {
            stack.push((current.below(), false));
        }
    }

    log::debug!(
        "Flood from {seed} visited {} tiles, unhid {}",
        report.visited,
        report.unhidden
    );
    report
}

/// Constructions and ice do not block vision, so the tile beneath them decides, except for
/// stairs leading down which must keep carrying the flood downward.
fn effective_tile<G: GridAccessor>(grid: &G, coords: TileCoord) -> Option<TileType> {
    let actual = grid.tile_type(coords, TileLayer::Actual)?;
    if actual.shape.is_descending_stair() {
        Some(actual)
    } else {
        grid.tile_type(coords, TileLayer::Base)
    }
}
