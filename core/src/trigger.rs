use hashbrown::HashSet;

use crate::*;

/// Blocks overlapping structures whose discovery sets off an irreversible event.
///
/// Rebuilt on every bulk reveal, the hazard lists can change between calls.
#[derive(Clone, Debug, Default)]
pub struct TriggerCache {
    blocks: HashSet<BlockCoord>,
}

impl TriggerCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: HashSet::with_capacity(capacity),
        }
    }

    pub fn build<S: HazardSource>(source: &S) -> Self {
        let mut cache = Self::with_capacity(2 * source.hazard_count());
        for site in source.hazards() {
            cache.insert_tiles(site.tiles);
        }
        log::trace!("Trigger cache holds {} blocks", cache.len());
        cache
    }

    pub fn insert_tiles(&mut self, tiles: &[TileCoord]) {
        self.blocks.extend(tiles.iter().map(|tile| tile.block()));
    }

    pub fn contains(&self, block: BlockCoord) -> bool {
        self.blocks.contains(&block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<BlockCoord> for TriggerCache {
    fn from_iter<I: IntoIterator<Item = BlockCoord>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

/// Whether `block` can be bulk revealed without risk of exposing the underworld or setting off
/// a trigger. Anything uncertain, including a failed feature read, counts as unsafe.
pub fn is_safe(block: BlockCoord, features: Result<BlockFeatures>, triggers: &TriggerCache) -> bool {
    if triggers.contains(block) {
        log::trace!("Block {block} overlaps a trigger");
        return false;
    }

    let features = match features {
        Ok(features) => features,
        Err(err) => {
            log::trace!("Block {block} treated as unsafe: {err}");
            return false;
        }
    };

    if features.local.is_some_and(FeatureType::leads_to_underworld) {
        log::trace!("Block {block} leads to the underworld");
        return false;
    }

    if features.global.is_some_and(FeatureType::is_underworld) {
        log::trace!("Block {block} is in the underworld");
        return false;
    }

    true
}
