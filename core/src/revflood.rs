use alloc::vec::Vec;

use crate::*;

/// First in-bounds position among the cursor, the selected unit and the first citizen.
pub fn resolve_seed<H: GridAccessor + PositionResolver>(host: &H) -> Option<TileCoord> {
    let candidates = [
        ("cursor", host.cursor_position()),
        ("selected unit", host.selected_unit_position()),
        ("first citizen", host.first_citizen_position()),
    ];
    let (source, seed) = candidates
        .into_iter()
        .filter_map(|(source, position)| Some((source, position?)))
        .find(|&(_, position)| host.contains(position))?;
    log::debug!("Flood seed {seed} taken from the {source}");
    Some(seed)
}

impl RevealSession {
    /// Hides the whole map, then unhides everything reachable from the cursor, the selected
    /// unit or the first citizen.
    pub fn reveal_flood<H: Host>(&self, host: &mut H) -> Result<FloodReport> {
        self.check_flood_allowed(&*host)?;
        let seed = resolve_seed(&*host).ok_or(RevealError::NoUsableSeed)?;
        hide_and_flood(host, seed)
    }

    /// [`RevealSession::reveal_flood`] from an explicit position.
    pub fn reveal_flood_from<H: Host>(&self, host: &mut H, seed: TileCoord) -> Result<FloodReport> {
        self.check_flood_allowed(&*host)?;
        if !host.contains(seed) {
            return Err(RevealError::NoUsableSeed);
        }
        hide_and_flood(host, seed)
    }

    fn check_flood_allowed<H: Host>(&self, host: &H) -> Result<()> {
        if !host.is_valid_map() {
            return Err(RevealError::MapUnavailable);
        }
        if self.is_revealed() {
            return Err(RevealError::AlreadyRevealed);
        }
        if host.play_mode() != PlayMode::Fortress || !host.is_fortress_mode() {
            return Err(RevealError::WrongMode);
        }
        Ok(())
    }
}

fn hide_and_flood<H: Host>(host: &mut H, seed: TileCoord) -> Result<FloodReport> {
    let on_wall = host
        .tile_type(seed, TileLayer::Actual)
        .is_none_or(TileType::is_wall);
    if on_wall {
        return Err(RevealError::NoUsableSeed);
    }

    let blocks: Vec<BlockCoord> = host.blocks().collect();
    for block in blocks {
        host.write_hidden_flags(block, &ALL_HIDDEN)?;
    }

    let report = unhide_flood(host, seed);
    log::info!("Map hidden and flooded from {seed}, {} tiles shown", report.unhidden);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWorld;

    fn cave() -> MemoryWorld {
        let mut world = MemoryWorld::new(MapSize::new(1, 1, 1));
        world.fill(TileCoord::new(1, 1, 0), TileCoord::new(6, 6, 0), TileType::STONE_FLOOR);
        world.fill(TileCoord::new(9, 9, 0), TileCoord::new(12, 12, 0), TileType::STONE_FLOOR);
        world
    }

    #[test]
    fn cursor_beats_selected_unit() {
        let mut world = cave();
        world.set_cursor(Some(TileCoord::new(5, 5, 0)));
        world.set_selected_unit(Some(TileCoord::new(10, 10, 0)));
        world.add_citizen(TileCoord::new(11, 11, 0));

        assert_eq!(resolve_seed(&world), Some(TileCoord::new(5, 5, 0)));

        RevealSession::default().reveal_flood(&mut world).unwrap();

        assert!(!world.is_hidden(TileCoord::new(5, 5, 0)));
        assert!(!world.is_hidden(TileCoord::new(1, 1, 0)));
        assert!(world.is_hidden(TileCoord::new(10, 10, 0)));
        assert!(world.is_hidden(TileCoord::new(11, 11, 0)));
    }

    #[test]
    fn out_of_bounds_candidates_fall_through() {
        let mut world = cave();
        world.set_cursor(Some(TileCoord::new(-30, 0, 0)));
        world.add_citizen(TileCoord::new(10, 10, 0));

        assert_eq!(resolve_seed(&world), Some(TileCoord::new(10, 10, 0)));

        world.set_selected_unit(Some(TileCoord::new(2, 2, 0)));
        assert_eq!(resolve_seed(&world), Some(TileCoord::new(2, 2, 0)));
    }

    #[test]
    fn flood_shows_only_the_seeded_cave() {
        let mut world = cave();
        world.set_hidden(TileCoord::new(10, 10, 0), false);
        world.set_cursor(Some(TileCoord::new(3, 3, 0)));
        let session = RevealSession::default();

        let report = session.reveal_flood(&mut world).unwrap();

        assert_eq!(report.unhidden, 8 * 8);
        assert!(!world.is_hidden(TileCoord::new(0, 0, 0)));
        assert!(!world.is_hidden(TileCoord::new(7, 7, 0)));
        assert!(world.is_hidden(TileCoord::new(10, 10, 0)));
        assert_eq!(session.snapshot_len(), 0);
    }

    #[test]
    fn wall_seed_is_rejected_before_hiding() {
        let mut world = cave();
        world.set_hidden(TileCoord::new(3, 3, 0), false);
        let before = world.clone();
        let session = RevealSession::default();

        assert_eq!(
            session.reveal_flood_from(&mut world, TileCoord::new(0, 0, 0)),
            Err(RevealError::NoUsableSeed)
        );
        assert_eq!(world, before);
    }

    #[test]
    fn missing_seed_is_reported() {
        let mut world = cave();
        let session = RevealSession::default();

        assert_eq!(session.reveal_flood(&mut world), Err(RevealError::NoUsableSeed));
        assert_eq!(
            session.reveal_flood_from(&mut world, TileCoord::new(3, 3, 4)),
            Err(RevealError::NoUsableSeed)
        );
    }

    #[test]
    fn flood_needs_an_unrevealed_fortress() {
        let mut world = cave();
        world.set_cursor(Some(TileCoord::new(3, 3, 0)));
        let mut session = RevealSession::default();

        world.set_fortress_game(false);
        assert_eq!(session.reveal_flood(&mut world), Err(RevealError::WrongMode));
        world.set_fortress_game(true);
        world.set_play_mode(PlayMode::Adventure);
        assert_eq!(session.reveal_flood(&mut world), Err(RevealError::WrongMode));
        world.set_play_mode(PlayMode::Fortress);
        world.set_loaded(false);
        assert_eq!(session.reveal_flood(&mut world), Err(RevealError::MapUnavailable));
        world.set_loaded(true);

        session.reveal(&mut world, RevealMode::Full).unwrap();
        assert_eq!(session.reveal_flood(&mut world), Err(RevealError::AlreadyRevealed));
    }
}
