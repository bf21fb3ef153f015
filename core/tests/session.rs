use revealer_core::memory::MemoryWorld;
use revealer_core::*;

/// Two-level fort: a dug out hall with a stair down to a half explored cellar, a sealed
/// hollow in the far block of the cellar.
fn fort() -> MemoryWorld {
    let mut world = MemoryWorld::new(MapSize::new(2, 1, 2));
    world.paint_layer(
        1,
        [
            "##########",
            "#........#",
            "#...X....#",
            "#........#",
            "##########",
        ],
    );
    world.paint_layer(
        0,
        [
            "##########",
            "#.....####",
            "#...X.####",
            "#.....####",
            "##########",
        ],
    );
    for x in 0..10 {
        for y in 0..5 {
            world.set_hidden(TileCoord::new(x, y, 1), false);
        }
    }
    world.add_hazard(HazardKind::DeepVeinHollow, [TileCoord::new(24, 8, 0)]);
    world.set_cursor(Some(TileCoord::new(2, 2, 1)));
    world
}

#[test]
fn safe_reveal_round_trip_keeps_the_hollow_hidden() {
    let mut world = fort();
    let before = world.hidden_tiles();
    let mut session = RevealSession::default();

    let report = session.reveal(&mut world, RevealMode::Safe).unwrap();

    assert_eq!(report.revealed_blocks, 3);
    assert_eq!(report.skipped_blocks, 1);
    assert!(world.is_hidden(TileCoord::new(24, 8, 0)));
    assert!(!world.is_hidden(TileCoord::new(2, 2, 0)));

    assert_eq!(session.toggle(&mut world), Ok(ToggleOutcome::Unrevealed { restored_blocks: 3 }));
    assert_eq!(world.hidden_tiles(), before);
}

#[test]
fn flood_after_unreveal_follows_the_stairs() {
    let mut world = fort();
    let mut session = RevealSession::default();
    session.reveal(&mut world, RevealMode::Full).unwrap();
    assert_eq!(session.reveal_flood(&mut world), Err(RevealError::AlreadyRevealed));
    session.unreveal(&mut world).unwrap();

    let report = session.reveal_flood(&mut world).unwrap();

    assert!(report.unhidden > 0);
    assert!(!world.is_hidden(TileCoord::new(9, 4, 1)));
    assert!(!world.is_hidden(TileCoord::new(4, 2, 0)));
    assert!(!world.is_hidden(TileCoord::new(1, 1, 0)));
    // beyond the cellar wall
    assert!(world.is_hidden(TileCoord::new(7, 2, 0)));
    assert!(world.is_hidden(TileCoord::new(24, 8, 0)));
}

#[test]
fn forget_makes_the_reveal_permanent() {
    let mut world = fort();
    let mut session = RevealSession::default();
    session.reveal(&mut world, RevealMode::Full).unwrap();
    assert!(world.is_paused());

    session.forget().unwrap();

    assert_eq!(session.unreveal(&mut world), Err(RevealError::NotRevealed));
    assert_eq!(world.hidden_count(), 0);
}

#[test]
fn resized_map_cannot_be_unrevealed() {
    let mut world = fort();
    let mut session = RevealSession::default();
    session.reveal(&mut world, RevealMode::Full).unwrap();

    let mut bigger = MemoryWorld::new(MapSize::new(2, 1, 3));
    let untouched = bigger.clone();

    assert!(matches!(
        session.unreveal(&mut bigger),
        Err(RevealError::DimensionMismatch { .. })
    ));
    assert_eq!(bigger, untouched);
    assert!(session.is_revealed());
    assert_eq!(session.unreveal(&mut world), Ok(4));
}

#[test]
fn session_and_world_survive_a_save() {
    let mut world = fort();
    let mut session = RevealSession::new(SessionConfig {
        allow_demon: true,
        default_mode: RevealMode::Demon,
    });
    session.toggle(&mut world).unwrap();
    assert_eq!(session.state(), RevealState::DemonRevealed);
    assert!(!world.is_paused());

    let saved = serde_json::to_string(&(&world, &session)).unwrap();
    let (mut world, mut session): (MemoryWorld, RevealSession) =
        serde_json::from_str(&saved).unwrap();

    session.toggle(&mut world).unwrap();
    assert_eq!(world.hidden_tiles(), fort().hidden_tiles());
}

#[test]
fn errors_read_like_messages() {
    assert_eq!(
        RevealError::NotRevealed.to_string(),
        "Map is not revealed, there is nothing to revert or forget"
    );
    assert_eq!(
        RevealError::DimensionMismatch {
            recorded: MapSize::new(2, 1, 2),
            current: MapSize::new(2, 1, 3),
        }
        .to_string(),
        "The map is not of the same size: revealed at 2x1x2, now 2x1x3"
    );
}
