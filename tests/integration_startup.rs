//! Integration test to ensure a generated level can host a session end to end.

use wayfarer::{
    generate, load, save, Action, Direction, GameEvent, GenerationConfig, Outcome, Session,
    SessionConfig, TerrainKind, WayfarerResult,
};

#[test]
fn test_basic_startup() -> WayfarerResult<()> {
    let level = generate(80, 40, 12345)?;
    let spawn = level.player_spawn().expect("generated level has a player");

    let session = Session::from_level(level, &SessionConfig::default())?;

    assert_eq!(session.turn_number(), 0);
    assert_eq!(session.occupants().len(), 11);
    assert_eq!(session.grid().occupant_count(), 11);
    assert_eq!(session.outcome(), Outcome::Continue);

    let player = session.player().expect("player is placed");
    assert_eq!(player.position, spawn);
    assert!(session.grid().is_visible(spawn));
    assert!(session.grid().is_seen(spawn));

    let terrain = session.grid().terrain(spawn).expect("spawn is in bounds");
    assert!(matches!(terrain, TerrainKind::Grass | TerrainKind::DirtFloor));
    Ok(())
}

#[test]
fn test_generate_save_load_and_play() -> WayfarerResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("maps").join("level1.map");

    let config = GenerationConfig::for_testing(2024);
    let level = wayfarer::generate_with(&config)?;
    save(&level, &path)?;
    let loaded = load(&path)?;

    // Files list spawns in row-major order, generation in placement order.
    let mut expected = level.spawns.clone();
    let mut found = loaded.spawns.clone();
    expected.sort_by_key(|spawn| (spawn.position.y, spawn.position.x));
    found.sort_by_key(|spawn| (spawn.position.y, spawn.position.x));
    assert_eq!(found, expected);

    let mut session = Session::from_level(loaded, &SessionConfig::default())?;
    let directions = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    for turn in 0..40 {
        let report = session.player_action(Action::Move(directions[turn % 4]))?;
        for event in &report.events {
            if let GameEvent::Moved { to, .. } = event {
                assert!(session.grid().is_visible(*to));
            }
        }
        if report.outcome == Outcome::Defeat {
            break;
        }

        let report = session.monster_turn();
        // Occupancy index and arena always agree.
        assert_eq!(session.grid().occupant_count(), session.occupants().len());
        for occupant in session.occupants().iter() {
            assert_eq!(session.grid().occupant_at(occupant.position), Some(occupant.id));
        }
        if report.outcome == Outcome::Defeat {
            break;
        }
    }

    assert!(session.turn_number() >= 1);
    Ok(())
}

#[test]
fn test_wait_and_search_do_not_move_anyone() -> WayfarerResult<()> {
    let level = generate(40, 20, 7)?;
    let mut session = Session::from_level(level, &SessionConfig::default())?;
    let start = session.player().map(|p| p.position);

    let report = session.player_action(Action::Wait)?;
    assert!(report.events.is_empty());
    assert!(report.path.is_none());

    let report = session.player_action(Action::Search)?;
    let path = report.path.expect("search reports a path");
    if let Some(first) = path.start() {
        assert_eq!(Some(first), start);
    }
    assert_eq!(session.player().map(|p| p.position), start);
    assert_eq!(session.turn_number(), 2);
    Ok(())
}
