use std::time::Duration;

use reef_core::{CharacterKind, Command, Direction, EntityKind, Event, Input, Position};
use reef_engine::{Engine, EngineConfig, EngineError};
use reef_world::{query, Level};

fn levels(layouts: &[&[&str]]) -> Vec<Level> {
    layouts
        .iter()
        .enumerate()
        .map(|(index, rows)| {
            Level::parse(format!("room{index}.txt"), &rows.join("\n")).expect("level parses")
        })
        .collect()
}

fn quiet() -> EngineConfig {
    EngineConfig {
        crab_wander: false,
        ..EngineConfig::default()
    }
}

fn start(layouts: &[&[&str]], config: EngineConfig) -> (Engine, Vec<Event>) {
    let mut events = Vec::new();
    let engine = Engine::new(levels(layouts), config, &mut events).expect("engine starts");
    (engine, events)
}

#[test]
fn session_needs_at_least_one_level() {
    let mut events = Vec::new();
    let result = Engine::new(Vec::new(), quiet(), &mut events);
    assert!(matches!(result, Err(EngineError::NoLevels)));
}

#[test]
fn big_fish_receives_control_first() {
    let (engine, events) = start(&[&["S B"]], quiet());

    assert_eq!(engine.controlled(), Some(CharacterKind::BigFish));
    assert!(events.contains(&Event::LevelLoaded {
        name: "room0.txt".to_owned(),
        width: 3,
        height: 1,
    }));
    assert!(events.contains(&Event::ControlSwitched {
        character: CharacterKind::BigFish
    }));
}

#[test]
fn configured_start_character_is_honoured() {
    let config = EngineConfig {
        start_with: CharacterKind::SmallFish,
        ..quiet()
    };
    let (engine, _) = start(&[&["S B"]], config);

    assert_eq!(engine.controlled(), Some(CharacterKind::SmallFish));
}

#[test]
fn switching_toggles_between_live_fish() {
    let (mut engine, _) = start(&[&["S B"]], quiet());
    let mut events = Vec::new();

    engine.update(Input::SwitchCharacter, &mut events);
    assert_eq!(engine.controlled(), Some(CharacterKind::SmallFish));

    engine.update(Input::SwitchCharacter, &mut events);
    assert_eq!(engine.controlled(), Some(CharacterKind::BigFish));
}

#[test]
fn switching_is_ignored_without_a_second_fish() {
    let (mut engine, _) = start(&[&["B  "]], quiet());
    let mut events = Vec::new();

    engine.update(Input::SwitchCharacter, &mut events);

    assert_eq!(engine.controlled(), Some(CharacterKind::BigFish));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::ControlSwitched { .. })));
}

#[test]
fn blocked_steps_do_not_count_as_moves() {
    let (mut engine, _) = start(&[&["BW"]], quiet());
    let mut events = Vec::new();

    engine.update(Input::Step(Direction::East), &mut events);

    assert_eq!(engine.level_tally().moves, 0);
    assert_eq!(engine.level_tally().ticks, 1);
}

#[test]
fn control_falls_back_when_the_fish_leaves() {
    let (mut engine, _) = start(&[&["BS  "]], quiet());
    let mut events = Vec::new();

    engine.update(Input::Step(Direction::West), &mut events);

    assert_eq!(engine.controlled(), Some(CharacterKind::SmallFish));
    assert!(events.contains(&Event::CharacterExited {
        character: CharacterKind::BigFish,
        at: Position::new(0, 0),
    }));
}

#[test]
fn finishing_every_level_completes_the_game() {
    let (mut engine, _) = start(&[&["BS"], &["BS"]], quiet());
    let mut events = Vec::new();

    for _ in 0..2 {
        engine.update(Input::Step(Direction::West), &mut events);
        engine.update(Input::Step(Direction::East), &mut events);
    }

    assert!(engine.is_finished());
    assert_eq!(engine.level_index(), 1);
    assert!(events.contains(&Event::LevelCompleted {
        name: "room0.txt".to_owned(),
        moves: 2,
        ticks: 1,
    }));
    assert_eq!(
        events.last(),
        Some(&Event::GameCompleted { moves: 4, ticks: 2 })
    );
    assert_eq!(engine.elapsed(), Duration::from_millis(1000));

    let mut after = Vec::new();
    engine.update(Input::Idle, &mut after);
    assert!(after.is_empty());
}

#[test]
fn failed_level_is_reloaded_fresh() {
    let (mut engine, _) = start(&[&["BT "]], quiet());
    let mut events = Vec::new();

    engine.update(Input::Step(Direction::East), &mut events);

    let failed = events
        .iter()
        .position(|event| matches!(event, Event::LevelFailed { .. }))
        .expect("level failed");
    let reloaded = events
        .iter()
        .rposition(|event| matches!(event, Event::LevelLoaded { .. }))
        .expect("level reloaded");
    assert!(failed < reloaded);
    assert_eq!(
        query::character_position(engine.room(), CharacterKind::BigFish),
        Some(Position::new(0, 0))
    );
    assert_eq!(engine.controlled(), Some(CharacterKind::BigFish));
    assert_eq!(engine.level_tally().ticks, 0);
    assert!(!events[reloaded..]
        .iter()
        .any(|event| matches!(event, Event::TimeAdvanced { .. })));
}

#[test]
fn next_level_starts_without_the_finishing_tick() {
    let (mut engine, _) = start(&[&["B"], &["CB", "  "]], quiet());
    let mut events = Vec::new();

    engine.update(Input::Step(Direction::West), &mut events);

    assert_eq!(engine.level_index(), 1);
    assert_eq!(engine.level_tally().ticks, 0);
    assert_eq!(
        engine
            .room()
            .entities()
            .find(|entity| entity.kind() == EntityKind::Cup)
            .map(|entity| entity.position()),
        Some(Position::new(0, 0))
    );

    engine.update(Input::Idle, &mut events);
    assert_eq!(engine.level_tally().ticks, 1);
}

#[test]
fn restart_restores_the_pristine_layout() {
    let (mut engine, _) = start(&[&["B   "]], quiet());
    let mut events = Vec::new();

    engine.update(Input::Step(Direction::East), &mut events);
    engine.update(Input::Step(Direction::East), &mut events);
    engine.apply(Command::RestartLevel, &mut events);

    assert_eq!(
        query::character_position(engine.room(), CharacterKind::BigFish),
        Some(Position::new(0, 0))
    );
    assert_eq!(engine.level_tally().moves, 0);
}

#[test]
fn identical_scripts_replay_identically() {
    let layout: &[&str] = &[
        "B         ",
        " K    K   ",
        "WWWWWWWWWW",
    ];
    let script = [
        Input::Idle,
        Input::Step(Direction::East),
        Input::Step(Direction::East),
        Input::Idle,
        Input::Step(Direction::South),
        Input::Idle,
        Input::Step(Direction::East),
        Input::Idle,
        Input::Idle,
    ];
    let config = EngineConfig {
        crab_seed: 42,
        ..EngineConfig::default()
    };

    let run = || {
        let (mut engine, mut events) = start(&[layout], config.clone());
        for input in script {
            engine.update(input, &mut events);
        }
        events
    };

    assert_eq!(run(), run());
}
