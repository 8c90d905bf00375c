use reef_core::{CharacterKind, DeathCause, EffectKind, EntityKind, Event, Lifecycle, Position};
use reef_system_gravity::Gravity;
use reef_world::{Level, LevelStatus, Room};

fn room(rows: &[&str]) -> Room {
    let level = Level::parse("test", &rows.join("\n")).expect("level parses");
    let mut events = Vec::new();
    Room::from_level(&level, &mut events).expect("room builds")
}

fn positions_of(room: &Room, kind: EntityKind) -> Vec<Position> {
    room.entities()
        .filter(|entity| entity.kind() == kind)
        .map(|entity| entity.position())
        .collect()
}

fn run_ticks(gravity: &mut Gravity, room: &mut Room, ticks: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        gravity.handle(room, &mut events);
    }
    events
}

fn lifecycle(room: &Room, character: CharacterKind) -> Lifecycle {
    room.character(character).expect("slot").lifecycle()
}

#[test]
fn tick_is_announced_before_anything_falls() {
    let mut room = room(&["C", " "]);
    let mut gravity = Gravity::new();

    let events = run_ticks(&mut gravity, &mut room, 1);

    assert_eq!(events.first(), Some(&Event::TimeAdvanced { tick: 1 }));
    assert_eq!(gravity.tick(), 1);
}

#[test]
fn objects_fall_one_cell_per_tick() {
    let mut room = room(&["C", " ", " ", " "]);
    let mut gravity = Gravity::new();

    let _ = run_ticks(&mut gravity, &mut room, 1);
    assert_eq!(positions_of(&room, EntityKind::Cup), vec![Position::new(0, 1)]);

    let _ = run_ticks(&mut gravity, &mut room, 5);
    assert_eq!(positions_of(&room, EntityKind::Cup), vec![Position::new(0, 3)]);
}

#[test]
fn upper_object_waits_for_the_snapshot_of_the_one_below() {
    let mut room = room(&["C", "C", " "]);
    let mut gravity = Gravity::new();

    let _ = run_ticks(&mut gravity, &mut room, 1);

    assert_eq!(
        positions_of(&room, EntityKind::Cup),
        vec![Position::new(0, 0), Position::new(0, 2)]
    );
}

#[test]
fn big_fish_holds_a_single_rock() {
    let mut room = room(&["R", "B", "W"]);
    let mut gravity = Gravity::new();

    let _ = run_ticks(&mut gravity, &mut room, 3);

    assert_eq!(positions_of(&room, EntityKind::Rock), vec![Position::new(0, 0)]);
    assert_eq!(lifecycle(&room, CharacterKind::BigFish), Lifecycle::Alive);
}

#[test]
fn two_stacked_rocks_crush_the_big_fish() {
    let mut room = room(&["R", "R", "B", "W"]);
    let mut gravity = Gravity::new();

    let events = run_ticks(&mut gravity, &mut room, 1);

    assert_eq!(lifecycle(&room, CharacterKind::BigFish), Lifecycle::Dead);
    assert_eq!(room.status(), LevelStatus::Failed);
    assert!(events.contains(&Event::CharacterDied {
        character: CharacterKind::BigFish,
        at: Position::new(0, 2),
        cause: DeathCause::Crushed,
    }));
    assert!(positions_of(&room, EntityKind::Rock).contains(&Position::new(0, 2)));
}

#[test]
fn small_fish_dies_under_a_heavy_object() {
    let mut room = room(&["R", "S", "W"]);

    let _ = run_ticks(&mut Gravity::new(), &mut room, 1);

    assert_eq!(lifecycle(&room, CharacterKind::SmallFish), Lifecycle::Dead);
}

#[test]
fn small_fish_holds_a_single_light_object() {
    let mut room = room(&["C", "S", "W"]);

    let _ = run_ticks(&mut Gravity::new(), &mut room, 2);

    assert_eq!(lifecycle(&room, CharacterKind::SmallFish), Lifecycle::Alive);
    assert_eq!(positions_of(&room, EntityKind::Cup), vec![Position::new(0, 0)]);
}

#[test]
fn small_fish_dies_when_two_light_objects_pile_up() {
    let mut room = room(&["C", "K", "W"]);
    let mut setup = Vec::new();
    let _ = room
        .add_entity(EntityKind::SmallFish, Position::new(0, 1), &mut setup)
        .expect("fish placed");

    let _ = run_ticks(&mut Gravity::new(), &mut room, 1);

    assert_eq!(lifecycle(&room, CharacterKind::SmallFish), Lifecycle::Dead);
}

#[test]
fn rock_crushes_a_log() {
    let mut room = room(&["R", "Y", "W"]);

    let events = run_ticks(&mut Gravity::new(), &mut room, 1);

    assert!(positions_of(&room, EntityKind::Log).is_empty());
    assert_eq!(positions_of(&room, EntityKind::Rock), vec![Position::new(0, 1)]);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ObjectCrushed { crushed: EntityKind::Log, .. })));
    assert!(room
        .entities_at(Position::new(0, 1))
        .any(|entity| entity.effect_kind() == Some(EffectKind::Splinters)));
}

#[test]
fn logs_float_and_hold_light_objects() {
    let mut room = room(&["C", "Y", " "]);

    let _ = run_ticks(&mut Gravity::new(), &mut room, 2);

    assert_eq!(positions_of(&room, EntityKind::Log), vec![Position::new(0, 1)]);
    assert_eq!(positions_of(&room, EntityKind::Cup), vec![Position::new(0, 0)]);
}

#[test]
fn falling_bomb_explodes_on_impact() {
    let mut room = room(&["b", " ", "R", "W"]);
    let mut gravity = Gravity::new();

    let events = run_ticks(&mut gravity, &mut room, 2);

    assert!(events.contains(&Event::BombExploded { center: Position::new(0, 2) }));
    assert!(positions_of(&room, EntityKind::Bomb).is_empty());
    assert!(positions_of(&room, EntityKind::Rock).is_empty());
    assert_eq!(positions_of(&room, EntityKind::Wall), vec![Position::new(0, 3)]);
}

#[test]
fn resting_bomb_never_explodes() {
    let mut room = room(&["b", "R", "W"]);

    let events = run_ticks(&mut Gravity::new(), &mut room, 3);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BombExploded { .. })));
    assert_eq!(positions_of(&room, EntityKind::Bomb), vec![Position::new(0, 0)]);
}

#[test]
fn bomb_landing_on_a_wall_is_a_dud() {
    let mut room = room(&["b", " ", "W"]);

    let events = run_ticks(&mut Gravity::new(), &mut room, 3);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BombExploded { .. })));
    assert_eq!(positions_of(&room, EntityKind::Bomb), vec![Position::new(0, 1)]);
}

#[test]
fn effects_expire_with_the_ticks() {
    let mut room = room(&["R", "Y", "W"]);
    let mut gravity = Gravity::new();

    let _ = run_ticks(&mut gravity, &mut room, 1);
    let _ = run_ticks(&mut gravity, &mut room, EffectKind::Splinters.lifetime_ticks() as usize);

    assert!(room.entities().all(|entity| entity.effect_kind().is_none()));
}

#[test]
fn blast_smoke_does_not_open_a_wall_below() {
    let mut room = room(&["R", "W", " "]);
    let mut setup = Vec::new();
    let _ = room.spawn_effect(EffectKind::Boom, Position::new(0, 1), &mut setup);

    let _ = run_ticks(&mut Gravity::new(), &mut room, 1);

    assert_eq!(positions_of(&room, EntityKind::Rock), vec![Position::new(0, 0)]);
    assert_eq!(positions_of(&room, EntityKind::Wall), vec![Position::new(0, 1)]);
}

#[test]
fn splinters_do_not_let_a_rock_join_the_crusher() {
    let mut room = room(&["R", "R", "Y", "W"]);

    let _ = run_ticks(&mut Gravity::new(), &mut room, 3);

    assert_eq!(
        positions_of(&room, EntityKind::Rock),
        vec![Position::new(0, 1), Position::new(0, 2)]
    );
}

#[test]
fn object_sharing_a_cell_with_a_character_stays_put() {
    let mut room = room(&["T", " "]);
    let mut setup = Vec::new();
    let _ = room
        .add_entity(EntityKind::SmallFish, Position::new(0, 0), &mut setup)
        .expect("fish placed");

    let _ = run_ticks(&mut Gravity::new(), &mut room, 2);

    assert_eq!(positions_of(&room, EntityKind::Trap), vec![Position::new(0, 0)]);
    assert_eq!(lifecycle(&room, CharacterKind::SmallFish), Lifecycle::Alive);
}

#[test]
fn bomb_caught_by_a_fish_is_disarmed() {
    let mut room = room(&["b", " ", "S", "W"]);

    let events = run_ticks(&mut Gravity::new(), &mut room, 3);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BombExploded { .. })));
    assert_eq!(positions_of(&room, EntityKind::Bomb), vec![Position::new(0, 1)]);
    let charge = room
        .entities()
        .find(|entity| entity.kind() == EntityKind::Bomb)
        .and_then(|entity| entity.charge())
        .expect("bomb charge");
    assert!(!charge.is_falling());
    assert_eq!(lifecycle(&room, CharacterKind::SmallFish), Lifecycle::Alive);
}

#[test]
fn falling_bomb_kills_a_fish_next_to_the_impact() {
    let mut room = room(&["b  ", "   ", "RS ", "WWW"]);

    let events = run_ticks(&mut Gravity::new(), &mut room, 2);

    assert!(events.contains(&Event::BombExploded { center: Position::new(0, 2) }));
    assert!(events.contains(&Event::CharacterDied {
        character: CharacterKind::SmallFish,
        at: Position::new(1, 2),
        cause: DeathCause::Exploded,
    }));
    assert_eq!(lifecycle(&room, CharacterKind::SmallFish), Lifecycle::Dead);
    assert_eq!(room.status(), LevelStatus::Failed);
}
