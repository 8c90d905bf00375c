#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gravity resolver: one fall step per movable object per tick.
//!
//! Every tick works on a snapshot of positions taken before anything moves,
//! so an object falls at most one cell per tick and objects moved earlier in
//! the same tick are not processed again.

use reef_core::{CharacterKind, DeathCause, EntityId, Event, Position, Weight};
use reef_system_explosion::Explosion;
use reef_world::{
    entity::{Cargo, Crushable, Explodable, FallRule, Movable},
    lifecycle, Room,
};

/// Stateful gravity resolver that counts ticks.
#[derive(Debug, Default)]
pub struct Gravity {
    tick: u64,
    explosion: Explosion,
}

impl Gravity {
    /// Creates a resolver whose first tick is number one.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks resolved so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Resolves one gravity tick and ages every effect.
    pub fn handle(&mut self, room: &mut Room, out_events: &mut Vec<Event>) {
        self.tick = self.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced { tick: self.tick });

        for (id, start) in room.snapshot() {
            let Some(cargo) = room
                .entity(id)
                .filter(|entity| entity.position() == start)
                .and_then(|entity| entity.as_movable())
            else {
                continue;
            };
            if cargo.weight() == Weight::None || cargo.fall_rule() == FallRule::Float {
                continue;
            }
            self.settle(room, id, start, cargo, out_events);
        }

        room.advance_effects(out_events);
    }

    fn settle(
        &mut self,
        room: &mut Room,
        id: EntityId,
        start: Position,
        cargo: Cargo,
        out_events: &mut Vec<Event>,
    ) {
        if room.character_at(start).is_some() {
            return;
        }
        let below = start.below();
        if !room.is_inside_bounds(below) {
            rest(room, id);
            return;
        }

        if cargo.weight() == Weight::Heavy {
            let crushed = room.top_entity_at(below).and_then(|entity| {
                entity
                    .as_crushable()
                    .map(|fragile| (entity.id(), entity.kind(), fragile.remains()))
            });
            if let Some((crushed_id, crushed, remains)) = crushed {
                let _ = room.spawn_effect(remains, below, out_events);
                let _ = room.remove_entity(crushed_id, out_events);
                out_events.push(Event::ObjectCrushed {
                    crusher: id,
                    crushed,
                    at: below,
                });
                room.move_entity(id, below, out_events);
                return;
            }
        }

        if let Some(character) = room.character_at(below) {
            if is_crushed(room, character, start, below, cargo.weight()) {
                lifecycle::kill_character(room, character, DeathCause::Crushed, out_events);
                room.move_entity(id, below, out_events);
                fall(room, id);
            } else {
                rest(room, id);
            }
            return;
        }

        if room.is_open(below) {
            room.move_entity(id, below, out_events);
            fall(room, id);
            return;
        }

        let obstacle = room.top_entity_at(below).map(|entity| entity.kind());
        let detonates = match (cargo.fall_rule(), obstacle) {
            (FallRule::Detonate, Some(obstacle)) => room
                .entity(id)
                .and_then(|entity| entity.charge())
                .is_some_and(|charge| charge.detonates_on(obstacle)),
            _ => false,
        };
        if detonates {
            self.explosion.detonate(room, id, below, out_events);
        } else {
            rest(room, id);
        }
    }
}

/// Whether `character` in `below` dies when an entity of `weight` falls onto it from `start`.
fn is_crushed(
    room: &Room,
    character: CharacterKind,
    start: Position,
    below: Position,
    weight: Weight,
) -> bool {
    let (landing, heavy) = room
        .entities_at(below)
        .filter_map(|entity| entity.as_movable())
        .fold(
            (1_usize, usize::from(weight == Weight::Heavy)),
            |(landing, heavy), cargo| {
                (landing + 1, heavy + usize::from(cargo.weight() == Weight::Heavy))
            },
        );
    match character {
        CharacterKind::SmallFish => heavy > 0 || landing > 1,
        CharacterKind::BigFish => heavy > 1 || stacked_heavies(room, start) >= 2,
    }
}

fn stacked_heavies(room: &Room, start: Position) -> usize {
    let mut heavies = 0;
    let mut cursor = start;
    while room.is_inside_bounds(cursor) {
        let mut found = false;
        for cargo in room.entities_at(cursor).filter_map(|entity| entity.as_movable()) {
            found = true;
            if cargo.weight() == Weight::Heavy {
                heavies += 1;
            }
        }
        if !found {
            break;
        }
        cursor = cursor.above();
    }
    heavies
}

fn fall(room: &mut Room, id: EntityId) {
    if let Some(charge) = room.entity_mut(id).and_then(|entity| entity.charge_mut()) {
        charge.fall();
    }
}

fn rest(room: &mut Room, id: EntityId) {
    if let Some(charge) = room.entity_mut(id).and_then(|entity| entity.charge_mut()) {
        charge.rest();
    }
}
