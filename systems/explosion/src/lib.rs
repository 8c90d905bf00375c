#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Blast resolver for detonating bombs.

use reef_core::{DeathCause, Direction, EffectKind, EntityId, Event, Position};
use reef_world::{lifecycle, Entity, Room};

/// Resolves bomb blasts against the room.
#[derive(Debug, Default)]
pub struct Explosion {
    blast: Vec<Position>,
    debris: Vec<EntityId>,
}

impl Explosion {
    /// Creates a new resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detonates `bomb` with the blast centred on `center`.
    ///
    /// The centre and its four neighbours inside the room each receive a
    /// boom effect. A live character in a blast cell dies; otherwise every
    /// solid occupant is destroyed unless it is indestructible.
    /// The bomb itself is consumed.
    pub fn detonate(
        &mut self,
        room: &mut Room,
        bomb: EntityId,
        center: Position,
        out_events: &mut Vec<Event>,
    ) {
        out_events.push(Event::BombExploded { center });

        self.blast.clear();
        self.blast.push(center);
        self.blast
            .extend(Direction::ALL.into_iter().map(|direction| center.step(direction)));
        self.blast.retain(|cell| room.is_inside_bounds(*cell));

        for cell in self.blast.iter().copied() {
            let victim = room.character_at(cell);
            self.debris.clear();
            self.debris.extend(
                room.entities_at(cell)
                    .filter(|entity| is_debris(entity))
                    .map(Entity::id),
            );
            let _ = room.spawn_effect(EffectKind::Boom, cell, out_events);

            if let Some(character) = victim {
                lifecycle::kill_character(room, character, DeathCause::Exploded, out_events);
                continue;
            }
            for id in self.debris.iter().copied() {
                let _ = room.remove_entity(id, out_events);
            }
        }

        let _ = room.remove_entity(bomb, out_events);
    }
}

fn is_debris(entity: &Entity) -> bool {
    !entity.is_transposable()
        && !entity.kind().is_indestructible()
        && entity.character().is_none()
}
