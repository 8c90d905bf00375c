#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded crab wandering.
//!
//! Each tick every crab takes one random horizontal step. Crabs bite the
//! small fish, but the big fish and traps get rid of them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reef_core::{CharacterKind, DeathCause, Direction, EntityKind, Event};
use reef_world::{lifecycle, Room};

/// Crab wander system driven by a deterministic random stream.
#[derive(Debug)]
pub struct CrabWander {
    rng: ChaCha8Rng,
}

impl CrabWander {
    /// Creates a wander system whose choices are fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Moves every crab that was in the room at the start of the call.
    pub fn handle(&mut self, room: &mut Room, out_events: &mut Vec<Event>) {
        for (id, start) in room.snapshot() {
            let is_crab = room
                .entity(id)
                .is_some_and(|entity| entity.kind() == EntityKind::Crab && entity.position() == start);
            if !is_crab {
                continue;
            }

            let direction = if self.rng.gen_bool(0.5) {
                Direction::East
            } else {
                Direction::West
            };
            let destination = start.step(direction);
            if !room.is_inside_bounds(destination) {
                continue;
            }

            match room.character_at(destination) {
                Some(CharacterKind::SmallFish) => {
                    lifecycle::kill_character(
                        room,
                        CharacterKind::SmallFish,
                        DeathCause::Bitten,
                        out_events,
                    );
                    room.move_entity(id, destination, out_events);
                }
                Some(CharacterKind::BigFish) => {
                    let _ = room.remove_entity(id, out_events);
                }
                None => {
                    let top = room.top_entity_at(destination).map(|entity| entity.kind());
                    match top {
                        Some(EntityKind::Trap) => {
                            let _ = room.remove_entity(id, out_events);
                        }
                        None => room.move_entity(id, destination, out_events),
                        Some(kind) if kind.is_transposable() => {
                            room.move_entity(id, destination, out_events);
                        }
                        Some(_) => {}
                    }
                }
            }
        }
    }
}
