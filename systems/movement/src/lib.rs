#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step resolver for the playable characters.
//!
//! A step first turns the character, then either walks it into the
//! destination cell, shoves a chain of pushable cargo ahead of it, lets it
//! leave the grid, or reports that the move was blocked.

use reef_core::{CharacterKind, DeathCause, Direction, EntityId, Event, Facing, Weight};
use reef_world::{
    entity::{GateContact, Movable, PassableGate},
    lifecycle, Room,
};

/// Result of resolving a single step request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The character is not in play; nothing happened.
    Inactive,
    /// The move was rejected and the room is unchanged apart from facing.
    Blocked,
    /// The character walked into the destination cell.
    Moved,
    /// The character shoved `cargo` entities one cell and followed them.
    Pushed {
        /// Length of the pushed chain.
        cargo: usize,
    },
    /// The character stepped off the grid and left the level.
    Exited,
    /// The character walked into something lethal.
    Killed,
}

impl StepOutcome {
    /// Whether the outcome counts towards the player's move total.
    #[must_use]
    pub const fn is_move(self) -> bool {
        matches!(self, Self::Moved | Self::Pushed { .. } | Self::Exited)
    }
}

/// Stateful step resolver; keeps a scratch buffer for push chains.
#[derive(Debug, Default)]
pub struct Movement {
    chain: Vec<(EntityId, Weight)>,
}

impl Movement {
    /// Creates a new resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves one step of `character` towards `direction`.
    pub fn handle(
        &mut self,
        room: &mut Room,
        character: CharacterKind,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> StepOutcome {
        let Some((mover, origin)) = room
            .character_entity(character)
            .map(|entity| (entity.id(), entity.position()))
        else {
            return StepOutcome::Inactive;
        };

        if let Some(facing) = facing_for(direction) {
            if room.set_facing(character, facing) {
                out_events.push(Event::FacingChanged { character, facing });
            }
        }

        let destination = origin.step(direction);
        if !room.is_inside_bounds(destination) {
            lifecycle::exit_character(room, character, out_events);
            return StepOutcome::Exited;
        }

        let top = room
            .top_entity_at(destination)
            .map(|entity| (entity.as_gate(), entity.is_transposable()));
        match top {
            None | Some((None, true)) => {
                room.move_entity(mover, destination, out_events);
                return StepOutcome::Moved;
            }
            Some((Some(gate), _)) => {
                return match gate.contact(character) {
                    GateContact::Pass => {
                        room.move_entity(mover, destination, out_events);
                        StepOutcome::Moved
                    }
                    GateContact::Lethal => {
                        lifecycle::kill_character(room, character, DeathCause::Trapped, out_events);
                        StepOutcome::Killed
                    }
                    GateContact::Block => blocked(character, direction, out_events),
                };
            }
            Some((None, false)) => {}
        }

        self.chain.clear();
        let mut cursor = destination;
        while room.is_inside_bounds(cursor) {
            let Some(cargo) = room.top_entity_at(cursor).and_then(|entity| {
                entity
                    .as_movable()
                    .filter(Movable::is_pushable)
                    .map(|cargo| (entity.id(), cargo.weight()))
            }) else {
                break;
            };
            self.chain.push(cargo);
            cursor = cursor.step(direction);
        }

        if self.chain.is_empty() || !room.is_inside_bounds(cursor) {
            return blocked(character, direction, out_events);
        }
        let beyond_free = room.top_entity_at(cursor).map_or(true, |entity| {
            entity.is_transposable()
                || entity
                    .as_gate()
                    .is_some_and(|gate| gate.admits(character))
        });
        let weights = self.chain.iter().map(|(_, weight)| *weight);
        if !beyond_free || !can_push(character, direction, weights) {
            return blocked(character, direction, out_events);
        }

        for (id, _) in self.chain.iter().rev() {
            if let Some(from) = room.entity(*id).map(|entity| entity.position()) {
                room.move_entity(*id, from.step(direction), out_events);
            }
        }
        room.move_entity(mover, destination, out_events);
        StepOutcome::Pushed {
            cargo: self.chain.len(),
        }
    }
}

/// Push policy: which chains `character` may shove towards `direction`.
///
/// The small fish moves exactly one light object. The big fish shoves any
/// number of objects of any weight sideways but only one object vertically.
#[must_use]
pub fn can_push<I>(character: CharacterKind, direction: Direction, cargo: I) -> bool
where
    I: IntoIterator<Item = Weight>,
    I::IntoIter: ExactSizeIterator,
{
    let mut cargo = cargo.into_iter();
    match character {
        CharacterKind::SmallFish => {
            cargo.len() == 1 && cargo.all(|weight| weight == Weight::Light)
        }
        CharacterKind::BigFish if direction.is_horizontal() => cargo.len() > 0,
        CharacterKind::BigFish => cargo.len() == 1,
    }
}

fn facing_for(direction: Direction) -> Option<Facing> {
    match direction {
        Direction::East => Some(Facing::Right),
        Direction::West => Some(Facing::Left),
        Direction::North | Direction::South => None,
    }
}

fn blocked(
    character: CharacterKind,
    direction: Direction,
    out_events: &mut Vec<Event>,
) -> StepOutcome {
    out_events.push(Event::MoveBlocked {
        character,
        direction,
    });
    StepOutcome::Blocked
}
