//! Alive / dead / out transitions for the playable characters.
//!
//! Both transitions are terminal for the instance: the slot keeps its final
//! state until the engine loads a fresh room.

use reef_core::{CharacterKind, DeathCause, EffectKind, Event, Lifecycle};

use crate::Room;

/// Kills a live character: leaves a blood marker, removes it from the room,
/// and invalidates its position. Does nothing for characters not in play.
pub fn kill_character(
    room: &mut Room,
    character: CharacterKind,
    cause: DeathCause,
    out_events: &mut Vec<Event>,
) {
    let Some(at) = retire(room, character, Lifecycle::Dead, out_events) else {
        return;
    };
    let _ = room.spawn_effect(EffectKind::Blood, at, out_events);
    out_events.push(Event::CharacterDied {
        character,
        at,
        cause,
    });
}

/// Marks a live character as having left the grid and removes it from the room.
pub fn exit_character(room: &mut Room, character: CharacterKind, out_events: &mut Vec<Event>) {
    let Some(at) = retire(room, character, Lifecycle::Out, out_events) else {
        return;
    };
    out_events.push(Event::CharacterExited { character, at });
}

fn retire(
    room: &mut Room,
    character: CharacterKind,
    lifecycle: Lifecycle,
    out_events: &mut Vec<Event>,
) -> Option<reef_core::Position> {
    let handle = room
        .character(character)
        .filter(|slot| slot.is_active())
        .and_then(|slot| slot.handle())?;
    let at = room.entity(handle)?.position();
    let _ = room.remove_entity(handle, out_events);
    if let Some(slot) = room.character_mut(character) {
        slot.retire(lifecycle);
    }
    Some(at)
}
