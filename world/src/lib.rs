#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room state for Reef.
//!
//! A [`Room`] stores every entity of the level being played in stable
//! insertion order and answers the spatial queries the resolvers need. It is
//! mutated only through its own methods, each of which reports what changed by
//! appending [`Event`] values to a caller-supplied buffer.

pub mod entity;
pub mod level;
pub mod lifecycle;

pub use entity::Entity;
pub use level::{Level, LevelError};

use reef_core::{
    CharacterKind, EffectKind, EntityId, EntityKind, Event, Facing, Lifecycle, Position,
};
use thiserror::Error;

/// Reasons the room refuses to insert an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RoomError {
    /// A live instance of the character already swims in the room.
    #[error("{0:?} is already present in the room")]
    DuplicateCharacter(CharacterKind),
    /// The character already died or left; only a reload brings it back.
    #[error("{0:?} has already left play in this room")]
    RetiredCharacter(CharacterKind),
    /// Effects carry a variant and must be inserted with [`Room::spawn_effect`].
    #[error("effects must be spawned with an effect kind")]
    UntypedEffect,
}

/// Overall state of the level being played in a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelStatus {
    /// At least one character is still swimming and none has died.
    Playing,
    /// Every character present at load time left through the boundary.
    Completed,
    /// A character died.
    Failed,
}

/// Per-room record of a playable character.
///
/// The slot outlives the character's entity so that lifecycle queries keep
/// working after the fish died or swam out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterSlot {
    kind: CharacterKind,
    handle: Option<EntityId>,
    lifecycle: Lifecycle,
    facing: Facing,
    last_position: Position,
}

impl CharacterSlot {
    fn new(kind: CharacterKind, handle: EntityId, position: Position) -> Self {
        Self {
            kind,
            handle: Some(handle),
            lifecycle: Lifecycle::Alive,
            facing: Facing::default(),
            last_position: position,
        }
    }

    /// Character tracked by the slot.
    #[must_use]
    pub const fn kind(&self) -> CharacterKind {
        self.kind
    }

    /// Entity currently representing the character, if it is in the room.
    #[must_use]
    pub const fn handle(&self) -> Option<EntityId> {
        self.handle
    }

    /// Lifecycle state of the character.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Direction the character faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Last in-grid cell, or [`Position::OFF_GRID`] once the character left play.
    #[must_use]
    pub const fn last_position(&self) -> Position {
        self.last_position
    }

    /// Whether the character is alive and inside the room.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Alive) && self.handle.is_some()
    }

    pub(crate) fn retire(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
        self.handle = None;
        self.last_position = Position::OFF_GRID;
    }
}

/// Represents the authoritative state of a single room.
#[derive(Clone, Debug)]
pub struct Room {
    name: String,
    width: u32,
    height: u32,
    entities: Vec<Entity>,
    next_id: u32,
    big_fish: Option<CharacterSlot>,
    small_fish: Option<CharacterSlot>,
}

impl Room {
    /// Creates an empty room with the provided dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            name: String::new(),
            width,
            height,
            entities: Vec::new(),
            next_id: 0,
            big_fish: None,
            small_fish: None,
        }
    }

    /// Builds a fresh room from a parsed level.
    ///
    /// Water is laid under every cell first, then the level's objects in
    /// row-major order.
    pub fn from_level(level: &Level, out_events: &mut Vec<Event>) -> Result<Self, RoomError> {
        let mut room = Self::new(level.width(), level.height());
        room.name = level.name().to_owned();
        out_events.push(Event::LevelLoaded {
            name: room.name.clone(),
            width: room.width,
            height: room.height,
        });

        for y in 0..level.height() {
            for x in 0..level.width() {
                let cell = Position::new(to_coord(x), to_coord(y));
                let id = room.allocate_id();
                let _ = room.insert(Entity::new(id, EntityKind::Water, cell));
            }
        }

        for &(kind, cell) in level.placements() {
            let _ = room.add_entity(kind, cell, out_events)?;
        }

        Ok(room)
    }

    /// Name of the level the room was loaded from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns in the room.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the room.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `position` lies inside the fixed grid.
    #[must_use]
    pub fn is_inside_bounds(&self, position: Position) -> bool {
        position.x() >= 0
            && position.y() >= 0
            && i64::from(position.x()) < i64::from(self.width)
            && i64::from(position.y()) < i64::from(self.height)
    }

    /// Iterator over every entity in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Looks up an entity by identifier.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    /// Looks up an entity by identifier for mutation of its kind state.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    /// Highest-layer entity at `position`; equal layers favour the newest entity.
    ///
    /// Effects are decoration and never count as the top occupant.
    #[must_use]
    pub fn top_entity_at(&self, position: Position) -> Option<&Entity> {
        self.entities_at(position)
            .filter(|entity| entity.kind() != EntityKind::Effect)
            .fold(None, |top: Option<&Entity>, entity| match top {
                Some(current) if current.layer() > entity.layer() => Some(current),
                _ => Some(entity),
            })
    }

    /// Every entity at `position` in insertion order.
    pub fn entities_at(&self, position: Position) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.position() == position)
    }

    /// Reports whether `position` holds nothing but transposable entities.
    #[must_use]
    pub fn is_open(&self, position: Position) -> bool {
        self.top_entity_at(position)
            .map_or(true, Entity::is_transposable)
    }

    /// Live character occupying `position`, if any.
    #[must_use]
    pub fn character_at(&self, position: Position) -> Option<CharacterKind> {
        self.entities_at(position)
            .filter_map(Entity::character)
            .find(|kind| self.character(*kind).is_some_and(CharacterSlot::is_active))
    }

    /// Lifecycle record of `kind`, if the character was ever placed in the room.
    #[must_use]
    pub fn character(&self, kind: CharacterKind) -> Option<&CharacterSlot> {
        match kind {
            CharacterKind::BigFish => self.big_fish.as_ref(),
            CharacterKind::SmallFish => self.small_fish.as_ref(),
        }
    }

    pub(crate) fn character_mut(&mut self, kind: CharacterKind) -> Option<&mut CharacterSlot> {
        match kind {
            CharacterKind::BigFish => self.big_fish.as_mut(),
            CharacterKind::SmallFish => self.small_fish.as_mut(),
        }
    }

    /// Entity of a live character.
    #[must_use]
    pub fn character_entity(&self, kind: CharacterKind) -> Option<&Entity> {
        self.character(kind)
            .and_then(CharacterSlot::handle)
            .and_then(|id| self.entity(id))
    }

    /// Turns a live character to face `facing`; returns whether it changed.
    pub fn set_facing(&mut self, kind: CharacterKind, facing: Facing) -> bool {
        match self.character_mut(kind) {
            Some(slot) if slot.is_active() && slot.facing != facing => {
                slot.facing = facing;
                true
            }
            _ => false,
        }
    }

    /// Captures the identifier and position of every entity at this instant.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(EntityId, Position)> {
        self.entities
            .iter()
            .map(|entity| (entity.id(), entity.position()))
            .collect()
    }

    /// Overall state of the level.
    #[must_use]
    pub fn status(&self) -> LevelStatus {
        let slots: Vec<&CharacterSlot> = [self.big_fish.as_ref(), self.small_fish.as_ref()]
            .into_iter()
            .flatten()
            .collect();

        if slots
            .iter()
            .any(|slot| slot.lifecycle() == Lifecycle::Dead)
        {
            LevelStatus::Failed
        } else if !slots.is_empty()
            && slots.iter().all(|slot| slot.lifecycle() == Lifecycle::Out)
        {
            LevelStatus::Completed
        } else {
            LevelStatus::Playing
        }
    }

    /// Inserts a new entity of `kind` at `position`.
    ///
    /// Characters register their lifecycle slot; a second live instance of the
    /// same character, or one that already left play, is rejected.
    pub fn add_entity(
        &mut self,
        kind: EntityKind,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<EntityId, RoomError> {
        if kind == EntityKind::Effect {
            return Err(RoomError::UntypedEffect);
        }

        let id = if let Some(character) = kind.character() {
            if let Some(slot) = self.character(character) {
                if slot.lifecycle().is_terminal() {
                    return Err(RoomError::RetiredCharacter(character));
                }
                return Err(RoomError::DuplicateCharacter(character));
            }
            let id = self.allocate_id();
            let slot = CharacterSlot::new(character, id, position);
            match character {
                CharacterKind::BigFish => self.big_fish = Some(slot),
                CharacterKind::SmallFish => self.small_fish = Some(slot),
            }
            id
        } else {
            self.allocate_id()
        };

        let id = self.insert(Entity::new(id, kind, position));
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind,
            at: position,
        });
        Ok(id)
    }

    /// Inserts a transient effect at `position`.
    pub fn spawn_effect(
        &mut self,
        effect: EffectKind,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> EntityId {
        let id = self.allocate_id();
        let id = self.insert(Entity::effect(id, effect, position));
        out_events.push(Event::EntitySpawned {
            entity: id,
            kind: EntityKind::Effect,
            at: position,
        });
        id
    }

    /// Relocates an entity without validation; callers check the move first.
    ///
    /// Sliding a rock sideways disturbs a crab: one appears in the open cell
    /// above the rock's origin unless a crab already sits there.
    pub fn move_entity(&mut self, id: EntityId, to: Position, out_events: &mut Vec<Event>) {
        let Some(entity) = self.entity_mut(id) else {
            return;
        };
        let from = entity.position();
        let kind = entity.kind();
        entity.relocate(to);
        if let Some(character) = kind.character() {
            if let Some(slot) = self.character_mut(character) {
                slot.last_position = to;
            }
        }
        out_events.push(Event::EntityMoved {
            entity: id,
            kind,
            from,
            to,
        });

        if kind == EntityKind::Rock && from.y() == to.y() && from != to {
            self.disturb_crab(from.above(), out_events);
        }
    }

    /// Deletes an entity, returning it with its position invalidated.
    ///
    /// Removing a tracked character clears the room's handle to it.
    pub fn remove_entity(&mut self, id: EntityId, out_events: &mut Vec<Event>) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id() == id)?;
        let removed = self.entities.remove(index);
        if let Some(character) = removed.character() {
            if let Some(slot) = self.character_mut(character) {
                if slot.handle == Some(id) {
                    slot.handle = None;
                }
            }
        }
        out_events.push(Event::EntityRemoved {
            entity: id,
            kind: removed.kind(),
            at: removed.position(),
        });
        Some(removed.invalidate())
    }

    /// Counts down every effect and removes the ones that expired.
    pub fn advance_effects(&mut self, out_events: &mut Vec<Event>) {
        let mut expired = Vec::new();
        for entity in &mut self.entities {
            if let Some(timer) = entity.timer_mut() {
                if timer.tick() {
                    expired.push(entity.id());
                }
            }
        }
        for id in expired {
            let _ = self.remove_entity(id, out_events);
        }
    }

    fn disturb_crab(&mut self, cell: Position, out_events: &mut Vec<Event>) {
        if !self.is_inside_bounds(cell) || !self.is_open(cell) {
            return;
        }
        if self
            .entities_at(cell)
            .any(|entity| entity.kind() == EntityKind::Crab)
        {
            return;
        }
        let _ = self.add_entity(EntityKind::Crab, cell, out_events);
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        self.entities.push(entity);
        id
    }
}

fn to_coord(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Query functions that provide read-only access to room state.
pub mod query {
    use super::{CharacterSlot, Room};
    use reef_core::{CharacterKind, Position, RenderTile};

    /// Drawable tiles sorted by layer ascending, then row, then column.
    #[must_use]
    pub fn render_tiles(room: &Room) -> Vec<RenderTile> {
        let mut tiles: Vec<RenderTile> = room
            .entities()
            .map(|entity| RenderTile {
                kind: entity.kind(),
                position: entity.position(),
                layer: entity.layer(),
                facing: entity
                    .character()
                    .and_then(|kind| room.character(kind))
                    .map(CharacterSlot::facing),
                effect: entity.effect_kind(),
            })
            .collect();
        tiles.sort_by_key(|tile| (tile.layer, tile.position.y(), tile.position.x()));
        tiles
    }

    /// Cell occupied by a live character.
    #[must_use]
    pub fn character_position(room: &Room, kind: CharacterKind) -> Option<Position> {
        room.character_entity(kind).map(|entity| entity.position())
    }

    /// Characters still alive and inside the room, in control preference order.
    #[must_use]
    pub fn active_characters(room: &Room) -> Vec<CharacterKind> {
        CharacterKind::ALL
            .into_iter()
            .filter(|kind| room.character(*kind).is_some_and(CharacterSlot::is_active))
            .collect()
    }
}
