//! Entity records and the capability traits the resolvers dispatch on.
//!
//! Every entity is a single [`Entity`] record tagged with an [`EntityKind`].
//! Behaviour that only some kinds have is exposed through narrow capability
//! views ([`Cargo`], [`Gate`], [`Fragile`], [`BombCharge`]) obtained from the
//! record, each implementing one trait.

use reef_core::{CharacterKind, EffectKind, EntityId, EntityKind, Position, Weight};

/// A single object living inside a room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: Position,
    state: EntityState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EntityState {
    Inert,
    Charge(BombCharge),
    Effect(EffectTimer),
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, position: Position) -> Self {
        let state = if kind.is_explodable() {
            EntityState::Charge(BombCharge::default())
        } else {
            EntityState::Inert
        };
        Self {
            id,
            kind,
            position,
            state,
        }
    }

    pub(crate) fn effect(id: EntityId, effect: EffectKind, position: Position) -> Self {
        Self {
            id,
            kind: EntityKind::Effect,
            position,
            state: EntityState::Effect(EffectTimer::new(effect)),
        }
    }

    /// Identifier assigned by the room.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind tag of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Cell the entity occupies, or [`Position::OFF_GRID`] once removed.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Paint priority of the entity.
    #[must_use]
    pub const fn layer(&self) -> u8 {
        self.kind.layer()
    }

    /// Whether other entities may enter the entity's cell freely.
    #[must_use]
    pub const fn is_transposable(&self) -> bool {
        self.kind.is_transposable()
    }

    /// Playable character represented by the entity, if any.
    #[must_use]
    pub const fn character(&self) -> Option<CharacterKind> {
        self.kind.character()
    }

    /// Effect variant of effect entities.
    #[must_use]
    pub const fn effect_kind(&self) -> Option<EffectKind> {
        match self.state {
            EntityState::Effect(timer) => Some(timer.kind()),
            _ => None,
        }
    }

    /// Gravity and push view of the entity, if it is movable.
    #[must_use]
    pub fn as_movable(&self) -> Option<Cargo> {
        self.kind.is_movable().then_some(Cargo(self.kind))
    }

    /// Gate view of the entity, if it conditionally admits characters.
    #[must_use]
    pub fn as_gate(&self) -> Option<Gate> {
        self.kind.is_passable_gate().then_some(Gate(self.kind))
    }

    /// Crush view of the entity, if heavy cargo breaks it.
    #[must_use]
    pub fn as_crushable(&self) -> Option<Fragile> {
        self.kind.is_crushable().then_some(Fragile(self.kind))
    }

    /// Arming state of bombs.
    #[must_use]
    pub const fn charge(&self) -> Option<BombCharge> {
        match self.state {
            EntityState::Charge(charge) => Some(charge),
            _ => None,
        }
    }

    /// Mutable arming state of bombs.
    pub fn charge_mut(&mut self) -> Option<&mut BombCharge> {
        match &mut self.state {
            EntityState::Charge(charge) => Some(charge),
            _ => None,
        }
    }

    pub(crate) fn timer_mut(&mut self) -> Option<&mut EffectTimer> {
        match &mut self.state {
            EntityState::Effect(timer) => Some(timer),
            _ => None,
        }
    }

    pub(crate) fn relocate(&mut self, to: Position) {
        self.position = to;
    }

    pub(crate) fn invalidate(mut self) -> Self {
        self.position = Position::OFF_GRID;
        self
    }
}

/// How a movable entity reacts when its gravity turn comes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallRule {
    /// Sinks into empty or transposable cells, otherwise rests.
    Sink,
    /// Sinks like [`FallRule::Sink`] but detonates when a fall ends on an obstacle.
    Detonate,
    /// Never falls on its own.
    Float,
}

/// Behaviour of entities that take part in gravity and push chains.
pub trait Movable {
    /// Weight class used by the push and crush rules.
    fn weight(&self) -> Weight;

    /// Whether a character may shove the entity as push cargo.
    fn is_pushable(&self) -> bool;

    /// Per-kind fall reaction.
    fn fall_rule(&self) -> FallRule;
}

/// Movable view of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cargo(EntityKind);

impl Movable for Cargo {
    fn weight(&self) -> Weight {
        self.0.weight()
    }

    fn is_pushable(&self) -> bool {
        self.0.is_pushable()
    }

    fn fall_rule(&self) -> FallRule {
        match self.0 {
            EntityKind::Bomb => FallRule::Detonate,
            EntityKind::Log => FallRule::Float,
            _ => FallRule::Sink,
        }
    }
}

/// Result of a character walking into a gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateContact {
    /// The character slips into the gate's cell.
    Pass,
    /// The gate blocks the character.
    Block,
    /// The gate kills the character on contact.
    Lethal,
}

/// Behaviour of tiles that admit some characters and stop others.
pub trait PassableGate {
    /// Verdict for `character` walking into the gate.
    fn contact(&self, character: CharacterKind) -> GateContact;

    /// Whether `character` may enter the gate's cell without harm.
    fn admits(&self, character: CharacterKind) -> bool {
        self.contact(character) == GateContact::Pass
    }
}

/// Gate view of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gate(EntityKind);

impl PassableGate for Gate {
    fn contact(&self, character: CharacterKind) -> GateContact {
        match (self.0, character) {
            (EntityKind::Trap, CharacterKind::BigFish) => GateContact::Lethal,
            (_, character) if character.can_pass_hole() => GateContact::Pass,
            _ => GateContact::Block,
        }
    }
}

/// Behaviour of tiles that break when heavy cargo lands on them.
pub trait Crushable {
    /// Effect left behind in the crushed tile's cell.
    fn remains(&self) -> EffectKind;
}

/// Crush view of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragile(EntityKind);

impl Crushable for Fragile {
    fn remains(&self) -> EffectKind {
        match self.0 {
            EntityKind::Log => EffectKind::Splinters,
            _ => EffectKind::Boom,
        }
    }
}

/// Behaviour of entities that may set off an explosion.
pub trait Explodable {
    /// Records one tick of free fall.
    fn fall(&mut self);

    /// Records that the entity came to rest without exploding.
    fn rest(&mut self);

    /// Whether landing on an obstacle of kind `obstacle` sets off a blast.
    fn detonates_on(&self, obstacle: EntityKind) -> bool;
}

/// Arming state of a bomb.
///
/// A bomb arms on its first tick of free fall and only detonates while the
/// fall streak is unbroken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BombCharge {
    armed: bool,
    falling: bool,
}

impl BombCharge {
    /// Whether the bomb has ever started falling.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the bomb fell during its previous gravity turn.
    #[must_use]
    pub const fn is_falling(&self) -> bool {
        self.falling
    }
}

impl Explodable for BombCharge {
    fn fall(&mut self) {
        self.armed = true;
        self.falling = true;
    }

    fn rest(&mut self) {
        self.falling = false;
    }

    fn detonates_on(&self, obstacle: EntityKind) -> bool {
        self.armed
            && self.falling
            && !obstacle.is_transposable()
            && !obstacle.is_indestructible()
            && obstacle.character().is_none()
    }
}

/// Remaining lifetime of a visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectTimer {
    kind: EffectKind,
    remaining: u32,
}

impl EffectTimer {
    /// Starts a timer with the effect's default lifetime (at least one tick).
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            remaining: kind.lifetime_ticks().max(1),
        }
    }

    /// Effect variant being timed.
    #[must_use]
    pub const fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Counts down one tick and reports whether the effect expired.
    pub(crate) fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}
