#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Reef engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative room store, and the resolver systems. Adapters submit
//! [`Command`] values (usually derived from an [`Input`]), the engine resolves
//! them against the room, and the resolvers broadcast [`Event`] values that a
//! presentation layer consumes to redraw. Nothing in this crate knows about
//! pixels, windows, or files.

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column (`x`) and row (`y`).
///
/// Rows grow downward, so gravity moves entities towards larger `y` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Sentinel assigned to entities once they leave the room.
    pub const OFF_GRID: Position = Position::new(-1, -1);

    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell one step along `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Cell directly beneath this one.
    #[must_use]
    pub const fn below(self) -> Self {
        self.step(Direction::South)
    }

    /// Cell directly above this one.
    #[must_use]
    pub const fn above(self) -> Self {
        self.step(Direction::North)
    }

    /// Reports whether the position is the off-grid sentinel.
    #[must_use]
    pub const fn is_off_grid(&self) -> bool {
        self.x == Self::OFF_GRID.x && self.y == Self::OFF_GRID.y
    }
}

/// Cardinal movement directions available to the controlled character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit vector `(dx, dy)` for the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Whether the direction runs along a row.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }

    /// Whether the direction runs along a column.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Unique identifier assigned to an entity when it enters a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Weight class that decides push and crush eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weight {
    /// Fixed tiles and characters; never fall and never ride a push as cargo.
    None,
    /// Cargo a small fish can carry and push.
    Light,
    /// Cargo only a big fish can push; crushes what it lands on.
    Heavy,
}

/// The two playable characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterKind {
    /// Strong fish that pushes heavy cargo but cannot squeeze through holes.
    BigFish,
    /// Agile fish that slips through holes but only pushes light cargo.
    SmallFish,
}

impl CharacterKind {
    /// Both characters in the order the engine prefers to control them.
    pub const ALL: [CharacterKind; 2] = [CharacterKind::BigFish, CharacterKind::SmallFish];

    /// Entity kind that represents the character inside a room.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::BigFish => EntityKind::BigFish,
            Self::SmallFish => EntityKind::SmallFish,
        }
    }

    /// Whether the character fits through hole walls.
    #[must_use]
    pub const fn can_pass_hole(self) -> bool {
        matches!(self, Self::SmallFish)
    }

    /// The other playable character.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::BigFish => Self::SmallFish,
            Self::SmallFish => Self::BigFish,
        }
    }
}

/// Kinds of entities that may populate a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Background water present under every cell.
    Water,
    /// Solid, indestructible wall.
    Wall,
    /// Wall with a hole only the small fish fits through.
    HoleWall,
    /// Horizontal steel beam.
    SteelHorizontal,
    /// Vertical steel beam.
    SteelVertical,
    /// Light cup.
    Cup,
    /// Heavy rock; pushing it sideways disturbs a crab.
    Rock,
    /// Heavy anchor.
    Anchor,
    /// Light bomb that explodes when it lands after a fall.
    Bomb,
    /// Heavy trap; lethal to the big fish, passable by the small fish.
    Trap,
    /// Light log that never falls and breaks under heavy cargo.
    Log,
    /// Wandering crab.
    Crab,
    /// Playable small fish.
    SmallFish,
    /// Playable big fish.
    BigFish,
    /// Transient visual effect.
    Effect,
}

impl EntityKind {
    /// Maps a level-file token to the kind it denotes.
    ///
    /// Space maps to [`EntityKind::Water`]; unknown tokens map to `None`.
    #[must_use]
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            ' ' => Some(Self::Water),
            'W' => Some(Self::Wall),
            'X' => Some(Self::HoleWall),
            'H' => Some(Self::SteelHorizontal),
            'V' => Some(Self::SteelVertical),
            'C' => Some(Self::Cup),
            'R' => Some(Self::Rock),
            'A' => Some(Self::Anchor),
            'b' => Some(Self::Bomb),
            'T' => Some(Self::Trap),
            'Y' => Some(Self::Log),
            'K' => Some(Self::Crab),
            'S' => Some(Self::SmallFish),
            'B' => Some(Self::BigFish),
            _ => None,
        }
    }

    /// Level-file token for the kind. Effects have no token and use `*`.
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Water => ' ',
            Self::Wall => 'W',
            Self::HoleWall => 'X',
            Self::SteelHorizontal => 'H',
            Self::SteelVertical => 'V',
            Self::Cup => 'C',
            Self::Rock => 'R',
            Self::Anchor => 'A',
            Self::Bomb => 'b',
            Self::Trap => 'T',
            Self::Log => 'Y',
            Self::Crab => 'K',
            Self::SmallFish => 'S',
            Self::BigFish => 'B',
            Self::Effect => '*',
        }
    }

    /// Paint priority; higher layers win top-of-stack queries.
    #[must_use]
    pub const fn layer(self) -> u8 {
        match self {
            Self::Water => 0,
            Self::Wall | Self::SteelHorizontal | Self::SteelVertical => 1,
            Self::HoleWall
            | Self::Cup
            | Self::Rock
            | Self::Anchor
            | Self::Bomb
            | Self::Trap
            | Self::Log => 2,
            Self::Crab => 3,
            Self::SmallFish | Self::BigFish => 4,
            Self::Effect => 10,
        }
    }

    /// Weight class of the kind.
    #[must_use]
    pub const fn weight(self) -> Weight {
        match self {
            Self::Cup | Self::Bomb | Self::Log | Self::Crab => Weight::Light,
            Self::Rock | Self::Anchor | Self::Trap => Weight::Heavy,
            Self::Water
            | Self::Wall
            | Self::HoleWall
            | Self::SteelHorizontal
            | Self::SteelVertical
            | Self::SmallFish
            | Self::BigFish
            | Self::Effect => Weight::None,
        }
    }

    /// Whether characters and cargo may enter the cell regardless of occupant.
    #[must_use]
    pub const fn is_transposable(self) -> bool {
        matches!(self, Self::Water | Self::Effect)
    }

    /// Whether the kind participates in gravity and push chains.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        matches!(
            self,
            Self::Cup
                | Self::Rock
                | Self::Anchor
                | Self::Bomb
                | Self::Trap
                | Self::Log
                | Self::Crab
        )
    }

    /// Whether a character may shove the kind along as push cargo.
    #[must_use]
    pub const fn is_pushable(self) -> bool {
        self.is_movable() && !matches!(self, Self::Crab)
    }

    /// Whether the kind conditionally lets specific characters through.
    #[must_use]
    pub const fn is_passable_gate(self) -> bool {
        matches!(self, Self::HoleWall | Self::Trap)
    }

    /// Whether the kind breaks when heavy cargo lands on it.
    #[must_use]
    pub const fn is_crushable(self) -> bool {
        matches!(self, Self::Log)
    }

    /// Whether the kind can trigger an explosion.
    #[must_use]
    pub const fn is_explodable(self) -> bool {
        matches!(self, Self::Bomb)
    }

    /// Whether explosions leave the kind untouched.
    #[must_use]
    pub const fn is_indestructible(self) -> bool {
        matches!(self, Self::Wall | Self::HoleWall)
    }

    /// Playable character represented by the kind, if any.
    #[must_use]
    pub const fn character(self) -> Option<CharacterKind> {
        match self {
            Self::BigFish => Some(CharacterKind::BigFish),
            Self::SmallFish => Some(CharacterKind::SmallFish),
            _ => None,
        }
    }
}

/// Direction a character's sprite faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward decreasing column indices.
    Left,
    /// Facing toward increasing column indices.
    #[default]
    Right,
}

/// Lifecycle state of a playable character instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// The character is alive and inside the grid.
    #[default]
    Alive,
    /// The character was crushed, exploded, trapped, or bitten.
    Dead,
    /// The character swam out through the grid boundary.
    Out,
}

impl Lifecycle {
    /// Whether the state can never return to [`Lifecycle::Alive`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dead | Self::Out)
    }
}

/// Reason a character died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Cargo landed on the character.
    Crushed,
    /// The character was caught in a blast.
    Exploded,
    /// The big fish touched a trap.
    Trapped,
    /// A crab walked into the small fish.
    Bitten,
}

/// Transient visual effects spawned by the resolvers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Blast cloud left by an explosion.
    Boom,
    /// Marker left where a character died.
    Blood,
    /// Debris left by a crushed tile.
    Splinters,
}

impl EffectKind {
    /// Number of gravity ticks the effect stays in the room.
    #[must_use]
    pub const fn lifetime_ticks(self) -> u32 {
        match self {
            Self::Boom => 8,
            Self::Blood => 4,
            Self::Splinters => 3,
        }
    }
}

/// Single update-cycle input accepted from the input collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Input {
    /// No key was pressed; only the clock advances.
    #[default]
    Idle,
    /// The controlled character attempts a step.
    Step(Direction),
    /// Control passes to the other character.
    SwitchCharacter,
}

/// Commands that express all permissible engine mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests that the controlled character step in the given direction.
    Step {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Passes control to the other live character.
    SwitchCharacter,
    /// Advances the simulation clock by one gravity tick.
    Tick,
    /// Reloads the current level from its pristine layout.
    RestartLevel,
}

impl Input {
    /// Expands the input into the command batch of a full update cycle.
    ///
    /// Every cycle ends with exactly one [`Command::Tick`].
    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        match self {
            Self::Idle => vec![Command::Tick],
            Self::Step(direction) => vec![Command::Step { direction }, Command::Tick],
            Self::SwitchCharacter => vec![Command::SwitchCharacter, Command::Tick],
        }
    }
}

/// Events broadcast by the resolvers after mutating a room.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// A level was loaded into a fresh room.
    LevelLoaded {
        /// Name of the level file.
        name: String,
        /// Number of columns in the room.
        width: u32,
        /// Number of rows in the room.
        height: u32,
    },
    /// The gravity clock advanced.
    TimeAdvanced {
        /// Index of the tick that just ran, starting at one.
        tick: u64,
    },
    /// An entity was relocated.
    EntityMoved {
        /// Identifier of the moved entity.
        entity: EntityId,
        /// Kind of the moved entity.
        kind: EntityKind,
        /// Cell the entity occupied before moving.
        from: Position,
        /// Cell the entity occupies after moving.
        to: Position,
    },
    /// An entity was inserted into the room.
    EntitySpawned {
        /// Identifier assigned to the entity.
        entity: EntityId,
        /// Kind of the new entity.
        kind: EntityKind,
        /// Cell the entity occupies.
        at: Position,
    },
    /// An entity was deleted from the room.
    EntityRemoved {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Kind of the removed entity.
        kind: EntityKind,
        /// Last cell the entity occupied.
        at: Position,
    },
    /// A character's step was rejected; no position changed.
    MoveBlocked {
        /// Character that attempted to move.
        character: CharacterKind,
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// A character turned around.
    FacingChanged {
        /// Character that turned.
        character: CharacterKind,
        /// New facing.
        facing: Facing,
    },
    /// Heavy cargo broke a crushable tile.
    ObjectCrushed {
        /// Entity that landed on the tile.
        crusher: EntityId,
        /// Kind of the destroyed tile.
        crushed: EntityKind,
        /// Cell the tile occupied.
        at: Position,
    },
    /// A bomb detonated.
    BombExploded {
        /// Centre cell of the blast.
        center: Position,
    },
    /// A character died.
    CharacterDied {
        /// Character that died.
        character: CharacterKind,
        /// Last cell the character occupied.
        at: Position,
        /// What killed the character.
        cause: DeathCause,
    },
    /// A character left the grid through its boundary.
    CharacterExited {
        /// Character that left.
        character: CharacterKind,
        /// Last in-grid cell the character occupied.
        at: Position,
    },
    /// Control passed to another character.
    ControlSwitched {
        /// Character now under control.
        character: CharacterKind,
    },
    /// Both characters left the grid.
    LevelCompleted {
        /// Name of the completed level.
        name: String,
        /// Successful steps taken in the level.
        moves: u32,
        /// Gravity ticks spent in the level.
        ticks: u64,
    },
    /// A character died; the level will be reloaded.
    LevelFailed {
        /// Name of the failed level.
        name: String,
    },
    /// The last level was completed.
    GameCompleted {
        /// Successful steps taken across the whole session.
        moves: u32,
        /// Gravity ticks spent across the whole session.
        ticks: u64,
    },
}

/// One drawable tile handed to the render collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderTile {
    /// Kind of entity to draw.
    pub kind: EntityKind,
    /// Cell the entity occupies.
    pub position: Position,
    /// Paint priority of the entity.
    pub layer: u8,
    /// Facing of playable characters; `None` for every other kind.
    pub facing: Option<Facing>,
    /// Effect variant for [`EntityKind::Effect`] tiles.
    pub effect: Option<EffectKind>,
}

#[cfg(test)]
mod tests {
    use super::{CharacterKind, Direction, EntityKind, Facing, Input, Position, Weight};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn step_applies_unit_offsets() {
        let origin = Position::new(4, 4);
        assert_eq!(origin.step(Direction::North), Position::new(4, 3));
        assert_eq!(origin.step(Direction::East), Position::new(5, 4));
        assert_eq!(origin.below(), Position::new(4, 5));
        assert_eq!(origin.step(Direction::West), Position::new(3, 4));
    }

    #[test]
    fn off_grid_sentinel_is_recognised() {
        assert!(Position::OFF_GRID.is_off_grid());
        assert!(!Position::new(0, 0).is_off_grid());
    }

    #[test]
    fn every_token_maps_back_to_its_kind() {
        for token in " WXHVCRAbTYKSB".chars() {
            let kind = EntityKind::from_token(token).expect("known token");
            assert_eq!(kind.token(), token);
        }
        assert_eq!(EntityKind::from_token('?'), None);
    }

    #[test]
    fn effects_paint_above_characters() {
        assert!(EntityKind::Effect.layer() > EntityKind::BigFish.layer());
        assert!(EntityKind::BigFish.layer() > EntityKind::Crab.layer());
        assert!(EntityKind::Crab.layer() > EntityKind::Rock.layer());
    }

    #[test]
    fn weightless_kinds_never_move() {
        for kind in [
            EntityKind::Water,
            EntityKind::Wall,
            EntityKind::HoleWall,
            EntityKind::BigFish,
            EntityKind::Effect,
        ] {
            assert_eq!(kind.weight(), Weight::None);
            assert!(!kind.is_movable());
        }
    }

    #[test]
    fn crabs_fall_but_are_not_cargo() {
        assert!(EntityKind::Crab.is_movable());
        assert!(!EntityKind::Crab.is_pushable());
        assert!(EntityKind::Trap.is_pushable());
    }

    #[test]
    fn only_small_fish_passes_holes() {
        assert!(CharacterKind::SmallFish.can_pass_hole());
        assert!(!CharacterKind::BigFish.can_pass_hole());
        assert_eq!(CharacterKind::BigFish.other(), CharacterKind::SmallFish);
    }

    #[test]
    fn every_input_ends_with_a_tick() {
        for input in [
            Input::Idle,
            Input::Step(Direction::East),
            Input::SwitchCharacter,
        ] {
            let commands = input.into_commands();
            assert_eq!(commands.last(), Some(&super::Command::Tick));
        }
    }

    #[test]
    fn position_round_trips_through_bincode() {
        assert_round_trip(&Position::new(-1, 7));
    }

    #[test]
    fn character_kind_round_trips_through_bincode() {
        assert_round_trip(&CharacterKind::SmallFish);
        assert_round_trip(&Facing::Left);
    }
}
