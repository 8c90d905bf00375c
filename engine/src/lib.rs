#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session engine that owns the current room and drives the resolvers.
//!
//! The engine walks a sequence of levels. Each update cycle applies the
//! player's command, lets the crabs wander, runs one gravity tick, and then
//! checks whether the level was completed or failed. Completed levels advance
//! to the next one; failed levels are reloaded from their pristine layout.

mod config;

use std::time::Duration;

use log::{debug, info, warn};
use reef_core::{CharacterKind, Command, Event, Input};
use reef_system_crabs::CrabWander;
use reef_system_gravity::Gravity;
use reef_system_movement::Movement;
use reef_world::{query, Level, LevelStatus, Room, RoomError};
use thiserror::Error;

pub use config::{EngineConfig, DEFAULT_CRAB_SEED};

/// Errors raised while starting or reloading a session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The session was started without any level.
    #[error("no levels to play")]
    NoLevels,
    /// A level could not be turned into a room.
    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Progress counters of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Successful steps.
    pub moves: u32,
    /// Gravity ticks.
    pub ticks: u64,
}

/// A single play session across a sequence of levels.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    levels: Vec<Level>,
    current: usize,
    room: Room,
    controlled: Option<CharacterKind>,
    movement: Movement,
    gravity: Gravity,
    crabs: Option<CrabWander>,
    level_tally: Tally,
    session_tally: Tally,
    loads: u64,
    finished: bool,
}

impl Engine {
    /// Starts a session on the first of `levels`.
    pub fn new(
        levels: Vec<Level>,
        config: EngineConfig,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, EngineError> {
        let first = levels.first().ok_or(EngineError::NoLevels)?;
        let mut scratch = Vec::new();
        let room = Room::from_level(first, &mut scratch)?;
        for level in levels.iter().skip(1) {
            let _ = Room::from_level(level, &mut scratch)?;
        }

        let crabs = config
            .crab_wander
            .then(|| CrabWander::new(config.crab_seed));
        let mut engine = Self {
            config,
            levels,
            current: 0,
            room,
            controlled: None,
            movement: Movement::new(),
            gravity: Gravity::new(),
            crabs,
            level_tally: Tally::default(),
            session_tally: Tally::default(),
            loads: 0,
            finished: false,
        };
        engine.load(0, out_events);
        Ok(engine)
    }

    /// Runs one full update cycle for `input`.
    ///
    /// When the cycle's command ends the attempt (the level is completed or
    /// failed and a room is loaded), the cycle's tick is skipped so the fresh
    /// room starts untouched.
    pub fn update(&mut self, input: Input, out_events: &mut Vec<Event>) {
        let loads = self.loads;
        for command in input.into_commands() {
            if command == Command::Tick && self.loads != loads {
                debug!("room reloaded during the cycle, skipping its tick");
                continue;
            }
            self.apply(command, out_events);
        }
    }

    /// Applies a single command to the session.
    ///
    /// Commands are ignored once the last level has been completed.
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        if self.finished {
            return;
        }
        match command {
            Command::Step { direction } => {
                let Some(character) = self.controlled else {
                    return;
                };
                let outcome = self
                    .movement
                    .handle(&mut self.room, character, direction, out_events);
                debug!("{character:?} step {direction:?}: {outcome:?}");
                if outcome.is_move() {
                    self.level_tally.moves = self.level_tally.moves.saturating_add(1);
                }
                self.settle(out_events);
            }
            Command::SwitchCharacter => {
                let Some(current) = self.controlled else {
                    return;
                };
                let other = current.other();
                if query::active_characters(&self.room).contains(&other) {
                    self.controlled = Some(other);
                    out_events.push(Event::ControlSwitched { character: other });
                }
            }
            Command::Tick => {
                if let Some(crabs) = self.crabs.as_mut() {
                    crabs.handle(&mut self.room, out_events);
                }
                self.gravity.handle(&mut self.room, out_events);
                self.level_tally.ticks = self.level_tally.ticks.saturating_add(1);
                self.settle(out_events);
            }
            Command::RestartLevel => {
                info!("restarting level `{}`", self.room.name());
                self.load(self.current, out_events);
            }
        }
    }

    /// Room of the level being played.
    #[must_use]
    pub const fn room(&self) -> &Room {
        &self.room
    }

    /// Character receiving step commands, if any is still in play.
    #[must_use]
    pub const fn controlled(&self) -> Option<CharacterKind> {
        self.controlled
    }

    /// Index of the current level in the sequence.
    #[must_use]
    pub const fn level_index(&self) -> usize {
        self.current
    }

    /// Whether the last level has been completed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Counters of the current level attempt.
    #[must_use]
    pub const fn level_tally(&self) -> Tally {
        self.level_tally
    }

    /// Counters accumulated over every completed level.
    #[must_use]
    pub const fn session_tally(&self) -> Tally {
        self.session_tally
    }

    /// Play time of the completed levels, measured in ticks.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let millis = self
            .session_tally
            .ticks
            .saturating_mul(self.config.tick_millis);
        Duration::from_millis(millis)
    }

    fn settle(&mut self, out_events: &mut Vec<Event>) {
        self.refresh_control(out_events);
        match self.room.status() {
            LevelStatus::Playing => {}
            LevelStatus::Completed => self.complete(out_events),
            LevelStatus::Failed => {
                warn!("level `{}` failed, reloading", self.room.name());
                out_events.push(Event::LevelFailed {
                    name: self.room.name().to_owned(),
                });
                self.load(self.current, out_events);
            }
        }
    }

    fn complete(&mut self, out_events: &mut Vec<Event>) {
        let tally = self.level_tally;
        info!(
            "level `{}` completed in {} moves and {} ticks",
            self.room.name(),
            tally.moves,
            tally.ticks
        );
        out_events.push(Event::LevelCompleted {
            name: self.room.name().to_owned(),
            moves: tally.moves,
            ticks: tally.ticks,
        });
        self.session_tally.moves = self.session_tally.moves.saturating_add(tally.moves);
        self.session_tally.ticks = self.session_tally.ticks.saturating_add(tally.ticks);

        let next = self.current + 1;
        if next < self.levels.len() {
            self.load(next, out_events);
        } else {
            self.finished = true;
            self.controlled = None;
            info!(
                "all {} levels completed in {:?}",
                self.levels.len(),
                self.elapsed()
            );
            out_events.push(Event::GameCompleted {
                moves: self.session_tally.moves,
                ticks: self.session_tally.ticks,
            });
        }
    }

    fn load(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let Some(level) = self.levels.get(index) else {
            return;
        };
        // Every level was instantiated once when the session started.
        match Room::from_level(level, out_events) {
            Ok(room) => self.room = room,
            Err(error) => {
                warn!("level `{}` could not be loaded: {error}", level.name());
                return;
            }
        }
        info!("loaded level `{}`", level.name());
        self.loads = self.loads.wrapping_add(1);
        self.current = index;
        self.gravity = Gravity::new();
        self.level_tally = Tally::default();
        self.controlled = None;
        self.refresh_control(out_events);
    }

    fn refresh_control(&mut self, out_events: &mut Vec<Event>) {
        let active = query::active_characters(&self.room);
        if self
            .controlled
            .is_some_and(|character| active.contains(&character))
        {
            return;
        }
        let next = if active.contains(&self.config.start_with) && self.controlled.is_none() {
            Some(self.config.start_with)
        } else {
            active.first().copied()
        };
        self.controlled = next;
        if let Some(character) = next {
            debug!("control passes to {character:?}");
            out_events.push(Event::ControlSwitched { character });
        }
    }
}
