#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation helpers shared by Reef adapters.
//!
//! Adapters receive [`RenderTile`] values ordered back to front and either
//! paint them as text or map them to the names of the classic sprite set.

use std::fmt;

use reef_core::{CharacterKind, EffectKind, EntityKind, Event, Facing, RenderTile};

/// Glyph grid produced by painting a room's tiles back to front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    cells: Vec<char>,
}

impl Frame {
    /// Paints `tiles` in order onto a `width` by `height` water background.
    ///
    /// Tiles are expected in back-to-front order, so later tiles cover
    /// earlier ones. Tiles outside the frame are ignored.
    #[must_use]
    pub fn paint(width: u32, height: u32, tiles: &[RenderTile]) -> Self {
        let width = usize::try_from(width).unwrap_or(0);
        let height = usize::try_from(height).unwrap_or(0);
        let mut cells = vec![' '; width * height];
        for tile in tiles {
            let (Ok(x), Ok(y)) = (
                usize::try_from(tile.position.x()),
                usize::try_from(tile.position.y()),
            ) else {
                continue;
            };
            if x < width && y < height {
                cells[y * width + x] = glyph(tile);
            }
        }
        Self { width, cells }
    }

    /// Rows of the frame, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Text glyph for a tile; level tokens for entities, punctuation for effects.
#[must_use]
pub fn glyph(tile: &RenderTile) -> char {
    match tile.effect {
        Some(EffectKind::Boom) => '*',
        Some(EffectKind::Blood) => '%',
        Some(EffectKind::Splinters) => '~',
        None => tile.kind.token(),
    }
}

/// Sprite name of a tile in the classic image set.
#[must_use]
pub fn sprite_name(tile: &RenderTile) -> &'static str {
    let facing = tile.facing.unwrap_or_default();
    match (tile.kind, facing) {
        (EntityKind::BigFish, Facing::Right) => "bigFishRight",
        (EntityKind::BigFish, Facing::Left) => "bigFishLeft",
        (EntityKind::SmallFish, Facing::Right) => "smallFishRight",
        (EntityKind::SmallFish, Facing::Left) => "smallFishLeft",
        (EntityKind::Water, _) => "water",
        (EntityKind::Wall, _) => "wall",
        (EntityKind::HoleWall, _) => "holedWall",
        (EntityKind::SteelHorizontal, _) => "steelHorizontal",
        (EntityKind::SteelVertical, _) => "steelVertical",
        (EntityKind::Cup, _) => "cup",
        (EntityKind::Rock, _) => "stone",
        (EntityKind::Anchor, _) => "anchor",
        (EntityKind::Bomb, _) => "bomb",
        (EntityKind::Trap, _) => "trap",
        (EntityKind::Log, _) => "trunk",
        (EntityKind::Crab, _) => "krab",
        (EntityKind::Effect, _) => match tile.effect {
            Some(EffectKind::Blood) => "blood",
            Some(EffectKind::Splinters) => "splinters",
            Some(EffectKind::Boom) | None => "boom",
        },
    }
}

/// One-line status message for events worth showing to the player.
#[must_use]
pub fn describe(event: &Event) -> Option<String> {
    let message = match event {
        Event::LevelLoaded {
            name,
            width,
            height,
        } => format!("level {name} ({width}x{height})"),
        Event::ControlSwitched { character } => format!("controlling {}", label(*character)),
        Event::CharacterDied {
            character, cause, ..
        } => format!("{} died: {cause:?}", label(*character)),
        Event::CharacterExited { character, .. } => format!("{} is out", label(*character)),
        Event::BombExploded { center } => {
            format!("boom at ({}, {})", center.x(), center.y())
        }
        Event::LevelCompleted { name, moves, ticks } => {
            format!("level {name} completed: {moves} moves, {ticks} ticks")
        }
        Event::LevelFailed { name } => format!("level {name} failed, restarting"),
        Event::GameCompleted { moves, ticks } => {
            format!("all levels completed: {moves} moves, {ticks} ticks")
        }
        _ => return None,
    };
    Some(message)
}

fn label(character: CharacterKind) -> &'static str {
    match character {
        CharacterKind::BigFish => "big fish",
        CharacterKind::SmallFish => "small fish",
    }
}

/// Sink that shows frames and status lines to the player.
pub trait Presenter {
    /// Error raised when the output device fails.
    type Error;

    /// Shows one frame together with the events that produced it.
    fn present(&mut self, frame: &Frame, events: &[Event]) -> Result<(), Self::Error>;
}
