//! Level files: rectangular grids of single-character tokens.

use std::{
    fs,
    path::{Path, PathBuf},
};

use reef_core::{CharacterKind, EntityKind, Position};
use thiserror::Error;

/// Errors raised while reading level layouts.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The level contained no rows or only empty rows.
    #[error("level `{name}` is empty")]
    Empty {
        /// Name of the offending level.
        name: String,
    },
    /// The level placed the same character twice.
    #[error("level `{name}` places {character:?} more than once")]
    DuplicateCharacter {
        /// Name of the offending level.
        name: String,
        /// Character placed twice.
        character: CharacterKind,
    },
    /// A level file or directory could not be read.
    #[error("failed to read levels from {}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Pristine layout of a level, ready to be instantiated into a room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    name: String,
    width: u32,
    height: u32,
    placements: Vec<(EntityKind, Position)>,
}

impl Level {
    /// Parses a level from its textual layout.
    ///
    /// The width is the longest row; shorter rows are padded with water.
    /// Trailing empty lines are ignored. Spaces denote water and unknown
    /// tokens produce no entity.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, LevelError> {
        let name = name.into();
        let mut rows: Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            let _ = rows.pop();
        }

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(LevelError::Empty { name });
        }

        let mut placements = Vec::new();
        let mut seen: Vec<CharacterKind> = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, token) in row.chars().enumerate() {
                let Some(kind) = EntityKind::from_token(token) else {
                    continue;
                };
                if kind == EntityKind::Water {
                    continue;
                }
                if let Some(character) = kind.character() {
                    if seen.contains(&character) {
                        return Err(LevelError::DuplicateCharacter { name, character });
                    }
                    seen.push(character);
                }
                placements.push((kind, Position::new(to_coord(x), to_coord(y))));
            }
        }

        Ok(Self {
            name,
            width: to_extent(width),
            height: to_extent(rows.len()),
            placements,
        })
    }

    /// Reads every level file in `dir`, ordered by file name.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<Self>, LevelError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error(dir))? {
            let entry = entry.map_err(io_error(dir))?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .iter()
            .map(|path| {
                let text = fs::read_to_string(path).map_err(io_error(path))?;
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Self::parse(name, &text)
            })
            .collect()
    }

    /// Name the level was registered under, usually its file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Non-water entities in row-major order.
    #[must_use]
    pub fn placements(&self) -> &[(EntityKind, Position)] {
        &self.placements
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LevelError {
    let path = path.to_path_buf();
    move |source| LevelError::Io { path, source }
}

fn to_coord(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_extent(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
