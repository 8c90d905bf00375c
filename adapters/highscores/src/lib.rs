#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistent top-ten table of completed sessions.
//!
//! The table lives in a plain text file with one `name;timeMillis;moves`
//! entry per line. Faster sessions rank higher; ties are broken by the
//! number of moves.

use std::{
    cmp::Ordering,
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use log::{debug, warn};
use thiserror::Error;

/// Number of entries kept in the table.
pub const CAPACITY: usize = 10;

/// Name recorded when the player leaves theirs blank.
pub const DEFAULT_NAME: &str = "Player";

/// Errors raised by the high-score keeper.
#[derive(Debug, Error)]
pub enum HighscoreError {
    /// A line did not match the `name;timeMillis;moves` layout.
    #[error("malformed highscore line `{line}`")]
    Malformed {
        /// Offending line.
        line: String,
    },
    /// The table file could not be written.
    #[error("failed to write highscores to {}", path.display())]
    Io {
        /// Path of the table file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// One completed session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highscore {
    name: String,
    time_millis: u64,
    moves: u32,
}

impl Highscore {
    /// Creates an entry; blank names become [`DEFAULT_NAME`].
    #[must_use]
    pub fn new(name: &str, time_millis: u64, moves: u32) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            DEFAULT_NAME.to_owned()
        } else {
            // The field separator cannot appear inside a name.
            name.replace(';', "_")
        };
        Self {
            name,
            time_millis,
            moves,
        }
    }

    /// Player name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session play time in milliseconds.
    #[must_use]
    pub const fn time_millis(&self) -> u64 {
        self.time_millis
    }

    /// Successful steps taken during the session.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }
}

impl Ord for Highscore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time_millis
            .cmp(&other.time_millis)
            .then(self.moves.cmp(&other.moves))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Highscore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Highscore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.name, self.time_millis, self.moves)
    }
}

impl FromStr for Highscore {
    type Err = HighscoreError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || HighscoreError::Malformed {
            line: line.to_owned(),
        };
        let mut fields = line.split(';');
        let (Some(name), Some(time), Some(moves), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };
        let time_millis = time.trim().parse().map_err(|_| malformed())?;
        let moves = moves.trim().parse().map_err(|_| malformed())?;
        Ok(Self::new(name, time_millis, moves))
    }
}

/// High-score table bound to a file.
#[derive(Clone, Debug)]
pub struct HighscoreTable {
    path: PathBuf,
    scores: Vec<Highscore>,
}

impl HighscoreTable {
    /// Opens the table stored at `path`.
    ///
    /// A missing file yields an empty table. Malformed lines are skipped and
    /// failures to read the file or create its directory are logged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            if let Err(error) = fs::create_dir_all(parent) {
                warn!(
                    "could not create highscore directory {}: {error}",
                    parent.display()
                );
            }
        }

        let mut scores = Vec::new();
        match fs::read_to_string(&path) {
            Ok(text) => {
                for line in text.lines().filter(|line| !line.trim().is_empty()) {
                    match line.parse::<Highscore>() {
                        Ok(score) => scores.push(score),
                        Err(error) => warn!("skipping highscore: {error}"),
                    }
                }
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!("no highscores at {} yet", path.display());
            }
            Err(error) => warn!("could not read highscores from {}: {error}", path.display()),
        }
        scores.sort();
        scores.truncate(CAPACITY);
        Self { path, scores }
    }

    /// Entries from best to worst.
    #[must_use]
    pub fn scores(&self) -> &[Highscore] {
        &self.scores
    }

    /// File the table is stored in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a session result and writes the table back to disk.
    ///
    /// Returns the entry's rank, counting from zero, when it made the table.
    pub fn record(
        &mut self,
        name: &str,
        elapsed: Duration,
        moves: u32,
    ) -> Result<Option<usize>, HighscoreError> {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let score = Highscore::new(name, millis, moves);
        let rank = self.scores.partition_point(|existing| existing <= &score);
        self.scores.insert(rank, score);
        self.scores.truncate(CAPACITY);
        self.save()?;
        Ok((rank < CAPACITY).then_some(rank))
    }

    /// Writes every entry to the table file.
    pub fn save(&self) -> Result<(), HighscoreError> {
        let mut text = String::new();
        for score in &self.scores {
            text.push_str(&score.to_string());
            text.push('\n');
        }
        fs::write(&self.path, text).map_err(|source| HighscoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
