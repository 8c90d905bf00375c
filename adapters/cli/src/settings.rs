//! TOML configuration for the terminal player.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use reef_engine::EngineConfig;
use serde::Deserialize;

/// Top-level configuration file layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Engine tunables.
    pub(crate) engine: EngineConfig,
    /// High-score persistence.
    pub(crate) highscores: HighscoreSettings,
}

/// `[highscores]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct HighscoreSettings {
    /// File holding the high-score table.
    pub(crate) path: PathBuf,
}

impl Default for HighscoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/highscores.txt"),
        }
    }
}

impl Settings {
    /// Reads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }
}
