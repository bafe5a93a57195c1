//! Configuration file loading for chess-play.
//!
//! Settings come from `chess-play.toml` in the current directory, or from
//! the file named by `--config`. Every field has a default, so an empty or
//! missing file gives a human playing White against a depth-3 minimax engine.

use chess_ai::{Engine, Strategy, DEFAULT_DEPTH};
use chess_model::{Color, FenError};
use chess_rules::GameState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deepest search the configuration accepts.
pub const MAX_DEPTH: u8 = 6;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Search depth outside 1..=MAX_DEPTH.
    #[error("Search depth must be between 1 and {max}, got {0}", max = MAX_DEPTH)]
    InvalidDepth(u8),
    /// The starting position could not be set up.
    #[error("Invalid start position: {0}")]
    InvalidFen(#[from] FenError),
}

/// Which move-selection strategy the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyName {
    #[default]
    Minimax,
    Greedy,
}

/// Which side, if any, is played from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HumanSide {
    #[default]
    White,
    Black,
    /// The engine plays both sides.
    None,
}

impl HumanSide {
    pub fn plays(self, color: Color) -> bool {
        match self {
            HumanSide::White => color == Color::White,
            HumanSide::Black => color == Color::Black,
            HumanSide::None => false,
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Defaults to minimax.
    #[serde(default)]
    pub strategy: StrategyName,
    /// Search depth in plies. Ignored by the greedy strategy. Defaults to 3.
    #[serde(default = "default_depth")]
    pub depth: u8,
}

fn default_depth() -> u8 {
    DEFAULT_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            strategy: StrategyName::default(),
            depth: default_depth(),
        }
    }
}

impl EngineConfig {
    pub fn strategy(&self) -> Strategy {
        match self.strategy {
            StrategyName::Minimax => Strategy::Minimax { depth: self.depth },
            StrategyName::Greedy => Strategy::Greedy,
        }
    }
}

/// Main chess-play configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlayConfig {
    /// Side played from the terminal. Defaults to white.
    #[serde(default)]
    pub human: HumanSide,
    /// Starting position as FEN. Defaults to the standard position.
    #[serde(default)]
    pub start_fen: Option<String>,
    /// The game is abandoned after this many half-moves. Defaults to 300.
    #[serde(default = "default_max_plies")]
    pub max_plies: u32,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_max_plies() -> u32 {
    300
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            human: HumanSide::default(),
            start_fen: None,
            max_plies: default_max_plies(),
            engine: EngineConfig::default(),
        }
    }
}

impl PlayConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`Self::config_path()`]
    /// is read if present and defaults are used otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = Self::config_path();
                if !default.exists() {
                    tracing::debug!("no {} found, using defaults", default.display());
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the default configuration path, `chess-play.toml`.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess-play.toml")
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.engine.depth;
        if self.engine.strategy == StrategyName::Minimax && !(1..=MAX_DEPTH).contains(&depth) {
            return Err(ConfigError::InvalidDepth(depth));
        }
        if let Some(fen) = &self.start_fen {
            GameState::from_fen(fen)?;
        }
        Ok(())
    }

    /// Sets up the starting position.
    pub fn initial_state(&self) -> Result<GameState, ConfigError> {
        match &self.start_fen {
            Some(fen) => Ok(GameState::from_fen(fen)?),
            None => Ok(GameState::new()),
        }
    }

    /// Returns the engine for `color`, or `None` if a human plays it.
    pub fn engine_for(&self, color: Color) -> Option<Engine> {
        (!self.human.plays(color)).then(|| Engine::new(color, self.engine.strategy()))
    }
}
