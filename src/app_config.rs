//! Host configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strictly_chess::BoardSettings;
use tracing::{debug, info, instrument};

/// Who moves a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves with the mouse.
    Human,
    /// Moves through the external move API.
    Engine,
}

impl PlayerKind {
    /// Whether this side moves with the pointer.
    pub fn is_human(self) -> bool {
        self == PlayerKind::Human
    }
}

/// Configuration of the terminal chessboard.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Board widget settings.
    #[serde(default)]
    board: BoardSettings,

    /// Starting position; empty means the standard position.
    #[serde(default)]
    start_fen: String,

    /// Name recorded for white in PGN output.
    #[serde(default = "default_white_name")]
    white_name: String,

    /// Name recorded for black in PGN output.
    #[serde(default = "default_black_name")]
    black_name: String,

    /// Delay between a move and its termination check, in milliseconds.
    #[serde(default = "default_termination_delay_ms")]
    termination_delay_ms: u64,

    /// Thinking time of the built-in engine, in milliseconds.
    #[serde(default = "default_engine_delay_ms")]
    engine_delay_ms: u64,

    /// Log file for the terminal UI.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

#[instrument]
fn default_white_name() -> String {
    "White".to_string()
}

#[instrument]
fn default_black_name() -> String {
    "Black".to_string()
}

#[instrument]
fn default_termination_delay_ms() -> u64 {
    50
}

#[instrument]
fn default_engine_delay_ms() -> u64 {
    300
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_chessboard.log")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            board: BoardSettings::default(),
            start_fen: String::new(),
            white_name: default_white_name(),
            black_name: default_black_name(),
            termination_delay_ms: default_termination_delay_ms(),
            engine_delay_ms: default_engine_delay_ms(),
            log_file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            white = %config.white_name,
            black = %config.black_name,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        fen: Option<String>,
        reversed: bool,
        white: Option<PlayerKind>,
        black: Option<PlayerKind>,
    ) -> Self {
        if let Some(fen) = fen {
            self.start_fen = fen;
        }
        if reversed {
            self.board.reversed = true;
        }
        if let Some(white) = white {
            self.board.white_player_human = white.is_human();
        }
        if let Some(black) = black {
            self.board.black_player_human = black.is_human();
        }
        self
    }

    /// Termination check delay.
    pub fn termination_delay(&self) -> Duration {
        Duration::from_millis(self.termination_delay_ms)
    }

    /// Engine thinking time.
    pub fn engine_delay(&self) -> Duration {
        Duration::from_millis(self.engine_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
