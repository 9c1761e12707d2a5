use std::path::PathBuf;

use crate::game::Player;

/// Errors raised by the game engine. All of them indicate a caller-side
/// contract violation, not a recoverable runtime condition.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("it is not {player}'s turn (current turn: {turn})")]
    IllegalMove { player: Player, turn: Player },

    #[error("the game already has a terminal status")]
    GameOver,

    #[error("slot {slot} is outside the board (0..9)")]
    SlotOutOfRange { slot: usize },
}

/// Errors that can occur during checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("no 'latest' symlink found in {0}")]
    NoLatestSymlink(PathBuf),

    #[error("failed to read metadata from {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse metadata from {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to save model: {0}")]
    ModelSave(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort a training run. There is no retry anywhere: an engine
/// error during a rollout means the episode roller itself is defective.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("engine rejected a move during rollout: {0}")]
    Engine(#[from] EngineError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
