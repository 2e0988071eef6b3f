//! Error types for the tables and their configuration

use thiserror::Error;

/// Errors returned by table operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Invalid key: {key}")]
    InvalidKey { key: String },

    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Table is full at capacity {capacity}")]
    TableFull { capacity: usize },
}

impl TableError {
    pub(crate) fn invalid(key: &str) -> Self {
        TableError::InvalidKey { key: key.to_string() }
    }

    pub(crate) fn not_found(key: &str) -> Self {
        TableError::KeyNotFound { key: key.to_string() }
    }
}

/// Errors raised while building a table or loading its configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Growth ladder is empty")]
    EmptyLadder,

    #[error("Growth ladder must strictly increase: {previous} is followed by {next}")]
    LadderNotIncreasing { previous: usize, next: usize },

    #[error("Capacity {capacity} is not prime")]
    NotPrime { capacity: usize },

    #[error("Capacity {capacity} is outside [{min}, {max}]")]
    CapacityOutOfRange { capacity: usize, min: usize, max: usize },

    #[error("Keys '{first}' and '{second}' both hash to slot {slot} at capacity {capacity}")]
    PerfectHashCollision { first: &'static str, second: &'static str, slot: usize, capacity: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type TableResult<T> = std::result::Result<T, TableError>;
