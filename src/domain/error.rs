//! Domain error types

use thiserror::Error;

/// Error when microphone access cannot be obtained
#[derive(Debug, Clone, Error)]
pub enum PermissionError {
    #[error("Microphone access was denied")]
    Denied,

    #[error("Microphone access is permanently denied; enable it in system settings")]
    PermanentlyDenied,
}

/// Error from the persisted catalog store
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to read catalog store: {0}")]
    ReadError(String),

    #[error("Failed to write catalog store: {0}")]
    WriteError(String),

    #[error("Failed to serialize catalog: {0}")]
    SerializeError(String),

    #[error("Failed to deserialize catalog: {0}")]
    DeserializeError(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
