use std::{fmt, io, num::ParseIntError};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum RetentionError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Custom error: {0}")]
    Custom(String),
    /// A node or connection endpoint that does not name a record in the snapshot. This is a
    /// corrupt-snapshot or programming error and is never recovered from inside the engine.
    #[error("Invalid node: {0}")]
    InvalidNode(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RetentionError {
    fn from(src: toml::de::Error) -> RetentionError {
        RetentionError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for RetentionError {
    fn from(src: toml::ser::Error) -> RetentionError {
        RetentionError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for RetentionError {
    fn from(src: JsonError) -> RetentionError {
        RetentionError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<ParseIntError> for RetentionError {
    fn from(src: ParseIntError) -> RetentionError {
        RetentionError::Serialization(format!("Invalid integer: {src}"))
    }
}

impl From<io::Error> for RetentionError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => RetentionError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => RetentionError::PermissionDenied,
            _ => RetentionError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for RetentionError {
    fn from(x: fmt::Error) -> Self {
        RetentionError::Custom(format!("{x}"))
    }
}
