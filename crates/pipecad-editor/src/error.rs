//! Error types for the editor core.
//!
//! Normal flow-control outcomes (invalid placement, suppressed duplicate
//! clicks, empty selections, history boundaries) are not errors; they are
//! reported through return values. These variants cover data that cannot
//! be trusted, typically a corrupted saved design.

use thiserror::Error;

/// Errors surfaced to the persistence layer.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Design or template JSON could not be parsed.
    #[error("corrupt design data: {0}")]
    CorruptState(#[from] serde_json::Error),

    /// Two components in a loaded design share an id.
    #[error("duplicate component id in design: {0}")]
    DuplicateId(String),

    /// A loaded component has a NaN or infinite coordinate.
    #[error("component {0} has a non-finite position or rotation")]
    NonFiniteTransform(String),

    /// The editor configuration file is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
