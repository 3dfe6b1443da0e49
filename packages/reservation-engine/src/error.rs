//! Typed errors for the reservation engine.
//!
//! Normalization, matching and diffing never fail: malformed values degrade
//! to `None` or a default. Errors only exist at the edges, where raw text is
//! parsed into JSON or configuration values are read from strings.

use thiserror::Error;

/// Errors that can occur at the engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Raw extraction text was not valid JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Raw extraction parsed, but the top level is not an object
    #[error("expected a JSON object at the top level, got {found}")]
    NotAnObject { found: &'static str },

    /// A configuration value could not be interpreted
    #[error("invalid config value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    /// Entity kind name not recognised
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
