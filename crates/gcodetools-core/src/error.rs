//! Error handling for GcodeTools
//!
//! Provides the error types shared by every layer of the workspace:
//! - G-code errors (parsing, container access)
//! - Configuration errors (loading, validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// G-code error type
///
/// Represents errors raised while parsing G-code text or while
/// manipulating a parsed block sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// Arc given in radius form (`R`), which cannot be decomposed
    #[error("Unsupported arc at line {line_number}: radius form is not supported: {line}")]
    UnsupportedArc {
        /// The line number of the arc move.
        line_number: usize,
        /// The raw text of the offending line.
        line: String,
    },

    /// Arc move without center offsets for the active plane
    #[error("Missing arc center at line {line_number}: {line}")]
    MissingArcCenter {
        /// The line number of the arc move.
        line_number: usize,
        /// The raw text of the offending line.
        line: String,
    },

    /// Parameter value could not be read as a number
    #[error("Invalid parameter '{param}' at line {line_number}: '{value}' in {line}")]
    InvalidParameter {
        /// The line number where the parameter was found.
        line_number: usize,
        /// The parameter letter or key.
        param: String,
        /// The value text that failed to parse.
        value: String,
        /// The raw text of the offending line.
        line: String,
    },

    /// Block index outside of the sequence
    #[error("Index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The length of the sequence.
        len: usize,
    },

    /// Object index not present in the object registry
    #[error("Unknown object index {index} ({registered} registered)")]
    UnknownObject {
        /// The requested object index.
        index: usize,
        /// Number of objects in the registry.
        registered: usize,
    },
}

impl GcodeError {
    /// Line number the error refers to, if any
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::UnsupportedArc { line_number, .. }
            | Self::MissingArcCenter { line_number, .. }
            | Self::InvalidParameter { line_number, .. } => Some(*line_number),
            Self::IndexOutOfBounds { .. } | Self::UnknownObject { .. } => None,
        }
    }

    /// Raw line text the error refers to, if any
    pub fn line(&self) -> Option<&str> {
        match self {
            Self::UnsupportedArc { line, .. }
            | Self::MissingArcCenter { line, .. }
            | Self::InvalidParameter { line, .. } => Some(line),
            Self::IndexOutOfBounds { .. } | Self::UnknownObject { .. } => None,
        }
    }

    /// Whether the parse can continue past this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is invalid.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for GcodeTools
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// G-code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a G-code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Gcode(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
