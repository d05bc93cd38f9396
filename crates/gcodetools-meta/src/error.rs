//! Error types for the metadata engine

use thiserror::Error;

/// Dialect table error type
///
/// Raised while decoding or compiling a matcher table. Matching itself
/// never fails: a line without a match simply inherits state.
#[derive(Error, Debug)]
pub enum MatcherError {
    /// A pattern in a table row is not a valid regular expression
    #[error("Invalid pattern '{pattern}' for {event}: {source}")]
    InvalidPattern {
        /// The event the row belongs to.
        event: String,
        /// The offending pattern text.
        pattern: String,
        /// The regex compiler error.
        #[source]
        source: regex::Error,
    },

    /// A row declares a reporting offset below -1
    #[error("Invalid offset {offset} for {event}: expected -1 or a line count")]
    InvalidOffset { event: String, offset: i64 },

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
