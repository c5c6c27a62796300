use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse id from String
    ///
    /// Stored Discord/Roblox IDs are TEXT columns; one that does not parse
    /// back to u64 means the row was written by something else.
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// A JSON column held a value of the wrong shape.
    ///
    /// History maps and winner lists live in JSON columns; a decode failure
    /// means the row was corrupted outside the repository layer.
    #[error("Corrupt JSON in column '{column}': {source}")]
    CorruptJsonColumn {
        /// Name of the offending column
        column: &'static str,
        /// The underlying decode error
        #[source]
        source: serde_json::Error,
    },
}
