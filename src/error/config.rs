use thiserror::Error;

/// Errors raised while loading configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but holds an unusable value.
    #[error("Invalid value for environment variable {name}: '{value}'")]
    InvalidEnvVar {
        /// Name of the offending variable
        name: String,
        /// The raw value that failed to parse
        value: String,
    },

    /// The level table file could not be read or deserialized.
    #[error("Failed to load level table from '{path}': {reason}")]
    LevelTable {
        /// Path of the level table file
        path: String,
        /// Why loading failed
        reason: String,
    },
}
