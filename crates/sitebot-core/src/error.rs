//! Configuration error types.

/// Errors raised while resolving configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable: {name}")]
    MissingVar { name: String },

    /// An environment variable is present but cannot be parsed.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
