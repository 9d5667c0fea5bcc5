//! Error types for the breach lookup subsystem.

use thiserror::Error;

/// Errors raised while configuring or building breach lookups.
///
/// Per-page failures (401, empty body, malformed JSON, transport errors)
/// are not represented here: they end the pagination loop for one input
/// and are reported through tracing only.
#[derive(Debug, Error)]
pub enum BreachError {
    /// Account email or API key is empty
    #[error("Dehashed account email or API key is not set")]
    MissingCredentials,

    /// A module option is missing or malformed
    #[error("invalid option {option}: {reason}")]
    InvalidOption {
        /// Option name as known to the host registry
        option: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Configuration file or environment error
    #[error("configuration error: {0}")]
    Config(#[from] spectral_core::ConfigError),

    /// HTTP client construction or request building error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for breach lookup operations.
pub type Result<T> = std::result::Result<T, BreachError>;
