//! Configuration loading errors.

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidVariable {
        var: String,
        value: String,
        reason: String,
    },
}
