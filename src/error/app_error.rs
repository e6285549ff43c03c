use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Skipped deliveries (disabled adapters, filtered actions) are not errors and
/// never surface here; only transport failures and malformed input do.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The HTTP call to a destination could not be completed
    #[error("Transport failure for {service} ({url})")]
    Transport {
        service: String,
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The destination answered with a non-success status code
    #[error("Delivery to {service} ({url}) rejected with status {status}")]
    Delivery {
        service: String,
        url: String,
        status: u16,
    },

    /// Payload or request body could not be serialized
    #[error("Serialization failed")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Whether this error was produced while talking to a destination.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, AppError::Transport { .. } | AppError::Delivery { .. })
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Serialization { source: error }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = error.field().unwrap_or("settings").to_string();
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
