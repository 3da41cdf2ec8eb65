//! Error types for Paybridge.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Startup errors
    #[error("Config validation error: {field} {reason}")]
    Config { field: &'static str, reason: String },

    // Request errors
    #[error("Invalid request: {field} {reason}")]
    InvalidRequest { field: String, reason: String },

    // Payment processor errors
    #[error("Payment processor error: {message}")]
    Processor {
        status: Option<u16>,
        message: String,
    },

    // Infrastructure errors
    #[error("Event bus error: {0}")]
    EventBus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Config {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// HTTP-style status used when the error is reported back to a caller.
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidRequest { .. } | Error::Serialization(_) => 400,
            Error::Processor { status, .. } => status.unwrap_or(502),
            Error::Config { .. } | Error::EventBus(_) | Error::Io(_) => 500,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_field() {
        let err = Error::config("STRIPE_SECRET_KEY", "is required");
        assert_eq!(
            err.to_string(),
            "Config validation error: STRIPE_SECRET_KEY is required"
        );
    }

    #[test]
    fn test_processor_status_defaults_to_bad_gateway() {
        let err = Error::Processor {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), 502);

        let err = Error::Processor {
            status: Some(400),
            message: "Invalid currency: zzz".to_string(),
        };
        assert_eq!(err.status(), 400);
    }
}
