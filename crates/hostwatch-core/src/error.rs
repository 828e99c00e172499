//! Error types for the hostwatch system
//!
//! Only address validation fails visibly. Probe failures never surface
//! here: they are folded into [`crate::ProbeOutcome::Unreachable`].

use thiserror::Error;

/// Result type alias for hostwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the hostwatch system
#[derive(Error, Debug)]
pub enum Error {
    /// Input is not an IPv4 or IPv6 literal
    #[error("\"{input}\" is not a valid IP address")]
    InvalidAddress {
        /// The rejected input, as given
        input: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid address error
    pub fn invalid_address(input: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from address validation
    pub fn is_invalid_address(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_address_message_names_input() {
        let err = Error::invalid_address("not-an-ip");
        assert_eq!(err.to_string(), "\"not-an-ip\" is not a valid IP address");
        assert!(err.is_invalid_address());
    }

    #[test]
    fn config_error_is_not_address_error() {
        let err = Error::config("probe timeout must be > 0");
        assert!(!err.is_invalid_address());
        assert_eq!(
            err.to_string(),
            "Configuration error: probe timeout must be > 0"
        );
    }
}
