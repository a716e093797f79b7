use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shared error taxonomy that exchange error tables map onto.
///
/// The string form of each variant is the tag used inside descriptor
/// `exceptions` tables, e.g. `"DDoSProtection"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Catch-all business error
    ExchangeError,
    OrderNotFound,
    InsufficientFunds,
    DDoSProtection,
    AuthenticationError,
    PermissionDenied,
    InvalidOrder,
    InvalidNonce,
    ExchangeNotAvailable,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExchangeError => "ExchangeError",
            Self::OrderNotFound => "OrderNotFound",
            Self::InsufficientFunds => "InsufficientFunds",
            Self::DDoSProtection => "DDoSProtection",
            Self::AuthenticationError => "AuthenticationError",
            Self::PermissionDenied => "PermissionDenied",
            Self::InvalidOrder => "InvalidOrder",
            Self::InvalidNonce => "InvalidNonce",
            Self::ExchangeNotAvailable => "ExchangeNotAvailable",
        }
    }

    /// Whether repeating the same call later may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DDoSProtection | Self::InvalidNonce | Self::ExchangeNotAvailable
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ExchangeError" => Ok(Self::ExchangeError),
            "OrderNotFound" => Ok(Self::OrderNotFound),
            "InsufficientFunds" => Ok(Self::InsufficientFunds),
            "DDoSProtection" => Ok(Self::DDoSProtection),
            "AuthenticationError" => Ok(Self::AuthenticationError),
            "PermissionDenied" => Ok(Self::PermissionDenied),
            "InvalidOrder" => Ok(Self::InvalidOrder),
            "InvalidNonce" => Ok(Self::InvalidNonce),
            "ExchangeNotAvailable" => Ok(Self::ExchangeNotAvailable),
            other => Err(ExchangeError::ConfigurationError(format!(
                "Unknown error kind tag: {}",
                other
            ))),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A business error recognised by the exchange's error table
    #[error("{kind}: {message}")]
    Classified { kind: ErrorKind, message: String },

    /// `success` was false but no error text came with it
    #[error("{exchange} returned a malformed error: {body}")]
    MalformedResponse { exchange: String, body: String },

    /// Raised by the fallback handler for non-2xx responses
    #[error("{exchange} {method} {url} {status} {reason} {body}")]
    HttpStatus {
        exchange: String,
        kind: ErrorKind,
        status: u16,
        reason: String,
        method: String,
        url: String,
        body: String,
    },

    #[error("{exchange} returned an unparseable response: {body}")]
    BadResponse { exchange: String, body: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    pub fn classified(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Classified {
            kind,
            message: message.into(),
        }
    }

    /// Category of this error in the shared taxonomy, if it has one
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Classified { kind, .. } | Self::HttpStatus { kind, .. } => Some(*kind),
            Self::MalformedResponse { .. } | Self::BadResponse { .. } => {
                Some(ErrorKind::ExchangeError)
            }
            Self::AuthError(_) => Some(ErrorKind::AuthenticationError),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            Self::NetworkError(_) => true,
            other => other.kind().is_some_and(|kind| kind.is_retryable()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_tags_round_trip() {
        for kind in [
            ErrorKind::ExchangeError,
            ErrorKind::OrderNotFound,
            ErrorKind::InsufficientFunds,
            ErrorKind::DDoSProtection,
            ErrorKind::InvalidNonce,
        ] {
            assert_eq!(kind.as_str().parse::<ErrorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_tag_is_configuration_error() {
        let err = "NoSuchKind".parse::<ErrorKind>().unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)));
    }

    #[test]
    fn test_retry_semantics() {
        let ddos = ExchangeError::classified(ErrorKind::DDoSProtection, "wex {}");
        assert!(ddos.is_retryable());

        let funds = ExchangeError::classified(ErrorKind::InsufficientFunds, "wex {}");
        assert!(!funds.is_retryable());

        let malformed = ExchangeError::MalformedResponse {
            exchange: "wex".to_string(),
            body: "{\"success\":false}".to_string(),
        };
        assert_eq!(malformed.kind(), Some(ErrorKind::ExchangeError));
        assert!(!malformed.is_retryable());
    }
}
