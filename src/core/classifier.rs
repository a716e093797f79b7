//! Error classification shared by every exchange.
//!
//! An exchange's `handle_errors` sees the complete response first. It either
//! lets the response through, hands it to [`default_error_handler`], or raises
//! a categorized [`ExchangeError`]. The lookup tables come from the
//! descriptor's `exceptions` section and are applied as two explicit ordered
//! policies: exact matches first, then substring rules in list order.

use crate::core::descriptor::Descriptor;
use crate::core::errors::{ErrorKind, ExchangeError};
use serde_json::Value;
use std::collections::HashMap;

/// Everything known about a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub url: String,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RawResponse {
    /// A 200 response with the given body, handy for exercising classifiers
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: "OK".to_string(),
            url: String::new(),
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_status(mut self, status: u16, reason: impl Into<String>) -> Self {
        self.status = status;
        self.reason = reason.into();
        self
    }
}

/// Outcome of `handle_errors` when nothing was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCheck {
    /// The body is a regular payload and may be parsed
    Passed,
    /// Not classified here; the fallback handler decides
    Deferred,
}

/// Exact and substring error tables read from a descriptor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorPolicy {
    exact: HashMap<String, ErrorKind>,
    codes: HashMap<String, ErrorKind>,
    broad: Vec<(String, ErrorKind)>,
}

impl ErrorPolicy {
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self, ExchangeError> {
        Ok(Self {
            exact: read_table(descriptor, "exceptions.messages")?,
            codes: read_table(descriptor, "exceptions.codes")?,
            broad: read_rules(descriptor, "exceptions.broad")?,
        })
    }

    pub fn match_exact(&self, message: &str) -> Option<ErrorKind> {
        self.exact.get(message).copied()
    }

    pub fn match_code(&self, code: &str) -> Option<ErrorKind> {
        self.codes.get(code).copied()
    }

    /// First substring rule contained in `message`, in declaration order
    pub fn match_broad(&self, message: &str) -> Option<ErrorKind> {
        self.broad
            .iter()
            .find(|(needle, _)| message.contains(needle.as_str()))
            .map(|(_, kind)| *kind)
    }
}

fn read_table(
    descriptor: &Descriptor,
    path: &str,
) -> Result<HashMap<String, ErrorKind>, ExchangeError> {
    let Some(node) = descriptor.get(path) else {
        return Ok(HashMap::new());
    };
    let table = node.as_object().ok_or_else(|| {
        ExchangeError::ConfigurationError(format!("{} must be a mapping", path))
    })?;

    table
        .iter()
        .map(|(message, tag)| {
            let tag = tag.as_str().ok_or_else(|| {
                ExchangeError::ConfigurationError(format!(
                    "{}.{} must name an error kind",
                    path, message
                ))
            })?;
            Ok((message.clone(), tag.parse::<ErrorKind>()?))
        })
        .collect()
}

fn read_rules(
    descriptor: &Descriptor,
    path: &str,
) -> Result<Vec<(String, ErrorKind)>, ExchangeError> {
    let Some(node) = descriptor.get(path) else {
        return Ok(Vec::new());
    };
    let rules = node.as_array().ok_or_else(|| {
        ExchangeError::ConfigurationError(format!("{} must be a list of rules", path))
    })?;

    rules
        .iter()
        .map(|rule| match rule.as_array().map(Vec::as_slice) {
            Some([Value::String(needle), Value::String(tag)]) => {
                Ok((needle.clone(), tag.parse::<ErrorKind>()?))
            }
            _ => Err(ExchangeError::ConfigurationError(format!(
                "{} entries must be [substring, kind] pairs, got {}",
                path, rule
            ))),
        })
        .collect()
}

/// Fallback for responses an exchange declined to classify
pub fn default_error_handler(exchange_id: &str, response: &RawResponse) -> ExchangeError {
    if (200..300).contains(&response.status) {
        return ExchangeError::BadResponse {
            exchange: exchange_id.to_string(),
            body: response.body.clone(),
        };
    }

    let kind = match response.status {
        418 | 429 => ErrorKind::DDoSProtection,
        500 | 502 | 503 | 504 => ErrorKind::ExchangeNotAvailable,
        401 | 403 => ErrorKind::AuthenticationError,
        _ => ErrorKind::ExchangeError,
    };

    ExchangeError::HttpStatus {
        exchange: exchange_id.to_string(),
        kind,
        status: response.status,
        reason: response.reason.clone(),
        method: response.method.clone(),
        url: response.url.clone(),
        body: response.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor() -> Descriptor {
        Descriptor::new(json!({
            "exceptions": {
                "messages": {"Requests too often": "DDoSProtection", "bad status": "OrderNotFound"},
                "codes": {"833": "OrderNotFound"},
                "broad": [["not enough", "InsufficientFunds"], ["not", "InvalidOrder"]]
            }
        }))
    }

    #[test]
    fn test_policy_lookups() {
        let policy = ErrorPolicy::from_descriptor(&descriptor()).unwrap();
        assert_eq!(policy.match_exact("bad status"), Some(ErrorKind::OrderNotFound));
        assert_eq!(policy.match_exact("bad status!"), None);
        assert_eq!(policy.match_code("833"), Some(ErrorKind::OrderNotFound));
        assert_eq!(policy.match_broad("you have not enough"), Some(ErrorKind::InsufficientFunds));
        assert_eq!(policy.match_broad("not now"), Some(ErrorKind::InvalidOrder));
        assert_eq!(policy.match_broad("fine"), None);
    }

    #[test]
    fn test_unknown_kind_fails_when_consumed() {
        let bad = Descriptor::new(json!({"exceptions": {"messages": {"x": "Nope"}}}));
        assert!(matches!(
            ErrorPolicy::from_descriptor(&bad),
            Err(ExchangeError::ConfigurationError(_))
        ));

        let bad_rule = Descriptor::new(json!({"exceptions": {"broad": [["only-one"]]}}));
        assert!(ErrorPolicy::from_descriptor(&bad_rule).is_err());
    }

    #[test]
    fn test_default_handler_status_mapping() {
        let unavailable =
            RawResponse::ok("Service Unavailable").with_status(503, "Service Unavailable");
        let err = default_error_handler("wex", &unavailable);
        assert_eq!(err.kind(), Some(ErrorKind::ExchangeNotAvailable));
        assert!(err.is_retryable());

        let throttled = RawResponse::ok("").with_status(429, "Too Many Requests");
        assert_eq!(
            default_error_handler("wex", &throttled).kind(),
            Some(ErrorKind::DDoSProtection)
        );

        let html = RawResponse::ok("<html>maintenance</html>");
        assert!(matches!(
            default_error_handler("wex", &html),
            ExchangeError::BadResponse { .. }
        ));
    }
}
