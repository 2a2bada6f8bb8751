//! Error types for Twilio operations.
//!
//! Errors are categorized so callers can give appropriate user feedback.
//! Nothing in this crate retries; the category only informs the message.

use serde::Deserialize;
use std::fmt;

/// Result type alias for Twilio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of Twilio errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors or provider-side failures.
    Network,
    /// Credentials rejected or missing.
    Auth,
    /// Resource not found.
    NotFound,
    /// Request parameters rejected.
    Validation,
    /// Unexpected response format.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::NotFound => "Application not found",
            Self::Validation => "Request rejected by Twilio",
            Self::Format => "Invalid response format",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and try again",
            Self::Auth => "Check TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN (or the API key pair)",
            Self::NotFound => {
                "The application may have been deleted outside switchboard; run 'switchboard destroy NAME' to clear it"
            }
            Self::Validation => "Check the application fields in your manifest",
            Self::Format => "The API returned something unexpected, try again",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during Twilio operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Transport-level HTTP failure.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Twilio answered with an error document.
    #[error("Twilio API error {status}{}: {message}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    Api {
        /// HTTP status code.
        status: u16,
        /// Twilio error code.
        code: Option<u32>,
        /// Error message.
        message: String,
        /// Link to the Twilio error reference.
        more_info: Option<String>,
    },

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// No usable credentials were configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

/// Error document returned by the Twilio REST API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u32>,
    message: Option<String>,
    more_info: Option<String>,
}

impl Error {
    /// Build an error from a non-success response.
    ///
    /// Twilio error bodies carry `code`, `message`, and `more_info`. A body
    /// that is not such a document becomes the message verbatim.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(doc) => Self::Api {
                status,
                code: doc.code,
                message: doc.message.unwrap_or_else(|| format!("HTTP {status}")),
                more_info: doc.more_info,
            },
            Err(_) => Self::Api {
                status,
                code: None,
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                },
                more_info: None,
            },
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http { .. } => ErrorCategory::Network,
            Error::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                400 | 422 => ErrorCategory::Validation,
                500..=599 => ErrorCategory::Network,
                _ => ErrorCategory::Other,
            },
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::MissingCredentials(_) => ErrorCategory::Auth,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_description() {
        assert!(!ErrorCategory::Network.description().is_empty());
        assert!(!ErrorCategory::Auth.description().is_empty());
        assert!(!ErrorCategory::NotFound.description().is_empty());
    }

    #[test]
    fn test_error_category_advice() {
        assert!(!ErrorCategory::Network.advice().is_empty());
        assert!(ErrorCategory::Auth.advice().contains("TWILIO_AUTH_TOKEN"));
        assert!(ErrorCategory::NotFound.advice().contains("switchboard destroy"));
    }

    #[test]
    fn test_error_category_display() {
        let display = format!("{}", ErrorCategory::Network);
        assert!(display.contains("Network"));
    }

    #[test]
    fn test_error_http_category() {
        let err = Error::Http {
            message: "connection reset".into(),
            status: None,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.to_string(), "HTTP request failed: connection reset");
    }

    #[test]
    fn test_from_response_parses_twilio_error_document() {
        let body = r#"{"code": 20404, "message": "The requested resource was not found", "more_info": "https://www.twilio.com/docs/errors/20404", "status": 404}"#;
        let err = Error::from_response(404, body);

        match &err {
            Error::Api {
                status,
                code,
                message,
                more_info,
            } => {
                assert_eq!(*status, 404);
                assert_eq!(*code, Some(20404));
                assert!(message.contains("not found"));
                assert!(more_info.as_deref().unwrap().ends_with("20404"));
            }
            _ => panic!("Expected Error::Api"),
        }
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("code 20404"));
    }

    #[test]
    fn test_from_response_keeps_plain_body() {
        let err = Error::from_response(502, "Bad Gateway\n");
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.to_string(), "Twilio API error 502: Bad Gateway");
    }

    #[test]
    fn test_from_response_empty_body() {
        let err = Error::from_response(401, "");
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.to_string().contains("HTTP 401"));
    }

    #[test]
    fn test_validation_category() {
        let err = Error::from_response(400, r#"{"code": 21205, "message": "Url is not a valid url"}"#);
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.to_string().starts_with("Twilio API error 400 (code 21205)"));
    }

    #[test]
    fn test_missing_credentials_category() {
        let err = Error::MissingCredentials("TWILIO_ACCOUNT_SID not set".into());
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.to_string().contains("TWILIO_ACCOUNT_SID"));
    }

    #[test]
    fn test_invalid_json_becomes_invalid_response() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Format);
    }
}
