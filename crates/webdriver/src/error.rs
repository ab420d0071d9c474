//! Error types for WebDriver commands

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Error classification carried in a WebDriver error response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    ElementClickIntercepted,
    ElementNotInteractable,
    InsecureCertificate,
    InvalidArgument,
    InvalidCookieDomain,
    InvalidElementState,
    InvalidSelector,
    InvalidSessionId,
    JavascriptError,
    MoveTargetOutOfBounds,
    NoSuchAlert,
    NoSuchCookie,
    NoSuchElement,
    NoSuchFrame,
    NoSuchWindow,
    NoSuchShadowRoot,
    ScriptTimeout,
    SessionNotCreated,
    StaleElementReference,
    DetachedShadowRoot,
    Timeout,
    UnableToSetCookie,
    UnableToCaptureScreen,
    UnexpectedAlertOpen,
    UnknownCommand,
    /// Raised for low-level failures such as unreachable navigation targets
    UnknownError,
    UnknownMethod,
    UnsupportedOperation,
    Other(String),
}

impl ErrorCode {
    pub fn from_wire(code: &str) -> Self {
        match code {
            "element click intercepted" => Self::ElementClickIntercepted,
            "element not interactable" => Self::ElementNotInteractable,
            "insecure certificate" => Self::InsecureCertificate,
            "invalid argument" => Self::InvalidArgument,
            "invalid cookie domain" => Self::InvalidCookieDomain,
            "invalid element state" => Self::InvalidElementState,
            "invalid selector" => Self::InvalidSelector,
            "invalid session id" => Self::InvalidSessionId,
            "javascript error" => Self::JavascriptError,
            "move target out of bounds" => Self::MoveTargetOutOfBounds,
            "no such alert" => Self::NoSuchAlert,
            "no such cookie" => Self::NoSuchCookie,
            "no such element" => Self::NoSuchElement,
            "no such frame" => Self::NoSuchFrame,
            "no such window" => Self::NoSuchWindow,
            "no such shadow root" => Self::NoSuchShadowRoot,
            "script timeout" => Self::ScriptTimeout,
            "session not created" => Self::SessionNotCreated,
            "stale element reference" => Self::StaleElementReference,
            "detached shadow root" => Self::DetachedShadowRoot,
            "timeout" => Self::Timeout,
            "unable to set cookie" => Self::UnableToSetCookie,
            "unable to capture screen" => Self::UnableToCaptureScreen,
            "unexpected alert open" => Self::UnexpectedAlertOpen,
            "unknown command" => Self::UnknownCommand,
            "unknown error" => Self::UnknownError,
            "unknown method" => Self::UnknownMethod,
            "unsupported operation" => Self::UnsupportedOperation,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ElementClickIntercepted => "element click intercepted",
            Self::ElementNotInteractable => "element not interactable",
            Self::InsecureCertificate => "insecure certificate",
            Self::InvalidArgument => "invalid argument",
            Self::InvalidCookieDomain => "invalid cookie domain",
            Self::InvalidElementState => "invalid element state",
            Self::InvalidSelector => "invalid selector",
            Self::InvalidSessionId => "invalid session id",
            Self::JavascriptError => "javascript error",
            Self::MoveTargetOutOfBounds => "move target out of bounds",
            Self::NoSuchAlert => "no such alert",
            Self::NoSuchCookie => "no such cookie",
            Self::NoSuchElement => "no such element",
            Self::NoSuchFrame => "no such frame",
            Self::NoSuchWindow => "no such window",
            Self::NoSuchShadowRoot => "no such shadow root",
            Self::ScriptTimeout => "script timeout",
            Self::SessionNotCreated => "session not created",
            Self::StaleElementReference => "stale element reference",
            Self::DetachedShadowRoot => "detached shadow root",
            Self::Timeout => "timeout",
            Self::UnableToSetCookie => "unable to set cookie",
            Self::UnableToCaptureScreen => "unable to capture screen",
            Self::UnexpectedAlertOpen => "unexpected alert open",
            Self::UnknownCommand => "unknown command",
            Self::UnknownError => "unknown error",
            Self::UnknownMethod => "unknown method",
            Self::UnsupportedOperation => "unsupported operation",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum WebDriverError {
    #[error("{code}: {message}")]
    Protocol { code: ErrorCode, message: String },

    #[error("Timed out waiting for: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WebDriverError {
    /// Protocol error classification, if the remote end reported one
    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            WebDriverError::Protocol { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_unknown_error(&self) -> bool {
        matches!(self.code(), Some(ErrorCode::UnknownError))
    }
}

pub type WebDriverResult<T> = Result<T, WebDriverError>;

/// Error payload as it appears under `value` in a failed response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

impl From<ErrorPayload> for WebDriverError {
    fn from(payload: ErrorPayload) -> Self {
        WebDriverError::Protocol {
            code: ErrorCode::from_wire(&payload.error),
            message: payload.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("unknown error", ErrorCode::UnknownError; "unknown error")]
    #[test_case("no such element", ErrorCode::NoSuchElement; "no such element")]
    #[test_case("javascript error", ErrorCode::JavascriptError; "javascript error")]
    #[test_case("timeout", ErrorCode::Timeout; "timeout")]
    fn test_known_codes(wire: &str, expected: ErrorCode) {
        let code = ErrorCode::from_wire(wire);
        assert_eq!(code, expected);
        assert_eq!(code.as_str(), wire);
    }

    #[test]
    fn test_unrecognised_code_is_preserved() {
        let code = ErrorCode::from_wire("gecko exploded");
        assert_eq!(code, ErrorCode::Other("gecko exploded".to_string()));
        assert_eq!(code.to_string(), "gecko exploded");
    }

    #[test]
    fn test_only_unknown_error_matches() {
        let dead: WebDriverError = ErrorPayload {
            error: "unknown error".to_string(),
            message: "Reached error page".to_string(),
        }
        .into();
        assert!(dead.is_unknown_error());
        assert_eq!(dead.to_string(), "unknown error: Reached error page");

        let other: WebDriverError = ErrorPayload {
            error: "insecure certificate".to_string(),
            message: String::new(),
        }
        .into();
        assert!(!other.is_unknown_error());

        assert!(!WebDriverError::Timeout("#foo".to_string()).is_unknown_error());
    }
}
