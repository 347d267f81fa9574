//! Error types
//!
//! Every fallible operation in the crate returns [`Error`]. Local input
//! problems are reported before any network call is made.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the VictoriaMetrics Cloud client
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing local input (empty API key, bad deployment ID,
    /// violated deployment parameter rule)
    #[error("{0}")]
    InvalidArgument(String),

    /// The base URL could not be used as an absolute base URL
    #[error("failed to parse base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network, DNS, TLS, timeout or body-read failure from the transport
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status outside 200..300
    #[error("unexpected status code: {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body is not valid JSON for the expected shape
    #[error("failed to unmarshal response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// A raw text response body is not valid UTF-8
    #[error("response body is not valid UTF-8: {0}")]
    InvalidText(#[source] std::string::FromUtf8Error),

    /// The request payload could not be serialized
    #[error("failed to marshal {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An error annotated with the operation and identifiers involved
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any [`Error::Context`] wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status of an [`Error::UnexpectedStatus`] root cause
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error was raised by local validation
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.root(), Self::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_root_cause() {
        let err = Error::UnexpectedStatus {
            status: 404,
            body: "not found".to_string(),
        }
        .with_context("failed to delete deployment \"abc\"");

        assert_eq!(err.status(), Some(404));
        assert!(matches!(err.root(), Error::UnexpectedStatus { .. }));
        assert_eq!(
            err.to_string(),
            "failed to delete deployment \"abc\": unexpected status code: 404, body: not found"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::invalid_argument("API key cannot be empty");
        assert!(err.is_invalid_argument());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "API key cannot be empty");
    }
}
