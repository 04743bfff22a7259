//! Error types for chat-completion operations.

use std::fmt;

/// Universal error type that abstracts provider-specific failures into common variants.
///
/// Every provider implementation maps its native errors to one of these variants so
/// callers can tell a transport problem apart from a provider-side rejection or an
/// unreadable answer without knowing which provider produced it.
#[derive(Debug)]
pub enum Error {
    /// The provider could not be reached: connection refused, DNS failure, timeout
    /// or a body that could not be read. These failures are transient and are the
    /// only ones worth retrying.
    Unavailable(Box<dyn std::error::Error + Send + Sync>),

    /// The provider answered with an HTTP status other than 200. `body` holds the raw
    /// response text for diagnostics.
    Status { status: u16, body: String },

    /// The provider answered 200 but the body is not a JSON object.
    MalformedResponse(Box<dyn std::error::Error + Send + Sync>),

    /// Missing or invalid provider settings (endpoint, credential, model).
    Configuration(String),
}

impl Error {
    /// Short, stable label used when logging which failure path was taken.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Unavailable(_) => "unavailable",
            Error::Status { .. } => "status",
            Error::MalformedResponse(_) => "malformed_response",
            Error::Configuration(_) => "configuration",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unavailable(err) => write!(f, "Completion provider unavailable: {}", err),
            Error::Status { status, body } => {
                write!(f, "Completion provider returned status {}: {}", status, body)
            }
            Error::MalformedResponse(err) => {
                write!(f, "Malformed completion provider response: {}", err)
            }
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Unavailable(err) | Error::MalformedResponse(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
