//! Error types for the `domain` layer.
use meeting_ai::Error as CompletionError;
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error that caused the
/// domain error. Errors are translated between layers at their boundaries: `domain`
/// translates `meeting_ai` and `reqwest` errors, and `web` only ever sees the kinds
/// defined here when choosing an HTTP status code and message.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Validation(ValidationErrorKind),
    /// The requested operation has no backing implementation in this deployment.
    NotImplemented(String),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Config,
    Other(String),
}

/// Errors about the records the domain reads and writes.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    /// A conflicting operation on the same record is already in progress.
    Conflict,
}

/// Caller-supplied input that cannot be acted upon.
#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    BadPaginationParams,
    FilterParse(String),
    InvalidFilterCategory(String),
    InvalidFilterOperator(String),
    InvalidInput(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The completion provider could not be reached.
    ProviderUnavailable,
    /// The completion provider answered with a non-200 status.
    ProviderError { status: u16, body: String },
    /// The completion provider answered 200 with a body that is not a JSON object.
    ProviderResponseMalformed,
}

impl Error {
    pub fn from_kind(error_kind: DomainErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub fn not_found() -> Self {
        Self::from_kind(DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::NotFound,
        )))
    }

    pub fn validation(kind: ValidationErrorKind) -> Self {
        Self::from_kind(DomainErrorKind::Validation(kind))
    }

    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::from_kind(DomainErrorKind::NotImplemented(operation.into()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.error_kind)
    }
}

impl fmt::Display for DomainErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DomainErrorKind::Internal(kind) => write!(f, "{kind}"),
            DomainErrorKind::External(kind) => write!(f, "{kind}"),
            DomainErrorKind::Validation(kind) => write!(f, "{kind}"),
            DomainErrorKind::NotImplemented(operation) => {
                write!(f, "{operation} is not implemented")
            }
        }
    }
}

impl fmt::Display for InternalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InternalErrorKind::Entity(EntityErrorKind::NotFound) => write!(f, "record not found"),
            InternalErrorKind::Entity(EntityErrorKind::Conflict) => {
                write!(f, "another summary generation was invoked")
            }
            InternalErrorKind::Config => write!(f, "invalid service configuration"),
            InternalErrorKind::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationErrorKind::BadPaginationParams => write!(
                f,
                "offset must be non-negative and limit must be positive and less than or equal to 1000"
            ),
            ValidationErrorKind::FilterParse(reason) => {
                write!(f, "invalid filter expression: {reason}")
            }
            ValidationErrorKind::InvalidFilterCategory(category) => {
                write!(f, "invalid category '{category}'")
            }
            ValidationErrorKind::InvalidFilterOperator(operator) => {
                write!(f, "invalid operator '{operator}'")
            }
            ValidationErrorKind::InvalidInput(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ExternalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExternalErrorKind::ProviderUnavailable => write!(f, "completion provider unavailable"),
            // The provider's own error detail is the most useful message for callers.
            ExternalErrorKind::ProviderError { status, body } if body.trim().is_empty() => {
                write!(f, "completion provider returned status {status}")
            }
            ExternalErrorKind::ProviderError { body, .. } => write!(f, "{body}"),
            ExternalErrorKind::ProviderResponseMalformed => {
                write!(f, "completion provider returned a malformed response")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `meeting_ai` layer to the `domain` layer.
impl From<CompletionError> for Error {
    fn from(err: CompletionError) -> Self {
        let error_kind = match &err {
            CompletionError::Unavailable(_) => {
                DomainErrorKind::External(ExternalErrorKind::ProviderUnavailable)
            }
            CompletionError::Status { status, body } => {
                DomainErrorKind::External(ExternalErrorKind::ProviderError {
                    status: *status,
                    body: body.clone(),
                })
            }
            CompletionError::MalformedResponse(_) => {
                DomainErrorKind::External(ExternalErrorKind::ProviderResponseMalformed)
            }
            CompletionError::Configuration(_) => {
                DomainErrorKind::Internal(InternalErrorKind::Config)
            }
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::ProviderUnavailable),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_status_keeps_raw_body_as_message() {
        let err: Error = CompletionError::Status {
            status: 502,
            body: "{\"detail\":\"upstream model crashed\"}".to_string(),
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ProviderError {
                status: 502,
                body: "{\"detail\":\"upstream model crashed\"}".to_string(),
            })
        );
        assert_eq!(err.to_string(), "{\"detail\":\"upstream model crashed\"}");
        assert!(err.source.is_some());
    }

    #[test]
    fn test_provider_status_with_empty_body_reports_status() {
        let err: Error = CompletionError::Status {
            status: 401,
            body: String::new(),
        }
        .into();
        assert_eq!(err.to_string(), "completion provider returned status 401");
    }

    #[test]
    fn test_malformed_and_unavailable_are_distinct_kinds() {
        let decode_err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let malformed: Error = CompletionError::MalformedResponse(Box::new(decode_err)).into();
        assert_eq!(
            malformed.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ProviderResponseMalformed)
        );

        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let unavailable: Error = CompletionError::Unavailable(Box::new(io_err)).into();
        assert_eq!(
            unavailable.error_kind,
            DomainErrorKind::External(ExternalErrorKind::ProviderUnavailable)
        );
    }

    #[test]
    fn test_configuration_errors_become_internal_config() {
        let err: Error = CompletionError::Configuration("missing COMPLETION_URL".into()).into();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Config)
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            Error::validation(ValidationErrorKind::BadPaginationParams).to_string(),
            "offset must be non-negative and limit must be positive and less than or equal to 1000"
        );
        assert_eq!(
            Error::validation(ValidationErrorKind::InvalidFilterOperator("like".into()))
                .to_string(),
            "invalid operator 'like'"
        );
        assert_eq!(
            Error::not_implemented("Listing meeting summaries").to_string(),
            "Listing meeting summaries is not implemented"
        );
    }
}
