use std::error::Error as StdError;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind,
    ValidationErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

pub const NOT_FOUND_MESSAGE: &str = "No data found";
pub const CONFLICT_MESSAGE: &str = "Check drift was already invoked and is in progress";
pub const INVALID_ERROR_RESPONSE_MESSAGE: &str = "Invalid error response";

/// Failure surfaced by a handler: either a domain error still to be classified, or a
/// response that was already built and must pass through untouched.
#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Response(ErrorResponse),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localized_message: Option<String>,
}

/// JSON body of every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub http_status_code: Option<u16>,
    pub messages: Vec<ErrorMessage>,
}

impl ErrorMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ErrorMessage {
            message: message.into(),
            severity: Severity::Error,
            timestamp: Utc::now(),
            code: None,
            arguments: None,
            localized_message: None,
        }
    }
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            http_status_code: Some(status.as_u16()),
            messages: create_error_messages([message.into()]),
        }
    }
}

/// Wraps each message with severity `ERROR` and the current time.
pub fn create_error_messages<I>(messages: I) -> Vec<ErrorMessage>
where
    I: IntoIterator<Item = String>,
{
    messages.into_iter().map(ErrorMessage::error).collect()
}

/// Classifies `err` into the response sent to the client.
pub fn create_error_response(err: Error) -> ErrorResponse {
    let domain_error = match err {
        Error::Response(response) => return response,
        Error::Domain(domain_error) => domain_error,
    };

    let status = match &domain_error.error_kind {
        DomainErrorKind::Validation(_) => StatusCode::BAD_REQUEST,
        DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
            return ErrorResponse::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE);
        }
        DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict)) => {
            return ErrorResponse::new(StatusCode::CONFLICT, CONFLICT_MESSAGE);
        }
        DomainErrorKind::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        DomainErrorKind::Internal(_) | DomainErrorKind::External(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    ErrorResponse::new(status, domain_error.to_string())
}

/// HTTP status of `response`; 500 when there is none.
pub fn status_code_of(response: Option<&ErrorResponse>) -> u16 {
    response
        .and_then(|response| response.http_status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Domain(err) => Some(err),
            Error::Response(_) => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        match self {
            Error::Domain(err) => write!(fmt, "{err}"),
            Error::Response(response) => write!(
                fmt,
                "{} ({})",
                response
                    .messages
                    .first()
                    .map(|message| message.message.as_str())
                    .unwrap_or(INVALID_ERROR_RESPONSE_MESSAGE),
                status_code_of(Some(response))
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Domain(err) = &self {
            match err.source.as_ref() {
                Some(source) => warn!("Request failed: {err} (caused by: {source})"),
                None => warn!("Request failed: {err}"),
            }
        }

        let mut response = create_error_response(self);
        if response.messages.is_empty() {
            error!("Refusing to send an error response without messages");
            response = ErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                INVALID_ERROR_RESPONSE_MESSAGE,
            );
        }

        let status = StatusCode::from_u16(status_code_of(Some(&response)))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(response)).into_response()
    }
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error::Domain(err)
    }
}

impl From<ErrorResponse> for Error {
    fn from(response: ErrorResponse) -> Self {
        Error::Response(response)
    }
}

fn invalid_input(message: String) -> Error {
    Error::Domain(DomainError::validation(ValidationErrorKind::InvalidInput(
        message,
    )))
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        invalid_input(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        invalid_input(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        invalid_input(rejection.body_text())
    }
}
