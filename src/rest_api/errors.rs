//! # REST API Errors
//!
//! Two tiers of failure:
//! - [`ClientError`]: an anticipated 4xx condition, caught once at the
//!   dispatch boundary and rendered as `{"Error": message}`.
//! - [`ServerError`]: anything unexpected (storage, serialization, panics).
//!   Never caught by the dispatcher; the HTTP boundary renders it as a 500
//!   diagnostic.

use std::panic::Location;

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Result type for endpoint operations
pub type ApiResult<T> = Result<T, ApiError>;

/// A well-formed but invalid or forbidden request.
///
/// The message is canonicalised when the error is built, so the status and
/// text never drift apart between construction and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    status: StatusCode,
}

impl ClientError {
    /// Build an error from a numeric status code with the canonical phrase
    pub fn new(code: u16) -> Self {
        Self::build(code, None)
    }

    /// Build an error whose canonical phrase is followed by `": <detail>"`
    pub fn with_detail(code: u16, detail: impl Into<String>) -> Self {
        Self::build(code, Some(detail.into()))
    }

    fn build(code: u16, detail: Option<String>) -> Self {
        let (status, phrase) = canonical(code);
        let message = match detail {
            Some(detail) => format!("{}: {}", phrase, detail),
            None => phrase.to_string(),
        };
        Self { message, status }
    }

    /// 400 Bad Request
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::with_detail(400, detail)
    }

    /// 401 Unauthorised
    pub fn unauthorised(detail: impl Into<String>) -> Self {
        Self::with_detail(401, detail)
    }

    /// 404 Resource Not found
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::with_detail(404, detail)
    }

    /// 405 Method not allowed, naming the rejected verb
    pub fn method_not_allowed(verb: impl Into<String>) -> Self {
        Self::with_detail(405, verb)
    }

    /// 409 Conflict
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::with_detail(409, detail)
    }

    /// 422 Invalid Parameter
    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::with_detail(422, detail)
    }

    /// HTTP status of this error
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical message, including any detail
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The JSON error envelope
    pub fn body(&self) -> Value {
        json!({ "Error": self.message })
    }
}

/// Map a numeric code to its status and phrase. Unknown codes become 500.
fn canonical(code: u16) -> (StatusCode, &'static str) {
    match code {
        400 => (StatusCode::BAD_REQUEST, "Bad Request"),
        401 => (StatusCode::UNAUTHORIZED, "Unauthorised"),
        404 => (StatusCode::NOT_FOUND, "Resource Not found"),
        405 => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        409 => (StatusCode::CONFLICT, "Conflict"),
        422 => (StatusCode::UNPROCESSABLE_ENTITY, "Invalid Parameter"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Unknown Error"),
    }
}

/// Unexpected failures. These always become an HTTP 500.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The storage layer rejected a statement
    #[error("Storage error: {source}")]
    Storage {
        source: rusqlite::Error,
        location: &'static Location<'static>,
    },

    /// A value could not be serialized to JSON
    #[error("Serialization error: {source}")]
    Serialization {
        source: serde_json::Error,
        location: &'static Location<'static>,
    },

    /// Request handling panicked
    #[error("Request handling panicked: {0}")]
    Panic(String),

    /// Internal invariant broken
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        location: &'static Location<'static>,
    },
}

impl ServerError {
    /// Internal error recorded at the caller's location
    #[track_caller]
    pub fn internal(message: impl Into<String>) -> Self {
        ServerError::Internal {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// Where the failure was raised, when known
    pub fn location(&self) -> Option<&'static Location<'static>> {
        match self {
            ServerError::Storage { location, .. }
            | ServerError::Serialization { location, .. }
            | ServerError::Internal { location, .. } => Some(*location),
            ServerError::Panic(_) => None,
        }
    }

    /// The `{message, code, file, line}` diagnostic payload
    pub fn diagnostic(&self) -> Value {
        let location = self.location();
        json!({
            "message": self.to_string(),
            "code": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            "file": location.map(|l| l.file()),
            "line": location.map(|l| l.line()),
        })
    }
}

impl From<rusqlite::Error> for ServerError {
    #[track_caller]
    fn from(source: rusqlite::Error) -> Self {
        ServerError::Storage {
            source,
            location: Location::caller(),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        ServerError::Serialization {
            source,
            location: Location::caller(),
        }
    }
}

/// Either tier of failure, as returned by endpoint operations
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

impl From<rusqlite::Error> for ApiError {
    #[track_caller]
    fn from(source: rusqlite::Error) -> Self {
        ApiError::Server(ServerError::Storage {
            source,
            location: Location::caller(),
        })
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        ApiError::Server(ServerError::Serialization {
            source,
            location: Location::caller(),
        })
    }
}
