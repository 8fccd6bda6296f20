//! # Response Envelope
//!
//! Status, endpoint-specific headers and a JSON body. Serialising adds the
//! headers every response carries.

use axum::body::Body;
use axum::http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LANGUAGE, CONTENT_TYPE,
};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use super::errors::{ClientError, ServerError};

/// An endpoint's result, readable before it is serialised
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// 200 with a body
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 201 with a body
    pub fn created(body: Value) -> Self {
        Self::new(StatusCode::CREATED, body)
    }

    /// 204 with a `null` body
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, Value::Null)
    }

    /// Error envelope for a client error. Carries no endpoint headers.
    pub fn client_error(error: &ClientError) -> Self {
        Self::new(error.status(), error.body())
    }

    /// Diagnostic envelope for an unexpected failure
    pub fn server_error(error: &ServerError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error.diagnostic())
    }

    /// Add an endpoint-specific header
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Headers present on every response
fn standard_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_LANGUAGE, HeaderValue::from_static("en"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut headers = standard_headers();
        headers.extend(self.headers);

        // 204 must not carry a payload; the logical `null` stays off the wire.
        let body = if self.status == StatusCode::NO_CONTENT {
            Body::empty()
        } else {
            Body::from(self.body.to_string())
        };

        (self.status, headers, body).into_response()
    }
}
