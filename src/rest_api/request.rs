//! # Request Envelope
//!
//! Normalises an inbound HTTP request into what endpoints consume: the verb,
//! the endpoint segment, the query parameter set, headers, and a lazily
//! parsed JSON body.

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use serde_json::{Map, Value};

use super::errors::ClientError;
use super::parser::QueryParameters;

/// The six verbs an endpoint can implement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Put,
    Delete,
    Options,
}

impl Verb {
    /// Map an HTTP method to a verb. Anything else is a 405.
    pub fn from_method(method: &Method) -> Result<Self, ClientError> {
        match *method {
            Method::GET => Ok(Verb::Get),
            Method::POST => Ok(Verb::Post),
            Method::PATCH => Ok(Verb::Patch),
            Method::PUT => Ok(Verb::Put),
            Method::DELETE => Ok(Verb::Delete),
            Method::OPTIONS => Ok(Verb::Options),
            _ => Err(ClientError::method_not_allowed(method.as_str())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
        }
    }
}

/// Raw pieces of an HTTP request, as handed over by the server
#[derive(Debug, Clone)]
pub struct RequestParts {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A normalised request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    query: QueryParameters,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiRequest {
    /// Normalise raw parts. `base_path` is stripped before the endpoint
    /// segment is taken.
    pub fn from_parts(parts: RequestParts, base_path: &str) -> Result<Self, ClientError> {
        let query = QueryParameters::parse(parts.uri.query())?;
        let endpoint = endpoint_segment(parts.uri.path(), base_path);

        Ok(Self {
            method: parts.method,
            endpoint,
            query,
            headers: parts.headers,
            body: parts.body,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Lowercased first path segment after the base path
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn query(&self) -> &QueryParameters {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Parse the body as a JSON object. An empty body is an empty object.
    pub fn body(&self) -> Result<Map<String, Value>, ClientError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_slice(&self.body)
            .map_err(|_| ClientError::bad_request("Request body is not valid JSON"))?;

        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ClientError::bad_request("Request body must be a JSON object")),
        }
    }
}

/// First non-empty segment of `path` after `base_path`, lowercased.
pub fn endpoint_segment(path: &str, base_path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let path = if base.is_empty() {
        path
    } else {
        match path.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    };

    path.split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_lowercase()
}
