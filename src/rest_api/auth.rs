//! # Authorization Gate
//!
//! Checks `Authorization: Bearer <base64(secret)>` against the configured
//! shared secret. Endpoints call [`require_key`] explicitly from the verbs
//! that need it.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use subtle::ConstantTimeEq;

use super::errors::ClientError;

const BEARER: &str = "Bearer";

/// Succeeds only when the decoded bearer token equals `secret`.
///
/// - missing header: 400
/// - header without the `Bearer` prefix: 400
/// - undecodable or wrong token: 401
pub fn require_key(headers: &HeaderMap, secret: &str) -> Result<bool, ClientError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ClientError::bad_request("Authorization header is required"))?;

    let header = header
        .to_str()
        .map_err(|_| ClientError::bad_request("Authorization header is not valid text"))?;

    let token = header
        .strip_prefix(BEARER)
        .ok_or_else(|| ClientError::bad_request("Bearer token is required"))?
        .trim();

    let decoded = STANDARD
        .decode(token)
        .map_err(|_| ClientError::unauthorised("Invalid key"))?;

    if constant_time_eq(&decoded, secret.as_bytes()) {
        Ok(true)
    } else {
        Err(ClientError::unauthorised("Invalid key"))
    }
}

/// Constant-time comparison of two byte slices
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
