//! # Endpoint Contract
//!
//! Each endpoint implements only the verbs it supports. Every hook defaults
//! to 405, so an endpoint that omits a verb rejects it.

use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS};

use crate::http_server::ServiceConfig;

use super::auth::require_key;
use super::database::Storage;
use super::errors::{ApiResult, ClientError};
use super::request::{ApiRequest, Verb};
use super::response::ApiResponse;

/// Everything an endpoint hook can see for one request
pub struct RequestContext<'r> {
    pub request: &'r ApiRequest,
    pub storage: Storage<'r>,
    pub config: &'r ServiceConfig,
}

impl RequestContext<'_> {
    /// Authorization gate against the configured secret
    pub fn require_key(&self) -> Result<bool, ClientError> {
        require_key(self.request.headers(), &self.config.api_secret)
    }
}

pub trait Endpoint {
    fn get(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Err(ClientError::method_not_allowed(Verb::Get.as_str()).into())
    }

    fn post(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Err(ClientError::method_not_allowed(Verb::Post.as_str()).into())
    }

    fn patch(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Err(ClientError::method_not_allowed(Verb::Patch.as_str()).into())
    }

    fn put(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Err(ClientError::method_not_allowed(Verb::Put.as_str()).into())
    }

    fn delete(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Err(ClientError::method_not_allowed(Verb::Delete.as_str()).into())
    }

    fn options(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Err(ClientError::method_not_allowed(Verb::Options.as_str()).into())
    }
}

/// Run exactly one hook, chosen by the request's method
pub fn dispatch_verb(endpoint: &dyn Endpoint, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
    match Verb::from_method(ctx.request.method())? {
        Verb::Get => endpoint.get(ctx),
        Verb::Post => endpoint.post(ctx),
        Verb::Patch => endpoint.patch(ctx),
        Verb::Put => endpoint.put(ctx),
        Verb::Delete => endpoint.delete(ctx),
        Verb::Options => endpoint.options(ctx),
    }
}

/// Standard OPTIONS reply advertising `methods`
pub fn options_response(methods: &'static str) -> ApiResponse {
    ApiResponse::no_content()
        .with_header(ACCESS_CONTROL_ALLOW_METHODS, methods)
        .with_header(ACCESS_CONTROL_ALLOW_HEADERS, "Authorization, Content-Type")
}
