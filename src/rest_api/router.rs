//! # Request Dispatcher
//!
//! Owns the database and configuration. For each request it takes the
//! connection, resolves the endpoint from the first path segment and runs
//! exactly one verb hook. Client errors are rendered here; server errors are
//! returned to the HTTP boundary untouched.

use std::sync::Arc;

use uuid::Uuid;

use crate::http_server::ServiceConfig;

use super::database::{Database, Storage};
use super::endpoint::{dispatch_verb, RequestContext};
use super::endpoints::lookup;
use super::errors::{ApiError, ApiResult, ClientError, ServerError};
use super::request::{ApiRequest, RequestParts};
use super::response::ApiResponse;

pub struct Dispatcher {
    database: Database,
    config: Arc<ServiceConfig>,
}

impl Dispatcher {
    pub fn new(database: Database, config: Arc<ServiceConfig>) -> Self {
        Self { database, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Handle one request.
    ///
    /// `Ok` carries either the endpoint's response or a rendered client
    /// error. `Err` is only ever an unexpected failure.
    pub fn route(&self, parts: RequestParts) -> Result<ApiResponse, ServerError> {
        let span = tracing::info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %parts.method,
            path = %parts.uri.path(),
        );
        let _entered = span.enter();

        match self.dispatch(parts) {
            Ok(response) => {
                tracing::debug!(status = response.status().as_u16(), "handled");
                Ok(response)
            }
            Err(ApiError::Client(error)) => {
                tracing::warn!(status = error.status().as_u16(), error = %error, "client error");
                Ok(ApiResponse::client_error(&error))
            }
            Err(ApiError::Server(error)) => {
                let location = error.location();
                tracing::error!(
                    error = %error,
                    file = location.map(|l| l.file()),
                    line = location.map(|l| l.line()),
                    "server error"
                );
                Err(error)
            }
        }
    }

    fn dispatch(&self, parts: RequestParts) -> ApiResult<ApiResponse> {
        let request = ApiRequest::from_parts(parts, &self.config.base_path)?;

        let endpoint = lookup(request.endpoint())
            .ok_or_else(|| ClientError::not_found(format!("/{}", request.endpoint())))?;

        let conn = self.database.lock();
        let ctx = RequestContext {
            request: &request,
            storage: Storage::new(&conn),
            config: &self.config,
        };
        dispatch_verb(endpoint.as_ref(), &ctx)
    }
}

/// Run [`Dispatcher::route`] off the async executor. A panic inside request
/// handling becomes [`ServerError::Panic`].
pub async fn route_blocking(
    dispatcher: Arc<Dispatcher>,
    parts: RequestParts,
) -> Result<ApiResponse, ServerError> {
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        dispatcher.route(parts)
    })
    .await
    .map_err(|join| {
        let reason = if join.is_panic() {
            panic_message(join.into_panic())
        } else {
            "request task cancelled".to_string()
        };
        tracing::error!(reason = %reason, "request handler did not complete");
        ServerError::Panic(reason)
    })?
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
