//! # HTTP Server
//!
//! Every request lands on one fallback handler; routing by path segment
//! happens in the [`Dispatcher`], not in axum's router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::rest_api::{route_blocking, ApiResponse, ClientError, Database, Dispatcher, RequestParts};

use super::config::ServiceConfig;

/// Largest request body read, in bytes
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP server for the conference information API
pub struct HttpServer {
    config: Arc<ServiceConfig>,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServiceConfig, database: Database) -> Self {
        let config = Arc::new(config);
        let dispatcher = Arc::new(Dispatcher::new(database, config.clone()));
        let router = Self::build_router(dispatcher);
        Self { config, router }
    }

    fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
        Router::new()
            .fallback(handle_request)
            .with_state(dispatcher)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, base_path = %self.config.base_path, "confinfo listening");

        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

/// The single entry point for every request
async fn handle_request(State(dispatcher): State<Arc<Dispatcher>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let error = ClientError::bad_request(format!("Unreadable request body: {}", e));
            tracing::warn!(error = %error, "client error");
            return ApiResponse::client_error(&error).into_response();
        }
    };

    let parts = RequestParts {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    };

    match route_blocking(dispatcher, parts).await {
        Ok(response) => response.into_response(),
        Err(error) => ApiResponse::server_error(&error).into_response(),
    }
}
