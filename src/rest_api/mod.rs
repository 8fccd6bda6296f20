//! # REST API
//!
//! The conference information API: request normalisation, the query clause
//! builder, the bearer-key gate, the endpoint registry and the dispatcher
//! that ties them to the SQLite store.
//!
//! Every response is JSON. Client mistakes become `{"Error": message}` with
//! a 4xx status; anything unexpected becomes a 500 diagnostic.

pub mod auth;
pub mod body;
pub mod database;
pub mod endpoint;
pub mod endpoints;
pub mod errors;
pub mod parser;
pub mod query_builder;
pub mod request;
pub mod response;
pub mod router;
pub mod schema;

pub use database::{Database, Storage};
pub use endpoint::{Endpoint, RequestContext};
pub use errors::{ApiError, ApiResult, ClientError, ServerError};
pub use parser::{QueryParameters, ValidParams};
pub use query_builder::{BoundParams, QueryBuilder, QueryClauses};
pub use request::{ApiRequest, RequestParts, Verb};
pub use response::ApiResponse;
pub use router::{route_blocking, Dispatcher};
