//! confinfo - a small JSON information service over a conference dataset
//!
//! - [`rest_api`]: endpoints, query building, validation and storage
//! - [`http_server`]: configuration and the axum server
//! - [`observability`]: tracing setup and lifecycle events
//! - [`cli`]: `init` and `serve`

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
