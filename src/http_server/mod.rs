//! # HTTP Server Module
//!
//! Configuration and the axum server that feeds requests to the REST API
//! dispatcher.

pub mod config;
pub mod server;

pub use config::{ConfigError, DeveloperInfo, ServiceConfig};
pub use server::{HttpServer, MAX_BODY_BYTES};
