//! # Observability
//!
//! Process-wide `tracing` setup and the lifecycle events the service emits
//! while booting.
//!
//! Request handling logs through `tracing` directly: one `request` span per
//! request, client errors at `warn`, server errors at `error`.

mod events;
mod logger;

pub use events::{log_event, Event};
pub use logger::{build_filter, init_logging, LoggingError};
