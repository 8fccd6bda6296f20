//! Concrete endpoints and the segment registry.

mod authors;
mod award_management;
mod awards;
mod content;
mod developer;

pub use authors::Authors;
pub use award_management::AwardManagement;
pub use awards::Awards;
pub use content::Content;
pub use developer::Developer;

use serde_json::Value;

use super::endpoint::{Endpoint, RequestContext};
use super::errors::{ApiResult, ClientError};
use super::parser::{validate, ValidParams};
use super::query_builder::QueryBuilder;
use super::response::ApiResponse;

/// Constructor for one endpoint
pub type EndpointConstructor = fn() -> Box<dyn Endpoint>;

/// Path segment to endpoint constructor
pub const REGISTRY: &[(&str, EndpointConstructor)] = &[
    ("authors", || -> Box<dyn Endpoint> { Box::new(Authors) }),
    ("authors-listing", || -> Box<dyn Endpoint> { Box::new(Authors) }),
    ("content", || -> Box<dyn Endpoint> { Box::new(Content) }),
    ("developer", || -> Box<dyn Endpoint> { Box::new(Developer) }),
    ("awards", || -> Box<dyn Endpoint> { Box::new(Awards) }),
    ("award-management", || -> Box<dyn Endpoint> { Box::new(AwardManagement) }),
];

/// Construct the endpoint registered for `segment`
pub fn lookup(segment: &str) -> Option<Box<dyn Endpoint>> {
    REGISTRY
        .iter()
        .find(|(name, _)| *name == segment)
        .map(|(_, construct)| construct())
}

/// Run `base_query` filtered by the request's query parameters
fn select_rows(
    ctx: &RequestContext<'_>,
    base_query: &str,
    builder: QueryBuilder<'_>,
) -> ApiResult<ApiResponse> {
    let clauses = builder.build(ctx.request.query())?;
    let sql = format!("{}{}", base_query, clauses.sql);
    tracing::debug!(sql = %sql, bound = clauses.params.len(), "select");

    let rows = ctx.storage.execute_sql(&sql, &clauses.params)?;
    Ok(ApiResponse::ok(Value::Array(rows)))
}

/// Verbs that take no query parameters reject any that are sent
fn reject_query_parameters(ctx: &RequestContext<'_>) -> Result<(), ClientError> {
    validate(ctx.request.query(), &ValidParams::NONE)?;
    Ok(())
}
