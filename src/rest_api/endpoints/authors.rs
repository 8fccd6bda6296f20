//! `authors`: read-only author listing.

use crate::rest_api::endpoint::{options_response, Endpoint, RequestContext};
use crate::rest_api::errors::ApiResult;
use crate::rest_api::parser::ValidParams;
use crate::rest_api::query_builder::{QueryBuilder, RequiredJoins};
use crate::rest_api::response::ApiResponse;

use super::select_rows;

const BASE_QUERY: &str = "SELECT author.id AS author_id, author.name AS name FROM author";

const VALID_PARAMS: ValidParams = ValidParams::new(&[
    ("content_id", "content_has_author.content = :content_id"),
    ("author_id", "author.id = :author_id"),
    ("search", "author.name LIKE :search"),
    ("page", ""),
]);

const REQUIRED_JOINS: &RequiredJoins = &[(
    "content_id",
    "JOIN content_has_author ON author.id = content_has_author.author",
)];

const GROUPING: &str = "GROUP BY author.id";

pub struct Authors;

impl Endpoint for Authors {
    fn get(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        let builder = QueryBuilder::new(&VALID_PARAMS)
            .joins(REQUIRED_JOINS)
            .grouping(GROUPING);
        select_rows(ctx, BASE_QUERY, builder)
    }

    fn options(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Ok(options_response("GET, OPTIONS"))
    }
}
