//! `awards`: the award catalogue. Every verb except OPTIONS requires the
//! bearer key.

use serde_json::json;

use crate::rest_api::body::{id_field, require_fields, text_field};
use crate::rest_api::endpoint::{options_response, Endpoint, RequestContext};
use crate::rest_api::errors::{ApiResult, ClientError};
use crate::rest_api::parser::ValidParams;
use crate::rest_api::query_builder::{BoundParams, QueryBuilder, RequiredJoins};
use crate::rest_api::response::ApiResponse;

use super::{reject_query_parameters, select_rows};

const BASE_QUERY: &str = "SELECT award.id AS award_id, award.name AS name FROM award";

const VALID_PARAMS: ValidParams = ValidParams::new(&[
    ("content_id", "content_has_award.content = :content_id"),
    ("search", "award.name LIKE :search"),
    ("page", ""),
]);

const REQUIRED_JOINS: &RequiredJoins = &[(
    "content_id",
    "JOIN content_has_award ON award.id = content_has_award.award",
)];

const GROUPING: &str = "GROUP BY award.id";

const AWARD_EXISTS: &str = "SELECT 1 FROM award WHERE id = :award_id";
const NAME_TAKEN: &str = "SELECT 1 FROM award WHERE name = :name AND id != :award_id";

pub struct Awards;

impl Endpoint for Awards {
    fn get(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        ctx.require_key()?;

        let builder = QueryBuilder::new(&VALID_PARAMS)
            .joins(REQUIRED_JOINS)
            .grouping(GROUPING);
        select_rows(ctx, BASE_QUERY, builder)
    }

    fn post(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        ctx.require_key()?;
        reject_query_parameters(ctx)?;

        let body = ctx.request.body()?;
        require_fields(&body, &["name"])?;
        let name = text_field(&body, "name")?;

        let award_id = ctx.storage.transaction(|tx| {
            // No award has id 0, so this checks the name against every award.
            let lookup = BoundParams::new().with("name", name).with("award_id", 0_i64);
            if tx.exists(NAME_TAKEN, &lookup)? {
                return Err(ClientError::conflict(format!("Award {} already exists", name)).into());
            }

            tx.execute(
                "INSERT INTO award (name) VALUES (:name)",
                &BoundParams::new().with("name", name),
            )?;
            Ok(tx.last_insert_rowid())
        })?;

        tracing::info!(award_id, award_name = name, "award created");
        Ok(ApiResponse::created(json!("Award created")))
    }

    fn patch(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        ctx.require_key()?;
        reject_query_parameters(ctx)?;

        let body = ctx.request.body()?;
        require_fields(&body, &["award_id", "name"])?;
        let award_id = id_field(&body, "award_id")?;
        let name = text_field(&body, "name")?;

        ctx.storage.transaction(|tx| {
            let params = BoundParams::new()
                .with("award_id", award_id)
                .with("name", name);

            if !tx.exists(AWARD_EXISTS, &params)? {
                return Err(ClientError::not_found(format!("Award {}", award_id)).into());
            }
            if tx.exists(NAME_TAKEN, &params)? {
                return Err(ClientError::conflict(format!("Award {} already exists", name)).into());
            }

            tx.execute("UPDATE award SET name = :name WHERE id = :award_id", &params)?;
            Ok(())
        })?;

        tracing::info!(award_id, award_name = name, "award updated");
        Ok(ApiResponse::ok(json!("Award updated")))
    }

    fn delete(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        ctx.require_key()?;
        reject_query_parameters(ctx)?;

        let body = ctx.request.body()?;
        require_fields(&body, &["award_id"])?;
        let award_id = id_field(&body, "award_id")?;

        ctx.storage.transaction(|tx| {
            let params = BoundParams::new().with("award_id", award_id);
            if !tx.exists(AWARD_EXISTS, &params)? {
                return Err(ClientError::not_found(format!("Award {}", award_id)).into());
            }

            tx.execute("DELETE FROM content_has_award WHERE award = :award_id", &params)?;
            tx.execute("DELETE FROM award WHERE id = :award_id", &params)?;
            Ok(())
        })?;

        tracing::info!(award_id, "award deleted");
        Ok(ApiResponse::no_content())
    }

    fn options(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Ok(options_response("GET, POST, PATCH, DELETE, OPTIONS"))
    }
}
