//! `award-management`: attach an award to content, or detach it. A content
//! item holds at most one award.

use serde_json::json;

use crate::rest_api::body::{id_field, require_fields};
use crate::rest_api::endpoint::{options_response, Endpoint, RequestContext};
use crate::rest_api::errors::{ApiResult, ClientError};
use crate::rest_api::query_builder::BoundParams;
use crate::rest_api::request::ApiRequest;
use crate::rest_api::response::ApiResponse;

use super::reject_query_parameters;

const FIELDS: [&str; 2] = ["content_id", "award_id"];

const CONTENT_EXISTS: &str = "SELECT 1 FROM content WHERE id = :content_id";
const CONTENT_HAS_AWARD: &str = "SELECT 1 FROM content_has_award WHERE content = :content_id";
const AWARD_EXISTS: &str = "SELECT 1 FROM award WHERE id = :award_id";

pub struct AwardManagement;

/// Both identifiers from the body, in field order
fn link_ids(request: &ApiRequest) -> Result<(i64, i64), ClientError> {
    let body = request.body()?;
    require_fields(&body, &FIELDS)?;
    Ok((id_field(&body, "content_id")?, id_field(&body, "award_id")?))
}

impl Endpoint for AwardManagement {
    fn post(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        ctx.require_key()?;
        reject_query_parameters(ctx)?;
        let (content_id, award_id) = link_ids(ctx.request)?;

        ctx.storage.transaction(|tx| {
            let params = BoundParams::new()
                .with("content_id", content_id)
                .with("award_id", award_id);

            if !tx.exists(CONTENT_EXISTS, &params)? {
                return Err(ClientError::not_found(format!("Content {}", content_id)).into());
            }
            if tx.exists(CONTENT_HAS_AWARD, &params)? {
                return Err(ClientError::conflict(format!(
                    "Content {} already has an award",
                    content_id
                ))
                .into());
            }
            if !tx.exists(AWARD_EXISTS, &params)? {
                return Err(ClientError::not_found(format!("Award {}", award_id)).into());
            }

            tx.execute(
                "INSERT INTO content_has_award (content, award) VALUES (:content_id, :award_id)",
                &params,
            )?;
            Ok(())
        })?;

        tracing::info!(content_id, award_id, "award assigned");
        Ok(ApiResponse::created(json!("Award assigned")))
    }

    fn delete(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        ctx.require_key()?;
        reject_query_parameters(ctx)?;
        let (content_id, award_id) = link_ids(ctx.request)?;

        let params = BoundParams::new()
            .with("content_id", content_id)
            .with("award_id", award_id);
        let removed = ctx.storage.execute(
            "DELETE FROM content_has_award WHERE content = :content_id AND award = :award_id",
            &params,
        )?;

        if removed == 0 {
            return Err(ClientError::not_found(format!(
                "Content {} does not hold award {}",
                content_id, award_id
            ))
            .into());
        }

        tracing::info!(content_id, award_id, "award unassigned");
        Ok(ApiResponse::no_content())
    }

    fn options(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Ok(options_response("POST, DELETE, OPTIONS"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::rest_api::database::{Database, Storage};
    use crate::rest_api::endpoints::test_support::{call, client_error, request, seeded};
    use crate::rest_api::query_builder::BoundParams;

    fn links(db: &Database) -> Vec<Value> {
        let conn = db.lock();
        Storage::new(&conn)
            .execute_sql(
                "SELECT content, award FROM content_has_award ORDER BY content",
                &BoundParams::new(),
            )
            .unwrap()
    }

    fn post(db: &Database, body: Value) -> (u16, String) {
        client_error(call(
            db,
            &request(Method::POST, "/award-management", Some(body), true),
        ))
    }

    #[test]
    fn test_assign_award() {
        let db = seeded();
        let response = call(
            &db,
            &request(
                Method::POST,
                "/award-management",
                Some(json!({"content_id": 3, "award_id": 3})),
                true,
            ),
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body(), &json!("Award assigned"));
        assert_eq!(links(&db).len(), 3);
    }

    #[test]
    fn test_content_already_awarded_is_conflict() {
        let db = seeded();
        let (status, _) = post(&db, json!({"content_id": 5, "award_id": 9}));
        assert_eq!(status, 409);
        assert_eq!(
            links(&db),
            vec![json!({"content": 1, "award": 1}), json!({"content": 5, "award": 2})]
        );
    }

    #[test]
    fn test_unknown_content_or_award() {
        let db = seeded();
        let (status, message) = post(&db, json!({"content_id": 99, "award_id": 1}));
        assert_eq!(status, 404);
        assert_eq!(message, "Resource Not found: Content 99");

        let (status, message) = post(&db, json!({"content_id": 2, "award_id": 9}));
        assert_eq!(status, 404);
        assert_eq!(message, "Resource Not found: Award 9");
        assert_eq!(links(&db).len(), 2);
    }

    #[test]
    fn test_body_field_checks() {
        let db = seeded();
        let (status, message) = post(&db, json!({"award_id": 1}));
        assert_eq!(status, 422);
        assert_eq!(message, "Invalid Parameter: content_id is required");

        let (_, message) = post(&db, json!({"content_id": "two", "award_id": 1}));
        assert_eq!(message, "Invalid Parameter: content_id: Expected a number.");
    }

    #[test]
    fn test_non_object_body() {
        let db = seeded();
        let (status, _) = post(&db, json!([1, 2]));
        assert_eq!(status, 400);
    }

    #[test]
    fn test_remove_award() {
        let db = seeded();
        let response = call(
            &db,
            &request(
                Method::DELETE,
                "/award-management",
                Some(json!({"content_id": 5, "award_id": 2})),
                true,
            ),
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(links(&db), vec![json!({"content": 1, "award": 1})]);
    }

    #[test]
    fn test_remove_absent_link() {
        let db = seeded();
        let (status, _) = client_error(call(
            &db,
            &request(
                Method::DELETE,
                "/award-management",
                Some(json!({"content_id": 5, "award_id": 1})),
                true,
            ),
        ));
        assert_eq!(status, 404);
        assert_eq!(links(&db).len(), 2);
    }

    #[test]
    fn test_get_not_allowed() {
        let db = seeded();
        let (status, _) =
            client_error(call(&db, &request(Method::GET, "/award-management", None, true)));
        assert_eq!(status, 405);
    }

    #[test]
    fn test_options_needs_no_key() {
        let db = seeded();
        let response =
            call(&db, &request(Method::OPTIONS, "/award-management", None, false)).unwrap();
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "POST, DELETE, OPTIONS"
        );
    }
}
