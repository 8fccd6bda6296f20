//! `content`: read-only listing of conference content with its type and
//! award.

use crate::rest_api::endpoint::{options_response, Endpoint, RequestContext};
use crate::rest_api::errors::ApiResult;
use crate::rest_api::parser::ValidParams;
use crate::rest_api::query_builder::{QueryBuilder, RequiredJoins};
use crate::rest_api::response::ApiResponse;

use super::select_rows;

const BASE_QUERY: &str = "SELECT content.id AS content_id, content.title AS title, \
     content.abstract AS abstract, type.name AS type, award.name AS award \
     FROM content \
     JOIN type ON content.type = type.id \
     LEFT JOIN content_has_award ON content.id = content_has_award.content \
     LEFT JOIN award ON content_has_award.award = award.id";

const VALID_PARAMS: ValidParams = ValidParams::new(&[
    ("content_id", "content.id = :content_id"),
    ("author_id", "content_has_author.author = :author_id"),
    (
        "search",
        "(content.title LIKE :search OR content.abstract LIKE :search)",
    ),
    ("page", ""),
]);

const REQUIRED_JOINS: &RequiredJoins = &[(
    "author_id",
    "JOIN content_has_author ON content.id = content_has_author.content",
)];

const GROUPING: &str = "GROUP BY content.id";

pub struct Content;

impl Endpoint for Content {
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

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::rest_api::endpoints::test_support::{call, client_error, request, rows, seeded};

    #[test]
    fn test_all_content() {
        let db = seeded();
        let response = call(&db, &request(Method::GET, "/content", None, false)).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(rows(&response).len(), 6);
    }

    #[test]
    fn test_row_shape_with_award() {
        let db = seeded();
        let response =
            call(&db, &request(Method::GET, "/content?content_id=1", None, false)).unwrap();
        assert_eq!(
            rows(&response),
            &vec![json!({
                "content_id": 1,
                "title": "Designing Calm Interfaces for Shared Homes",
                "abstract": "A field study of ambient displays in multi-occupant households.",
                "type": "Paper",
                "award": "Best Paper",
            })]
        );
    }

    #[test]
    fn test_award_is_null_when_none() {
        let db = seeded();
        let response =
            call(&db, &request(Method::GET, "/content?content_id=3", None, false)).unwrap();
        assert!(rows(&response)[0]["award"].is_null());
    }

    #[test]
    fn test_content_by_author() {
        let db = seeded();
        let response =
            call(&db, &request(Method::GET, "/content?author_id=2", None, false)).unwrap();
        let ids: Vec<i64> = rows(&response)
            .iter()
            .map(|row| row["content_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_search_matches_abstract() {
        let db = seeded();
        let response =
            call(&db, &request(Method::GET, "/content?search=smart%20speakers", None, false))
                .unwrap();
        let rows = rows(&response);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["content_id"], 3);
    }

    #[test]
    fn test_search_value_is_bound_not_spliced() {
        let db = seeded();
        let response = call(
            &db,
            &request(Method::GET, "/content?search=%27%20OR%201%3D1%20--", None, false),
        )
        .unwrap();
        assert!(rows(&response).is_empty());
    }

    #[test]
    fn test_page_beyond_end_is_empty() {
        let db = seeded();
        let response = call(&db, &request(Method::GET, "/content?page=2", None, false)).unwrap();
        assert!(rows(&response).is_empty());
    }

    #[test]
    fn test_invalid_page() {
        let db = seeded();
        for uri in ["/content?page=0", "/content?page=1.5", "/content?page=-2"] {
            let (status, _) = client_error(call(&db, &request(Method::GET, uri, None, false)));
            assert_eq!(status, 422, "{}", uri);
        }
        let (_, message) =
            client_error(call(&db, &request(Method::GET, "/content?page=abc", None, false)));
        assert_eq!(message, "Invalid Parameter: page: Expected a number.");
    }

    #[test]
    fn test_options() {
        let db = seeded();
        let response = call(&db, &request(Method::OPTIONS, "/content", None, false)).unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET, OPTIONS"
        );
    }
}
