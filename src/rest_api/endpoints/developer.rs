//! `developer`: static information about who runs this service.

use serde_json::json;

use crate::rest_api::endpoint::{options_response, Endpoint, RequestContext};
use crate::rest_api::errors::ApiResult;
use crate::rest_api::response::ApiResponse;

use super::reject_query_parameters;

pub struct Developer;

impl Endpoint for Developer {
    fn get(&self, ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        reject_query_parameters(ctx)?;

        let developer = &ctx.config.developer;
        Ok(ApiResponse::ok(json!({
            "name": developer.name,
            "id": developer.id,
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })))
    }

    fn options(&self, _ctx: &RequestContext<'_>) -> ApiResult<ApiResponse> {
        Ok(options_response("GET, OPTIONS"))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::http_server::DeveloperInfo;
    use crate::rest_api::endpoints::test_support::{call, client_error, request, seeded};

    #[test]
    fn test_developer_info_without_auth() {
        let db = seeded();
        let response = call(&db, &request(Method::GET, "/developer", None, false)).unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.body();
        let defaults = DeveloperInfo::default();
        assert_eq!(body["name"], defaults.name.as_str());
        assert_eq!(body["id"], defaults.id.as_str());
        assert_eq!(body["service"], "confinfo");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_rejects_query_parameters() {
        let db = seeded();
        let (status, message) =
            client_error(call(&db, &request(Method::GET, "/developer?page=1", None, false)));
        assert_eq!(status, 422);
        assert_eq!(message, "Invalid Parameter: Unknown Parameter page");
    }

    #[test]
    fn test_delete_not_allowed() {
        let db = seeded();
        let (status, message) =
            client_error(call(&db, &request(Method::DELETE, "/developer", None, true)));
        assert_eq!(status, 405);
        assert_eq!(message, "Method not allowed: DELETE");
    }
}
