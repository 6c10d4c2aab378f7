use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::Method,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use bulkparts_auth::Permission;
use bulkparts_bulk::BatchError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// `GET /api/search-locations/?q=...`
pub async fn search_locations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    method: Method,
    Query(query): Query<dto::SearchLocationsQuery>,
) -> axum::response::Response {
    if let Err(denied) = crate::authz::require(&principal, &Permission::VIEW_LOCATIONS) {
        return denied;
    }

    if method != Method::GET {
        return errors::batch_error_to_response(&BatchError::MethodNotAllowed);
    }

    match bulkparts_bulk::search_locations(&*services.catalog, &query.q).await {
        Ok(hits) => Json(json!({ "results": hits })).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
