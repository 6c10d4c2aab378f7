use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use bulkparts_auth::Permission;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Context for the bulk-products page: categories, locations and the default
/// stock location.
pub async fn page(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(denied) = crate::authz::require(&principal, &Permission::VIEW_CATEGORIES) {
        return denied;
    }

    match bulkparts_bulk::page_context(&*services.catalog, services.settings.load()).await {
        Ok(ctx) => Json(ctx).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
