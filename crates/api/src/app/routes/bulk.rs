use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::Method,
    response::IntoResponse,
    Json,
};

use bulkparts_auth::Permission;
use bulkparts_bulk::BatchError;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// `POST /api/bulk-create/`: create parts (and initial stock) item by item.
///
/// Always 200 once item processing starts; per-item failures are inline.
pub async fn bulk_create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    method: Method,
    body: Bytes,
) -> axum::response::Response {
    if let Err(denied) = crate::authz::require(&principal, &Permission::ADD_PART) {
        return denied;
    }

    if method != Method::POST {
        return errors::batch_error_to_response(&BatchError::MethodNotAllowed);
    }

    let settings = match services.settings.load() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "settings unavailable");
            return errors::batch_error_to_response(&BatchError::PluginNotLoaded(e.to_string()));
        }
    };

    match bulkparts_bulk::bulk_create(&*services.catalog, &settings, &body).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::info!(principal = %principal.principal_id(), error = e.code(), "bulk create rejected");
            errors::batch_error_to_response(&e)
        }
    }
}
