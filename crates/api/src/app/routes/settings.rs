use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use bulkparts_auth::Permission;
use bulkparts_infra::SettingsPatch;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub async fn get_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(denied) = crate::authz::require(&principal, &Permission::CHANGE_SETTINGS) {
        return denied;
    }

    match services.settings.load() {
        Ok(settings) => Json(settings).into_response(),
        Err(e) => errors::settings_error_to_response(e),
    }
}

/// Partial update; keys left out keep their value.
pub async fn update_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> axum::response::Response {
    if let Err(denied) = crate::authz::require(&principal, &Permission::CHANGE_SETTINGS) {
        return denied;
    }

    let patch: SettingsPatch = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", e.to_string()),
    };

    match services.settings.update(patch) {
        Ok(settings) => {
            tracing::info!(
                principal = %principal.principal_id(),
                allow_create = settings.allow_create,
                default_stock_location_id = settings.default_stock_location_id,
                "plugin settings updated"
            );
            Json(settings).into_response()
        }
        Err(e) => errors::settings_error_to_response(e),
    }
}
