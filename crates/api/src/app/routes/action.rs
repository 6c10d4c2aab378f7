use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use bulkparts_bulk::DRY_RUN_ACTION;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// `POST /api/action/`: the dry-run plugin action. Never writes.
pub async fn run_action(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> axum::response::Response {
    let request: dto::ActionRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", e.to_string()),
    };

    if request.action != DRY_RUN_ACTION {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "unknown_action",
            format!("no action named '{}'", request.action),
        );
    }

    let settings = match services.settings.load() {
        Ok(s) => s,
        Err(e) => return errors::settings_error_to_response(e),
    };

    let report = bulkparts_bulk::dry_run(&request.data, settings, principal.username().map(str::to_string));
    Json(json!({
        "action": request.action,
        "result": report.is_success(),
        "info": report,
    }))
    .into_response()
}
