use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bulkparts_bulk::BatchError;
use bulkparts_infra::{SettingsError, StoreError};

pub fn batch_error_to_response(err: &BatchError) -> axum::response::Response {
    let status = match err {
        BatchError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        BatchError::PluginNotLoaded(_) => StatusCode::INTERNAL_SERVER_ERROR,
        BatchError::CreationDisabled | BatchError::InvalidJson(_) | BatchError::ItemsRequired => {
            StatusCode::BAD_REQUEST
        }
    };

    let body = match err.detail() {
        Some(detail) => json!({ "error": err.code(), "detail": detail }),
        None => json!({ "error": err.code() }),
    };
    (status, axum::Json(body)).into_response()
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "catalog store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn settings_error_to_response(err: SettingsError) -> axum::response::Response {
    match err {
        SettingsError::Invalid { .. } => json_error(StatusCode::BAD_REQUEST, "invalid_setting", err.to_string()),
        SettingsError::Unavailable(_) => {
            tracing::error!(error = %err, "settings store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "plugin_not_loaded", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
