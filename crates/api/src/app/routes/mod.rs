use axum::{
    routing::{any, get, post},
    Router,
};

pub mod action;
pub mod bulk;
pub mod locations;
pub mod page;
pub mod settings;
pub mod system;

/// Router for all authenticated endpoints.
///
/// The bulk-create and search routes accept any method so that a caller with
/// the right permission gets a JSON `method_not_allowed` instead of a bare 405.
pub fn router() -> Router {
    Router::new()
        .route("/", get(page::page))
        .route("/api/bulk-create/", any(bulk::bulk_create))
        .route("/api/search-locations/", any(locations::search_locations))
        .route("/api/action/", post(action::run_action))
        .route("/api/settings/", get(settings::get_settings).put(settings::update_settings))
}
