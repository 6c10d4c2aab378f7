use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use bulkparts_api::app::{AppServices, build_app_with};
use bulkparts_auth::{JwtClaims, PrincipalId, Role};
use bulkparts_infra::{InMemoryCatalogStore, InMemorySettingsStore, PluginSettings};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    catalog: InMemoryCatalogStore,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Category 1 "Electronics"; locations 1 "Warehouse" and 2 "Warehouse/Shelf".
    async fn spawn(settings: PluginSettings) -> Self {
        let catalog = InMemoryCatalogStore::with_part_url_prefix(Some("/part/".to_string()));
        catalog.add_category("Electronics", None).unwrap();
        let warehouse = catalog.add_location("Warehouse", None).unwrap();
        catalog.add_location("Shelf", Some(warehouse.id)).unwrap();

        let services = AppServices::new(
            Arc::new(catalog.clone()),
            Arc::new(InMemorySettingsStore::new(settings)),
        );

        // Same router as prod, but bound to an ephemeral port.
        let app = build_app_with(services, JWT_SECRET.as_bytes().to_vec());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            catalog,
            handle,
        }
    }

    async fn spawn_default() -> Self {
        Self::spawn(PluginSettings::default()).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(roles: &[&'static str]) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        username: Some("alice".to_string()),
        roles: roles.iter().map(|r| Role::new(*r)).collect(),
        issued_at: now - ChronoDuration::seconds(5),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn post_bulk(srv: &TestServer, token: &str, body: Value) -> (StatusCode, Value) {
    let res = reqwest::Client::new()
        .post(srv.url("/api/bulk-create/"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn_default().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let res = client.post(srv.url("/api/bulk-create/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(srv.url("/api/search-locations/?q=shelf"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn creates_part_with_stock() {
    let srv = TestServer::spawn_default().await;
    let token = mint_jwt(&["parts_manager"]);

    let (status, body) = post_bulk(
        &srv,
        &token,
        json!({"items": [{"category_id": 1, "name": "Widget", "quantity": 5, "location_id": 2}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body["results"][0];
    assert_eq!(result["index"], 0);
    assert_eq!(result["success"], true);
    assert_eq!(result["part"]["name"], "Widget");
    assert_eq!(result["part"]["ipn"], "");
    let part_id = result["part"]["id"].as_i64().unwrap();
    assert_eq!(result["part"]["url"], format!("/part/{part_id}/"));
    assert_eq!(result["stock_item"]["quantity"], 5);
    assert_eq!(result["stock_item"]["location_id"], 2);
    assert!(result["stock_item"]["id"].is_i64());

    assert_eq!(srv.catalog.parts().len(), 1);
    assert_eq!(srv.catalog.stock_items().len(), 1);
}

#[tokio::test]
async fn item_failures_are_inline_and_ordered() {
    let srv = TestServer::spawn_default().await;
    let token = mint_jwt(&["parts_manager"]);

    let (status, body) = post_bulk(
        &srv,
        &token,
        json!({"items": [
            {"category_id": 42, "name": "Ghost"},
            {"category_id": 1, "name": "Real"},
            {"name": "Nameless category"},
            {"category_id": 1, "name": "Needs location", "quantity": 3}
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["error"], "invalid_category");
    assert_eq!(results[1]["success"], true);
    assert_eq!(results[2]["error"], "missing_required_fields");
    assert_eq!(results[2]["fields"], json!({"category_id": false, "name": true}));
    assert_eq!(results[3]["error"], "location_required_for_stock_in");
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r["index"], i);
    }
    assert_eq!(srv.catalog.parts().len(), 1);
}

#[tokio::test]
async fn default_location_applies_to_stock_in() {
    let srv = TestServer::spawn(PluginSettings {
        allow_create: true,
        default_stock_location_id: 1,
    })
    .await;
    let token = mint_jwt(&["parts_manager"]);

    let (_, body) = post_bulk(&srv, &token, json!({"items": [{"category_id": 1, "name": "A", "quantity": 2}]})).await;

    assert_eq!(body["results"][0]["success"], true);
    assert_eq!(body["results"][0]["stock_item"]["location_id"], 1);
}

#[tokio::test]
async fn batch_level_errors() {
    let srv = TestServer::spawn_default().await;
    let token = mint_jwt(&["parts_manager"]);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/api/bulk-create/"))
        .bearer_auth(&token)
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_json");

    let (status, body) = post_bulk(&srv, &token, json!({"items": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "items_required");

    let res = client
        .get(srv.url("/api/bulk-create/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "method_not_allowed");

    assert!(srv.catalog.parts().is_empty());
}

#[tokio::test]
async fn creation_disabled_by_settings() {
    let srv = TestServer::spawn(PluginSettings {
        allow_create: false,
        default_stock_location_id: 0,
    })
    .await;
    let token = mint_jwt(&["parts_manager"]);

    let (status, body) = post_bulk(&srv, &token, json!({"items": [{"category_id": 1, "name": "A"}]})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "creation_disabled");
    assert_eq!(body["detail"], "Plugin setting ALLOW_CREATE is disabled");
    assert!(srv.catalog.parts().is_empty());
}

#[tokio::test]
async fn viewer_cannot_create_parts() {
    let srv = TestServer::spawn_default().await;
    let token = mint_jwt(&["viewer"]);

    let (status, body) = post_bulk(&srv, &token, json!({"items": [{"category_id": 1, "name": "A"}]})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
    assert!(srv.catalog.parts().is_empty());
}

#[tokio::test]
async fn search_locations_by_name() {
    let srv = TestServer::spawn_default().await;
    let token = mint_jwt(&["viewer"]);
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/search-locations/?q=SHEL"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"results": [{"id": 2, "text": "Warehouse/Shelf"}]}));

    let res = client
        .get(srv.url("/api/search-locations/?q=%20%20"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"results": []}));

    let res = client
        .post(srv.url("/api/search-locations/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn page_context_lists_catalog() {
    let srv = TestServer::spawn(PluginSettings {
        allow_create: true,
        default_stock_location_id: 2,
    })
    .await;
    let token = mint_jwt(&["viewer"]);

    let res = reqwest::Client::new()
        .get(srv.url("/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["title"], "Bulk Products");
    assert_eq!(body["categories"][0]["name"], "Electronics");
    assert_eq!(body["locations"][1]["pathstring"], "Warehouse/Shelf");
    assert_eq!(body["default_location_id"], 2);
}

#[tokio::test]
async fn dry_run_action_reports_plan_without_writing() {
    let srv = TestServer::spawn_default().await;
    let token = mint_jwt(&["viewer"]);

    let res = reqwest::Client::new()
        .post(srv.url("/api/action/"))
        .bearer_auth(&token)
        .json(&json!({
            "action": "bulkproducts.dry_run",
            "data": {"parts": [{"name": " Bolt ", "quantity": 4}, {"name": "Nut", "ipn": "N-1"}]}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["action"], "bulkproducts.dry_run");
    assert_eq!(body["result"], true);
    assert_eq!(body["info"]["mode"], "dry-run");
    assert_eq!(body["info"]["count"], 2);
    assert_eq!(body["info"]["user"], "alice");
    assert_eq!(
        body["info"]["plan"],
        json!([
            {"create_part": {"name": "Bolt", "ipn": null}, "stock_in": {"quantity": 4}},
            {"create_part": {"name": "Nut", "ipn": "N-1"}, "stock_in": null}
        ])
    );
    assert!(srv.catalog.parts().is_empty());
}

#[tokio::test]
async fn settings_require_permission_and_apply_partially() {
    let srv = TestServer::spawn_default().await;
    let client = reqwest::Client::new();

    let manager = mint_jwt(&["parts_manager"]);
    let res = client
        .get(srv.url("/api/settings/"))
        .bearer_auth(&manager)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let admin = mint_jwt(&["admin"]);
    let res = client
        .put(srv.url("/api/settings/"))
        .bearer_auth(&admin)
        .json(&json!({"ALLOW_CREATE": false}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"ALLOW_CREATE": false, "DEFAULT_STOCK_LOCATION_ID": 0}));

    let res = client
        .put(srv.url("/api/settings/"))
        .bearer_auth(&admin)
        .json(&json!({"DEFAULT_STOCK_LOCATION_ID": -1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_setting");

    // The earlier update is now in force for bulk creation.
    let (status, body) = post_bulk(&srv, &admin, json!({"items": [{"category_id": 1, "name": "A"}]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "creation_disabled");
}
