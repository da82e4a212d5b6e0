#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use banstore_adapters::{
    incoming::http_axum::{middleware::request_id::REQUEST_ID_HEADER, routes::build_application_router},
    outgoing::flat_file::{
        ban_store_file::{FlatFileBanStoreAdapter, FlatFileBanStoreConfig},
        blacklist_file::FileBlacklistAdapter,
    },
    shared::app_state::AppState,
};
use banstore_application::{
    ban::service::BanService,
    config::ListingSettings,
    infrastructure_config::Config,
    ports::outgoing::{ban_enforcement::DynBanEnforcementPort, ban_store::DynBanStorePort},
};

const TOKEN: &str = "test-admin-token";

struct TestApp {
    router: Router,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().unwrap();

    let mut config = Config::default();
    config.storage.base_dir = dir.path().to_path_buf();
    config.enforcement.blacklist_file = dir.path().join("Blacklist.txt");
    config.listing.max_page_size = 20;
    config.admin.api_token = SecretString::from(TOKEN);
    let config = Arc::new(config);

    let enforcement: DynBanEnforcementPort = Arc::new(
        FileBlacklistAdapter::open(config.enforcement.blacklist_file.clone())
            .await
            .unwrap(),
    );
    let store: DynBanStorePort = Arc::new(
        FlatFileBanStoreAdapter::open(
            FlatFileBanStoreConfig::from(&config.storage),
            Arc::clone(&enforcement),
        )
        .await
        .unwrap(),
    );
    let service = BanService::new(
        store,
        enforcement,
        ListingSettings::from(&config.listing),
    );

    let state = AppState::new(Arc::clone(&config), Arc::new(service));
    let router = build_application_router(&state).with_state(state);

    TestApp { router, _dir: dir }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn admin(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }
}

fn ban_body(name: &str, reason: &str, duration_secs: u32) -> Value {
    json!({
        "target_display_name": name,
        "target_account_name": name.to_lowercase(),
        "admin_id": 76_561_198_000_000_001_u64,
        "admin_display_name": "Warden",
        "admin_account_name": "warden",
        "reason": reason,
        "duration_secs": duration_secs
    })
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(Request::get("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn ban_routes_reject_missing_or_wrong_tokens() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(Request::get("/bans").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["ok"], false);

    let (status, _) = app
        .send(
            Request::get("/bans")
                .header(header::AUTHORIZATION, "Bearer not-the-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Request::get("/bans")
                .header(header::AUTHORIZATION, format!("Bearer {TOKEN}extra"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_authorization_schemes_are_unauthorized() {
    let app = spawn_app().await;

    for value in [format!("Basic {TOKEN}"), TOKEN.to_string(), "Bearer".to_string()] {
        let (status, body) = app
            .send(
                Request::get("/bans")
                    .header(header::AUTHORIZATION, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["ok"], false);
    }
}

#[tokio::test]
async fn banned_player_can_be_fetched_and_unbanned() {
    let app = spawn_app().await;

    let (status, body) = app
        .admin(
            "PUT",
            "/bans/76561198000000042",
            Some(ban_body("Griefer", "tnt in spawn", 0)),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["target_id"], "76561198000000042");
    assert_eq!(body["data"]["permanent"], true);
    assert_eq!(body["data"]["expires_at"], Value::Null);

    let (status, body) = app.admin("GET", "/bans/76561198000000042", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reason"], "tnt in spawn");
    assert_eq!(body["data"]["admin_id"], "76561198000000001");

    let (status, body) = app.admin("DELETE", "/bans/76561198000000042", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = app.admin("GET", "/bans/76561198000000042", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.admin("DELETE", "/bans/76561198000000042", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_id_may_be_sent_as_a_string() {
    let app = spawn_app().await;
    let mut body = ban_body("Echoed", "alt account", 0);
    body["admin_id"] = json!("76561198000000007");

    let (status, response) = app.admin("PUT", "/bans/12", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["admin_id"], "76561198000000007");

    let mut body = ban_body("Echoed", "alt account", 0);
    body["admin_id"] = json!("not-an-id");
    let (status, _) = app.admin("PUT", "/bans/13", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn timed_ban_reports_its_expiry() {
    let app = spawn_app().await;

    let (status, body) = app
        .admin("PUT", "/bans/5", Some(ban_body("Spammer", "chat spam", 600)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["duration_secs"], 600);
    assert_eq!(body["data"]["permanent"], false);
    assert!(body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn malformed_player_ids_are_bad_requests() {
    let app = spawn_app().await;

    let (status, body) = app.admin("GET", "/bans/STEAM_0:1:42", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn unstorable_text_is_rejected() {
    let app = spawn_app().await;

    let (status, _) = app
        .admin("PUT", "/bans/9", Some(ban_body("Sneaky", "breaks><format", 0)))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .admin("PUT", "/bans/9", Some(ban_body("Sneaky", "", 0)))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.admin("GET", "/bans/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_finds_bans_by_name_fragment() {
    let app = spawn_app().await;
    app.admin("PUT", "/bans/1", Some(ban_body("CreeperHugger", "griefing", 0)))
        .await;

    let (status, body) = app.admin("GET", "/bans/search?name=creeper", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["target_id"], "1");

    let (status, _) = app.admin("GET", "/bans/search?name=zombie", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_uses_defaults_and_validates_page_size() {
    let app = spawn_app().await;
    for id in 1..=7 {
        app.admin(
            "PUT",
            &format!("/bans/{id}"),
            Some(ban_body(&format!("Player{id}"), "spam", 0)),
        )
        .await;
    }

    let (status, body) = app.admin("GET", "/bans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_matches"], 7);
    assert_eq!(body["data"]["page_size"], 5);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["start_rank"], 3);
    assert_eq!(body["data"]["bans"].as_array().unwrap().len(), 5);

    let (status, body) = app.admin("GET", "/bans?page_size=5&page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["start_rank"], 1);
    assert_eq!(body["data"]["bans"].as_array().unwrap().len(), 2);

    let (status, _) = app.admin("GET", "/bans?page_size=21", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.admin("GET", "/bans?page=0", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn sweep_endpoint_reports_lifted_bans() {
    let app = spawn_app().await;
    app.admin("PUT", "/bans/3", Some(ban_body("Active", "spam", 3600)))
        .await;

    let (status, body) = app.admin("POST", "/bans/sweep", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lifted"], 0);
    let (status, _) = app.admin("GET", "/bans/3", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn request_ids_are_echoed_or_generated() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "trace-me-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-me-123");

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}
