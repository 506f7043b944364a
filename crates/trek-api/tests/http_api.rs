use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use trek_api::{router, AppState, AuthConfig};
use trek_domain::InMemoryStore;

const ADMIN_KEY: &str = "test-admin-key";

fn app() -> Router {
    app_with_ttl(None)
}

fn app_with_ttl(ttl_secs: Option<&'static str>) -> Router {
    let store = InMemoryStore::default();
    let cfg = AuthConfig::from_lookup(|key| match key {
        "JWT_SECRET_KEY" => Some("test-secret".into()),
        "ADMIN_MASTER_KEY" => Some(ADMIN_KEY.into()),
        "ACCESS_TTL_SECS" => ttl_secs.map(String::from),
        _ => None,
    });
    router(AppState::new(Arc::new(store.clone()), Arc::new(store), cfg))
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    if uri == "/api/admin/register" {
        req = req.header("x-admin-key", ADMIN_KEY);
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(b.to_string())).unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = call(app,
                           "POST",
                           "/api/admin/register",
                           None,
                           Some(json!({ "username": username, "password": "pw" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(app, "POST", "/api/login", None, Some(json!({ "username": username, "password": "pw" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username);
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_reports_service() {
    let app = app();
    let (status, body) = call(&app, "GET", "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn register_requires_admin_key() {
    let app = app();
    let req = Request::builder().method("POST")
                                .uri("/api/admin/register")
                                .header("content-type", "application/json")
                                .header("x-admin-key", "wrong")
                                .body(Body::from(json!({ "username": "a", "password": "b" }).to_string()))
                                .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["msg"].is_string());
}

#[tokio::test]
async fn register_rejects_empty_and_duplicate() {
    let app = app();
    let (status, body) = call(&app, "POST", "/api/admin/register", None, Some(json!({ "username": "", "password": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].is_string());

    register_and_login(&app, "ana").await;
    let (status, _) = call(&app, "POST", "/api/admin/register", None, Some(json!({ "username": "ana", "password": "x" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = app();
    register_and_login(&app, "ana").await;
    let (s1, b1) = call(&app, "POST", "/api/login", None, Some(json!({ "username": "ana", "password": "nope" }))).await;
    let (s2, b2) = call(&app, "POST", "/api/login", None, Some(json!({ "username": "ghost", "password": "pw" }))).await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
}

#[tokio::test]
async fn media_requires_token() {
    let app = app();
    let (status, body) = call(&app, "GET", "/api/media", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["msg"].is_string());
    let (status, _) = call(&app, "GET", "/api/media", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn media_crud_flow() {
    let app = app();
    let token = register_and_login(&app, "ana").await;

    let item = json!({ "title": "Dune", "media_type": "Book", "status": "Reading", "progress": "p. 120", "rating": 5 });
    let (status, body) = call(&app, "POST", "/api/media", Some(&token), Some(item.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    let media_id = body["media_id"].as_i64().unwrap();

    let (status, body) = call(&app, "POST", "/api/media", Some(&token), Some(item)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (status, body) = call(&app, "GET", "/api/media", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["current_progress"], "p. 120");

    let edit = json!({ "title": "Dune", "media_type": "Book", "status": "Completed", "rating": 4 });
    let (status, _) = call(&app, "PUT", &format!("/api/media/{media_id}"), Some(&token), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "GET", "/api/media", Some(&token), None).await;
    assert_eq!(body["data"][0]["status"], "Completed");
    assert!(body["data"][0]["current_progress"].is_null());

    let (status, _) = call(&app, "DELETE", &format!("/api/media/{media_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "DELETE", &format!("/api/media/{media_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_bad_rating_and_blank_title() {
    let app = app();
    let token = register_and_login(&app, "ana").await;
    let (status, _) = call(&app,
                           "POST",
                           "/api/media",
                           Some(&token),
                           Some(json!({ "title": "X", "media_type": "Movie", "status": "Done", "rating": 6 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app,
                           "POST",
                           "/api/media",
                           Some(&token),
                           Some(json!({ "title": "  ", "media_type": "Movie", "status": "Done" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_items_are_not_found() {
    let app = app();
    let ana = register_and_login(&app, "ana").await;
    let bob = register_and_login(&app, "bob").await;
    let (_, body) = call(&app,
                         "POST",
                         "/api/media",
                         Some(&ana),
                         Some(json!({ "title": "Alien", "media_type": "Movie", "status": "Done" }))).await;
    let media_id = body["media_id"].as_i64().unwrap();

    let (status, _) = call(&app, "DELETE", &format!("/api/media/{media_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = call(&app, "GET", "/api/media", Some(&bob), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    let (_, body) = call(&app, "GET", "/api/media", Some(&ana), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_is_case_insensitive() {
    let app = app();
    let token = register_and_login(&app, "ana").await;
    for title in ["The Matrix", "Matrix Reloaded", "Heat"] {
        call(&app,
             "POST",
             "/api/media",
             Some(&token),
             Some(json!({ "title": title, "media_type": "Movie", "status": "Done" }))).await;
    }
    let (_, body) = call(&app, "GET", "/api/media?q=matrix", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    let (_, body) = call(&app, "GET", "/api/media?q=", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn change_password_checks_current() {
    let app = app();
    let token = register_and_login(&app, "ana").await;
    let (status, _) = call(&app,
                           "PUT",
                           "/api/account/password",
                           Some(&token),
                           Some(json!({ "current_password": "bad", "new_password": "new" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app,
                           "PUT",
                           "/api/account/password",
                           Some(&token),
                           Some(json!({ "current_password": "pw", "new_password": "new" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "POST", "/api/login", None, Some(json!({ "username": "ana", "password": "new" }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleted_account_cannot_add_media() {
    let app = app();
    let token = register_and_login(&app, "ana").await;
    call(&app,
         "POST",
         "/api/media",
         Some(&token),
         Some(json!({ "title": "Heat", "media_type": "Movie", "status": "Done" }))).await;
    let (status, _) = call(&app, "DELETE", "/api/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, "GET", "/api/media", Some(&token), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
    let (status, _) = call(&app,
                           "POST",
                           "/api/media",
                           Some(&token),
                           Some(json!({ "title": "Ronin", "media_type": "Movie", "status": "Done" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "POST", "/api/login", None, Some(json!({ "username": "ana", "password": "pw" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected_with_msg() {
    let app = app_with_ttl(Some("-120"));
    let token = register_and_login(&app, "ana").await;
    let (status, body) = call(&app, "GET", "/api/media", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "expired access token");
    assert!(body.get("status").is_none());
}
