mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn login_returns_a_usable_bearer_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "operator@example.com",
                "password": "correct-horse-battery"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], json!("bearer"));
    assert!(body["access_token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "operator@example.com",
                "password": "wrong"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/commands", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/stats/kpis", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn categories_and_users_stay_public() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/categories", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    // the seeded operator is listed, with no password material exposed
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert!(body["data"][0].get("password_hash").is_none());
}

#[tokio::test]
async fn authenticated_requests_pass() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_authenticated(Method::GET, "/products", None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
