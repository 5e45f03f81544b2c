mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn category_crud_round_trip() {
    let app = TestApp::new().await;

    let (status, created) = app
        .request(
            Method::POST,
            "/categories",
            Some(json!({"name": "Nursery", "description": "Beds and decor"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = TestApp::id_of(&created);

    let (status, fetched) = app
        .request(Method::GET, &format!("/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], json!("Nursery"));

    let (status, updated) = app
        .request(
            Method::PATCH,
            &format!("/categories/{id}"),
            Some(json!({"description": "Beds, mobiles and decor"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("Nursery"));
    assert_eq!(updated["description"], json!("Beds, mobiles and decor"));

    let (status, body) = app
        .request(Method::DELETE, &format!("/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Category deleted successfully"));
}

#[tokio::test]
async fn delete_of_missing_category_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::DELETE,
            "/categories/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn limit_is_capped_and_total_pages_is_ceiling() {
    let app = TestApp::new().await;
    for i in 0..12 {
        app.seed_category(&format!("Category {i}")).await;
    }

    // a limit far above the cap is clamped to 10
    let (status, body) = app
        .request(Method::GET, "/categories?page=1&limit=500", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["limit"], json!(10));
    assert_eq!(body["meta"]["total"], json!(12));
    assert_eq!(body["meta"]["total_pages"], json!(2));
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let (status, body) = app
        .request(Method::GET, "/categories?page=2&limit=500", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // smaller limits are honored
    let (_, body) = app
        .request(Method::GET, "/categories?page=1&limit=5", None)
        .await;
    assert_eq!(body["meta"]["limit"], json!(5));
    assert_eq!(body["meta"]["total_pages"], json!(3));
}

#[tokio::test]
async fn search_filters_by_name_and_description() {
    let app = TestApp::new().await;
    app.seed_category("Strollers").await;
    app.seed_category("Clothing").await;

    let (status, body) = app
        .request(Method::GET, "/categories?search=stroll", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], json!("Strollers"));
}
