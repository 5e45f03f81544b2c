mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn client_csv_export_is_a_bom_prefixed_attachment() {
    let app = TestApp::new().await;
    app.seed_client().await;

    let response = app.request_raw(Method::GET, "/clients/export/csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap(),
        "attachment; filename=clients.csv"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with('\u{feff}'));
    assert!(text.contains("First Name,Last Name,Email"));
    assert!(text.contains("Amira,Ben Salah,amira@example.com"));
}

#[tokio::test]
async fn product_pdf_export_renders_a_pdf_document() {
    let app = TestApp::new().await;
    let category = app.seed_category("Export").await;
    app.seed_product(
        category,
        json!({
            "name": "Exported product",
            "sale_price": 10,
            "stock_quantity": 1,
            "is_consigned": false
        }),
    )
    .await;

    let response = app.request_raw(Method::GET, "/products/export/pdf").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn command_csv_export_includes_status_column() {
    let app = TestApp::new().await;
    let category = app.seed_category("Export").await;
    let client = app.seed_client().await;
    let product = app
        .seed_product(
            category,
            json!({
                "name": "Exported product",
                "sale_price": 10,
                "stock_quantity": 1,
                "is_consigned": false
            }),
        )
        .await;
    app.request_authenticated(
        Method::POST,
        "/commands",
        Some(json!({
            "product_count": 1,
            "sale_price": 10,
            "purchase_price": 4,
            "product_ids": [product],
            "client_id": client,
            "delivery_address": "Export street"
        })),
    )
    .await;

    let response = app.request_raw(Method::GET, "/commands/export/csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("NOT_DELIVERED"));
    assert!(text.contains("Export street"));
}

#[tokio::test]
async fn exports_require_authentication() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/clients/export/csv", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request(Method::GET, "/products/export/pdf", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
