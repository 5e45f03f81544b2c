mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::TestApp;

const BOUNDARY: &str = "depot-test-boundary";

fn multipart_body(product_id: Uuid, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"product_id\"\r\n\r\n{product_id}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn seeded_product(app: &TestApp) -> Uuid {
    let category = app.seed_category("Photogenic").await;
    app.seed_product(
        category,
        json!({
            "name": "Photographed product",
            "sale_price": 30,
            "stock_quantity": 1,
            "is_consigned": false
        }),
    )
    .await
}

#[tokio::test]
async fn upload_stores_the_file_and_records_its_path() {
    let app = TestApp::new().await;
    let product = seeded_product(&app).await;

    let body = multipart_body(product, "photo.png", b"not-really-a-png");
    let (status, response) = app
        .request_multipart("/product-photos/upload", BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::CREATED, "{response}");
    let path = response["path"].as_str().unwrap();
    assert!(path.starts_with("/uploads/product-"));
    assert!(path.ends_with(".png"));

    // the photo shows up in the per-product listing
    let (status, listing) = app
        .request_authenticated(
            Method::GET,
            &format!("/product-photos/product/{product}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["path"], json!(path));
}

#[tokio::test]
async fn non_image_uploads_are_rejected() {
    let app = TestApp::new().await;
    let product = seeded_product(&app).await;

    let body = multipart_body(product, "malware.exe", b"MZ");
    let (status, _) = app
        .request_multipart("/product-photos/upload", BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_for_unknown_product_is_not_found() {
    let app = TestApp::new().await;

    let body = multipart_body(Uuid::nil(), "photo.jpg", b"bytes");
    let (status, _) = app
        .request_multipart("/product-photos/upload", BOUNDARY, body)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn legacy_bulk_registration_and_delete() {
    let app = TestApp::new().await;
    let product = seeded_product(&app).await;

    let (status, created) = app
        .request_authenticated(
            Method::POST,
            "/product-photos",
            Some(json!({
                "product_id": product,
                "paths": ["/uploads/a.jpg", "/uploads/b.jpg"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().unwrap().len(), 2);

    let first_id = created[0]["id"].as_str().unwrap();
    let (status, body) = app
        .request_authenticated(Method::DELETE, &format!("/product-photos/{first_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Photo deleted successfully"));

    let (status, _) = app
        .request_authenticated(Method::DELETE, &format!("/product-photos/{first_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
