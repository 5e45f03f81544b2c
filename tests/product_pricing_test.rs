mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{decimal_field, TestApp};

#[tokio::test]
async fn consigned_product_gain_is_commission_minus_surcharge() {
    let app = TestApp::new().await;
    let category = app.seed_category("Strollers").await;
    let co_client = app.seed_co_client().await;

    let (status, body) = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "name": "Travel stroller",
                "sale_price": 100,
                "stock_quantity": 1,
                "is_consigned": true,
                "consignment_percent": 20,
                "surcharge": 5,
                "category_id": category,
                "co_client_id": co_client
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal_field(&body["gain"]), dec!(15));
    assert_eq!(body["is_available"], json!(true));
}

#[tokio::test]
async fn consigned_gain_ignores_purchase_price() {
    let app = TestApp::new().await;
    let category = app.seed_category("Car seats").await;

    let (status, body) = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "name": "Infant car seat",
                "sale_price": 100,
                "purchase_price": 999,
                "stock_quantity": 1,
                "is_consigned": true,
                "consignment_percent": 20,
                "surcharge": 5,
                "category_id": category
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal_field(&body["gain"]), dec!(15));
}

#[tokio::test]
async fn owned_product_gain_is_margin_minus_surcharge() {
    let app = TestApp::new().await;
    let category = app.seed_category("Cribs").await;

    let (status, body) = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "name": "Wooden crib",
                "sale_price": 100,
                "purchase_price": 60,
                "stock_quantity": 2,
                "is_consigned": false,
                "surcharge": 5,
                "category_id": category
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal_field(&body["gain"]), dec!(35));
}

#[tokio::test]
async fn owned_product_without_purchase_price_treats_it_as_zero() {
    let app = TestApp::new().await;
    let category = app.seed_category("Toys").await;

    let (status, body) = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "name": "Plush rabbit",
                "sale_price": 40,
                "stock_quantity": 5,
                "is_consigned": false,
                "surcharge": 2,
                "category_id": category
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal_field(&body["gain"]), dec!(38));
}

#[tokio::test]
async fn patch_recomputes_gain_from_merged_values() {
    let app = TestApp::new().await;
    let category = app.seed_category("Bottles").await;
    let product = app
        .seed_product(
            category,
            json!({
                "name": "Glass bottle set",
                "sale_price": 100,
                "purchase_price": 60,
                "stock_quantity": 3,
                "is_consigned": false,
                "surcharge": 5
            }),
        )
        .await;

    // Only the surcharge changes; sale and purchase price must keep their
    // stored contribution.
    let (status, body) = app
        .request_authenticated(
            Method::PATCH,
            &format!("/products/{product}"),
            Some(json!({"surcharge": 10})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(decimal_field(&body["gain"]), dec!(30));
    assert_eq!(decimal_field(&body["sale_price"]), dec!(100));

    // Flipping to consignment recomputes under the other formula:
    // 100 * 50% - 10 (surcharge kept from the previous patch).
    let (status, body) = app
        .request_authenticated(
            Method::PATCH,
            &format!("/products/{product}"),
            Some(json!({"is_consigned": true, "consignment_percent": 50})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(decimal_field(&body["gain"]), dec!(40));
}

#[tokio::test]
async fn consignment_percent_out_of_range_is_rejected() {
    let app = TestApp::new().await;
    let category = app.seed_category("Monitors").await;

    let (status, _) = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "name": "Baby monitor",
                "sale_price": 80,
                "stock_quantity": 1,
                "is_consigned": true,
                "consignment_percent": 150,
                "category_id": category
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_unknown_category_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "name": "Orphan product",
                "sale_price": 10,
                "stock_quantity": 1,
                "is_consigned": false,
                "category_id": "00000000-0000-0000-0000-000000000000"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_filters_and_sold_annotation() {
    let app = TestApp::new().await;
    let category = app.seed_category("Chairs").await;
    let other_category = app.seed_category("Highchairs").await;

    app.seed_product(
        category,
        json!({
            "name": "Rocking chair",
            "sale_price": 120,
            "purchase_price": 70,
            "stock_quantity": 1,
            "is_consigned": false
        }),
    )
    .await;
    app.seed_product(
        other_category,
        json!({
            "name": "Feeding highchair",
            "sale_price": 90,
            "stock_quantity": 1,
            "is_consigned": true,
            "consignment_percent": 30
        }),
    )
    .await;

    // category filter
    let (status, body) = app
        .request_authenticated(
            Method::GET,
            &format!("/products?category_id={category}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], json!("Rocking chair"));
    assert_eq!(body["data"][0]["is_sold"], json!(false));
    assert_eq!(body["data"][0]["category"]["name"], json!("Chairs"));

    // consignment filter
    let (status, body) = app
        .request_authenticated(Method::GET, "/products?is_consigned=true", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], json!("Feeding highchair"));

    // price range filter
    let (status, body) = app
        .request_authenticated(Method::GET, "/products?min_price=100", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], json!("Rocking chair"));
}
