mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use common::{decimal_field, TestApp};

/// Two products (one owned, one consigned) and two commands, one delivered.
async fn seed_dataset(app: &TestApp) -> (Uuid, Uuid) {
    let category = app.seed_category("Mixed").await;
    let client = app.seed_client().await;

    let owned = app
        .seed_product(
            category,
            json!({
                "name": "Owned crib",
                "sale_price": 200,
                "purchase_price": 120,
                "stock_quantity": 1,
                "is_consigned": false,
                "surcharge": 10
            }),
        )
        .await;
    let consigned = app
        .seed_product(
            category,
            json!({
                "name": "Consigned stroller",
                "sale_price": 100,
                "stock_quantity": 1,
                "is_consigned": true,
                "consignment_percent": 20,
                "surcharge": 5
            }),
        )
        .await;

    let (_, first) = app
        .request_authenticated(
            Method::POST,
            "/commands",
            Some(json!({
                "product_count": 1,
                "sale_price": 200,
                "purchase_price": 120,
                "product_ids": [owned],
                "client_id": client,
                "delivery_address": "Rue A"
            })),
        )
        .await;
    app.request_authenticated(
        Method::PATCH,
        &format!("/commands/{}", TestApp::id_of(&first)),
        Some(json!({"status": "DELIVERED"})),
    )
    .await;

    app.request_authenticated(
        Method::POST,
        "/commands",
        Some(json!({
            "product_count": 1,
            "sale_price": 100,
            "purchase_price": 0,
            "product_ids": [consigned],
            "client_id": client,
            "delivery_address": "Rue B"
        })),
    )
    .await;

    (owned, consigned)
}

#[tokio::test]
async fn kpis_aggregate_counts_and_revenue() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/kpis", None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total_products"], json!(2));
    assert_eq!(body["total_commands"], json!(2));
    assert_eq!(body["total_clients"], json!(1));
    assert_eq!(body["delivered_commands"], json!(1));
    assert_eq!(body["profit_commands"], json!(0));
    assert_eq!(decimal_field(&body["total_revenue"]), dec!(300));
    assert_eq!(decimal_field(&body["total_purchase_cost"]), dec!(120));
    assert_eq!(decimal_field(&body["total_profit"]), dec!(180));
    assert_eq!(decimal_field(&body["avg_order_value"]), dec!(150));
}

#[tokio::test]
async fn revenue_breakdown_splits_by_ownership_mode() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/revenue-breakdown", None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    // owned margin: 200 - 120 = 80; consigned gain: 100 * 20% - 5 = 15
    assert_eq!(decimal_field(&body["buying_revenue"]), dec!(80));
    assert_eq!(decimal_field(&body["depot_revenue"]), dec!(15));
    assert_eq!(decimal_field(&body["total_revenue"]), dec!(95));
}

#[tokio::test]
async fn depot_vs_buying_counts_products() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/depot-vs-buying", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["depot"], json!(1));
    assert_eq!(body["buying"], json!(1));
    assert_eq!(body["total"], json!(2));
}

#[tokio::test]
async fn commands_by_status_groups_counts() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/commands-by-status", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    let count_for = |status: &str| {
        rows.iter()
            .find(|r| r["status"] == json!(status))
            .map(|r| r["count"].as_u64().unwrap())
            .unwrap_or(0)
    };
    assert_eq!(count_for("DELIVERED"), 1);
    assert_eq!(count_for("NOT_DELIVERED"), 1);
}

#[tokio::test]
async fn monthly_sold_products_always_exposes_twelve_buckets() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/monthly-sold-products", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 12);
    let total: i64 = buckets.iter().map(|b| b["count"].as_i64().unwrap()).sum();
    assert_eq!(total, 2, "both commands fall in the current year");
}

#[tokio::test]
async fn top_products_rank_by_cumulative_value() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/top-products", None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["rank"], json!(1));
    assert_eq!(rows[0]["product_name"], json!("Owned crib"));
    assert_eq!(decimal_field(&rows[0]["total_value"]), dec!(200));
}

#[tokio::test]
async fn command_locations_resolve_buyer_names() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/command-locations", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["client"] == json!("Amira Ben Salah")));
}

#[tokio::test]
async fn total_surcharge_sums_product_surcharges() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/total-surcharge", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal_field(&body["total_surcharge"]), dec!(15));
}

#[tokio::test]
async fn monthly_revenue_buckets_are_sorted_and_summed() {
    let app = TestApp::new().await;
    seed_dataset(&app).await;

    let (status, body) = app
        .request_authenticated(Method::GET, "/stats/monthly-revenue", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1, "all commands created in the same month");
    assert_eq!(decimal_field(&rows[0]["revenue"]), dec!(300));
}
