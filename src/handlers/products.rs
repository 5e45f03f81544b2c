use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use super::common::MessageResponse;
use crate::auth::AuthUser;
use crate::entities::product;
use crate::errors::ServiceError;
use crate::exports::{self, TableSnapshot, EXPORT_ROW_CAP};
use crate::services::products::{CreateProduct, ListProductsParams, UpdateProduct};
use crate::AppState;

/// Create a product. The gain is computed server-side from the priced
/// attributes; any client-supplied gain is ignored by construction.
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced category or co-client not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateProduct>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Paginated listing with search and structural filters.
#[utoipa::path(
    get,
    path = "/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Paginated product list"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.products.find_all(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product with category, co-client and photos"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let details = state.services.products.find_details(id).await?;
    Ok(Json(details))
}

/// Partial update; the gain is recomputed from the merged values.
#[utoipa::path(
    patch,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
    Json(patch): Json<UpdateProduct>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.products.update(id, patch).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.products.remove(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

fn product_snapshot(rows: Vec<product::Model>) -> TableSnapshot {
    TableSnapshot {
        title: "Products Report".to_string(),
        headers: [
            "Name",
            "Sale Price",
            "Purchase Price",
            "Depot",
            "Percent",
            "Surcharge",
            "Gain",
            "Available",
        ]
        .map(String::from)
        .to_vec(),
        rows: rows
            .into_iter()
            .map(|p| {
                vec![
                    p.name,
                    p.sale_price.to_string(),
                    p.purchase_price.map(|v| v.to_string()).unwrap_or_default(),
                    if p.is_consigned { "yes" } else { "no" }.to_string(),
                    p.consignment_percent
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    p.surcharge.to_string(),
                    p.gain.to_string(),
                    if p.is_available { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect(),
    }
}

async fn export_products_csv(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .products
        .export_snapshot(EXPORT_ROW_CAP)
        .await?;
    let csv = exports::to_csv(&product_snapshot(rows));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=products.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn export_products_pdf(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .products
        .export_snapshot(EXPORT_ROW_CAP)
        .await?;
    let pdf = exports::to_pdf(&product_snapshot(rows))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=products.pdf",
            ),
        ],
        pdf,
    )
        .into_response())
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/export/csv", get(export_products_csv))
        .route("/export/pdf", get(export_products_pdf))
        .route(
            "/:id",
            get(get_product).patch(update_product).delete(delete_product),
        )
}
