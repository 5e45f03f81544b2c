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
use crate::entities::co_client;
use crate::errors::ServiceError;
use crate::exports::{self, TableSnapshot, EXPORT_ROW_CAP};
use crate::services::co_clients::{CreateCoClient, ListCoClientsParams};
use crate::AppState;

async fn create_co_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateCoClient>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.co_clients.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_co_clients(
    State(state): State<AppState>,
    Query(params): Query<ListCoClientsParams>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.co_clients.find_all(&params).await?;
    Ok(Json(page))
}

async fn get_co_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let co_client = state.services.co_clients.find_one(id).await?;
    Ok(Json(co_client))
}

async fn get_co_client_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let products = state.services.co_clients.product_history(id).await?;
    Ok(Json(products))
}

async fn delete_co_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.co_clients.remove(id).await?;
    Ok(Json(MessageResponse::new("CoClient deleted successfully")))
}

fn co_client_snapshot(rows: Vec<co_client::Model>) -> TableSnapshot {
    TableSnapshot {
        title: "Co-Clients Report".to_string(),
        headers: ["First Name", "Last Name", "Email", "Phone", "RIB", "Address"]
            .map(String::from)
            .to_vec(),
        rows: rows
            .into_iter()
            .map(|c| {
                vec![
                    c.first_name,
                    c.last_name,
                    c.email,
                    c.phone_number,
                    c.rib,
                    c.address,
                ]
            })
            .collect(),
    }
}

async fn export_co_clients_csv(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .co_clients
        .export_snapshot(EXPORT_ROW_CAP)
        .await?;
    let csv = exports::to_csv(&co_client_snapshot(rows));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=co-clients.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn export_co_clients_pdf(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .co_clients
        .export_snapshot(EXPORT_ROW_CAP)
        .await?;
    let pdf = exports::to_pdf(&co_client_snapshot(rows))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=co-clients.pdf",
            ),
        ],
        pdf,
    )
        .into_response())
}

pub fn co_client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_co_clients).post(create_co_client))
        .route("/export/csv", get(export_co_clients_csv))
        .route("/export/pdf", get(export_co_clients_pdf))
        .route("/:id", get(get_co_client).delete(delete_co_client))
        .route("/:id/products", get(get_co_client_products))
}
