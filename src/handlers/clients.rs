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
use crate::entities::client;
use crate::errors::ServiceError;
use crate::exports::{self, TableSnapshot, EXPORT_ROW_CAP};
use crate::services::clients::{CreateClient, ListClientsParams};
use crate::AppState;

async fn create_client(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateClient>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.clients.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ListClientsParams>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.clients.find_all(&params).await?;
    Ok(Json(page))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.services.clients.find_one(id).await?;
    Ok(Json(client))
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.clients.remove(id).await?;
    Ok(Json(MessageResponse::new("Client deleted successfully")))
}

fn client_snapshot(rows: Vec<client::Model>) -> TableSnapshot {
    TableSnapshot {
        title: "Clients Report".to_string(),
        headers: ["First Name", "Last Name", "Email", "Phone", "Address", "Created"]
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
                    c.address,
                    c.created_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect(),
    }
}

async fn export_clients_csv(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state.services.clients.export_snapshot(EXPORT_ROW_CAP).await?;
    let csv = exports::to_csv(&client_snapshot(rows));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=clients.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn export_clients_pdf(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state.services.clients.export_snapshot(EXPORT_ROW_CAP).await?;
    let pdf = exports::to_pdf(&client_snapshot(rows))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=clients.pdf",
            ),
        ],
        pdf,
    )
        .into_response())
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/export/csv", get(export_clients_csv))
        .route("/export/pdf", get(export_clients_pdf))
        .route("/:id", get(get_client).delete(delete_client))
}
