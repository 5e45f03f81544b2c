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
use crate::errors::ServiceError;
use crate::exports::{self, TableSnapshot, EXPORT_ROW_CAP};
use crate::services::commands::{CommandView, CreateCommand, ListCommandsParams, UpdateCommand};
use crate::AppState;

/// Create a command with one detail row per product, atomically.
#[utoipa::path(
    post,
    path = "/commands",
    request_body = CreateCommand,
    responses(
        (status = 201, description = "Command created with its detail rows"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced product or client not found", body = crate::errors::ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn create_command(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.commands.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/commands",
    params(ListCommandsParams),
    responses(
        (status = 200, description = "Paginated command list"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn list_commands(
    State(state): State<AppState>,
    Query(params): Query<ListCommandsParams>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.commands.find_all(&params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/commands/{id}",
    params(("id" = Uuid, Path, description = "Command id")),
    responses(
        (status = 200, description = "Command with resolved detail rows"),
        (status = 404, description = "Command not found", body = crate::errors::ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn get_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let command = state.services.commands.find_one(id).await?;
    Ok(Json(command))
}

/// Partial update. Setting the status to DELIVERED or GOT_PROFIT withdraws
/// every linked product from sellable stock.
#[utoipa::path(
    patch,
    path = "/commands/{id}",
    params(("id" = Uuid, Path, description = "Command id")),
    request_body = UpdateCommand,
    responses(
        (status = 200, description = "Command updated"),
        (status = 404, description = "Command not found", body = crate::errors::ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn update_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
    Json(patch): Json<UpdateCommand>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.commands.update(id, patch).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/commands/{id}",
    params(("id" = Uuid, Path, description = "Command id")),
    responses(
        (status = 200, description = "Command and detail rows deleted", body = MessageResponse),
        (status = 404, description = "Command not found", body = crate::errors::ErrorResponse)
    ),
    tag = "commands"
)]
pub async fn delete_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.commands.remove(id).await?;
    Ok(Json(MessageResponse::new("Command deleted successfully")))
}

fn command_snapshot(rows: Vec<CommandView>) -> TableSnapshot {
    TableSnapshot {
        title: "Commands Report".to_string(),
        headers: [
            "Products",
            "Sale Price",
            "Purchase Price",
            "Status",
            "Delivery Address",
            "Created",
        ]
        .map(String::from)
        .to_vec(),
        rows: rows
            .into_iter()
            .map(|view| {
                vec![
                    view.command.product_count.to_string(),
                    view.command.sale_price.to_string(),
                    view.command.purchase_price.to_string(),
                    view.command.status.to_string(),
                    view.command.delivery_address,
                    view.command.created_at.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect(),
    }
}

async fn export_commands_csv(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .commands
        .export_snapshot(EXPORT_ROW_CAP)
        .await?;
    let csv = exports::to_csv(&command_snapshot(rows));
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=commands.csv",
            ),
        ],
        csv,
    )
        .into_response())
}

async fn export_commands_pdf(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, ServiceError> {
    let rows = state
        .services
        .commands
        .export_snapshot(EXPORT_ROW_CAP)
        .await?;
    let pdf = exports::to_pdf(&command_snapshot(rows))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=commands.pdf",
            ),
        ],
        pdf,
    )
        .into_response())
}

pub fn command_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_commands).post(create_command))
        .route("/export/csv", get(export_commands_csv))
        .route("/export/pdf", get(export_commands_pdf))
        .route(
            "/:id",
            get(get_command).patch(update_command).delete(delete_command),
        )
}
