use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use super::common::MessageResponse;
use crate::errors::ServiceError;
use crate::services::users::{CreateUser, ListUsersParams, UpdateUser};
use crate::AppState;

async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.users.find_all(&params).await?;
    Ok(Json(page))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.services.users.find_one(id).await?;
    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateUser>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.users.update(id, patch).await?;
    Ok(Json(updated))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.users.remove(id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}
