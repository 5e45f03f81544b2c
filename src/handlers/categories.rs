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
use crate::services::categories::{CreateCategory, ListCategoriesParams, UpdateCategory};
use crate::AppState;

async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListCategoriesParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state.services.categories.find_all(&params).await?;
    Ok(Json(page))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let category = state.services.categories.find_one(id).await?;
    Ok(Json(category))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateCategory>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.categories.update(id, patch).await?;
    Ok(Json(updated))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.categories.remove(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}
