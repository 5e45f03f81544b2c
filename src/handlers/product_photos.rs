use std::path::PathBuf;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::MessageResponse;
use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::AppState;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Legacy bulk registration of already-stored photo paths.
#[derive(Debug, Deserialize, ToSchema)]
struct CreatePhotos {
    product_id: Uuid,
    paths: Vec<String>,
}

fn validated_extension(file_name: &str) -> Result<String, ServiceError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or_else(|| ServiceError::BadRequest("Only image files are allowed".to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ServiceError::BadRequest(
            "Only image files are allowed".to_string(),
        ));
    }

    Ok(extension)
}

/// Multipart upload: a single image file plus the owning product id. The
/// file lands in the uploads directory under a collision-resistant name.
async fn upload_photo(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let mut product_id: Option<Uuid> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("product_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ServiceError::BadRequest(format!("Invalid product id: {e}")))?;
                let id = raw
                    .parse()
                    .map_err(|_| ServiceError::BadRequest("Invalid product id".to_string()))?;
                product_id = Some(id);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let extension = validated_extension(&file_name)?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServiceError::BadRequest(format!("Upload failed: {e}")))?;
                if data.len() > state.config.max_upload_bytes {
                    return Err(ServiceError::BadRequest(format!(
                        "File exceeds the maximum size of {} bytes",
                        state.config.max_upload_bytes
                    )));
                }
                upload = Some((extension, data.to_vec()));
            }
            _ => {}
        }
    }

    let product_id =
        product_id.ok_or_else(|| ServiceError::BadRequest("Missing product id".to_string()))?;
    let (extension, data) =
        upload.ok_or_else(|| ServiceError::BadRequest("No file uploaded".to_string()))?;

    // timestamp + random suffix keeps concurrent uploads from colliding
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let file_name = format!(
        "product-{}-{suffix}.{extension}",
        Utc::now().timestamp_millis()
    );

    let uploads_dir = PathBuf::from(&state.config.uploads_dir);
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .map_err(|e| ServiceError::InternalError(format!("Cannot create uploads dir: {e}")))?;
    tokio::fs::write(uploads_dir.join(&file_name), &data)
        .await
        .map_err(|e| ServiceError::InternalError(format!("Cannot store upload: {e}")))?;

    info!(%product_id, file_name, bytes = data.len(), "photo stored");

    let photo = state
        .services
        .photos
        .create(product_id, format!("/uploads/{file_name}"))
        .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

async fn create_photos(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreatePhotos>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .photos
        .create_many(input.product_id, input.paths)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_photos_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let photos = state.services.photos.find_by_product(product_id).await?;
    Ok(Json(photos))
}

async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.photos.remove(id).await?;
    Ok(Json(MessageResponse::new("Photo deleted successfully")))
}

pub fn product_photo_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_photos))
        .route("/upload", post(upload_photo))
        .route("/product/:product_id", get(list_photos_for_product))
        .route("/:id", axum::routing::delete(delete_photo))
}
