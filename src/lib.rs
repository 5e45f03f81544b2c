//! depot-api library crate
//!
//! Back-office API for a consignment (depot) retail shop: categories,
//! clients, co-clients, products, commands, photos and reporting.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod exports;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod pricing;
pub mod services;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use crate::db::DbPool;
use crate::services::categories::CategoryService;
use crate::services::clients::ClientService;
use crate::services::co_clients::CoClientService;
use crate::services::commands::CommandService;
use crate::services::photos::ProductPhotoService;
use crate::services::products::ProductService;
use crate::services::stats::StatsService;
use crate::services::users::UserService;

/// Hard server-side cap on page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: u64 = 10;

pub fn default_page() -> u64 {
    1
}

pub fn default_limit() -> u64 {
    MAX_PAGE_SIZE
}

/// Normalizes pagination input: pages start at 1, the limit is clamped to
/// `1..=MAX_PAGE_SIZE` regardless of what was requested.
pub fn page_window(page: u64, limit: u64) -> (u64, u64) {
    (page.max(1), limit.clamp(1, MAX_PAGE_SIZE))
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Standard list envelope: `{data, meta}`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Aggregated service instances shared by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub clients: Arc<ClientService>,
    pub co_clients: Arc<CoClientService>,
    pub products: Arc<ProductService>,
    pub commands: Arc<CommandService>,
    pub photos: Arc<ProductPhotoService>,
    pub users: Arc<UserService>,
    pub stats: Arc<StatsService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db.clone())),
            clients: Arc::new(ClientService::new(db.clone())),
            co_clients: Arc::new(CoClientService::new(db.clone())),
            products: Arc::new(ProductService::new(db.clone())),
            commands: Arc::new(CommandService::new(db.clone())),
            photos: Arc::new(ProductPhotoService::new(db.clone())),
            users: Arc::new(UserService::new(db.clone())),
            stats: Arc::new(StatsService::new(db)),
        }
    }
}

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: AppServices,
}

/// Maximum accepted request body; large enough for legacy base64 photo
/// payloads.
pub const REQUEST_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Assembles the complete application router: REST surface, auth, static
/// uploads and the middleware stack. Shared by `main` and the test harness.
pub fn build_router(state: AppState, auth_service: Arc<auth::AuthService>) -> Router {
    let uploads_dir = state.config.uploads_dir.clone();

    Router::new()
        .route("/", get(|| async { "depot-api up" }))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .merge(handlers::api_routes())
        .nest(
            "/auth",
            auth::auth_routes().with_state(auth_service.clone()),
        )
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        // Inject AuthService into request extensions for the AuthUser extractor
        .layer(axum::middleware::from_fn_with_state(
            auth_service,
            |axum::extract::State(auth): axum::extract::State<Arc<auth::AuthService>>,
             mut req: axum::http::Request<axum::body::Body>,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_clamps_limit_to_cap() {
        assert_eq!(page_window(1, 10_000), (1, MAX_PAGE_SIZE));
        assert_eq!(page_window(0, 0), (1, 1));
        assert_eq!(page_window(3, 5), (3, 5));
    }

    #[test]
    fn total_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(PaginationMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 10, 1).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 11).total_pages, 2);
        assert_eq!(PaginationMeta::new(1, 3, 7).total_pages, 3);
    }
}
