pub mod categories;
pub mod clients;
pub mod co_clients;
pub mod commands;
pub mod common;
pub mod product_photos;
pub mod products;
pub mod stats;
pub mod users;

use axum::Router;

use crate::AppState;

/// Full REST surface, nested per entity.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::category_routes())
        .nest("/clients", clients::client_routes())
        .nest("/co-clients", co_clients::co_client_routes())
        .nest("/products", products::product_routes())
        .nest("/commands", commands::command_routes())
        .nest("/product-photos", product_photos::product_photo_routes())
        .nest("/users", users::user_routes())
        .nest("/stats", stats::stats_routes())
}
