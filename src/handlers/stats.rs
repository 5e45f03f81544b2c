use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::stats::StatsQuery;
use crate::AppState;

const TOP_PRODUCTS_LIMIT: usize = 10;

async fn kpis(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.kpis(&query).await?))
}

async fn products_by_category(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.products_by_category(&query).await?))
}

async fn commands_by_status(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.commands_by_status(&query).await?))
}

async fn monthly_revenue(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.monthly_revenue(&query).await?))
}

async fn monthly_profit(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.monthly_profit(&query).await?))
}

async fn top_products(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state
            .services
            .stats
            .top_products(&query, TOP_PRODUCTS_LIMIT)
            .await?,
    ))
}

async fn revenue_breakdown(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.revenue_breakdown(&query).await?))
}

async fn monthly_sold_products(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(
        state.services.stats.monthly_sold_products(&query).await?,
    ))
}

async fn depot_vs_buying(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.depot_vs_buying(&query).await?))
}

async fn command_locations(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.command_locations(&query).await?))
}

async fn total_surcharge(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
    _user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.services.stats.total_surcharge(&query).await?))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/kpis", get(kpis))
        .route("/products-by-category", get(products_by_category))
        .route("/commands-by-status", get(commands_by_status))
        .route("/monthly-revenue", get(monthly_revenue))
        .route("/monthly-profit", get(monthly_profit))
        .route("/top-products", get(top_products))
        .route("/revenue-breakdown", get(revenue_breakdown))
        .route("/monthly-sold-products", get(monthly_sold_products))
        .route("/depot-vs-buying", get(depot_vs_buying))
        .route("/command-locations", get(command_locations))
        .route("/total-surcharge", get(total_surcharge))
}
