use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use skyport_core::filters::AirportFilter;
use skyport_core::models::{Airport, AirportInput, Route, RouteDetail, RouteInput};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/airports", get(list_airports).post(create_airport))
        .route("/airports/{id}", get(get_airport).put(update_airport).delete(delete_airport))
        .route("/routes", get(list_routes).post(create_route))
        .route("/routes/{id}", get(get_route).put(update_route).delete(delete_route))
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RouteListItem {
    pub id: Uuid,
    pub source: String,
    pub destination: String,
    pub distance: i32,
}

impl From<RouteDetail> for RouteListItem {
    fn from(detail: RouteDetail) -> Self {
        Self {
            id: detail.route.id,
            source: detail.source.name,
            destination: detail.destination.name,
            distance: detail.route.distance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteDetailResponse {
    pub id: Uuid,
    pub source: Airport,
    pub destination: Airport,
    pub distance: i32,
}

impl From<RouteDetail> for RouteDetailResponse {
    fn from(detail: RouteDetail) -> Self {
        Self {
            id: detail.route.id,
            source: detail.source,
            destination: detail.destination,
            distance: detail.route.distance,
        }
    }
}

// ============================================================================
// Airport Handlers
// ============================================================================

/// GET /api/airport/airports?closest_big_city=
pub async fn list_airports(
    State(state): State<AppState>,
    Query(filter): Query<AirportFilter>,
) -> Result<Json<Vec<Airport>>, AppError> {
    Ok(Json(state.catalog.airports(&filter).await?))
}

/// POST /api/airport/airports
pub async fn create_airport(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AirportInput>,
) -> Result<(StatusCode, Json<Airport>), AppError> {
    claims.require_admin()?;
    Ok((StatusCode::CREATED, Json(state.catalog.create_airport(&req).await?)))
}

/// GET /api/airport/airports/{id}
pub async fn get_airport(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Airport>, AppError> {
    Ok(Json(state.catalog.airport(id).await?))
}

/// PUT /api/airport/airports/{id}
pub async fn update_airport(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<AirportInput>,
) -> Result<Json<Airport>, AppError> {
    claims.require_admin()?;
    Ok(Json(state.catalog.update_airport(id, &req).await?))
}

/// DELETE /api/airport/airports/{id}
pub async fn delete_airport(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    state.catalog.delete_airport(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/airport/routes
pub async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<RouteListItem>>, AppError> {
    let routes = state.catalog.routes().await?;
    Ok(Json(routes.into_iter().map(Into::into).collect()))
}

/// POST /api/airport/routes
pub async fn create_route(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RouteInput>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    claims.require_admin()?;
    Ok((StatusCode::CREATED, Json(state.catalog.create_route(&req).await?)))
}

/// GET /api/airport/routes/{id}
pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteDetailResponse>, AppError> {
    Ok(Json(state.catalog.route(id).await?.into()))
}

/// PUT /api/airport/routes/{id}
pub async fn update_route(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<RouteInput>,
) -> Result<Json<Route>, AppError> {
    claims.require_admin()?;
    Ok(Json(state.catalog.update_route(id, &req).await?))
}

/// DELETE /api/airport/routes/{id}
pub async fn delete_route(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    state.catalog.delete_route(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
