use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use skyport_core::filters::AirplaneFilter;
use skyport_core::models::{Airplane, AirplaneDetail, AirplaneInput, AirplaneType};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/airplane_types", get(list_airplane_types).post(create_airplane_type))
        .route(
            "/airplane_types/{id}",
            get(get_airplane_type).put(update_airplane_type).delete(delete_airplane_type),
        )
        .route("/airplanes", get(list_airplanes).post(create_airplane))
        .route("/airplanes/{id}", get(get_airplane).put(update_airplane).delete(delete_airplane))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AirplaneTypeRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AirplaneResponse {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub airplane_type_id: Uuid,
    pub capacity: i64,
}

impl From<Airplane> for AirplaneResponse {
    fn from(airplane: Airplane) -> Self {
        Self {
            capacity: airplane.capacity(),
            id: airplane.id,
            name: airplane.name,
            rows: airplane.rows,
            seats_in_row: airplane.seats_in_row,
            airplane_type_id: airplane.airplane_type_id,
        }
    }
}

/// List view: the type is shown by name.
#[derive(Debug, Serialize)]
pub struct AirplaneListItem {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub airplane_type: String,
    pub capacity: i64,
}

/// Detail view: the type is nested.
#[derive(Debug, Serialize)]
pub struct AirplaneDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub airplane_type: AirplaneType,
    pub capacity: i64,
}

impl From<AirplaneDetail> for AirplaneListItem {
    fn from(detail: AirplaneDetail) -> Self {
        Self {
            capacity: detail.airplane.capacity(),
            id: detail.airplane.id,
            name: detail.airplane.name,
            rows: detail.airplane.rows,
            seats_in_row: detail.airplane.seats_in_row,
            airplane_type: detail.airplane_type.name,
        }
    }
}

impl From<AirplaneDetail> for AirplaneDetailResponse {
    fn from(detail: AirplaneDetail) -> Self {
        Self {
            capacity: detail.airplane.capacity(),
            id: detail.airplane.id,
            name: detail.airplane.name,
            rows: detail.airplane.rows,
            seats_in_row: detail.airplane.seats_in_row,
            airplane_type: detail.airplane_type,
        }
    }
}

// ============================================================================
// Airplane Type Handlers
// ============================================================================

/// GET /api/airport/airplane_types
pub async fn list_airplane_types(State(state): State<AppState>) -> Result<Json<Vec<AirplaneType>>, AppError> {
    Ok(Json(state.catalog.airplane_types().await?))
}

/// POST /api/airport/airplane_types
pub async fn create_airplane_type(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AirplaneTypeRequest>,
) -> Result<(StatusCode, Json<AirplaneType>), AppError> {
    claims.require_admin()?;
    let airplane_type = state.catalog.create_airplane_type(&req.name).await?;
    Ok((StatusCode::CREATED, Json(airplane_type)))
}

/// GET /api/airport/airplane_types/{id}
pub async fn get_airplane_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AirplaneType>, AppError> {
    Ok(Json(state.catalog.airplane_type(id).await?))
}

/// PUT /api/airport/airplane_types/{id}
pub async fn update_airplane_type(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<AirplaneTypeRequest>,
) -> Result<Json<AirplaneType>, AppError> {
    claims.require_admin()?;
    Ok(Json(state.catalog.update_airplane_type(id, &req.name).await?))
}

/// DELETE /api/airport/airplane_types/{id}
pub async fn delete_airplane_type(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    state.catalog.delete_airplane_type(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Airplane Handlers
// ============================================================================

/// GET /api/airport/airplanes?airplane_type=
pub async fn list_airplanes(
    State(state): State<AppState>,
    Query(filter): Query<AirplaneFilter>,
) -> Result<Json<Vec<AirplaneListItem>>, AppError> {
    let airplanes = state.catalog.airplanes(&filter).await?;
    Ok(Json(airplanes.into_iter().map(Into::into).collect()))
}

/// POST /api/airport/airplanes
pub async fn create_airplane(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AirplaneInput>,
) -> Result<(StatusCode, Json<AirplaneResponse>), AppError> {
    claims.require_admin()?;
    let airplane = state.catalog.create_airplane(&req).await?;
    Ok((StatusCode::CREATED, Json(airplane.into())))
}

/// GET /api/airport/airplanes/{id}
pub async fn get_airplane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AirplaneDetailResponse>, AppError> {
    Ok(Json(state.catalog.airplane(id).await?.into()))
}

/// PUT /api/airport/airplanes/{id}
pub async fn update_airplane(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<AirplaneInput>,
) -> Result<Json<AirplaneResponse>, AppError> {
    claims.require_admin()?;
    Ok(Json(state.catalog.update_airplane(id, &req).await?.into()))
}

/// DELETE /api/airport/airplanes/{id}
pub async fn delete_airplane(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    state.catalog.delete_airplane(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
