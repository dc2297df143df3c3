use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use skyport_core::models::{Crew, CrewDetail, CrewInput};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/crews", get(list_crews).post(create_crew))
        .route("/crews/{id}", get(get_crew).put(update_crew).delete(delete_crew))
}

#[derive(Debug, Serialize)]
pub struct CrewResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flights_count: Option<i64>,
}

impl From<Crew> for CrewResponse {
    fn from(crew: Crew) -> Self {
        Self {
            full_name: crew.full_name(),
            id: crew.id,
            first_name: crew.first_name,
            last_name: crew.last_name,
            flights_count: None,
        }
    }
}

impl From<CrewDetail> for CrewResponse {
    fn from(detail: CrewDetail) -> Self {
        Self { flights_count: Some(detail.flights_count), ..detail.crew.into() }
    }
}

/// GET /api/airport/crews
pub async fn list_crews(State(state): State<AppState>) -> Result<Json<Vec<CrewResponse>>, AppError> {
    let crews = state.catalog.crews().await?;
    Ok(Json(crews.into_iter().map(Into::into).collect()))
}

/// POST /api/airport/crews
pub async fn create_crew(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CrewInput>,
) -> Result<(StatusCode, Json<CrewResponse>), AppError> {
    claims.require_admin()?;
    let crew = state.catalog.create_crew(&req).await?;
    Ok((StatusCode::CREATED, Json(crew.into())))
}

/// GET /api/airport/crews/{id}
pub async fn get_crew(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<CrewResponse>, AppError> {
    Ok(Json(state.catalog.crew(id).await?.into()))
}

/// PUT /api/airport/crews/{id}
pub async fn update_crew(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<CrewInput>,
) -> Result<Json<CrewResponse>, AppError> {
    claims.require_admin()?;
    Ok(Json(state.catalog.update_crew(id, &req).await?.into()))
}

/// DELETE /api/airport/crews/{id}
pub async fn delete_crew(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    state.catalog.delete_crew(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
