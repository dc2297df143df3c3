use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyport_catalog::FlightDetail;
use skyport_core::filters::FlightFilter;
use skyport_core::models::{Crew, Flight, FlightInput, FlightRecord, SeatRef};
use skyport_core::FlightAvailability;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::Claims;
use crate::network::RouteDetailResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/{id}", get(get_flight).put(update_flight).delete(delete_flight))
        .route("/flights/{id}/availability", get(flight_availability))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FlightListQuery {
    /// `source_airport_id,destination_airport_id`
    pub route_destination: Option<String>,
    pub departure_time: Option<DateTime<Utc>>,
    pub airplane: Option<Uuid>,
}

impl FlightListQuery {
    fn into_filter(self) -> Result<FlightFilter, AppError> {
        let route = self
            .route_destination
            .as_deref()
            .map(FlightFilter::parse_route_pair)
            .transpose()?;
        Ok(FlightFilter { route, departure_time: self.departure_time, airplane_id: self.airplane })
    }
}

#[derive(Debug, Serialize)]
pub struct FlightListItem {
    pub id: Uuid,
    pub route_full_name: String,
    pub airplane_name: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub crews: Vec<String>,
    pub available_tickets: i64,
}

impl From<FlightRecord> for FlightListItem {
    fn from(record: FlightRecord) -> Self {
        let availability = FlightAvailability::of(&record);
        Self {
            id: record.flight.id,
            route_full_name: availability.route_label,
            airplane_name: record.airplane.name,
            departure_time: record.flight.departure_time,
            arrival_time: record.flight.arrival_time,
            crews: record.crews.iter().map(Crew::full_name).collect(),
            available_tickets: availability.available_tickets,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightAirplane {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
}

#[derive(Debug, Serialize)]
pub struct FlightDetailResponse {
    pub id: Uuid,
    pub route: RouteDetailResponse,
    pub airplane: FlightAirplane,
    pub crews: Vec<Crew>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub taken_seats: Vec<SeatRef>,
    pub available_tickets: i64,
}

impl From<FlightDetail> for FlightDetailResponse {
    fn from(detail: FlightDetail) -> Self {
        let FlightDetail { record, taken_seats, available_tickets } = detail;
        Self {
            id: record.flight.id,
            airplane: FlightAirplane {
                capacity: record.airplane.capacity(),
                id: record.airplane.id,
                name: record.airplane.name,
                rows: record.airplane.rows,
                seats_in_row: record.airplane.seats_in_row,
            },
            route: record.route.into(),
            crews: record.crews,
            departure_time: record.flight.departure_time,
            arrival_time: record.flight.arrival_time,
            taken_seats,
            available_tickets,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/airport/flights?route_destination=&departure_time=&airplane=
pub async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightListQuery>,
) -> Result<Json<Vec<FlightListItem>>, AppError> {
    let filter = query.into_filter()?;
    let flights = state.catalog.flights(&filter).await?;
    Ok(Json(flights.into_iter().map(Into::into).collect()))
}

/// POST /api/airport/flights
pub async fn create_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<FlightInput>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    claims.require_admin()?;
    Ok((StatusCode::CREATED, Json(state.catalog.create_flight(&req).await?)))
}

/// GET /api/airport/flights/{id}
pub async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlightDetailResponse>, AppError> {
    Ok(Json(state.catalog.flight(id).await?.into()))
}

/// PUT /api/airport/flights/{id}
pub async fn update_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<FlightInput>,
) -> Result<Json<Flight>, AppError> {
    claims.require_admin()?;
    Ok(Json(state.catalog.update_flight(id, &req).await?))
}

/// DELETE /api/airport/flights/{id}
pub async fn delete_flight(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    claims.require_admin()?;
    state.catalog.delete_flight(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/airport/flights/{id}/availability
pub async fn flight_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlightAvailability>, AppError> {
    Ok(Json(state.catalog.flight_availability(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_route_pair() {
        let filter = FlightListQuery::default().into_filter().unwrap();
        assert_eq!(filter, FlightFilter::default());
    }

    #[test]
    fn test_malformed_route_pair_is_a_field_error() {
        let query = FlightListQuery { route_destination: Some("not-a-pair".into()), ..Default::default() };
        match query.into_filter() {
            Err(AppError::ValidationError { fields, .. }) => assert!(fields.contains_key("route_destination")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
