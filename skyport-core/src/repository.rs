use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::filters::{AirplaneFilter, AirportFilter, FlightFilter, OrderFilter};
use crate::models::{
    Airplane, AirplaneDetail, AirplaneInput, AirplaneType, Airport, AirportInput, Crew,
    CrewDetail, CrewInput, Flight, FlightInput, FlightRecord, Order, Route, RouteDetail,
    RouteInput, SeatRef, TicketRequest,
};

/// Repository trait for airplane types and airplanes
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn create_airplane_type(&self, name: &str) -> StoreResult<AirplaneType>;

    async fn get_airplane_type(&self, id: Uuid) -> StoreResult<Option<AirplaneType>>;

    async fn list_airplane_types(&self) -> StoreResult<Vec<AirplaneType>>;

    async fn update_airplane_type(&self, id: Uuid, name: &str) -> StoreResult<AirplaneType>;

    async fn delete_airplane_type(&self, id: Uuid) -> StoreResult<()>;

    async fn create_airplane(&self, input: &AirplaneInput) -> StoreResult<Airplane>;

    async fn get_airplane(&self, id: Uuid) -> StoreResult<Option<AirplaneDetail>>;

    async fn list_airplanes(&self, filter: &AirplaneFilter) -> StoreResult<Vec<AirplaneDetail>>;

    /// Replaces an airplane. Fails with `SeatMapLocked` when the seat map
    /// changes while any of its flights has sold tickets.
    async fn update_airplane(&self, id: Uuid, input: &AirplaneInput) -> StoreResult<Airplane>;

    async fn delete_airplane(&self, id: Uuid) -> StoreResult<()>;
}

/// Repository trait for airports
#[async_trait]
pub trait AirportRepository: Send + Sync {
    async fn create_airport(&self, input: &AirportInput) -> StoreResult<Airport>;

    async fn get_airport(&self, id: Uuid) -> StoreResult<Option<Airport>>;

    async fn list_airports(&self, filter: &AirportFilter) -> StoreResult<Vec<Airport>>;

    async fn update_airport(&self, id: Uuid, input: &AirportInput) -> StoreResult<Airport>;

    async fn delete_airport(&self, id: Uuid) -> StoreResult<()>;
}

/// Repository trait for routes. Callers validate endpoints first.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn create_route(&self, input: &RouteInput) -> StoreResult<Route>;

    async fn get_route(&self, id: Uuid) -> StoreResult<Option<RouteDetail>>;

    async fn list_routes(&self) -> StoreResult<Vec<RouteDetail>>;

    async fn update_route(&self, id: Uuid, input: &RouteInput) -> StoreResult<Route>;

    async fn delete_route(&self, id: Uuid) -> StoreResult<()>;
}

/// Repository trait for crew members
#[async_trait]
pub trait CrewRepository: Send + Sync {
    async fn create_crew(&self, input: &CrewInput) -> StoreResult<Crew>;

    async fn get_crew(&self, id: Uuid) -> StoreResult<Option<CrewDetail>>;

    async fn list_crews(&self) -> StoreResult<Vec<CrewDetail>>;

    async fn update_crew(&self, id: Uuid, input: &CrewInput) -> StoreResult<Crew>;

    async fn delete_crew(&self, id: Uuid) -> StoreResult<()>;
}

/// Repository trait for flights and their seat occupancy
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn create_flight(&self, input: &FlightInput) -> StoreResult<Flight>;

    /// Flight with route, airplane, crews and the committed ticket count.
    async fn get_flight(&self, id: Uuid) -> StoreResult<Option<FlightRecord>>;

    async fn list_flights(&self, filter: &FlightFilter) -> StoreResult<Vec<FlightRecord>>;

    async fn update_flight(&self, id: Uuid, input: &FlightInput) -> StoreResult<Flight>;

    async fn delete_flight(&self, id: Uuid) -> StoreResult<()>;

    /// Seats already sold on a flight, ordered by (row, seat).
    async fn taken_seats(&self, flight_id: Uuid) -> StoreResult<Vec<SeatRef>>;
}

/// Repository trait for orders and their tickets
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists one order and all of its tickets atomically.
    ///
    /// Implementations re-check seat bounds against the airplane inside the
    /// same atomic unit and enforce uniqueness of (flight, row, seat) at the
    /// storage level, including duplicates within `tickets`. On any failure
    /// nothing is persisted.
    async fn create_order(&self, user_id: Uuid, tickets: &[TicketRequest]) -> StoreResult<Order>;

    async fn get_order(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Order>>;

    /// Orders of one user, newest first.
    async fn list_orders(&self, user_id: Uuid, filter: &OrderFilter) -> StoreResult<Vec<Order>>;
}

/// Every repository the services need, sharing one backend.
#[derive(Clone)]
pub struct Repositories {
    pub fleet: Arc<dyn FleetRepository>,
    pub airports: Arc<dyn AirportRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub crews: Arc<dyn CrewRepository>,
    pub flights: Arc<dyn FlightRepository>,
    pub orders: Arc<dyn OrderRepository>,
}
