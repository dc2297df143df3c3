use serde::Serialize;
use skyport_core::availability::available_tickets;
use skyport_core::filters::FlightFilter;
use skyport_core::models::{Flight, FlightInput, FlightRecord, SeatRef};
use skyport_core::FlightAvailability;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::service::{found, CatalogService};

/// Flight detail view: the joined record plus its occupied seats.
#[derive(Debug, Clone, Serialize)]
pub struct FlightDetail {
    pub record: FlightRecord,
    pub taken_seats: Vec<SeatRef>,
    pub available_tickets: i64,
}

/// Drops repeated crew ids while keeping first-seen order.
fn normalize(input: &FlightInput) -> FlightInput {
    let mut normalized = input.clone();
    let mut seen = std::collections::HashSet::new();
    normalized.crew_ids.retain(|id| seen.insert(*id));

    if normalized.arrival_time <= normalized.departure_time {
        warn!(
            "Flight on route {} arrives at {} before departing at {}",
            normalized.route_id, normalized.arrival_time, normalized.departure_time
        );
    }
    normalized
}

impl CatalogService {
    pub async fn create_flight(&self, input: &FlightInput) -> CatalogResult<Flight> {
        let input = normalize(input);
        let flight = self.repos.flights.create_flight(&input).await?;
        info!("Created flight {} on route {} with {} crew", flight.id, flight.route_id, input.crew_ids.len());
        Ok(flight)
    }

    pub async fn flight(&self, id: Uuid) -> CatalogResult<FlightDetail> {
        let record = found(self.repos.flights.get_flight(id).await?, "flight", id)?;
        let taken_seats = self.repos.flights.taken_seats(id).await?;
        let available_tickets = available_tickets(record.airplane.capacity(), record.tickets_sold);
        Ok(FlightDetail { record, taken_seats, available_tickets })
    }

    pub async fn flights(&self, filter: &FlightFilter) -> CatalogResult<Vec<FlightRecord>> {
        Ok(self.repos.flights.list_flights(filter).await?)
    }

    pub async fn update_flight(&self, id: Uuid, input: &FlightInput) -> CatalogResult<Flight> {
        let input = normalize(input);
        Ok(self.repos.flights.update_flight(id, &input).await?)
    }

    pub async fn delete_flight(&self, id: Uuid) -> CatalogResult<()> {
        self.repos.flights.delete_flight(id).await?;
        info!("Deleted flight {}", id);
        Ok(())
    }

    /// Unsold seats of one flight, computed from committed tickets at call time.
    pub async fn flight_availability(&self, flight_id: Uuid) -> CatalogResult<FlightAvailability> {
        let record = found(self.repos.flights.get_flight(flight_id).await?, "flight", flight_id)?;
        Ok(FlightAvailability::of(&record))
    }
}
