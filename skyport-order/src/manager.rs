use std::collections::HashMap;
use std::sync::Arc;

use skyport_core::filters::OrderFilter;
use skyport_core::models::{Airplane, Order, TicketRequest};
use skyport_core::repository::{FlightRepository, OrderRepository};
use skyport_core::{validate_seat, SeatDimension, SeatOutOfRange, StoreError};
use tracing::{info, warn};
use uuid::Uuid;

/// Places orders: a batch of seats bought together, all or nothing.
///
/// Seat bounds are checked up front so bad requests fail without opening a
/// transaction, but the store re-checks them and owns the double-booking
/// decision. Two racing orders for one seat are settled by the store's
/// uniqueness on (flight, row, seat), never by a lookup here.
#[derive(Clone)]
pub struct OrderManager {
    flights: Arc<dyn FlightRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl OrderManager {
    pub fn new(flights: Arc<dyn FlightRepository>, orders: Arc<dyn OrderRepository>) -> Self {
        Self { flights, orders }
    }

    pub async fn create_order(&self, user_id: Uuid, tickets: Vec<TicketRequest>) -> Result<Order, OrderError> {
        if tickets.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut airplanes: HashMap<Uuid, Airplane> = HashMap::new();
        for (index, ticket) in tickets.iter().enumerate() {
            if !airplanes.contains_key(&ticket.flight_id) {
                let record = self
                    .flights
                    .get_flight(ticket.flight_id)
                    .await?
                    .ok_or(OrderError::FlightNotFound { index, flight_id: ticket.flight_id })?;
                airplanes.insert(ticket.flight_id, record.airplane);
            }
            if let Some(airplane) = airplanes.get(&ticket.flight_id) {
                validate_seat(ticket.row, ticket.seat, airplane).map_err(|source| OrderError::SeatOutOfRange {
                    index,
                    flight_id: ticket.flight_id,
                    source,
                })?;
            }
        }

        let order = self
            .orders
            .create_order(user_id, &tickets)
            .await
            .map_err(|err| Self::reject(err, &tickets))?;

        info!("Order {} placed by user {} with {} tickets", order.id, user_id, order.tickets.len());
        Ok(order)
    }

    pub async fn get_order(&self, user_id: Uuid, order_id: Uuid) -> Result<Order, OrderError> {
        self.orders
            .get_order(user_id, order_id)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }

    /// Orders of one user, newest first.
    pub async fn list_orders(&self, user_id: Uuid, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_orders(user_id, filter).await?)
    }

    /// Maps a storage rejection back onto the request that caused it.
    fn reject(err: StoreError, tickets: &[TicketRequest]) -> OrderError {
        match err {
            StoreError::SeatTaken { flight_id, row, seat } => {
                warn!("Seat {}/{} on flight {} already taken", row, seat, flight_id);
                OrderError::SeatTaken { flight_id, row, seat }
            }
            StoreError::SeatOutOfRange { flight_id, source } => {
                let index = tickets
                    .iter()
                    .position(|t| t.flight_id == flight_id && violated_by(&source, t))
                    .unwrap_or_default();
                OrderError::SeatOutOfRange { index, flight_id, source }
            }
            StoreError::NotFound { entity: "flight", id } => {
                let index = tickets.iter().position(|t| t.flight_id == id).unwrap_or_default();
                OrderError::FlightNotFound { index, flight_id: id }
            }
            other => OrderError::Store(other),
        }
    }
}

fn violated_by(error: &SeatOutOfRange, ticket: &TicketRequest) -> bool {
    error.violations.iter().all(|v| match v.dimension {
        SeatDimension::Row => v.value == ticket.row,
        SeatDimension::Seat => v.value == ticket.seat,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("An order must contain at least one ticket")]
    EmptyOrder,

    #[error("Ticket {index}: flight not found: {flight_id}")]
    FlightNotFound { index: usize, flight_id: Uuid },

    #[error("Ticket {index}: {source}")]
    SeatOutOfRange {
        index: usize,
        flight_id: Uuid,
        #[source]
        source: SeatOutOfRange,
    },

    #[error("Seat already booked: flight {flight_id}, row {row}, seat {seat}")]
    SeatTaken { flight_id: Uuid, row: i32, seat: i32 },

    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use skyport_core::models::{AirplaneInput, AirportInput, FlightInput, RouteInput, SeatRef};
    use skyport_core::{FlightAvailability, Repositories};
    use skyport_store::memory_repositories;

    struct Fixture {
        repos: Repositories,
        manager: OrderManager,
        flight_id: Uuid,
    }

    async fn fixture(rows: i32, seats_in_row: i32) -> Fixture {
        let repos = memory_repositories();
        let airplane_type = repos.fleet.create_airplane_type("Regional").await.unwrap();
        let airplane = repos
            .fleet
            .create_airplane(&AirplaneInput {
                name: "Embraer 175".into(),
                rows,
                seats_in_row,
                airplane_type_id: airplane_type.id,
            })
            .await
            .unwrap();
        let source = repos
            .airports
            .create_airport(&AirportInput { name: "Zhuliany".into(), closest_big_city: "Kyiv".into() })
            .await
            .unwrap();
        let destination = repos
            .airports
            .create_airport(&AirportInput { name: "Vaclav Havel".into(), closest_big_city: "Prague".into() })
            .await
            .unwrap();
        let route = repos
            .routes
            .create_route(&RouteInput { source_id: source.id, destination_id: destination.id, distance: 1100 })
            .await
            .unwrap();
        let departure = Utc::now() + Duration::days(1);
        let flight = repos
            .flights
            .create_flight(&FlightInput {
                route_id: route.id,
                airplane_id: airplane.id,
                crew_ids: vec![],
                departure_time: departure,
                arrival_time: departure + Duration::hours(2),
            })
            .await
            .unwrap();

        let manager = OrderManager::new(repos.flights.clone(), repos.orders.clone());
        Fixture { repos, manager, flight_id: flight.id }
    }

    fn ticket(flight_id: Uuid, row: i32, seat: i32) -> TicketRequest {
        TicketRequest { flight_id, row, seat }
    }

    async fn available(f: &Fixture) -> i64 {
        let record = f.repos.flights.get_flight(f.flight_id).await.unwrap().unwrap();
        FlightAvailability::of(&record).available_tickets
    }

    #[tokio::test]
    async fn test_two_by_two_airplane_scenario() {
        let f = fixture(2, 2).await;
        let user = Uuid::new_v4();

        let order = f.manager.create_order(user, vec![ticket(f.flight_id, 1, 1)]).await.unwrap();
        assert_eq!(order.tickets.len(), 1);
        assert_eq!(available(&f).await, 3);

        let err = f.manager.create_order(user, vec![ticket(f.flight_id, 1, 1)]).await.unwrap_err();
        assert!(matches!(err, OrderError::SeatTaken { row: 1, seat: 1, .. }));

        let err = f.manager.create_order(user, vec![ticket(f.flight_id, 3, 1)]).await.unwrap_err();
        match err {
            OrderError::SeatOutOfRange { index, source, .. } => {
                assert_eq!(index, 0);
                let row = source.violation(SeatDimension::Row).unwrap();
                assert_eq!((row.min, row.max), (1, 2));
                assert!(source.violation(SeatDimension::Seat).is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(available(&f).await, 3);
    }

    #[tokio::test]
    async fn test_both_dimensions_reported() {
        let f = fixture(2, 2).await;
        let err = f
            .manager
            .create_order(Uuid::new_v4(), vec![ticket(f.flight_id, 1, 1), ticket(f.flight_id, 0, 9)])
            .await
            .unwrap_err();

        match err {
            OrderError::SeatOutOfRange { index, source, .. } => {
                assert_eq!(index, 1);
                assert_eq!(source.violations.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(available(&f).await, 4);
    }

    #[tokio::test]
    async fn test_duplicate_seat_inside_one_order_commits_nothing() {
        let f = fixture(2, 2).await;
        let user = Uuid::new_v4();

        let err = f
            .manager
            .create_order(user, vec![ticket(f.flight_id, 2, 2), ticket(f.flight_id, 1, 2), ticket(f.flight_id, 2, 2)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::SeatTaken { row: 2, seat: 2, .. }));
        assert!(f.manager.list_orders(user, &OrderFilter::default()).await.unwrap().is_empty());
        assert_eq!(available(&f).await, 4);
    }

    #[tokio::test]
    async fn test_concurrent_orders_for_one_seat() {
        let f = fixture(5, 4).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let manager = f.manager.clone();
            let flight_id = f.flight_id;
            handles.push(tokio::spawn(async move {
                manager.create_order(Uuid::new_v4(), vec![ticket(flight_id, 3, 2)]).await
            }));
        }

        let mut succeeded = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(OrderError::SeatTaken { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(f.repos.flights.taken_seats(f.flight_id).await.unwrap(), vec![SeatRef { row: 3, seat: 2 }]);
        assert_eq!(available(&f).await, 19);
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let f = fixture(2, 2).await;
        let err = f.manager.create_order(Uuid::new_v4(), vec![]).await.unwrap_err();
        assert!(matches!(err, OrderError::EmptyOrder));
    }

    #[tokio::test]
    async fn test_unknown_flight_rejected() {
        let f = fixture(2, 2).await;
        let missing = Uuid::new_v4();
        let err = f
            .manager
            .create_order(Uuid::new_v4(), vec![ticket(f.flight_id, 1, 1), ticket(missing, 1, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::FlightNotFound { index: 1, flight_id } if flight_id == missing));
        assert_eq!(available(&f).await, 4);
    }

    #[tokio::test]
    async fn test_orders_listed_newest_first_per_user() {
        let f = fixture(3, 3).await;
        let user = Uuid::new_v4();
        let first = f.manager.create_order(user, vec![ticket(f.flight_id, 1, 1)]).await.unwrap();
        let second = f.manager.create_order(user, vec![ticket(f.flight_id, 2, 2)]).await.unwrap();
        f.manager.create_order(Uuid::new_v4(), vec![ticket(f.flight_id, 3, 3)]).await.unwrap();

        let orders = f.manager.list_orders(user, &OrderFilter::default()).await.unwrap();
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), 2);
        if second.created_at > first.created_at {
            assert_eq!(ids, vec![second.id, first.id]);
        }

        let exact = OrderFilter { created_at: Some(first.created_at) };
        let filtered = f.manager.list_orders(user, &exact).await.unwrap();
        assert!(filtered.iter().any(|o| o.id == first.id));
    }
}
