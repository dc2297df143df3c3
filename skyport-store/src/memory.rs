//! In-process backend used by tests and by `storage.backend = "memory"`.
//!
//! Every table lives behind one `RwLock`, so each repository call is a single
//! atomic unit. Foreign keys, cascades and the (flight, row, seat) uniqueness
//! mirror the PostgreSQL schema.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_core::filters::{AirplaneFilter, AirportFilter, FlightFilter, OrderFilter};
use skyport_core::fleet::changes_seat_map;
use skyport_core::models::{
    Airplane, AirplaneDetail, AirplaneInput, AirplaneType, Airport, AirportInput, Crew, CrewDetail,
    CrewInput, Flight, FlightInput, FlightRecord, Order, Route, RouteDetail, RouteInput, SeatRef,
    Ticket, TicketRequest,
};
use skyport_core::repository::{
    AirportRepository, CrewRepository, FleetRepository, FlightRepository, OrderRepository,
    RouteRepository,
};
use skyport_core::{validate_seat, StoreError, StoreResult};
use tokio::sync::RwLock;
use uuid::Uuid;

type SeatKey = (Uuid, i32, i32);

struct OrderEntry {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    airplane_types: HashMap<Uuid, AirplaneType>,
    airplanes: HashMap<Uuid, Airplane>,
    airports: HashMap<Uuid, Airport>,
    routes: HashMap<Uuid, Route>,
    crews: HashMap<Uuid, Crew>,
    flights: HashMap<Uuid, Flight>,
    flight_crews: HashMap<Uuid, BTreeSet<Uuid>>,
    orders: HashMap<Uuid, OrderEntry>,
    tickets: HashMap<Uuid, Ticket>,
    seat_index: HashSet<SeatKey>,
}

impl Tables {
    fn require<T>(map: &HashMap<Uuid, T>, id: Uuid, entity: &'static str) -> StoreResult<()> {
        if map.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference { entity })
        }
    }

    fn check_flight_refs(&self, input: &FlightInput) -> StoreResult<()> {
        Self::require(&self.routes, input.route_id, "route")?;
        Self::require(&self.airplanes, input.airplane_id, "airplane")?;
        for crew_id in &input.crew_ids {
            Self::require(&self.crews, *crew_id, "crew")?;
        }
        Ok(())
    }

    fn route_detail(&self, route: &Route) -> Option<RouteDetail> {
        Some(RouteDetail {
            route: route.clone(),
            source: self.airports.get(&route.source_id)?.clone(),
            destination: self.airports.get(&route.destination_id)?.clone(),
        })
    }

    fn airplane_detail(&self, airplane: &Airplane) -> Option<AirplaneDetail> {
        Some(AirplaneDetail {
            airplane: airplane.clone(),
            airplane_type: self.airplane_types.get(&airplane.airplane_type_id)?.clone(),
        })
    }

    fn flight_record(&self, flight: &Flight) -> Option<FlightRecord> {
        let route = self.route_detail(self.routes.get(&flight.route_id)?)?;
        let airplane = self.airplanes.get(&flight.airplane_id)?.clone();

        let mut crews: Vec<Crew> = self
            .flight_crews
            .get(&flight.id)
            .into_iter()
            .flatten()
            .filter_map(|crew_id| self.crews.get(crew_id).cloned())
            .collect();
        crews.sort_by(|a, b| (&a.first_name, &a.last_name).cmp(&(&b.first_name, &b.last_name)));

        let tickets_sold = self.seat_index.iter().filter(|(id, _, _)| *id == flight.id).count() as i64;

        Some(FlightRecord { flight: flight.clone(), route, airplane, crews, tickets_sold })
    }

    fn flights_count(&self, crew_id: Uuid) -> i64 {
        self.flight_crews.values().filter(|crews| crews.contains(&crew_id)).count() as i64
    }

    fn flight_has_tickets(&self, flight_id: Uuid) -> bool {
        self.seat_index.iter().any(|(id, _, _)| *id == flight_id)
    }

    fn order(&self, entry: &OrderEntry) -> Order {
        let mut tickets: Vec<Ticket> =
            self.tickets.values().filter(|t| t.order_id == entry.id).cloned().collect();
        tickets.sort_by_key(|t| (t.row, t.seat));
        Order { id: entry.id, user_id: entry.user_id, created_at: entry.created_at, tickets }
    }

    // ------------------------------------------------------------------------
    // Cascades (ON DELETE CASCADE in the schema)
    // ------------------------------------------------------------------------

    fn remove_flight(&mut self, id: Uuid) -> bool {
        if self.flights.remove(&id).is_none() {
            return false;
        }
        self.flight_crews.remove(&id);
        self.tickets.retain(|_, t| t.flight_id != id);
        self.seat_index.retain(|(flight_id, _, _)| *flight_id != id);
        true
    }

    fn remove_flights_where(&mut self, predicate: impl Fn(&Flight) -> bool) {
        let doomed: Vec<Uuid> = self.flights.values().filter(|f| predicate(f)).map(|f| f.id).collect();
        for id in doomed {
            self.remove_flight(id);
        }
    }

    fn remove_route(&mut self, id: Uuid) -> bool {
        if self.routes.remove(&id).is_none() {
            return false;
        }
        self.remove_flights_where(|f| f.route_id == id);
        true
    }

    fn remove_airplane(&mut self, id: Uuid) -> bool {
        if self.airplanes.remove(&id).is_none() {
            return false;
        }
        self.remove_flights_where(|f| f.airplane_id == id);
        true
    }
}

/// Thread-safe in-memory implementation of every repository trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetRepository for MemoryStore {
    async fn create_airplane_type(&self, name: &str) -> StoreResult<AirplaneType> {
        let mut tables = self.tables.write().await;
        if tables.airplane_types.values().any(|t| t.name == name) {
            return Err(StoreError::Duplicate { entity: "airplane type", field: "name", value: name.to_string() });
        }
        let airplane_type = AirplaneType { id: Uuid::new_v4(), name: name.to_string() };
        tables.airplane_types.insert(airplane_type.id, airplane_type.clone());
        Ok(airplane_type)
    }

    async fn get_airplane_type(&self, id: Uuid) -> StoreResult<Option<AirplaneType>> {
        Ok(self.tables.read().await.airplane_types.get(&id).cloned())
    }

    async fn list_airplane_types(&self) -> StoreResult<Vec<AirplaneType>> {
        let tables = self.tables.read().await;
        let mut types: Vec<AirplaneType> = tables.airplane_types.values().cloned().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn update_airplane_type(&self, id: Uuid, name: &str) -> StoreResult<AirplaneType> {
        let mut tables = self.tables.write().await;
        if !tables.airplane_types.contains_key(&id) {
            return Err(StoreError::not_found("airplane type", id));
        }
        if tables.airplane_types.values().any(|t| t.name == name && t.id != id) {
            return Err(StoreError::Duplicate { entity: "airplane type", field: "name", value: name.to_string() });
        }
        let airplane_type = AirplaneType { id, name: name.to_string() };
        tables.airplane_types.insert(id, airplane_type.clone());
        Ok(airplane_type)
    }

    async fn delete_airplane_type(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.airplane_types.remove(&id).is_none() {
            return Err(StoreError::not_found("airplane type", id));
        }
        let doomed: Vec<Uuid> =
            tables.airplanes.values().filter(|a| a.airplane_type_id == id).map(|a| a.id).collect();
        for airplane_id in doomed {
            tables.remove_airplane(airplane_id);
        }
        Ok(())
    }

    async fn create_airplane(&self, input: &AirplaneInput) -> StoreResult<Airplane> {
        let mut tables = self.tables.write().await;
        Tables::require(&tables.airplane_types, input.airplane_type_id, "airplane type")?;
        let airplane = Airplane {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            rows: input.rows,
            seats_in_row: input.seats_in_row,
            airplane_type_id: input.airplane_type_id,
        };
        tables.airplanes.insert(airplane.id, airplane.clone());
        Ok(airplane)
    }

    async fn get_airplane(&self, id: Uuid) -> StoreResult<Option<AirplaneDetail>> {
        let tables = self.tables.read().await;
        Ok(tables.airplanes.get(&id).and_then(|a| tables.airplane_detail(a)))
    }

    async fn list_airplanes(&self, filter: &AirplaneFilter) -> StoreResult<Vec<AirplaneDetail>> {
        let tables = self.tables.read().await;
        let mut airplanes: Vec<AirplaneDetail> = tables
            .airplanes
            .values()
            .filter_map(|a| tables.airplane_detail(a))
            .filter(|detail| filter.matches(detail))
            .collect();
        airplanes.sort_by(|a, b| a.airplane.name.cmp(&b.airplane.name));
        Ok(airplanes)
    }

    async fn update_airplane(&self, id: Uuid, input: &AirplaneInput) -> StoreResult<Airplane> {
        let mut tables = self.tables.write().await;
        let current = tables.airplanes.get(&id).cloned().ok_or_else(|| StoreError::not_found("airplane", id))?;
        Tables::require(&tables.airplane_types, input.airplane_type_id, "airplane type")?;

        if changes_seat_map(&current, input) {
            let sold = tables
                .flights
                .values()
                .filter(|f| f.airplane_id == id)
                .any(|f| tables.flight_has_tickets(f.id));
            if sold {
                return Err(StoreError::SeatMapLocked(id));
            }
        }

        let airplane = Airplane {
            id,
            name: input.name.clone(),
            rows: input.rows,
            seats_in_row: input.seats_in_row,
            airplane_type_id: input.airplane_type_id,
        };
        tables.airplanes.insert(id, airplane.clone());
        Ok(airplane)
    }

    async fn delete_airplane(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.remove_airplane(id) {
            return Err(StoreError::not_found("airplane", id));
        }
        Ok(())
    }
}

#[async_trait]
impl AirportRepository for MemoryStore {
    async fn create_airport(&self, input: &AirportInput) -> StoreResult<Airport> {
        let airport = Airport {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            closest_big_city: input.closest_big_city.clone(),
        };
        self.tables.write().await.airports.insert(airport.id, airport.clone());
        Ok(airport)
    }

    async fn get_airport(&self, id: Uuid) -> StoreResult<Option<Airport>> {
        Ok(self.tables.read().await.airports.get(&id).cloned())
    }

    async fn list_airports(&self, filter: &AirportFilter) -> StoreResult<Vec<Airport>> {
        let tables = self.tables.read().await;
        let mut airports: Vec<Airport> =
            tables.airports.values().filter(|a| filter.matches(a)).cloned().collect();
        airports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(airports)
    }

    async fn update_airport(&self, id: Uuid, input: &AirportInput) -> StoreResult<Airport> {
        let mut tables = self.tables.write().await;
        let airport = tables.airports.get_mut(&id).ok_or_else(|| StoreError::not_found("airport", id))?;
        airport.name = input.name.clone();
        airport.closest_big_city = input.closest_big_city.clone();
        Ok(airport.clone())
    }

    async fn delete_airport(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.airports.remove(&id).is_none() {
            return Err(StoreError::not_found("airport", id));
        }
        let doomed: Vec<Uuid> = tables
            .routes
            .values()
            .filter(|r| r.source_id == id || r.destination_id == id)
            .map(|r| r.id)
            .collect();
        for route_id in doomed {
            tables.remove_route(route_id);
        }
        Ok(())
    }
}

#[async_trait]
impl RouteRepository for MemoryStore {
    async fn create_route(&self, input: &RouteInput) -> StoreResult<Route> {
        let mut tables = self.tables.write().await;
        Tables::require(&tables.airports, input.source_id, "airport")?;
        Tables::require(&tables.airports, input.destination_id, "airport")?;
        let route = Route {
            id: Uuid::new_v4(),
            source_id: input.source_id,
            destination_id: input.destination_id,
            distance: input.distance,
        };
        tables.routes.insert(route.id, route.clone());
        Ok(route)
    }

    async fn get_route(&self, id: Uuid) -> StoreResult<Option<RouteDetail>> {
        let tables = self.tables.read().await;
        Ok(tables.routes.get(&id).and_then(|r| tables.route_detail(r)))
    }

    async fn list_routes(&self) -> StoreResult<Vec<RouteDetail>> {
        let tables = self.tables.read().await;
        let mut routes: Vec<RouteDetail> = tables.routes.values().filter_map(|r| tables.route_detail(r)).collect();
        routes.sort_by(|a, b| (&a.source.name, &a.destination.name).cmp(&(&b.source.name, &b.destination.name)));
        Ok(routes)
    }

    async fn update_route(&self, id: Uuid, input: &RouteInput) -> StoreResult<Route> {
        let mut tables = self.tables.write().await;
        if !tables.routes.contains_key(&id) {
            return Err(StoreError::not_found("route", id));
        }
        Tables::require(&tables.airports, input.source_id, "airport")?;
        Tables::require(&tables.airports, input.destination_id, "airport")?;
        let route = Route { id, source_id: input.source_id, destination_id: input.destination_id, distance: input.distance };
        tables.routes.insert(id, route.clone());
        Ok(route)
    }

    async fn delete_route(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.remove_route(id) {
            return Err(StoreError::not_found("route", id));
        }
        Ok(())
    }
}

#[async_trait]
impl CrewRepository for MemoryStore {
    async fn create_crew(&self, input: &CrewInput) -> StoreResult<Crew> {
        let crew = Crew { id: Uuid::new_v4(), first_name: input.first_name.clone(), last_name: input.last_name.clone() };
        self.tables.write().await.crews.insert(crew.id, crew.clone());
        Ok(crew)
    }

    async fn get_crew(&self, id: Uuid) -> StoreResult<Option<CrewDetail>> {
        let tables = self.tables.read().await;
        Ok(tables
            .crews
            .get(&id)
            .map(|crew| CrewDetail { crew: crew.clone(), flights_count: tables.flights_count(id) }))
    }

    async fn list_crews(&self) -> StoreResult<Vec<CrewDetail>> {
        let tables = self.tables.read().await;
        let mut crews: Vec<CrewDetail> = tables
            .crews
            .values()
            .map(|crew| CrewDetail { crew: crew.clone(), flights_count: tables.flights_count(crew.id) })
            .collect();
        crews.sort_by(|a, b| {
            (&a.crew.first_name, &a.crew.last_name).cmp(&(&b.crew.first_name, &b.crew.last_name))
        });
        Ok(crews)
    }

    async fn update_crew(&self, id: Uuid, input: &CrewInput) -> StoreResult<Crew> {
        let mut tables = self.tables.write().await;
        let crew = tables.crews.get_mut(&id).ok_or_else(|| StoreError::not_found("crew", id))?;
        crew.first_name = input.first_name.clone();
        crew.last_name = input.last_name.clone();
        Ok(crew.clone())
    }

    async fn delete_crew(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.crews.remove(&id).is_none() {
            return Err(StoreError::not_found("crew", id));
        }
        for crews in tables.flight_crews.values_mut() {
            crews.remove(&id);
        }
        Ok(())
    }
}

#[async_trait]
impl FlightRepository for MemoryStore {
    async fn create_flight(&self, input: &FlightInput) -> StoreResult<Flight> {
        let mut tables = self.tables.write().await;
        tables.check_flight_refs(input)?;
        let flight = Flight {
            id: Uuid::new_v4(),
            route_id: input.route_id,
            airplane_id: input.airplane_id,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
        };
        tables.flights.insert(flight.id, flight.clone());
        tables.flight_crews.insert(flight.id, input.crew_ids.iter().copied().collect());
        Ok(flight)
    }

    async fn get_flight(&self, id: Uuid) -> StoreResult<Option<FlightRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.flights.get(&id).and_then(|f| tables.flight_record(f)))
    }

    async fn list_flights(&self, filter: &FlightFilter) -> StoreResult<Vec<FlightRecord>> {
        let tables = self.tables.read().await;
        let mut flights: Vec<FlightRecord> = tables
            .flights
            .values()
            .filter_map(|f| tables.flight_record(f))
            .filter(|record| filter.matches(record))
            .collect();
        flights.sort_by_key(|r| (r.flight.departure_time, r.flight.id));
        Ok(flights)
    }

    async fn update_flight(&self, id: Uuid, input: &FlightInput) -> StoreResult<Flight> {
        let mut tables = self.tables.write().await;
        let current = tables.flights.get(&id).cloned().ok_or_else(|| StoreError::not_found("flight", id))?;
        if current.airplane_id != input.airplane_id && tables.flight_has_tickets(id) {
            return Err(StoreError::SeatMapLocked(current.airplane_id));
        }
        tables.check_flight_refs(input)?;

        let flight = Flight {
            id,
            route_id: input.route_id,
            airplane_id: input.airplane_id,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
        };
        tables.flights.insert(id, flight.clone());
        tables.flight_crews.insert(id, input.crew_ids.iter().copied().collect());
        Ok(flight)
    }

    async fn delete_flight(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.remove_flight(id) {
            return Err(StoreError::not_found("flight", id));
        }
        Ok(())
    }

    async fn taken_seats(&self, flight_id: Uuid) -> StoreResult<Vec<SeatRef>> {
        let tables = self.tables.read().await;
        let mut seats: Vec<SeatRef> = tables
            .seat_index
            .iter()
            .filter(|(id, _, _)| *id == flight_id)
            .map(|(_, row, seat)| SeatRef { row: *row, seat: *seat })
            .collect();
        seats.sort();
        Ok(seats)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create_order(&self, user_id: Uuid, tickets: &[TicketRequest]) -> StoreResult<Order> {
        let mut tables = self.tables.write().await;

        for request in tickets {
            let airplane = tables
                .flights
                .get(&request.flight_id)
                .and_then(|f| tables.airplanes.get(&f.airplane_id))
                .ok_or_else(|| StoreError::not_found("flight", request.flight_id))?;
            validate_seat(request.row, request.seat, airplane)
                .map_err(|source| StoreError::SeatOutOfRange { flight_id: request.flight_id, source })?;
        }

        // Stage every seat first; nothing is written unless all of them are free.
        let mut ordered: Vec<&TicketRequest> = tickets.iter().collect();
        ordered.sort_by_key(|t| (t.flight_id, t.row, t.seat));
        let mut staged: HashSet<SeatKey> = HashSet::with_capacity(tickets.len());
        for request in &ordered {
            let key = (request.flight_id, request.row, request.seat);
            if tables.seat_index.contains(&key) || !staged.insert(key) {
                return Err(StoreError::SeatTaken { flight_id: request.flight_id, row: request.row, seat: request.seat });
            }
        }

        let entry = OrderEntry { id: Uuid::new_v4(), user_id, created_at: Utc::now() };
        for request in ordered {
            let ticket = Ticket {
                id: Uuid::new_v4(),
                order_id: entry.id,
                flight_id: request.flight_id,
                row: request.row,
                seat: request.seat,
            };
            tables.tickets.insert(ticket.id, ticket);
        }
        tables.seat_index.extend(staged);

        let order = tables.order(&entry);
        tables.orders.insert(entry.id, entry);
        Ok(order)
    }

    async fn get_order(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .get(&id)
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| tables.order(entry)))
    }

    async fn list_orders(&self, user_id: Uuid, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| tables.order(entry))
            .filter(|order| filter.matches(order))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    struct Seeded {
        store: MemoryStore,
        flight: Flight,
        airplane: Airplane,
    }

    async fn seed(rows: i32, seats_in_row: i32) -> Seeded {
        let store = MemoryStore::new();
        let airplane_type = store.create_airplane_type("Narrow-body").await.unwrap();
        let airplane = store
            .create_airplane(&AirplaneInput {
                name: "Airbus A320".into(),
                rows,
                seats_in_row,
                airplane_type_id: airplane_type.id,
            })
            .await
            .unwrap();
        let kbp = store
            .create_airport(&AirportInput { name: "Boryspil".into(), closest_big_city: "Kyiv".into() })
            .await
            .unwrap();
        let lhr = store
            .create_airport(&AirportInput { name: "Heathrow".into(), closest_big_city: "London".into() })
            .await
            .unwrap();
        let route = store
            .create_route(&RouteInput { source_id: kbp.id, destination_id: lhr.id, distance: 2130 })
            .await
            .unwrap();
        let departure = Utc::now();
        let flight = store
            .create_flight(&FlightInput {
                route_id: route.id,
                airplane_id: airplane.id,
                crew_ids: vec![],
                departure_time: departure,
                arrival_time: departure + Duration::hours(3),
            })
            .await
            .unwrap();
        Seeded { store, flight, airplane }
    }

    fn seat(flight_id: Uuid, row: i32, seat: i32) -> TicketRequest {
        TicketRequest { flight_id, row, seat }
    }

    #[tokio::test]
    async fn test_second_order_for_same_seat_is_rejected() {
        let s = seed(2, 2).await;
        let user = Uuid::new_v4();

        s.store.create_order(user, &[seat(s.flight.id, 1, 1)]).await.unwrap();
        let err = s.store.create_order(user, &[seat(s.flight.id, 1, 1)]).await.unwrap_err();

        assert!(matches!(err, StoreError::SeatTaken { row: 1, seat: 1, .. }));
        assert_eq!(s.store.taken_seats(s.flight.id).await.unwrap(), vec![SeatRef { row: 1, seat: 1 }]);
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_commits_nothing() {
        let s = seed(2, 2).await;
        let user = Uuid::new_v4();

        let err = s
            .store
            .create_order(user, &[seat(s.flight.id, 1, 2), seat(s.flight.id, 2, 1), seat(s.flight.id, 1, 2)])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::SeatTaken { row: 1, seat: 2, .. }));
        assert!(s.store.taken_seats(s.flight.id).await.unwrap().is_empty());
        assert!(s.store.list_orders(user, &OrderFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_seat_commits_nothing() {
        let s = seed(2, 2).await;
        let user = Uuid::new_v4();

        let err = s
            .store
            .create_order(user, &[seat(s.flight.id, 1, 1), seat(s.flight.id, 3, 0)])
            .await
            .unwrap_err();

        match err {
            StoreError::SeatOutOfRange { source, .. } => assert_eq!(source.violations.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(s.store.taken_seats(s.flight.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flight_record_counts_sold_tickets() {
        let s = seed(3, 4).await;
        s.store
            .create_order(Uuid::new_v4(), &[seat(s.flight.id, 1, 1), seat(s.flight.id, 3, 4)])
            .await
            .unwrap();

        let record = s.store.get_flight(s.flight.id).await.unwrap().unwrap();
        assert_eq!(record.tickets_sold, 2);
        assert_eq!(record.route.label(), "Boryspil->Heathrow");
    }

    #[tokio::test]
    async fn test_seat_map_locked_after_sale() {
        let s = seed(2, 2).await;
        s.store.create_order(Uuid::new_v4(), &[seat(s.flight.id, 2, 2)]).await.unwrap();

        let mut input = AirplaneInput {
            name: "Renamed".into(),
            rows: s.airplane.rows,
            seats_in_row: s.airplane.seats_in_row,
            airplane_type_id: s.airplane.airplane_type_id,
        };
        assert!(s.store.update_airplane(s.airplane.id, &input).await.is_ok());

        input.rows = 1;
        let err = s.store.update_airplane(s.airplane.id, &input).await.unwrap_err();
        assert!(matches!(err, StoreError::SeatMapLocked(id) if id == s.airplane.id));
    }

    #[tokio::test]
    async fn test_deleting_flight_cascades_tickets() {
        let s = seed(2, 2).await;
        let user = Uuid::new_v4();
        s.store.create_order(user, &[seat(s.flight.id, 1, 1)]).await.unwrap();

        s.store.delete_flight(s.flight.id).await.unwrap();

        assert!(s.store.taken_seats(s.flight.id).await.unwrap().is_empty());
        let orders = s.store.list_orders(user, &OrderFilter::default()).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders[0].tickets.is_empty());
    }

    #[tokio::test]
    async fn test_missing_references_and_duplicates() {
        let store = MemoryStore::new();
        let err = store
            .create_airplane(&AirplaneInput {
                name: "Ghost".into(),
                rows: 1,
                seats_in_row: 1,
                airplane_type_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { entity: "airplane type" }));

        store.create_airplane_type("Wide-body").await.unwrap();
        let err = store.create_airplane_type("Wide-body").await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "name", .. }));
    }

    #[tokio::test]
    async fn test_orders_are_scoped_to_user() {
        let s = seed(2, 2).await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let order = s.store.create_order(alice, &[seat(s.flight.id, 1, 1)]).await.unwrap();

        assert!(s.store.get_order(bob, order.id).await.unwrap().is_none());
        assert_eq!(s.store.get_order(alice, order.id).await.unwrap(), Some(order));
    }
}
