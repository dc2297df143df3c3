use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FlightRecord;

/// Read-side projection of a flight, recomputed on every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightAvailability {
    pub flight_id: Uuid,
    pub available_tickets: i64,
    pub route_label: String,
}

impl FlightAvailability {
    pub fn of(record: &FlightRecord) -> Self {
        Self {
            flight_id: record.flight.id,
            available_tickets: available_tickets(record.airplane.capacity(), record.tickets_sold),
            route_label: record.route.label(),
        }
    }
}

/// Unsold seats: capacity minus committed tickets.
pub fn available_tickets(capacity: i64, tickets_sold: i64) -> i64 {
    capacity - tickets_sold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Airplane, Airport, Flight, Route, RouteDetail};
    use chrono::{Duration, Utc};

    fn record(rows: i32, seats_in_row: i32, tickets_sold: i64) -> FlightRecord {
        let source = Airport { id: Uuid::new_v4(), name: "Zhuliany".into(), closest_big_city: "Kyiv".into() };
        let destination = Airport { id: Uuid::new_v4(), name: "Chopin".into(), closest_big_city: "Warsaw".into() };
        let route = Route { id: Uuid::new_v4(), source_id: source.id, destination_id: destination.id, distance: 690 };
        let airplane = Airplane {
            id: Uuid::new_v4(),
            name: "ATR 72".into(),
            rows,
            seats_in_row,
            airplane_type_id: Uuid::new_v4(),
        };
        let departure = Utc::now();
        FlightRecord {
            flight: Flight {
                id: Uuid::new_v4(),
                route_id: route.id,
                airplane_id: airplane.id,
                departure_time: departure,
                arrival_time: departure + Duration::hours(2),
            },
            route: RouteDetail { route, source, destination },
            airplane,
            crews: vec![],
            tickets_sold,
        }
    }

    #[test]
    fn test_capacity_minus_sold() {
        let availability = FlightAvailability::of(&record(10, 4, 7));
        assert_eq!(availability.available_tickets, 33);
        assert_eq!(availability.route_label, "Zhuliany->Chopin");
    }

    #[test]
    fn test_one_more_sale_lowers_by_one() {
        let before = FlightAvailability::of(&record(2, 2, 3));
        let after = FlightAvailability::of(&record(2, 2, 4));
        assert_eq!(before.available_tickets - 1, after.available_tickets);
        assert_eq!(after.available_tickets, 0);
    }

    #[test]
    fn test_degenerate_airplane_has_nothing_to_sell() {
        let availability = FlightAvailability::of(&record(0, 6, 0));
        assert_eq!(availability.available_tickets, 0);
    }
}
