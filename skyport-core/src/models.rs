use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Fleet
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AirplaneType {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Airplane {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub airplane_type_id: Uuid,
}

impl Airplane {
    /// Total seat count. Zero or negative configurations yield a capacity
    /// `<= 0`, which means the airplane has no sellable seats.
    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }
}

/// Airplane joined with its type, as shown by list and detail views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AirplaneDetail {
    pub airplane: Airplane,
    pub airplane_type: AirplaneType,
}

/// Validated attribute bundle for creating or replacing an airplane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirplaneInput {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub airplane_type_id: Uuid,
}

// ============================================================================
// Network
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Airport {
    pub id: Uuid,
    pub name: String,
    pub closest_big_city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportInput {
    pub name: String,
    pub closest_big_city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Route {
    pub id: Uuid,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub distance: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteDetail {
    pub route: Route,
    pub source: Airport,
    pub destination: Airport,
}

impl RouteDetail {
    /// Display label, e.g. `Boryspil->Heathrow`.
    pub fn label(&self) -> String {
        format!("{}->{}", self.source.name, self.destination.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInput {
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub distance: i32,
}

// ============================================================================
// Operations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Crew {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl Crew {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewDetail {
    pub crew: Crew,
    pub flights_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewInput {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flight {
    pub id: Uuid,
    pub route_id: Uuid,
    pub airplane_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// A flight with everything the availability projection needs.
///
/// `tickets_sold` counts every committed ticket of the flight exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightRecord {
    pub flight: Flight,
    pub route: RouteDetail,
    pub airplane: Airplane,
    pub crews: Vec<Crew>,
    pub tickets_sold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightInput {
    pub route_id: Uuid,
    pub airplane_id: Uuid,
    #[serde(default)]
    pub crew_ids: Vec<Uuid>,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatRef {
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub id: Uuid,
    pub order_id: Uuid,
    pub flight_id: Uuid,
    pub row: i32,
    pub seat: i32,
}

/// One requested seat inside an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketRequest {
    pub flight_id: Uuid,
    pub row: i32,
    pub seat: i32,
}

/// Immutable once created. Tickets disappear only when their flight is
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<Ticket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airplane(rows: i32, seats_in_row: i32) -> Airplane {
        Airplane {
            id: Uuid::new_v4(),
            name: "Boeing".to_string(),
            rows,
            seats_in_row,
            airplane_type_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_capacity_is_rows_times_seats() {
        for (rows, seats) in [(1, 1), (2, 2), (30, 6), (7, 3)] {
            assert_eq!(airplane(rows, seats).capacity(), i64::from(rows * seats));
        }
    }

    #[test]
    fn test_degenerate_capacity_is_zero() {
        assert_eq!(airplane(0, 6).capacity(), 0);
        assert_eq!(airplane(12, 0).capacity(), 0);
        assert_eq!(airplane(0, 0).capacity(), 0);
    }

    #[test]
    fn test_capacity_does_not_overflow() {
        assert_eq!(
            airplane(i32::MAX, 2).capacity(),
            i64::from(i32::MAX) * 2
        );
    }

    #[test]
    fn test_route_label_and_crew_name() {
        let source = Airport { id: Uuid::new_v4(), name: "Boryspil".into(), closest_big_city: "Kyiv".into() };
        let destination = Airport { id: Uuid::new_v4(), name: "Heathrow".into(), closest_big_city: "London".into() };
        let route = RouteDetail {
            route: Route { id: Uuid::new_v4(), source_id: source.id, destination_id: destination.id, distance: 2100 },
            source,
            destination,
        };
        assert_eq!(route.label(), "Boryspil->Heathrow");

        let crew = Crew { id: Uuid::new_v4(), first_name: "Amelia".into(), last_name: "Earhart".into() };
        assert_eq!(crew.full_name(), "Amelia Earhart");
    }

    #[test]
    fn test_flight_input_crews_default_to_empty() {
        let json = r#"
            {
                "route_id": "7f1d2a52-1f49-4c8e-9e40-2f7f3b6a8a11",
                "airplane_id": "0b6f0d0e-5f55-4a57-8b3e-55c5c1a3c0d2",
                "departure_time": "2024-12-25T10:00:00Z",
                "arrival_time": "2024-12-25T13:30:00Z"
            }
        "#;
        let input: FlightInput = serde_json::from_str(json).expect("Failed to deserialize");
        assert!(input.crew_ids.is_empty());
        assert!(input.arrival_time > input.departure_time);
    }
}
