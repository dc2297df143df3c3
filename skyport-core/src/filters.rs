use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{AirplaneDetail, Airport, FlightRecord, Order};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("{field} expects two comma-separated ids (source,destination), got '{value}'")]
    MalformedRoutePair { field: &'static str, value: String },
}

/// `?closest_big_city=`, case-insensitive exact match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportFilter {
    pub closest_big_city: Option<String>,
}

impl AirportFilter {
    pub fn matches(&self, airport: &Airport) -> bool {
        match &self.closest_big_city {
            Some(city) => airport.closest_big_city.to_lowercase() == city.to_lowercase(),
            None => true,
        }
    }
}

/// `?airplane_type=`, case-insensitive substring of the type name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirplaneFilter {
    pub airplane_type: Option<String>,
}

impl AirplaneFilter {
    pub fn matches(&self, airplane: &AirplaneDetail) -> bool {
        match &self.airplane_type {
            Some(needle) => airplane
                .airplane_type
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightFilter {
    /// (source airport, destination airport) of the flight's route.
    pub route: Option<(Uuid, Uuid)>,
    pub departure_time: Option<DateTime<Utc>>,
    pub airplane_id: Option<Uuid>,
}

impl FlightFilter {
    /// Parses the `route_destination=source,destination` query value.
    pub fn parse_route_pair(value: &str) -> Result<(Uuid, Uuid), FilterError> {
        let malformed = || FilterError::MalformedRoutePair {
            field: "route_destination",
            value: value.to_string(),
        };

        let mut parts = value.split(',').map(str::trim);
        let (Some(source), Some(destination), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };

        let source = Uuid::parse_str(source).map_err(|_| malformed())?;
        let destination = Uuid::parse_str(destination).map_err(|_| malformed())?;
        Ok((source, destination))
    }

    pub fn matches(&self, record: &FlightRecord) -> bool {
        if let Some((source, destination)) = self.route {
            if record.route.route.source_id != source || record.route.route.destination_id != destination {
                return false;
            }
        }
        if let Some(departure) = self.departure_time {
            if record.flight.departure_time != departure {
                return false;
            }
        }
        if let Some(airplane_id) = self.airplane_id {
            if record.flight.airplane_id != airplane_id {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrderFilter {
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.created_at.map_or(true, |at| order.created_at == at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_pair_parsing() {
        let source = Uuid::new_v4();
        let destination = Uuid::new_v4();
        let parsed = FlightFilter::parse_route_pair(&format!("{source}, {destination}")).unwrap();
        assert_eq!(parsed, (source, destination));
    }

    #[test]
    fn test_route_pair_rejects_wrong_arity() {
        let one = Uuid::new_v4().to_string();
        assert!(FlightFilter::parse_route_pair(&one).is_err());

        let three = format!("{},{},{}", Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert!(FlightFilter::parse_route_pair(&three).is_err());

        let err = FlightFilter::parse_route_pair("1,2").unwrap_err();
        assert_eq!(
            err,
            FilterError::MalformedRoutePair { field: "route_destination", value: "1,2".into() }
        );
    }

    #[test]
    fn test_airport_city_is_case_insensitive_exact() {
        let airport = Airport { id: Uuid::new_v4(), name: "Orlando Intl".into(), closest_big_city: "Florida".into() };
        let filter = |city: &str| AirportFilter { closest_big_city: Some(city.into()) };

        assert!(filter("florida").matches(&airport));
        assert!(filter("FLORIDA").matches(&airport));
        assert!(!filter("Flor").matches(&airport));
        assert!(AirportFilter::default().matches(&airport));
    }
}
