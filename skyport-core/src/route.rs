use uuid::Uuid;

use crate::models::RouteInput;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("Destination can't be the same with source")]
    SameEndpoint { airport_id: Uuid },
}

/// Rejects a route whose source and destination are the same airport.
///
/// Airports are compared by identity: two distinct airports that happen to
/// share a name form a valid route. Distance is taken as given.
pub fn validate_route(route: &RouteInput) -> Result<(), RouteError> {
    if route.source_id == route.destination_id {
        return Err(RouteError::SameEndpoint {
            airport_id: route.source_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(source_id: Uuid, destination_id: Uuid, distance: i32) -> RouteInput {
        RouteInput { source_id, destination_id, distance }
    }

    #[test]
    fn test_same_endpoint_rejected_for_any_distance() {
        let airport = Uuid::new_v4();
        for distance in [0, 1, 950, -20, i32::MAX] {
            let err = validate_route(&input(airport, airport, distance)).unwrap_err();
            assert_eq!(err, RouteError::SameEndpoint { airport_id: airport });
        }
    }

    #[test]
    fn test_distinct_endpoints_accepted() {
        for distance in [0, 1200, -1] {
            assert!(validate_route(&input(Uuid::new_v4(), Uuid::new_v4(), distance)).is_ok());
        }
    }

    #[test]
    fn test_error_message_matches_field_error() {
        let airport = Uuid::new_v4();
        let err = validate_route(&input(airport, airport, 10)).unwrap_err();
        assert_eq!(err.to_string(), "Destination can't be the same with source");
    }
}
