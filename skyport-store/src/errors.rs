//! Translation of sqlx failures into [`StoreError`].

use skyport_core::StoreError;
use sqlx::Error as SqlxError;

pub(crate) fn backend(error: SqlxError) -> StoreError {
    tracing::error!("Database error: {}", error);
    StoreError::Backend(error.to_string())
}

pub(crate) fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Maps a failed INSERT/UPDATE. Foreign key violations name the missing
/// entity from the constraint; anything else is a backend failure.
pub(crate) fn map_write_error(error: SqlxError) -> StoreError {
    if let SqlxError::Database(ref db_err) = error {
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference {
                entity: referenced_entity(db_err.constraint()),
            };
        }
    }
    backend(error)
}

fn referenced_entity(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("airplanes_airplane_type_id_fkey") => "airplane type",
        Some("routes_source_id_fkey") | Some("routes_destination_id_fkey") => "airport",
        Some("flights_route_id_fkey") => "route",
        Some("flights_airplane_id_fkey") => "airplane",
        Some("flight_crews_crew_id_fkey") => "crew",
        Some("flight_crews_flight_id_fkey") | Some("tickets_flight_id_fkey") => "flight",
        Some("tickets_order_id_fkey") => "order",
        _ => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_names_map_to_entities() {
        assert_eq!(referenced_entity(Some("routes_destination_id_fkey")), "airport");
        assert_eq!(referenced_entity(Some("flight_crews_crew_id_fkey")), "crew");
        assert_eq!(referenced_entity(None), "record");
    }

    #[test]
    fn test_non_database_errors_are_backend_errors() {
        assert!(!is_unique_violation(&SqlxError::RowNotFound));
        assert!(matches!(map_write_error(SqlxError::RowNotFound), StoreError::Backend(_)));
    }
}
