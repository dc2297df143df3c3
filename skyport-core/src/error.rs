use uuid::Uuid;

use crate::seat::SeatOutOfRange;

/// Failures surfaced by a storage backend.
///
/// `SeatTaken` is the authoritative double-booking signal: it is raised by
/// the store's composite uniqueness on (flight, row, seat), never by an
/// application-side lookup.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} with {field} '{value}' already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Referenced {entity} does not exist")]
    MissingReference { entity: &'static str },

    #[error("Seat already booked: flight {flight_id}, row {row}, seat {seat}")]
    SeatTaken { flight_id: Uuid, row: i32, seat: i32 },

    #[error("Invalid seat for flight {flight_id}: {source}")]
    SeatOutOfRange {
        flight_id: Uuid,
        #[source]
        source: SeatOutOfRange,
    },

    #[error("Airplane {0} has sold tickets; its rows and seats_in_row are locked")]
    SeatMapLocked(Uuid),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
