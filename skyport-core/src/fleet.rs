use crate::models::{Airplane, AirplaneInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AirplaneError {
    #[error("{field} must be a positive integer, got {value}")]
    NonPositiveDimension { field: &'static str, value: i32 },
}

impl AirplaneError {
    pub fn field(&self) -> &'static str {
        match self {
            AirplaneError::NonPositiveDimension { field, .. } => field,
        }
    }
}

/// Write-time check for an airplane's seat map: both dimensions positive.
pub fn validate_airplane(input: &AirplaneInput) -> Result<(), AirplaneError> {
    for (field, value) in [("rows", input.rows), ("seats_in_row", input.seats_in_row)] {
        if value <= 0 {
            return Err(AirplaneError::NonPositiveDimension { field, value });
        }
    }
    Ok(())
}

/// Whether replacing `current` with `input` would change its seat universe.
pub fn changes_seat_map(current: &Airplane, input: &AirplaneInput) -> bool {
    current.rows != input.rows || current.seats_in_row != input.seats_in_row
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn input(rows: i32, seats_in_row: i32) -> AirplaneInput {
        AirplaneInput {
            name: "Embraer".to_string(),
            rows,
            seats_in_row,
            airplane_type_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_positive_dimensions_accepted() {
        assert!(validate_airplane(&input(20, 4)).is_ok());
    }

    #[test]
    fn test_zero_rows_rejected() {
        let err = validate_airplane(&input(0, 4)).unwrap_err();
        assert_eq!(err.field(), "rows");
    }

    #[test]
    fn test_negative_seats_rejected() {
        let err = validate_airplane(&input(3, -2)).unwrap_err();
        assert_eq!(err, AirplaneError::NonPositiveDimension { field: "seats_in_row", value: -2 });
    }

    #[test]
    fn test_seat_map_change_detection() {
        let type_id = Uuid::new_v4();
        let current = Airplane {
            id: Uuid::new_v4(),
            name: "Embraer".to_string(),
            rows: 20,
            seats_in_row: 4,
            airplane_type_id: type_id,
        };
        let mut renamed = input(20, 4);
        renamed.name = "Embraer E190".to_string();
        assert!(!changes_seat_map(&current, &renamed));
        assert!(changes_seat_map(&current, &input(21, 4)));
        assert!(changes_seat_map(&current, &input(20, 5)));
    }
}
