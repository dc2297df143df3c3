use std::fmt;

use serde::Serialize;

use crate::models::Airplane;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeatDimension {
    Row,
    Seat,
}

impl SeatDimension {
    /// Request field name.
    pub fn field(&self) -> &'static str {
        match self {
            SeatDimension::Row => "row",
            SeatDimension::Seat => "seat",
        }
    }

    /// Airplane attribute bounding this dimension.
    pub fn bound(&self) -> &'static str {
        match self {
            SeatDimension::Row => "rows",
            SeatDimension::Seat => "seats_in_row",
        }
    }
}

/// One out-of-range dimension together with its valid range `[min, max]`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RangeViolation {
    pub dimension: SeatDimension,
    pub value: i32,
    pub min: i32,
    pub max: i32,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} number must be in available range: (1, {}): ({}, {})",
            self.dimension.field(),
            self.dimension.bound(),
            self.min,
            self.max
        )
    }
}

/// Every violated dimension of a requested seat; never empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeatOutOfRange {
    pub violations: Vec<RangeViolation>,
}

impl fmt::Display for SeatOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for SeatOutOfRange {}

impl SeatOutOfRange {
    pub fn violation(&self, dimension: SeatDimension) -> Option<&RangeViolation> {
        self.violations.iter().find(|v| v.dimension == dimension)
    }
}

/// Checks `1 <= row <= rows` and, independently, `1 <= seat <= seats_in_row`.
pub fn validate_seat(row: i32, seat: i32, airplane: &Airplane) -> Result<(), SeatOutOfRange> {
    let violations: Vec<RangeViolation> = [
        (SeatDimension::Row, row, airplane.rows),
        (SeatDimension::Seat, seat, airplane.seats_in_row),
    ]
    .into_iter()
    .filter(|(_, value, max)| !(1..=*max).contains(value))
    .map(|(dimension, value, max)| RangeViolation { dimension, value, min: 1, max })
    .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SeatOutOfRange { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn airplane(rows: i32, seats_in_row: i32) -> Airplane {
        Airplane {
            id: Uuid::new_v4(),
            name: "A320".to_string(),
            rows,
            seats_in_row,
            airplane_type_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_valid_iff_inside_bounds() {
        let plane = airplane(4, 3);
        for row in -1..=6 {
            for seat in -1..=5 {
                let inside = (1..=4).contains(&row) && (1..=3).contains(&seat);
                assert_eq!(validate_seat(row, seat, &plane).is_ok(), inside, "row {row} seat {seat}");
            }
        }
    }

    #[test]
    fn test_both_dimensions_reported_together() {
        let plane = airplane(10, 6);
        let err = validate_seat(0, 7, &plane).unwrap_err();

        assert_eq!(err.violations.len(), 2);
        assert_eq!(
            err.violation(SeatDimension::Row),
            Some(&RangeViolation { dimension: SeatDimension::Row, value: 0, min: 1, max: 10 })
        );
        assert_eq!(
            err.violation(SeatDimension::Seat),
            Some(&RangeViolation { dimension: SeatDimension::Seat, value: 7, min: 1, max: 6 })
        );
    }

    #[test]
    fn test_single_dimension_reported_alone() {
        let plane = airplane(10, 6);
        let err = validate_seat(11, 3, &plane).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.violation(SeatDimension::Seat).is_none());
        assert_eq!(
            err.to_string(),
            "row number must be in available range: (1, rows): (1, 10)"
        );
    }

    #[test]
    fn test_zero_capacity_airplane_rejects_everything() {
        let plane = airplane(0, 0);
        let err = validate_seat(1, 1, &plane).unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }
}
