pub mod availability;
pub mod error;
pub mod filters;
pub mod fleet;
pub mod models;
pub mod repository;
pub mod route;
pub mod seat;

pub use availability::FlightAvailability;
pub use error::{StoreError, StoreResult};
pub use fleet::{validate_airplane, AirplaneError};
pub use repository::Repositories;
pub use route::{validate_route, RouteError};
pub use seat::{validate_seat, RangeViolation, SeatDimension, SeatOutOfRange};
