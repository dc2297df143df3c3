pub mod manager;

pub use manager::{OrderError, OrderManager};
