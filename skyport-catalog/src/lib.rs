pub mod error;
pub mod flights;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use flights::FlightDetail;
pub use service::CatalogService;
