use skyport_core::{AirplaneError, RouteError, StoreError};

/// Reference-data failures: validation rejects before storage is touched.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Airplane(#[from] AirplaneError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
