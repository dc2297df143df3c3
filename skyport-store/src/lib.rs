pub mod airport_repo;
pub mod app_config;
pub mod crew_repo;
pub mod database;
mod errors;
pub mod fleet_repo;
pub mod flight_repo;
pub mod memory;
pub mod order_repo;
pub mod route_repo;

use std::sync::Arc;

use skyport_core::Repositories;
use sqlx::PgPool;

pub use airport_repo::PgAirportRepository;
pub use crew_repo::PgCrewRepository;
pub use database::DbClient;
pub use fleet_repo::PgFleetRepository;
pub use flight_repo::PgFlightRepository;
pub use memory::MemoryStore;
pub use order_repo::PgOrderRepository;
pub use route_repo::PgRouteRepository;

/// Wires every repository to one PostgreSQL pool.
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        fleet: Arc::new(PgFleetRepository::new(pool.clone())),
        airports: Arc::new(PgAirportRepository::new(pool.clone())),
        routes: Arc::new(PgRouteRepository::new(pool.clone())),
        crews: Arc::new(PgCrewRepository::new(pool.clone())),
        flights: Arc::new(PgFlightRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool)),
    }
}

/// Every repository backed by one shared [`MemoryStore`].
pub fn memory_repositories() -> Repositories {
    let store = MemoryStore::new();
    Repositories {
        fleet: Arc::new(store.clone()),
        airports: Arc::new(store.clone()),
        routes: Arc::new(store.clone()),
        crews: Arc::new(store.clone()),
        flights: Arc::new(store.clone()),
        orders: Arc::new(store),
    }
}
