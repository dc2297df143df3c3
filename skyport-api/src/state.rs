use skyport_catalog::CatalogService;
use skyport_core::Repositories;
use skyport_order::OrderManager;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub orders: OrderManager,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(repos: Repositories, auth: AuthConfig) -> Self {
        Self {
            orders: OrderManager::new(repos.flights.clone(), repos.orders.clone()),
            catalog: CatalogService::new(repos),
            auth,
        }
    }
}
