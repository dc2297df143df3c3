use skyport_core::filters::{AirplaneFilter, AirportFilter};
use skyport_core::models::{
    Airplane, AirplaneDetail, AirplaneInput, AirplaneType, Airport, AirportInput, Crew, CrewDetail,
    CrewInput, Route, RouteDetail, RouteInput,
};
use skyport_core::{validate_airplane, validate_route, Repositories, StoreError};
use tracing::info;
use uuid::Uuid;

use crate::error::CatalogResult;

/// Reference data management: fleet, airports, routes, crews and flights.
///
/// Every write runs its pure validation first, then hands the input to the
/// repository. Reads return `StoreError::NotFound` for unknown ids.
#[derive(Clone)]
pub struct CatalogService {
    pub(crate) repos: Repositories,
}

pub(crate) fn found<T>(value: Option<T>, entity: &'static str, id: Uuid) -> CatalogResult<T> {
    value.ok_or_else(|| StoreError::not_found(entity, id).into())
}

impl CatalogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    // ========================================================================
    // Airplane types
    // ========================================================================

    pub async fn create_airplane_type(&self, name: &str) -> CatalogResult<AirplaneType> {
        let airplane_type = self.repos.fleet.create_airplane_type(name).await?;
        info!("Created airplane type {} ({})", airplane_type.name, airplane_type.id);
        Ok(airplane_type)
    }

    pub async fn airplane_type(&self, id: Uuid) -> CatalogResult<AirplaneType> {
        found(self.repos.fleet.get_airplane_type(id).await?, "airplane type", id)
    }

    pub async fn airplane_types(&self) -> CatalogResult<Vec<AirplaneType>> {
        Ok(self.repos.fleet.list_airplane_types().await?)
    }

    pub async fn update_airplane_type(&self, id: Uuid, name: &str) -> CatalogResult<AirplaneType> {
        Ok(self.repos.fleet.update_airplane_type(id, name).await?)
    }

    pub async fn delete_airplane_type(&self, id: Uuid) -> CatalogResult<()> {
        self.repos.fleet.delete_airplane_type(id).await?;
        info!("Deleted airplane type {}", id);
        Ok(())
    }

    // ========================================================================
    // Airplanes
    // ========================================================================

    pub async fn create_airplane(&self, input: &AirplaneInput) -> CatalogResult<Airplane> {
        validate_airplane(input)?;
        let airplane = self.repos.fleet.create_airplane(input).await?;
        info!(
            "Created airplane {} ({}x{}, capacity {})",
            airplane.id,
            airplane.rows,
            airplane.seats_in_row,
            airplane.capacity()
        );
        Ok(airplane)
    }

    pub async fn airplane(&self, id: Uuid) -> CatalogResult<AirplaneDetail> {
        found(self.repos.fleet.get_airplane(id).await?, "airplane", id)
    }

    pub async fn airplanes(&self, filter: &AirplaneFilter) -> CatalogResult<Vec<AirplaneDetail>> {
        Ok(self.repos.fleet.list_airplanes(filter).await?)
    }

    pub async fn update_airplane(&self, id: Uuid, input: &AirplaneInput) -> CatalogResult<Airplane> {
        validate_airplane(input)?;
        Ok(self.repos.fleet.update_airplane(id, input).await?)
    }

    pub async fn delete_airplane(&self, id: Uuid) -> CatalogResult<()> {
        self.repos.fleet.delete_airplane(id).await?;
        info!("Deleted airplane {}", id);
        Ok(())
    }

    // ========================================================================
    // Airports
    // ========================================================================

    pub async fn create_airport(&self, input: &AirportInput) -> CatalogResult<Airport> {
        let airport = self.repos.airports.create_airport(input).await?;
        info!("Created airport {} ({})", airport.name, airport.id);
        Ok(airport)
    }

    pub async fn airport(&self, id: Uuid) -> CatalogResult<Airport> {
        found(self.repos.airports.get_airport(id).await?, "airport", id)
    }

    pub async fn airports(&self, filter: &AirportFilter) -> CatalogResult<Vec<Airport>> {
        Ok(self.repos.airports.list_airports(filter).await?)
    }

    pub async fn update_airport(&self, id: Uuid, input: &AirportInput) -> CatalogResult<Airport> {
        Ok(self.repos.airports.update_airport(id, input).await?)
    }

    pub async fn delete_airport(&self, id: Uuid) -> CatalogResult<()> {
        self.repos.airports.delete_airport(id).await?;
        info!("Deleted airport {}", id);
        Ok(())
    }

    // ========================================================================
    // Routes
    // ========================================================================

    pub async fn create_route(&self, input: &RouteInput) -> CatalogResult<Route> {
        validate_route(input)?;
        let route = self.repos.routes.create_route(input).await?;
        info!("Created route {} ({} -> {})", route.id, route.source_id, route.destination_id);
        Ok(route)
    }

    pub async fn route(&self, id: Uuid) -> CatalogResult<RouteDetail> {
        found(self.repos.routes.get_route(id).await?, "route", id)
    }

    pub async fn routes(&self) -> CatalogResult<Vec<RouteDetail>> {
        Ok(self.repos.routes.list_routes().await?)
    }

    pub async fn update_route(&self, id: Uuid, input: &RouteInput) -> CatalogResult<Route> {
        validate_route(input)?;
        Ok(self.repos.routes.update_route(id, input).await?)
    }

    pub async fn delete_route(&self, id: Uuid) -> CatalogResult<()> {
        self.repos.routes.delete_route(id).await?;
        info!("Deleted route {}", id);
        Ok(())
    }

    // ========================================================================
    // Crews
    // ========================================================================

    pub async fn create_crew(&self, input: &CrewInput) -> CatalogResult<Crew> {
        let crew = self.repos.crews.create_crew(input).await?;
        info!("Created crew member {} ({})", crew.full_name(), crew.id);
        Ok(crew)
    }

    pub async fn crew(&self, id: Uuid) -> CatalogResult<CrewDetail> {
        found(self.repos.crews.get_crew(id).await?, "crew", id)
    }

    pub async fn crews(&self) -> CatalogResult<Vec<CrewDetail>> {
        Ok(self.repos.crews.list_crews().await?)
    }

    pub async fn update_crew(&self, id: Uuid, input: &CrewInput) -> CatalogResult<Crew> {
        Ok(self.repos.crews.update_crew(id, input).await?)
    }

    pub async fn delete_crew(&self, id: Uuid) -> CatalogResult<()> {
        self.repos.crews.delete_crew(id).await?;
        info!("Deleted crew member {}", id);
        Ok(())
    }
}
