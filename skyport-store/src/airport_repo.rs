use async_trait::async_trait;
use skyport_core::filters::AirportFilter;
use skyport_core::models::{Airport, AirportInput};
use skyport_core::repository::AirportRepository;
use skyport_core::{StoreError, StoreResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::{backend, map_write_error};

pub struct PgAirportRepository {
    pool: PgPool,
}

impl PgAirportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AirportRow {
    id: Uuid,
    name: String,
    closest_big_city: String,
}

impl From<AirportRow> for Airport {
    fn from(row: AirportRow) -> Self {
        Airport { id: row.id, name: row.name, closest_big_city: row.closest_big_city }
    }
}

#[async_trait]
impl AirportRepository for PgAirportRepository {
    async fn create_airport(&self, input: &AirportInput) -> StoreResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            "INSERT INTO airports (id, name, closest_big_city) VALUES ($1, $2, $3) RETURNING id, name, closest_big_city",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.closest_big_city)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn get_airport(&self, id: Uuid) -> StoreResult<Option<Airport>> {
        let row = sqlx::query_as::<_, AirportRow>("SELECT id, name, closest_big_city FROM airports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(Into::into))
    }

    async fn list_airports(&self, filter: &AirportFilter) -> StoreResult<Vec<Airport>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, name, closest_big_city FROM airports");
        if let Some(city) = &filter.closest_big_city {
            query.push(" WHERE LOWER(closest_big_city) = LOWER(").push_bind(city).push(")");
        }
        query.push(" ORDER BY name");

        let rows = query
            .build_query_as::<AirportRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_airport(&self, id: Uuid, input: &AirportInput) -> StoreResult<Airport> {
        let row = sqlx::query_as::<_, AirportRow>(
            "UPDATE airports SET name = $1, closest_big_city = $2 WHERE id = $3 RETURNING id, name, closest_big_city",
        )
        .bind(&input.name)
        .bind(&input.closest_big_city)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Into::into).ok_or_else(|| StoreError::not_found("airport", id))
    }

    async fn delete_airport(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM airports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("airport", id));
        }
        Ok(())
    }
}
