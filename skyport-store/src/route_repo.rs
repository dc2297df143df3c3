use async_trait::async_trait;
use skyport_core::models::{Airport, Route, RouteDetail, RouteInput};
use skyport_core::repository::RouteRepository;
use skyport_core::{StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{backend, map_write_error};

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    source_id: Uuid,
    destination_id: Uuid,
    distance: i32,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Route {
            id: row.id,
            source_id: row.source_id,
            destination_id: row.destination_id,
            distance: row.distance,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RouteDetailRow {
    pub id: Uuid,
    pub source_id: Uuid,
    pub destination_id: Uuid,
    pub distance: i32,
    pub source_name: String,
    pub source_city: String,
    pub destination_name: String,
    pub destination_city: String,
}

impl From<RouteDetailRow> for RouteDetail {
    fn from(row: RouteDetailRow) -> Self {
        RouteDetail {
            route: Route {
                id: row.id,
                source_id: row.source_id,
                destination_id: row.destination_id,
                distance: row.distance,
            },
            source: Airport { id: row.source_id, name: row.source_name, closest_big_city: row.source_city },
            destination: Airport {
                id: row.destination_id,
                name: row.destination_name,
                closest_big_city: row.destination_city,
            },
        }
    }
}

const ROUTE_DETAIL_SELECT: &str = r#"
    SELECT r.id, r.source_id, r.destination_id, r.distance,
           s.name AS source_name, s.closest_big_city AS source_city,
           d.name AS destination_name, d.closest_big_city AS destination_city
    FROM routes r
    JOIN airports s ON s.id = r.source_id
    JOIN airports d ON d.id = r.destination_id
"#;

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn create_route(&self, input: &RouteInput) -> StoreResult<Route> {
        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            INSERT INTO routes (id, source_id, destination_id, distance)
            VALUES ($1, $2, $3, $4)
            RETURNING id, source_id, destination_id, distance
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.source_id)
        .bind(input.destination_id)
        .bind(input.distance)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn get_route(&self, id: Uuid) -> StoreResult<Option<RouteDetail>> {
        let sql = format!("{ROUTE_DETAIL_SELECT} WHERE r.id = $1");
        let row = sqlx::query_as::<_, RouteDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(Into::into))
    }

    async fn list_routes(&self) -> StoreResult<Vec<RouteDetail>> {
        let sql = format!("{ROUTE_DETAIL_SELECT} ORDER BY s.name, d.name");
        let rows = sqlx::query_as::<_, RouteDetailRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_route(&self, id: Uuid, input: &RouteInput) -> StoreResult<Route> {
        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            UPDATE routes SET source_id = $1, destination_id = $2, distance = $3
            WHERE id = $4
            RETURNING id, source_id, destination_id, distance
            "#,
        )
        .bind(input.source_id)
        .bind(input.destination_id)
        .bind(input.distance)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Into::into).ok_or_else(|| StoreError::not_found("route", id))
    }

    async fn delete_route(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("route", id));
        }
        Ok(())
    }
}
