use async_trait::async_trait;
use skyport_core::models::{Crew, CrewDetail, CrewInput};
use skyport_core::repository::CrewRepository;
use skyport_core::{StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{backend, map_write_error};

pub struct PgCrewRepository {
    pool: PgPool,
}

impl PgCrewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct CrewRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl From<CrewRow> for Crew {
    fn from(row: CrewRow) -> Self {
        Crew { id: row.id, first_name: row.first_name, last_name: row.last_name }
    }
}

#[derive(sqlx::FromRow)]
struct CrewDetailRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    flights_count: i64,
}

impl From<CrewDetailRow> for CrewDetail {
    fn from(row: CrewDetailRow) -> Self {
        CrewDetail {
            crew: Crew { id: row.id, first_name: row.first_name, last_name: row.last_name },
            flights_count: row.flights_count,
        }
    }
}

const CREW_DETAIL_SELECT: &str = r#"
    SELECT c.id, c.first_name, c.last_name,
           (SELECT COUNT(*) FROM flight_crews fc WHERE fc.crew_id = c.id) AS flights_count
    FROM crews c
"#;

#[async_trait]
impl CrewRepository for PgCrewRepository {
    async fn create_crew(&self, input: &CrewInput) -> StoreResult<Crew> {
        let row = sqlx::query_as::<_, CrewRow>(
            "INSERT INTO crews (id, first_name, last_name) VALUES ($1, $2, $3) RETURNING id, first_name, last_name",
        )
        .bind(Uuid::new_v4())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn get_crew(&self, id: Uuid) -> StoreResult<Option<CrewDetail>> {
        let sql = format!("{CREW_DETAIL_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CrewDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(Into::into))
    }

    async fn list_crews(&self) -> StoreResult<Vec<CrewDetail>> {
        let sql = format!("{CREW_DETAIL_SELECT} ORDER BY c.first_name, c.last_name");
        let rows = sqlx::query_as::<_, CrewDetailRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_crew(&self, id: Uuid, input: &CrewInput) -> StoreResult<Crew> {
        let row = sqlx::query_as::<_, CrewRow>(
            "UPDATE crews SET first_name = $1, last_name = $2 WHERE id = $3 RETURNING id, first_name, last_name",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(Into::into).ok_or_else(|| StoreError::not_found("crew", id))
    }

    async fn delete_crew(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM crews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("crew", id));
        }
        Ok(())
    }
}
