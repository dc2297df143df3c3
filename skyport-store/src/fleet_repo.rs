use async_trait::async_trait;
use skyport_core::filters::AirplaneFilter;
use skyport_core::fleet::changes_seat_map;
use skyport_core::models::{Airplane, AirplaneDetail, AirplaneInput, AirplaneType};
use skyport_core::repository::FleetRepository;
use skyport_core::{StoreError, StoreResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::{backend, is_unique_violation, map_write_error};

pub struct PgFleetRepository {
    pool: PgPool,
}

impl PgFleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AirplaneTypeRow {
    id: Uuid,
    name: String,
}

impl From<AirplaneTypeRow> for AirplaneType {
    fn from(row: AirplaneTypeRow) -> Self {
        AirplaneType { id: row.id, name: row.name }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AirplaneRow {
    pub id: Uuid,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub airplane_type_id: Uuid,
}

impl From<AirplaneRow> for Airplane {
    fn from(row: AirplaneRow) -> Self {
        Airplane {
            id: row.id,
            name: row.name,
            rows: row.rows,
            seats_in_row: row.seats_in_row,
            airplane_type_id: row.airplane_type_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AirplaneDetailRow {
    id: Uuid,
    name: String,
    rows: i32,
    seats_in_row: i32,
    airplane_type_id: Uuid,
    airplane_type_name: String,
}

impl From<AirplaneDetailRow> for AirplaneDetail {
    fn from(row: AirplaneDetailRow) -> Self {
        AirplaneDetail {
            airplane_type: AirplaneType { id: row.airplane_type_id, name: row.airplane_type_name },
            airplane: Airplane {
                id: row.id,
                name: row.name,
                rows: row.rows,
                seats_in_row: row.seats_in_row,
                airplane_type_id: row.airplane_type_id,
            },
        }
    }
}

const AIRPLANE_DETAIL_SELECT: &str = r#"
    SELECT a.id, a.name, a."rows", a.seats_in_row, a.airplane_type_id, t.name AS airplane_type_name
    FROM airplanes a
    JOIN airplane_types t ON t.id = a.airplane_type_id
"#;

fn duplicate_type_name(name: &str) -> StoreError {
    StoreError::Duplicate { entity: "airplane type", field: "name", value: name.to_string() }
}

#[async_trait]
impl FleetRepository for PgFleetRepository {
    async fn create_airplane_type(&self, name: &str) -> StoreResult<AirplaneType> {
        let row = sqlx::query_as::<_, AirplaneTypeRow>(
            "INSERT INTO airplane_types (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| if is_unique_violation(&e) { duplicate_type_name(name) } else { map_write_error(e) })?;

        Ok(row.into())
    }

    async fn get_airplane_type(&self, id: Uuid) -> StoreResult<Option<AirplaneType>> {
        let row = sqlx::query_as::<_, AirplaneTypeRow>("SELECT id, name FROM airplane_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(Into::into))
    }

    async fn list_airplane_types(&self) -> StoreResult<Vec<AirplaneType>> {
        let rows = sqlx::query_as::<_, AirplaneTypeRow>("SELECT id, name FROM airplane_types ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_airplane_type(&self, id: Uuid, name: &str) -> StoreResult<AirplaneType> {
        let row = sqlx::query_as::<_, AirplaneTypeRow>(
            "UPDATE airplane_types SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| if is_unique_violation(&e) { duplicate_type_name(name) } else { map_write_error(e) })?;

        row.map(Into::into).ok_or_else(|| StoreError::not_found("airplane type", id))
    }

    async fn delete_airplane_type(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM airplane_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("airplane type", id));
        }
        Ok(())
    }

    async fn create_airplane(&self, input: &AirplaneInput) -> StoreResult<Airplane> {
        let row = sqlx::query_as::<_, AirplaneRow>(
            r#"
            INSERT INTO airplanes (id, name, "rows", seats_in_row, airplane_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, "rows", seats_in_row, airplane_type_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.rows)
        .bind(input.seats_in_row)
        .bind(input.airplane_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn get_airplane(&self, id: Uuid) -> StoreResult<Option<AirplaneDetail>> {
        let sql = format!("{AIRPLANE_DETAIL_SELECT} WHERE a.id = $1");
        let row = sqlx::query_as::<_, AirplaneDetailRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        Ok(row.map(Into::into))
    }

    async fn list_airplanes(&self, filter: &AirplaneFilter) -> StoreResult<Vec<AirplaneDetail>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(AIRPLANE_DETAIL_SELECT);
        if let Some(type_name) = &filter.airplane_type {
            query
                .push(" WHERE t.name ILIKE '%' || ")
                .push_bind(escape_like(type_name))
                .push(" || '%'");
        }
        query.push(" ORDER BY a.name");

        let rows = query
            .build_query_as::<AirplaneDetailRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_airplane(&self, id: Uuid, input: &AirplaneInput) -> StoreResult<Airplane> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        // FOR UPDATE waits out any order transaction holding the seat map FOR SHARE.
        let current: Airplane = sqlx::query_as::<_, AirplaneRow>(
            r#"SELECT id, name, "rows", seats_in_row, airplane_type_id FROM airplanes WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?
        .ok_or_else(|| StoreError::not_found("airplane", id))?
        .into();

        if changes_seat_map(&current, input) {
            let sold = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM tickets t
                    JOIN flights f ON f.id = t.flight_id
                    WHERE f.airplane_id = $1
                )
                "#,
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(backend)?;

            if sold {
                return Err(StoreError::SeatMapLocked(id));
            }
        }

        let row = sqlx::query_as::<_, AirplaneRow>(
            r#"
            UPDATE airplanes
            SET name = $1, "rows" = $2, seats_in_row = $3, airplane_type_id = $4
            WHERE id = $5
            RETURNING id, name, "rows", seats_in_row, airplane_type_id
            "#,
        )
        .bind(&input.name)
        .bind(input.rows)
        .bind(input.seats_in_row)
        .bind(input.airplane_type_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await.map_err(backend)?;
        Ok(row.into())
    }

    async fn delete_airplane(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM airplanes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("airplane", id));
        }
        Ok(())
    }
}

fn escape_like(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_wildcards_are_escaped() {
        assert_eq!(escape_like("Boeing"), "Boeing");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
