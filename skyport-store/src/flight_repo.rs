use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_core::filters::FlightFilter;
use skyport_core::models::{Airplane, Airport, Crew, Flight, FlightInput, FlightRecord, Route, RouteDetail, SeatRef};
use skyport_core::repository::FlightRepository;
use skyport_core::{StoreError, StoreResult};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::errors::{backend, map_write_error};

pub struct PgFlightRepository {
    pool: PgPool,
}

impl PgFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    route_id: Uuid,
    airplane_id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            route_id: row.route_id,
            airplane_id: row.airplane_id,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
        }
    }
}

/// One flight joined with its route, both airports and the airplane.
#[derive(sqlx::FromRow)]
struct FlightRecordRow {
    id: Uuid,
    route_id: Uuid,
    airplane_id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    source_id: Uuid,
    destination_id: Uuid,
    distance: i32,
    source_name: String,
    source_city: String,
    destination_name: String,
    destination_city: String,
    airplane_name: String,
    rows: i32,
    seats_in_row: i32,
    airplane_type_id: Uuid,
    tickets_sold: i64,
}

impl FlightRecordRow {
    fn into_record(self, crews: Vec<Crew>) -> FlightRecord {
        FlightRecord {
            flight: Flight {
                id: self.id,
                route_id: self.route_id,
                airplane_id: self.airplane_id,
                departure_time: self.departure_time,
                arrival_time: self.arrival_time,
            },
            route: RouteDetail {
                route: Route {
                    id: self.route_id,
                    source_id: self.source_id,
                    destination_id: self.destination_id,
                    distance: self.distance,
                },
                source: Airport { id: self.source_id, name: self.source_name, closest_big_city: self.source_city },
                destination: Airport {
                    id: self.destination_id,
                    name: self.destination_name,
                    closest_big_city: self.destination_city,
                },
            },
            airplane: Airplane {
                id: self.airplane_id,
                name: self.airplane_name,
                rows: self.rows,
                seats_in_row: self.seats_in_row,
                airplane_type_id: self.airplane_type_id,
            },
            crews,
            tickets_sold: self.tickets_sold,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FlightCrewRow {
    flight_id: Uuid,
    id: Uuid,
    first_name: String,
    last_name: String,
}

#[derive(sqlx::FromRow)]
struct SeatRow {
    row: i32,
    seat: i32,
}

const FLIGHT_RECORD_SELECT: &str = r#"
    SELECT f.id, f.route_id, f.airplane_id, f.departure_time, f.arrival_time,
           r.source_id, r.destination_id, r.distance,
           s.name AS source_name, s.closest_big_city AS source_city,
           d.name AS destination_name, d.closest_big_city AS destination_city,
           a.name AS airplane_name, a."rows", a.seats_in_row, a.airplane_type_id,
           (SELECT COUNT(*) FROM tickets t WHERE t.flight_id = f.id) AS tickets_sold
    FROM flights f
    JOIN routes r ON r.id = f.route_id
    JOIN airports s ON s.id = r.source_id
    JOIN airports d ON d.id = r.destination_id
    JOIN airplanes a ON a.id = f.airplane_id
"#;

impl PgFlightRepository {
    /// Loads crews for a batch of flights in one query.
    async fn crews_by_flight(&self, flight_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<Crew>>> {
        if flight_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, FlightCrewRow>(
            r#"
            SELECT fc.flight_id, c.id, c.first_name, c.last_name
            FROM flight_crews fc
            JOIN crews c ON c.id = fc.crew_id
            WHERE fc.flight_id = ANY($1)
            ORDER BY c.first_name, c.last_name
            "#,
        )
        .bind(flight_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut crews: HashMap<Uuid, Vec<Crew>> = HashMap::new();
        for row in rows {
            crews.entry(row.flight_id).or_default().push(Crew {
                id: row.id,
                first_name: row.first_name,
                last_name: row.last_name,
            });
        }
        Ok(crews)
    }

    async fn assign_crews(tx: &mut Transaction<'_, Postgres>, flight_id: Uuid, crew_ids: &[Uuid]) -> StoreResult<()> {
        for crew_id in crew_ids {
            sqlx::query("INSERT INTO flight_crews (flight_id, crew_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(flight_id)
                .bind(crew_id)
                .execute(&mut **tx)
                .await
                .map_err(map_write_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl FlightRepository for PgFlightRepository {
    async fn create_flight(&self, input: &FlightInput) -> StoreResult<Flight> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            INSERT INTO flights (id, route_id, airplane_id, departure_time, arrival_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, route_id, airplane_id, departure_time, arrival_time
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.route_id)
        .bind(input.airplane_id)
        .bind(input.departure_time)
        .bind(input.arrival_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        Self::assign_crews(&mut tx, row.id, &input.crew_ids).await?;

        tx.commit().await.map_err(backend)?;
        Ok(row.into())
    }

    async fn get_flight(&self, id: Uuid) -> StoreResult<Option<FlightRecord>> {
        let sql = format!("{FLIGHT_RECORD_SELECT} WHERE f.id = $1");
        let Some(row) = sqlx::query_as::<_, FlightRecordRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
        else {
            return Ok(None);
        };

        let mut crews = self.crews_by_flight(&[id]).await?;
        Ok(Some(row.into_record(crews.remove(&id).unwrap_or_default())))
    }

    async fn list_flights(&self, filter: &FlightFilter) -> StoreResult<Vec<FlightRecord>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(FLIGHT_RECORD_SELECT);
        query.push(" WHERE TRUE");
        if let Some((source, destination)) = filter.route {
            query.push(" AND r.source_id = ").push_bind(source);
            query.push(" AND r.destination_id = ").push_bind(destination);
        }
        if let Some(departure) = filter.departure_time {
            query.push(" AND f.departure_time = ").push_bind(departure);
        }
        if let Some(airplane_id) = filter.airplane_id {
            query.push(" AND f.airplane_id = ").push_bind(airplane_id);
        }
        query.push(" ORDER BY f.departure_time, f.id");

        let rows = query
            .build_query_as::<FlightRecordRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut crews = self.crews_by_flight(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let flight_crews = crews.remove(&row.id).unwrap_or_default();
                row.into_record(flight_crews)
            })
            .collect())
    }

    async fn update_flight(&self, id: Uuid, input: &FlightInput) -> StoreResult<Flight> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let current_airplane = sqlx::query_scalar::<_, Uuid>("SELECT airplane_id FROM flights WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("flight", id))?;

        // Sold tickets are bound to the current airplane's seat map.
        if current_airplane != input.airplane_id {
            let sold = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM tickets WHERE flight_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await
                .map_err(backend)?;
            if sold {
                return Err(StoreError::SeatMapLocked(current_airplane));
            }
        }

        let row = sqlx::query_as::<_, FlightRow>(
            r#"
            UPDATE flights
            SET route_id = $1, airplane_id = $2, departure_time = $3, arrival_time = $4
            WHERE id = $5
            RETURNING id, route_id, airplane_id, departure_time, arrival_time
            "#,
        )
        .bind(input.route_id)
        .bind(input.airplane_id)
        .bind(input.departure_time)
        .bind(input.arrival_time)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        sqlx::query("DELETE FROM flight_crews WHERE flight_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        Self::assign_crews(&mut tx, id, &input.crew_ids).await?;

        tx.commit().await.map_err(backend)?;
        Ok(row.into())
    }

    async fn delete_flight(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("flight", id));
        }
        Ok(())
    }

    async fn taken_seats(&self, flight_id: Uuid) -> StoreResult<Vec<SeatRef>> {
        let rows = sqlx::query_as::<_, SeatRow>(
            r#"SELECT "row", seat FROM tickets WHERE flight_id = $1 ORDER BY "row", seat"#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(|r| SeatRef { row: r.row, seat: r.seat }).collect())
    }
}
