use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skyport_core::filters::OrderFilter;
use skyport_core::models::{Airplane, Order, Ticket, TicketRequest};
use skyport_core::repository::OrderRepository;
use skyport_core::{validate_seat, StoreError, StoreResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::{backend, is_unique_violation, map_write_error};
use crate::fleet_repo::AirplaneRow;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    order_id: Uuid,
    flight_id: Uuid,
    row: i32,
    seat: i32,
}

impl From<TicketRow> for Ticket {
    fn from(row: TicketRow) -> Self {
        Ticket { id: row.id, order_id: row.order_id, flight_id: row.flight_id, row: row.row, seat: row.seat }
    }
}

impl PgOrderRepository {
    async fn attach_tickets(&self, rows: Vec<OrderRow>) -> StoreResult<Vec<Order>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let tickets = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT id, order_id, flight_id, "row", seat
            FROM tickets
            WHERE order_id = ANY($1)
            ORDER BY "row", seat
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        let mut by_order: HashMap<Uuid, Vec<Ticket>> = HashMap::new();
        for ticket in tickets {
            by_order.entry(ticket.order_id).or_default().push(ticket.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Order {
                id: row.id,
                user_id: row.user_id,
                created_at: row.created_at,
                tickets: by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, user_id: Uuid, tickets: &[TicketRequest]) -> StoreResult<Order> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let order = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (id, user_id) VALUES ($1, $2) RETURNING id, user_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(backend)?;

        // Lock every seat map involved before checking bounds. FOR SHARE keeps
        // concurrent orders parallel while blocking airplane updates.
        let mut airplanes: HashMap<Uuid, Airplane> = HashMap::new();
        for request in tickets {
            if airplanes.contains_key(&request.flight_id) {
                continue;
            }
            let airplane: Airplane = sqlx::query_as::<_, AirplaneRow>(
                r#"
                SELECT a.id, a.name, a."rows", a.seats_in_row, a.airplane_type_id
                FROM flights f
                JOIN airplanes a ON a.id = f.airplane_id
                WHERE f.id = $1
                FOR SHARE OF f, a
                "#,
            )
            .bind(request.flight_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::not_found("flight", request.flight_id))?
            .into();
            airplanes.insert(request.flight_id, airplane);
        }

        for request in tickets {
            if let Some(airplane) = airplanes.get(&request.flight_id) {
                validate_seat(request.row, request.seat, airplane)
                    .map_err(|source| StoreError::SeatOutOfRange { flight_id: request.flight_id, source })?;
            }
        }

        // A fixed insert order means two orders contending for the same seats
        // wait on each other instead of deadlocking.
        let mut ordered: Vec<&TicketRequest> = tickets.iter().collect();
        ordered.sort_by_key(|t| (t.flight_id, t.row, t.seat));

        let mut created = Vec::with_capacity(tickets.len());
        for request in ordered {
            let ticket = sqlx::query_as::<_, TicketRow>(
                r#"
                INSERT INTO tickets (id, order_id, flight_id, "row", seat)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, flight_id, "row", seat
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order.id)
            .bind(request.flight_id)
            .bind(request.row)
            .bind(request.seat)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::SeatTaken { flight_id: request.flight_id, row: request.row, seat: request.seat }
                } else {
                    map_write_error(e)
                }
            })?;
            created.push(Ticket::from(ticket));
        }

        tx.commit().await.map_err(backend)?;

        created.sort_by_key(|t| (t.row, t.seat));
        Ok(Order { id: order.id, user_id: order.user_id, created_at: order.created_at, tickets: created })
    }

    async fn get_order(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, created_at FROM orders WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_tickets(vec![row]).await?.pop())
    }

    async fn list_orders(&self, user_id: Uuid, filter: &OrderFilter) -> StoreResult<Vec<Order>> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT id, user_id, created_at FROM orders WHERE user_id = ");
        query.push_bind(user_id);
        if let Some(created_at) = filter.created_at {
            query.push(" AND created_at = ").push_bind(created_at);
        }
        query.push(" ORDER BY created_at DESC, id");

        let rows = query
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        self.attach_tickets(rows).await
    }
}
