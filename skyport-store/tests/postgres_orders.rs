//! Runs against a real PostgreSQL instance:
//! `DATABASE_URL=postgres://... cargo test -p skyport-store -- --ignored`

use chrono::{Duration, Utc};
use skyport_core::models::{AirplaneInput, AirportInput, FlightInput, RouteInput, TicketRequest};
use skyport_core::StoreError;
use skyport_store::app_config::DatabaseConfig;
use skyport_store::{postgres_repositories, DbClient};
use uuid::Uuid;

async fn connect() -> DbClient {
    let config = DatabaseConfig {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
        max_connections: 10,
        acquire_timeout_seconds: 5,
        run_migrations: true,
    };
    let db = DbClient::new(&config).await.expect("Failed to connect");
    db.migrate().await.expect("Failed to migrate");
    db
}

#[tokio::test]
#[ignore]
async fn test_concurrent_orders_for_one_seat() {
    let db = connect().await;
    let repos = postgres_repositories(db.pool.clone());

    let airplane_type = repos
        .fleet
        .create_airplane_type(&format!("Regional {}", Uuid::new_v4()))
        .await
        .unwrap();
    let airplane = repos
        .fleet
        .create_airplane(&AirplaneInput {
            name: "Embraer 190".into(),
            rows: 2,
            seats_in_row: 2,
            airplane_type_id: airplane_type.id,
        })
        .await
        .unwrap();
    let source = repos
        .airports
        .create_airport(&AirportInput { name: "Lviv".into(), closest_big_city: "Lviv".into() })
        .await
        .unwrap();
    let destination = repos
        .airports
        .create_airport(&AirportInput { name: "Okecie".into(), closest_big_city: "Warsaw".into() })
        .await
        .unwrap();
    let route = repos
        .routes
        .create_route(&RouteInput { source_id: source.id, destination_id: destination.id, distance: 340 })
        .await
        .unwrap();
    let departure = Utc::now();
    let flight = repos
        .flights
        .create_flight(&FlightInput {
            route_id: route.id,
            airplane_id: airplane.id,
            crew_ids: vec![],
            departure_time: departure,
            arrival_time: departure + Duration::hours(1),
        })
        .await
        .unwrap();

    let request = [TicketRequest { flight_id: flight.id, row: 2, seat: 1 }];
    let mut handles = Vec::new();
    for _ in 0..8 {
        let orders = repos.orders.clone();
        handles.push(tokio::spawn(async move { orders.create_order(Uuid::new_v4(), &request).await }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(StoreError::SeatTaken { row: 2, seat: 1, .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(succeeded, 1);

    let record = repos.flights.get_flight(flight.id).await.unwrap().unwrap();
    assert_eq!(record.tickets_sold, 1);

    repos.airports.delete_airport(source.id).await.unwrap();
    repos.airports.delete_airport(destination.id).await.unwrap();
    repos.fleet.delete_airplane_type(airplane_type.id).await.unwrap();
}
