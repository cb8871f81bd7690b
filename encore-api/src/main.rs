use std::net::SocketAddr;
use std::sync::Arc;

use encore_api::{
    app,
    state::{AppState, AuthConfig},
};
use encore_booking::ReservationEngine;
use encore_catalog::{demo_catalogue, SeatPlan};
use encore_domain::ConcertCatalog;
use encore_notify::{OccupancyNotifier, SubscriptionRegistry};
use encore_store::{MemoryBookingLedger, MemorySeatStore, MemoryUserDirectory};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = encore_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Encore API on port {}", config.server.port);

    // Demo catalogue and accounts
    let seed = demo_catalogue();
    let catalog: Arc<dyn ConcertCatalog> = Arc::new(seed.directory);
    let users = Arc::new(MemoryUserDirectory::new(seed.users));

    // Generate a seat map for every performance in the catalogue
    let seats = Arc::new(MemorySeatStore::new());
    let plan = SeatPlan {
        rows: config.venue.rows,
        seats_per_row: config.venue.seats_per_row,
        base_price: config.venue.base_price,
        row_price_step: config.venue.row_price_step,
    };
    let concerts = catalog.concerts().await.expect("catalogue unavailable");
    for concert in &concerts {
        for date in &concert.dates {
            seats.insert_seats(plan.seats_for(concert.id, *date));
        }
    }
    tracing::info!(
        concerts = concerts.len(),
        seats_per_date = plan.rows * plan.seats_per_row,
        "seat maps seeded"
    );

    let ledger = Arc::new(MemoryBookingLedger::new());
    let registry = Arc::new(SubscriptionRegistry::new());
    let notifier = Arc::new(OccupancyNotifier::new(seats.clone(), registry.clone()));
    let engine = Arc::new(ReservationEngine::new(
        catalog.clone(),
        seats.clone(),
        ledger.clone(),
        notifier,
    ));

    let app_state = AppState {
        catalog,
        seats,
        ledger,
        users,
        engine,
        registry,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
