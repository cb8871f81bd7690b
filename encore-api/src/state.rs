use std::sync::Arc;

use encore_booking::ReservationEngine;
use encore_domain::{BookingLedger, ConcertCatalog, SeatStore, UserDirectory};
use encore_notify::SubscriptionRegistry;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ConcertCatalog>,
    pub seats: Arc<dyn SeatStore>,
    pub ledger: Arc<dyn BookingLedger>,
    pub users: Arc<dyn UserDirectory>,
    pub engine: Arc<ReservationEngine>,
    pub registry: Arc<SubscriptionRegistry>,
    pub auth: AuthConfig,
}
