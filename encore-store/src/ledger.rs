use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use encore_domain::{Booking, BookingLedger, StoreError};

/// In-memory booking ledger. Bookings are append-only; there is no update
/// or delete path.
pub struct MemoryBookingLedger {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl MemoryBookingLedger {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBookingLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingLedger for MemoryBookingLedger {
    async fn record(&self, booking: Booking) -> Result<(), StoreError> {
        let mut bookings = self
            .bookings
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        info!(booking_id = %booking.id, seats = booking.seats.len(), "booking recorded");
        bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let bookings = self
            .bookings
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(bookings.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError> {
        let bookings = self
            .bookings
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let mut owned: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|b| b.created_at);
        Ok(owned)
    }
}
