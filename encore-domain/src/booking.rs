use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A committed reservation: a non-empty seat set for one concert-date,
/// owned by one user. Seat sets of different bookings for the same date
/// never overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub concert_id: Uuid,
    pub date: DateTime<Utc>,
    pub user_id: Uuid,
    pub seats: Vec<BookedSeat>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(concert_id: Uuid, date: DateTime<Utc>, user_id: Uuid, seats: Vec<BookedSeat>) -> Self {
        Self {
            id: Uuid::new_v4(),
            concert_id,
            date,
            user_id,
            seats,
            created_at: Utc::now(),
        }
    }
}

/// Seat view carried on a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSeat {
    pub label: String,
    pub price: i64,
}

/// Incoming reservation request
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub concert_id: Uuid,
    pub date: DateTime<Utc>,
    pub seat_labels: Vec<String>,
}
