use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::booking::Booking;
use crate::concert::{Concert, Performer};
use crate::seat::{OccupancySnapshot, Seat};
use crate::user::User;

/// Errors surfaced by the storage collaborators. Backend failures are
/// reported to the caller as-is; nothing here retries.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Result of an atomic seat claim attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// The claim won the seat; carries the seat as it was claimed
    Claimed(Seat),
    /// Another booking already holds the seat
    AlreadyBooked,
    /// No such seat exists for the concert-date
    NotFound,
}

/// Durable per-date seat records with an atomic per-seat claim.
///
/// `try_claim` is the only way a seat's booked flag transitions false ->
/// true, and the transition is a single compare-and-set: two racing claims
/// for the same seat cannot both observe `Claimed`.
#[async_trait]
pub trait SeatStore: Send + Sync {
    async fn seats_for_date(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Seat>, StoreError>;

    async fn try_claim(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        label: &str,
    ) -> Result<ClaimOutcome, StoreError>;

    /// Compensating release for a claim made earlier in the same request
    async fn release(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        label: &str,
    ) -> Result<(), StoreError>;

    async fn occupancy(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<OccupancySnapshot, StoreError>;
}

/// Persists committed bookings
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn record(&self, booking: Booking) -> Result<(), StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, StoreError>;
}

/// Read-only concert/performer catalogue
#[async_trait]
pub trait ConcertCatalog: Send + Sync {
    async fn concert(&self, id: Uuid) -> Result<Option<Concert>, StoreError>;

    async fn concerts(&self) -> Result<Vec<Concert>, StoreError>;

    async fn performer(&self, id: Uuid) -> Result<Option<Performer>, StoreError>;

    async fn performers(&self) -> Result<Vec<Performer>, StoreError>;

    /// Whether the concert exists and `date` is one of its performances
    async fn is_valid_date(&self, concert_id: Uuid, date: DateTime<Utc>) -> Result<bool, StoreError>;
}

/// Account lookup and credential check
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the user when the username/password pair is valid
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<Option<User>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}
