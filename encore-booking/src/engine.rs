use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use encore_domain::{
    BookedSeat, Booking, BookingLedger, ClaimOutcome, ConcertCatalog, OccupancySnapshot, Seat,
    SeatStore, StoreError,
};
use encore_notify::OccupancyNotifier;

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("invalid booking request: {0}")]
    InvalidRequest(String),

    #[error("one or more requested seats are unavailable")]
    SeatUnavailable,

    #[error("storage failure: {0}")]
    StorageFailure(#[from] StoreError),
}

/// Orchestrates a reservation as a single all-or-nothing unit.
///
/// Seats are claimed one at a time through the store's atomic
/// compare-and-set; there is no lock spanning the request. Atomicity comes
/// from the compensating release: any seat claimed by a request that then
/// fails is released before the error is returned, so no partial booking
/// is ever observable.
pub struct ReservationEngine {
    catalog: Arc<dyn ConcertCatalog>,
    seats: Arc<dyn SeatStore>,
    ledger: Arc<dyn BookingLedger>,
    notifier: Arc<OccupancyNotifier>,
}

impl ReservationEngine {
    pub fn new(
        catalog: Arc<dyn ConcertCatalog>,
        seats: Arc<dyn SeatStore>,
        ledger: Arc<dyn BookingLedger>,
        notifier: Arc<OccupancyNotifier>,
    ) -> Self {
        Self {
            catalog,
            seats,
            ledger,
            notifier,
        }
    }

    /// Reserve the labelled seats for one concert-date on behalf of a user.
    ///
    /// On success the booking is committed to the ledger and outstanding
    /// occupancy subscriptions for the date have been re-evaluated before
    /// the booking is returned.
    pub async fn reserve(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        seat_labels: &[String],
        user_id: Uuid,
    ) -> Result<Booking, ReservationError> {
        // Cheap precondition checks before touching seat state
        if seat_labels.is_empty() {
            return Err(ReservationError::InvalidRequest(
                "no seats requested".to_string(),
            ));
        }
        if !self.catalog.is_valid_date(concert_id, date).await? {
            return Err(ReservationError::InvalidRequest(format!(
                "concert {concert_id} has no performance on {date}"
            )));
        }

        // Claim phase: one atomic test-and-set per seat
        let mut claimed: Vec<Seat> = Vec::with_capacity(seat_labels.len());
        for label in seat_labels {
            match self.seats.try_claim(concert_id, date, label).await {
                Ok(ClaimOutcome::Claimed(seat)) => claimed.push(seat),
                Ok(ClaimOutcome::AlreadyBooked) | Ok(ClaimOutcome::NotFound) => {
                    warn!(%concert_id, %date, label, "seat unavailable, rolling back claims");
                    self.release_claims(&claimed).await?;
                    return Err(ReservationError::SeatUnavailable);
                }
                Err(e) => {
                    self.release_claims(&claimed).await?;
                    return Err(ReservationError::StorageFailure(e));
                }
            }
        }

        // Commit phase
        let booking = Booking::new(
            concert_id,
            date,
            user_id,
            claimed
                .iter()
                .map(|seat| BookedSeat {
                    label: seat.label.clone(),
                    price: seat.price,
                })
                .collect(),
        );
        if let Err(e) = self.ledger.record(booking.clone()).await {
            self.release_claims(&claimed).await?;
            return Err(ReservationError::StorageFailure(e));
        }
        info!(booking_id = %booking.id, %concert_id, %date, seats = booking.seats.len(), "reservation committed");

        // Post-commit: subscriptions observe the new occupancy before the
        // caller sees success. The booking is already durable, so a failed
        // evaluation is logged rather than surfaced.
        if let Err(e) = self.notifier.notify(concert_id, date).await {
            error!(%concert_id, %date, "post-commit occupancy evaluation failed: {e}");
        }

        Ok(booking)
    }

    /// Current occupancy for a concert-date. Read-only; repeated calls with
    /// no intervening booking return identical snapshots.
    pub async fn occupancy(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<OccupancySnapshot, ReservationError> {
        if !self.catalog.is_valid_date(concert_id, date).await? {
            return Err(ReservationError::InvalidRequest(format!(
                "concert {concert_id} has no performance on {date}"
            )));
        }
        Ok(self.seats.occupancy(concert_id, date).await?)
    }

    /// Best-effort compensating release. A release that itself fails is
    /// reported as a storage failure after every remaining seat has been
    /// attempted.
    async fn release_claims(&self, claimed: &[Seat]) -> Result<(), StoreError> {
        let mut first_failure = None;
        for seat in claimed {
            if let Err(e) = self
                .seats
                .release(seat.concert_id, seat.date, &seat.label)
                .await
            {
                error!(label = %seat.label, "failed to release claimed seat: {e}");
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use encore_catalog::ConcertDirectory;
    use encore_domain::Concert;
    use encore_notify::SubscriptionRegistry;
    use encore_store::{MemoryBookingLedger, MemorySeatStore};

    struct Fixture {
        engine: Arc<ReservationEngine>,
        seats: Arc<MemorySeatStore>,
        ledger: Arc<MemoryBookingLedger>,
        registry: Arc<SubscriptionRegistry>,
        concert_id: Uuid,
        date: DateTime<Utc>,
    }

    fn fixture(total_seats: u32) -> Fixture {
        let date = Utc.with_ymd_and_hms(2026, 9, 18, 20, 0, 0).unwrap();
        let concert = Concert::new("Midnight Circuit", "mc.png", "").with_dates([date]);
        let concert_id = concert.id;

        let mut directory = ConcertDirectory::new();
        directory.add_concert(concert);
        let catalog = Arc::new(directory);

        let seats = Arc::new(MemorySeatStore::new());
        seats.insert_seats(
            (1..=total_seats)
                .map(|n| Seat {
                    label: format!("A{n}"),
                    concert_id,
                    date,
                    price: 5000,
                    booked: false,
                })
                .collect(),
        );

        let ledger = Arc::new(MemoryBookingLedger::new());
        let registry = Arc::new(SubscriptionRegistry::new());
        let notifier = Arc::new(OccupancyNotifier::new(seats.clone(), registry.clone()));
        let engine = Arc::new(ReservationEngine::new(
            catalog,
            seats.clone(),
            ledger.clone(),
            notifier,
        ));

        Fixture {
            engine,
            seats,
            ledger,
            registry,
            concert_id,
            date,
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_successful_reservation_is_committed() {
        let fx = fixture(4);
        let user_id = Uuid::new_v4();

        let booking = fx
            .engine
            .reserve(fx.concert_id, fx.date, &labels(&["A1", "A2"]), user_id)
            .await
            .unwrap();

        assert_eq!(booking.seats.len(), 2);
        assert!(fx.ledger.find(booking.id).await.unwrap().is_some());

        let snap = fx.seats.occupancy(fx.concert_id, fx.date).await.unwrap();
        assert_eq!(snap.available, 2);
        assert_eq!(snap.percent_booked, 50);
    }

    #[tokio::test]
    async fn test_empty_seat_list_is_rejected() {
        let fx = fixture(4);
        let err = fx
            .engine
            .reserve(fx.concert_id, fx.date, &[], Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_unknown_concert_and_date_are_rejected() {
        let fx = fixture(4);

        let err = fx
            .engine
            .reserve(Uuid::new_v4(), fx.date, &labels(&["A1"]), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidRequest(_)));

        let wrong_date = Utc.with_ymd_and_hms(2026, 9, 20, 20, 0, 0).unwrap();
        let err = fx
            .engine
            .reserve(fx.concert_id, wrong_date, &labels(&["A1"]), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_partial_failure_releases_claimed_seats() {
        let fx = fixture(4);

        // A3 is taken by an earlier booking
        fx.engine
            .reserve(fx.concert_id, fx.date, &labels(&["A3"]), Uuid::new_v4())
            .await
            .unwrap();

        let err = fx
            .engine
            .reserve(
                fx.concert_id,
                fx.date,
                &labels(&["A1", "A2", "A3"]),
                Uuid::new_v4(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::SeatUnavailable));

        // A1 and A2 must not stay claimed by the failed request
        let seats = fx.seats.seats_for_date(fx.concert_id, fx.date).await.unwrap();
        let booked: Vec<&str> = seats
            .iter()
            .filter(|s| s.booked)
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(booked, vec!["A3"]);
    }

    #[tokio::test]
    async fn test_nonexistent_seat_fails_whole_request() {
        let fx = fixture(2);

        let err = fx
            .engine
            .reserve(
                fx.concert_id,
                fx.date,
                &labels(&["A1", "Z9"]),
                Uuid::new_v4(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::SeatUnavailable));

        let snap = fx.seats.occupancy(fx.concert_id, fx.date).await.unwrap();
        assert_eq!(snap.available, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_disjoint_reservations_all_succeed() {
        let n = 8;
        let fx = fixture(n);

        let mut handles = Vec::new();
        for i in 1..=n {
            let engine = fx.engine.clone();
            let concert_id = fx.concert_id;
            let date = fx.date;
            handles.push(tokio::spawn(async move {
                let seat_labels = vec![format!("A{i}")];
                engine
                    .reserve(concert_id, date, &seat_labels, Uuid::new_v4())
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let snap = fx.seats.occupancy(fx.concert_id, fx.date).await.unwrap();
        assert_eq!(snap.available, 0);
        assert_eq!(snap.percent_booked, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_contested_seat_yields_one_booking() {
        let fx = fixture(1);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let engine = fx.engine.clone();
            let concert_id = fx.concert_id;
            let date = fx.date;
            handles.push(tokio::spawn(async move {
                engine
                    .reserve(concert_id, date, &labels(&["A1"]), Uuid::new_v4())
                    .await
            }));
        }

        let mut wins = 0;
        let mut losses = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(ReservationError::SeatUnavailable) => losses += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(losses, 7);
    }

    #[tokio::test]
    async fn test_commit_resolves_matching_subscription() {
        let fx = fixture(10);
        let (_, mut rx) = fx
            .registry
            .subscribe(fx.concert_id, fx.date, 50, Uuid::new_v4());

        fx.engine
            .reserve(
                fx.concert_id,
                fx.date,
                &labels(&["A1", "A2", "A3", "A4"]),
                Uuid::new_v4(),
            )
            .await
            .unwrap();
        // 40% booked: below threshold
        assert!(rx.try_recv().is_err());

        fx.engine
            .reserve(fx.concert_id, fx.date, &labels(&["A5"]), Uuid::new_v4())
            .await
            .unwrap();
        // 50% booked: resolved synchronously with the committing request
        assert_eq!(
            rx.try_recv().unwrap(),
            encore_domain::OccupancyNotification { seats_available: 5 }
        );
    }

    #[tokio::test]
    async fn test_failed_reservation_does_not_notify() {
        let fx = fixture(2);
        fx.engine
            .reserve(fx.concert_id, fx.date, &labels(&["A1"]), Uuid::new_v4())
            .await
            .unwrap();

        let (_, mut rx) = fx
            .registry
            .subscribe(fx.concert_id, fx.date, 50, Uuid::new_v4());

        // Loses the race for A1; occupancy is unchanged and no evaluation
        // resolves the subscription
        let err = fx
            .engine
            .reserve(
                fx.concert_id,
                fx.date,
                &labels(&["A1", "A2"]),
                Uuid::new_v4(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::SeatUnavailable));
        assert!(rx.try_recv().is_err());
        assert_eq!(fx.registry.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_occupancy_read_is_idempotent() {
        let fx = fixture(4);
        fx.engine
            .reserve(fx.concert_id, fx.date, &labels(&["A1"]), Uuid::new_v4())
            .await
            .unwrap();

        let first = fx.engine.occupancy(fx.concert_id, fx.date).await.unwrap();
        let second = fx.engine.occupancy(fx.concert_id, fx.date).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.percent_booked, 25);
    }
}
