use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use encore_domain::{ClaimOutcome, OccupancySnapshot, Seat, SeatStore, StoreError};

type DateKey = (Uuid, DateTime<Utc>);

struct SeatSlot {
    price: i64,
    booked: AtomicBool,
}

/// In-memory seat store. The outer map is only write-locked during seeding;
/// a claim is a lone compare-and-set on the seat's flag, so concurrent
/// requests for different seats never contend with each other.
pub struct MemorySeatStore {
    dates: RwLock<HashMap<DateKey, HashMap<String, SeatSlot>>>,
}

impl MemorySeatStore {
    pub fn new() -> Self {
        Self {
            dates: RwLock::new(HashMap::new()),
        }
    }

    /// Seed seats for their concert-dates. Existing labels are replaced.
    pub fn insert_seats(&self, seats: Vec<Seat>) {
        let mut dates = self.dates.write().expect("seat store lock poisoned");
        for seat in seats {
            dates
                .entry((seat.concert_id, seat.date))
                .or_default()
                .insert(
                    seat.label,
                    SeatSlot {
                        price: seat.price,
                        booked: AtomicBool::new(seat.booked),
                    },
                );
        }
    }
}

impl Default for MemorySeatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SeatStore for MemorySeatStore {
    async fn seats_for_date(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Seat>, StoreError> {
        let dates = self
            .dates
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut seats: Vec<Seat> = dates
            .get(&(concert_id, date))
            .map(|slots| {
                slots
                    .iter()
                    .map(|(label, slot)| Seat {
                        label: label.clone(),
                        concert_id,
                        date,
                        price: slot.price,
                        booked: slot.booked.load(Ordering::Acquire),
                    })
                    .collect()
            })
            .unwrap_or_default();
        seats.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(seats)
    }

    async fn try_claim(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        label: &str,
    ) -> Result<ClaimOutcome, StoreError> {
        let dates = self
            .dates
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let Some(slot) = dates.get(&(concert_id, date)).and_then(|s| s.get(label)) else {
            return Ok(ClaimOutcome::NotFound);
        };

        match slot
            .booked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                debug!(%concert_id, %date, label, "seat claimed");
                Ok(ClaimOutcome::Claimed(Seat {
                    label: label.to_string(),
                    concert_id,
                    date,
                    price: slot.price,
                    booked: true,
                }))
            }
            Err(_) => Ok(ClaimOutcome::AlreadyBooked),
        }
    }

    async fn release(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        label: &str,
    ) -> Result<(), StoreError> {
        let dates = self
            .dates
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let slot = dates
            .get(&(concert_id, date))
            .and_then(|s| s.get(label))
            .ok_or_else(|| StoreError::NotFound(format!("seat {label}")))?;

        slot.booked.store(false, Ordering::Release);
        debug!(%concert_id, %date, label, "seat released");
        Ok(())
    }

    async fn occupancy(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<OccupancySnapshot, StoreError> {
        let dates = self
            .dates
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let (total, available) = dates
            .get(&(concert_id, date))
            .map(|slots| {
                let total = slots.len() as u32;
                let available = slots
                    .values()
                    .filter(|slot| !slot.booked.load(Ordering::Acquire))
                    .count() as u32;
                (total, available)
            })
            .unwrap_or((0, 0));

        Ok(OccupancySnapshot::compute(total, available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn seeded_store(concert_id: Uuid, date: DateTime<Utc>, labels: &[&str]) -> MemorySeatStore {
        let store = MemorySeatStore::new();
        store.insert_seats(
            labels
                .iter()
                .map(|label| Seat {
                    label: label.to_string(),
                    concert_id,
                    date,
                    price: 5000,
                    booked: false,
                })
                .collect(),
        );
        store
    }

    fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 18, 20, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_claim_is_one_shot_until_released() {
        let concert_id = Uuid::new_v4();
        let date = test_date();
        let store = seeded_store(concert_id, date, &["A1"]);

        let first = store.try_claim(concert_id, date, "A1").await.unwrap();
        assert!(matches!(first, ClaimOutcome::Claimed(_)));

        let second = store.try_claim(concert_id, date, "A1").await.unwrap();
        assert_eq!(second, ClaimOutcome::AlreadyBooked);

        store.release(concert_id, date, "A1").await.unwrap();
        let third = store.try_claim(concert_id, date, "A1").await.unwrap();
        assert!(matches!(third, ClaimOutcome::Claimed(_)));
    }

    #[tokio::test]
    async fn test_unknown_seat_and_date() {
        let concert_id = Uuid::new_v4();
        let date = test_date();
        let store = seeded_store(concert_id, date, &["A1"]);

        let missing = store.try_claim(concert_id, date, "Z9").await.unwrap();
        assert_eq!(missing, ClaimOutcome::NotFound);

        let other_date = Utc.with_ymd_and_hms(2026, 9, 19, 20, 0, 0).unwrap();
        let missing = store.try_claim(concert_id, other_date, "A1").await.unwrap();
        assert_eq!(missing, ClaimOutcome::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_contested_seat_has_exactly_one_winner() {
        let concert_id = Uuid::new_v4();
        let date = test_date();
        let store = Arc::new(seeded_store(concert_id, date, &["A1"]));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.try_claim(concert_id, date, "A1").await.unwrap()
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), ClaimOutcome::Claimed(_)) {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn test_occupancy_tracks_claims() {
        let concert_id = Uuid::new_v4();
        let date = test_date();
        let store = seeded_store(concert_id, date, &["A1", "A2", "A3", "A4"]);

        store.try_claim(concert_id, date, "A1").await.unwrap();
        let snap = store.occupancy(concert_id, date).await.unwrap();
        assert_eq!(snap.total, 4);
        assert_eq!(snap.available, 3);
        assert_eq!(snap.percent_booked, 25);

        // Idempotent with no intervening claim
        let again = store.occupancy(concert_id, date).await.unwrap();
        assert_eq!(snap, again);
    }

    #[tokio::test]
    async fn test_occupancy_of_unseeded_date_is_zero() {
        let store = MemorySeatStore::new();
        let snap = store
            .occupancy(Uuid::new_v4(), test_date())
            .await
            .unwrap();
        assert_eq!(snap.total, 0);
        assert_eq!(snap.percent_booked, 0);
    }
}
