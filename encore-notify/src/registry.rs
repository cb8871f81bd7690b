use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::debug;
use uuid::Uuid;

use encore_domain::OccupancyNotification;

type DateKey = (Uuid, DateTime<Utc>);

/// A live threshold subscription. The registry owns the entry until an
/// occupancy evaluation matches it, at which point the whole entry (and
/// with it the delivery handle) is handed to the caller; it can never be
/// matched again.
pub struct PendingSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub threshold_percent: i32,
    tx: oneshot::Sender<OccupancyNotification>,
}

impl PendingSubscription {
    /// One-shot delivery. Returns false when the subscriber went away
    /// before resolution.
    pub fn resolve(self, notification: OccupancyNotification) -> bool {
        self.tx.send(notification).is_ok()
    }
}

/// Outstanding threshold subscriptions, grouped per concert-date.
///
/// Insert and match-and-remove both run under one short-held lock, so an
/// entry matched by one evaluation is gone before any later evaluation
/// looks; delivery itself happens after the lock is released.
pub struct SubscriptionRegistry {
    entries: Mutex<HashMap<DateKey, Vec<PendingSubscription>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a subscription and return the receiving half of its handle.
    /// The threshold is stored as given; out-of-range values are legal and
    /// simply match never (above 100) or on the next evaluation (0 and
    /// below).
    pub fn subscribe(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        threshold_percent: i32,
        user_id: Uuid,
    ) -> (Uuid, oneshot::Receiver<OccupancyNotification>) {
        let (tx, rx) = oneshot::channel();
        let id = Uuid::new_v4();
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        entries.entry((concert_id, date)).or_default().push(PendingSubscription {
            id,
            user_id,
            threshold_percent,
            tx,
        });
        debug!(%concert_id, %date, threshold_percent, "subscription registered");
        (id, rx)
    }

    /// Remove every entry for the concert-date whose threshold the given
    /// occupancy meets, and hand them back for delivery.
    pub fn take_matching(
        &self,
        concert_id: Uuid,
        date: DateTime<Utc>,
        percent_booked: i32,
    ) -> Vec<PendingSubscription> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        let Some(pending) = entries.get_mut(&(concert_id, date)) else {
            return Vec::new();
        };

        let mut matched = Vec::new();
        let mut kept = Vec::new();
        for sub in pending.drain(..) {
            if percent_booked >= sub.threshold_percent {
                matched.push(sub);
            } else {
                kept.push(sub);
            }
        }
        *pending = kept;
        if pending.is_empty() {
            entries.remove(&(concert_id, date));
        }
        matched
    }

    /// Drop a single subscription, e.g. when its client disconnects before
    /// resolution. Safe to call for an already-resolved id.
    pub fn remove(&self, concert_id: Uuid, date: DateTime<Utc>, id: Uuid) -> bool {
        let mut entries = self.entries.lock().expect("registry lock poisoned");
        let Some(pending) = entries.get_mut(&(concert_id, date)) else {
            return false;
        };
        let before = pending.len();
        pending.retain(|sub| sub.id != id);
        let removed = pending.len() < before;
        if pending.is_empty() {
            entries.remove(&(concert_id, date));
        }
        removed
    }

    pub fn pending_count(&self) -> usize {
        let entries = self.entries.lock().expect("registry lock poisoned");
        entries.values().map(Vec::len).sum()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 2, 19, 30, 0).unwrap()
    }

    #[test]
    fn test_match_removes_entry() {
        let registry = SubscriptionRegistry::new();
        let concert_id = Uuid::new_v4();
        let date = test_date();

        let (_, mut rx) = registry.subscribe(concert_id, date, 50, Uuid::new_v4());
        assert_eq!(registry.pending_count(), 1);

        // Below threshold: entry stays
        assert!(registry.take_matching(concert_id, date, 40).is_empty());
        assert_eq!(registry.pending_count(), 1);

        // At threshold: entry is taken, and only once
        let matched = registry.take_matching(concert_id, date, 50);
        assert_eq!(matched.len(), 1);
        assert_eq!(registry.pending_count(), 0);
        assert!(registry.take_matching(concert_id, date, 90).is_empty());

        for sub in matched {
            assert!(sub.resolve(OccupancyNotification { seats_available: 5 }));
        }
        assert_eq!(
            rx.try_recv().unwrap(),
            OccupancyNotification { seats_available: 5 }
        );
    }

    #[test]
    fn test_dates_are_independent() {
        let registry = SubscriptionRegistry::new();
        let concert_id = Uuid::new_v4();
        let other_date = Utc.with_ymd_and_hms(2026, 10, 3, 19, 30, 0).unwrap();

        registry.subscribe(concert_id, test_date(), 10, Uuid::new_v4());
        registry.subscribe(concert_id, other_date, 10, Uuid::new_v4());

        let matched = registry.take_matching(concert_id, test_date(), 99);
        assert_eq!(matched.len(), 1);
        assert_eq!(registry.pending_count(), 1);
    }

    #[test]
    fn test_remove_on_disconnect() {
        let registry = SubscriptionRegistry::new();
        let concert_id = Uuid::new_v4();
        let date = test_date();

        let (id, rx) = registry.subscribe(concert_id, date, 50, Uuid::new_v4());
        drop(rx);

        assert!(registry.remove(concert_id, date, id));
        assert!(!registry.remove(concert_id, date, id));
        assert_eq!(registry.pending_count(), 0);
    }
}
