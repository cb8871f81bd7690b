use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use encore_domain::{OccupancyNotification, SeatStore, StoreError};

use crate::registry::SubscriptionRegistry;

/// Re-evaluates outstanding subscriptions against current occupancy.
///
/// Evaluation is pull-on-write: it runs once per committed reservation for
/// the affected concert-date. Occupancy never decreases, so an entry that
/// does not match now cannot match until another booking lands.
pub struct OccupancyNotifier {
    seats: Arc<dyn SeatStore>,
    registry: Arc<SubscriptionRegistry>,
}

impl OccupancyNotifier {
    pub fn new(seats: Arc<dyn SeatStore>, registry: Arc<SubscriptionRegistry>) -> Self {
        Self { seats, registry }
    }

    /// Compute occupancy for the concert-date and resolve every matching
    /// subscription with the seats still available at computation time.
    pub async fn notify(&self, concert_id: Uuid, date: DateTime<Utc>) -> Result<(), StoreError> {
        let snapshot = self.seats.occupancy(concert_id, date).await?;
        let matched =
            self.registry
                .take_matching(concert_id, date, snapshot.percent_booked);

        if matched.is_empty() {
            return Ok(());
        }

        info!(
            %concert_id,
            %date,
            percent_booked = snapshot.percent_booked,
            resolved = matched.len(),
            "occupancy threshold reached"
        );
        let notification = OccupancyNotification {
            seats_available: snapshot.available,
        };
        for subscription in matched {
            if !subscription.resolve(notification) {
                debug!(%concert_id, %date, "subscriber dropped before delivery");
            }
        }
        Ok(())
    }
}
