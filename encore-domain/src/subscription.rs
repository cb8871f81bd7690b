use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to be told when a concert-date reaches a booking threshold.
///
/// The threshold is taken literally: a value above 100 never matches and a
/// value at or below zero matches on the next booking for the date.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub concert_id: Uuid,
    pub date: DateTime<Utc>,
    pub percentage_booked: i32,
}

/// Payload delivered exactly once when a subscription's threshold is met
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccupancyNotification {
    pub seats_available: u32,
}
