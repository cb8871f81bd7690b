use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single seat for one concert-date. The label is unique within the
/// concert-date; `booked` only ever transitions false -> true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub label: String,
    pub concert_id: Uuid,
    pub date: DateTime<Utc>,
    /// Price in minor currency units
    pub price: i64,
    pub booked: bool,
}

/// Filter used by the seats-for-date listing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeatStatusFilter {
    #[default]
    Any,
    Booked,
    Unbooked,
}

impl SeatStatusFilter {
    pub fn matches(&self, booked: bool) -> bool {
        match self {
            SeatStatusFilter::Any => true,
            SeatStatusFilter::Booked => booked,
            SeatStatusFilter::Unbooked => !booked,
        }
    }
}

/// Point-in-time occupancy for one concert-date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccupancySnapshot {
    pub total: u32,
    pub available: u32,
    pub percent_booked: i32,
}

impl OccupancySnapshot {
    /// Integer-truncated share of booked seats; 0 when the date has no seats
    pub fn compute(total: u32, available: u32) -> Self {
        let percent_booked = if total == 0 {
            0
        } else {
            (((total - available) as i64 * 100) / total as i64) as i32
        };
        Self {
            total,
            available,
            percent_booked,
        }
    }
}
