use chrono::{TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

use encore_domain::{Concert, Genre, Performer, Seat, User};

use crate::directory::ConcertDirectory;

/// Venue layout used to generate a seat map for each concert-date. Rows are
/// labelled A, B, C... front to back; front rows carry the price premium.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatPlan {
    pub rows: u32,
    pub seats_per_row: u32,
    /// Price of a back-row seat, minor units
    pub base_price: i64,
    /// Premium added per row moving toward the stage
    pub row_price_step: i64,
}

impl SeatPlan {
    /// Generate the full unbooked seat map for one concert-date
    pub fn seats_for(&self, concert_id: Uuid, date: chrono::DateTime<Utc>) -> Vec<Seat> {
        let mut seats = Vec::with_capacity((self.rows * self.seats_per_row) as usize);
        for row in 0..self.rows {
            let row_letter = (b'A' + (row % 26) as u8) as char;
            let price = self.base_price + self.row_price_step * (self.rows - 1 - row) as i64;
            for number in 1..=self.seats_per_row {
                seats.push(Seat {
                    label: format!("{}{}", row_letter, number),
                    concert_id,
                    date,
                    price,
                    booked: false,
                });
            }
        }
        seats
    }
}

/// Everything the service needs at startup: the catalogue plus demo users
pub struct SeedData {
    pub directory: ConcertDirectory,
    pub users: Vec<User>,
}

/// Demo catalogue mirroring a small venue's programme
pub fn demo_catalogue() -> SeedData {
    let mut directory = ConcertDirectory::new();

    let aurora = Performer::new(
        "Aurora Vale",
        "aurora_vale.png",
        Genre::Pop,
        "Synth-pop headliner touring her third record.",
    );
    let brass = Performer::new(
        "Brass Monarchs",
        "brass_monarchs.png",
        Genre::RhythmAndBlues,
        "Eight-piece horn section with a standing-room reputation.",
    );
    let quartet = Performer::new(
        "Meridian Quartet",
        "meridian_quartet.png",
        Genre::Classical,
        "String quartet in residence at the Pavilion.",
    );

    let midnight = Concert::new(
        "Midnight Circuit",
        "midnight_circuit.png",
        "One stage, two nights, no support acts.",
    )
    .with_dates([
        Utc.with_ymd_and_hms(2026, 9, 18, 20, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 9, 19, 20, 0, 0).unwrap(),
    ])
    .with_performers([aurora.id]);

    let harbour = Concert::new(
        "Harbour Lights Revue",
        "harbour_lights.png",
        "The Monarchs close the summer season.",
    )
    .with_dates([Utc.with_ymd_and_hms(2026, 10, 2, 19, 30, 0).unwrap()])
    .with_performers([brass.id, aurora.id]);

    let chamber = Concert::new(
        "Chamber Sessions",
        "chamber_sessions.png",
        "An evening of Ravel and Debussy.",
    )
    .with_dates([Utc.with_ymd_and_hms(2026, 11, 7, 18, 0, 0).unwrap()])
    .with_performers([quartet.id]);

    directory.add_performer(aurora);
    directory.add_performer(brass);
    directory.add_performer(quartet);
    directory.add_concert(midnight);
    directory.add_concert(harbour);
    directory.add_concert(chamber);

    let users = vec![
        User::new("testuser", "pa55word"),
        User::new("testuser2", "pa55word2"),
    ];

    SeedData { directory, users }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_plan_generates_full_map() {
        let plan = SeatPlan {
            rows: 3,
            seats_per_row: 4,
            base_price: 4500,
            row_price_step: 1500,
        };
        let date = Utc.with_ymd_and_hms(2026, 9, 18, 20, 0, 0).unwrap();
        let concert_id = Uuid::new_v4();

        let seats = plan.seats_for(concert_id, date);
        assert_eq!(seats.len(), 12);
        assert_eq!(seats[0].label, "A1");
        assert_eq!(seats[11].label, "C4");

        // Row A carries the largest premium
        assert_eq!(seats[0].price, 4500 + 2 * 1500);
        assert_eq!(seats[11].price, 4500);
        assert!(seats.iter().all(|s| !s.booked));
    }

    #[test]
    fn test_demo_catalogue_shape() {
        let seed = demo_catalogue();
        assert_eq!(seed.directory.concert_count(), 3);
        assert_eq!(seed.users.len(), 2);
    }
}
