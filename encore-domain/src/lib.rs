pub mod booking;
pub mod concert;
pub mod repository;
pub mod seat;
pub mod subscription;
pub mod user;

pub use booking::{Booking, BookedSeat, BookingRequest};
pub use concert::{Concert, ConcertSummary, Genre, Performer};
pub use repository::{
    BookingLedger, ClaimOutcome, ConcertCatalog, SeatStore, StoreError, UserDirectory,
};
pub use seat::{OccupancySnapshot, Seat, SeatStatusFilter};
pub use subscription::{OccupancyNotification, SubscriptionRequest};
pub use user::User;
