pub mod directory;
pub mod seed;

pub use directory::ConcertDirectory;
pub use seed::{demo_catalogue, SeatPlan, SeedData};
