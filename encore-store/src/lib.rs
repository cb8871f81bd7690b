pub mod app_config;
pub mod ledger;
pub mod seat_store;
pub mod users;

pub use ledger::MemoryBookingLedger;
pub use seat_store::MemorySeatStore;
pub use users::MemoryUserDirectory;
