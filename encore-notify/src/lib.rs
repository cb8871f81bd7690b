pub mod notifier;
pub mod registry;

pub use notifier::OccupancyNotifier;
pub use registry::{PendingSubscription, SubscriptionRegistry};
