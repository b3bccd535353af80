pub mod explodes;
pub mod subparser;

pub use subparser::{fetch_subscription, parse_subscription, HttpFetcher, SubscriptionFetcher};
