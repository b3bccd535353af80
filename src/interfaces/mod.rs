pub mod merger;

pub use merger::{merge_config, merge_subscriptions, merge_urls, MergeError};
