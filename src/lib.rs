pub mod constants;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod region;
pub mod settings;
pub mod utils;
#[cfg(feature = "web-api")]
pub mod web_handlers;

// Re-export the main types for easier access
pub use interfaces::{merge_urls, MergeError};
pub use models::{Classification, ProxyRecord, RegionInfo};
pub use settings::Settings;
