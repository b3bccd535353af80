//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the merge
//! pipeline, separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use clash_merge::models::ProxyRecord;
//!
//! let mut proxy = ProxyRecord::new("HK-01", "vless", "example.com", 443);
//! proxy.set("uuid", "00000000-0000-0000-0000-000000000000");
//! assert_eq!(proxy.get("uuid").and_then(|v| v.as_str()).map(str::len), Some(36));
//! ```

pub mod app_state;
pub mod proxy;
pub mod proxy_group_config;
pub mod region;
pub mod subscription;

pub use app_state::{AppState, AppStateError};
pub use proxy::*;
pub use proxy_group_config::*;
pub use region::*;
pub use subscription::*;
