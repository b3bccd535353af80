pub mod config;
pub mod yaml;

pub use config::group::{append_manual_proxies, build_proxy_groups};
pub use config::overwrite::{overwrite_dns, overwrite_rules};
pub use yaml::clash::MergedConfig;
