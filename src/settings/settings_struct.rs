use std::env;
use std::fs;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::models::ProxyRecord;
use crate::region::geoip::{DEFAULT_GEOIP_TIMEOUT, DEFAULT_GEOIP_USER_AGENT};
use crate::utils::http::DEFAULT_TIMEOUT;

/// Client identifier sent with every subscription request
pub const SUBSCRIPTION_USER_AGENT: &str = "clash-verge/1.5.11";

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_listen_port() -> u16 {
    3000
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_subscription_user_agent() -> String {
    SUBSCRIPTION_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_geoip_timeout_secs() -> u64 {
    DEFAULT_GEOIP_TIMEOUT
}

fn default_geoip_user_agent() -> String {
    DEFAULT_GEOIP_USER_AGENT.to_string()
}

fn default_max_concurrent_lookups() -> usize {
    16
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings structure to hold global configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Server
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    // Subscription fetching
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_subscription_user_agent")]
    pub subscription_user_agent: String,

    // Geolocation
    #[serde(default = "default_true")]
    pub geoip_enabled: bool,
    #[serde(default = "default_geoip_timeout_secs")]
    pub geoip_timeout_secs: u64,
    #[serde(default = "default_geoip_user_agent")]
    pub geoip_user_agent: String,
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,

    /// Static proxies appended to every merged document
    pub manual_proxies: Vec<ProxyRecord>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            subscription_user_agent: default_subscription_user_agent(),
            geoip_enabled: default_true(),
            geoip_timeout_secs: default_geoip_timeout_secs(),
            geoip_user_agent: default_geoip_user_agent(),
            max_concurrent_lookups: default_max_concurrent_lookups(),
            manual_proxies: Vec::new(),
        }
    }
}

impl Settings {
    /// Create a new settings instance with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current() -> Arc<Settings> {
        GLOBAL
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        settings.apply_env();
        Ok(settings)
    }

    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::load_from_content(&content)
    }

    /// `PORT` overrides the configured listen port.
    fn apply_env(&mut self) {
        if let Ok(port) = env::var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.listen_port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
    }

    /// Listen address with the port appended when the address has none.
    pub fn bind_address(&self) -> String {
        let address = self.listen_address.trim();
        if address.is_empty() {
            warn!("Empty listen_address in settings, defaulting to 0.0.0.0");
            format!("{}:{}", default_listen_address(), self.listen_port)
        } else if address.contains(':') {
            address.to_string()
        } else {
            format!("{}:{}", address, self.listen_port)
        }
    }
}

static GLOBAL: LazyLock<RwLock<Arc<Settings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Settings::new())));

/// Load settings from `path`, or defaults when it is empty, and make them
/// current.
pub fn init_settings(path: &str) -> Result<Arc<Settings>, SettingsError> {
    let settings = if path.is_empty() {
        let mut settings = Settings::new();
        settings.apply_env();
        settings
    } else {
        info!("Loading settings from {}", path);
        Settings::load_from_file(path)?
    };
    Ok(replace_settings(settings))
}

/// Replace the current settings, returning the new snapshot.
pub fn replace_settings(settings: Settings) -> Arc<Settings> {
    let settings = Arc::new(settings);
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load_from_content("").unwrap();
        assert_eq!(settings.listen_address, "0.0.0.0");
        assert_eq!(settings.fetch_timeout_secs, 15);
        assert_eq!(settings.subscription_user_agent, "clash-verge/1.5.11");
        assert!(settings.geoip_enabled);
        assert_eq!(settings.geoip_timeout_secs, 3);
        assert_eq!(settings.max_concurrent_lookups, 16);
        assert!(settings.manual_proxies.is_empty());
    }

    #[test]
    fn test_manual_proxies() {
        let content = r#"
geoip_enabled = false

[[manual_proxies]]
name = "home"
type = "socks5"
server = "192.168.1.2"
port = 1080
udp = true
"#;
        let settings = Settings::load_from_content(content).unwrap();
        assert!(!settings.geoip_enabled);
        let home = &settings.manual_proxies[0];
        assert_eq!(home.proxy_type, "socks5");
        assert_eq!(home.port, 1080);
        assert_eq!(home.get("udp").and_then(|v| v.as_bool()), Some(true));
    }

    #[test]
    fn test_bind_address() {
        let mut settings = Settings::new();
        settings.listen_address = "127.0.0.1".into();
        settings.listen_port = 8080;
        assert_eq!(settings.bind_address(), "127.0.0.1:8080");
        settings.listen_address = "127.0.0.1:9000".into();
        assert_eq!(settings.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Settings::load_from_content("listen_port = \"x\""),
            Err(SettingsError::Parse(_))
        ));
    }
}
