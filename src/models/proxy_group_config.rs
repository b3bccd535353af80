use serde::Serialize;

/// Type of proxy group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProxyGroupType {
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "url-test")]
    URLTest,
    #[serde(rename = "load-balance")]
    LoadBalance,
}

/// Load balancing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BalanceStrategy {
    ConsistentHashing,
    RoundRobin,
}

/// Health check URL shared by every tested group
pub const HEALTH_CHECK_URL: &str = "http://www.gstatic.com/generate_204";
/// Interval in seconds between health checks
pub const HEALTH_CHECK_INTERVAL: u32 = 300;
/// Latency tolerance in milliseconds for url-test groups
pub const URL_TEST_TOLERANCE: u32 = 50;
/// Failures tolerated before a load-balance member is treated as down
pub const MAX_FAILED_TIMES: u32 = 3;

/// A proxy group as written to the `proxy-groups` section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProxyGroupConfig {
    /// Name of the proxy group
    pub name: String,
    /// Type of the proxy group
    #[serde(rename = "type")]
    pub group_type: ProxyGroupType,
    /// URL for testing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Interval in seconds between tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Tolerance value for tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_failed_times: Option<u32>,
    /// Strategy for load balancing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<BalanceStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
    /// Member proxy or group names
    pub proxies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl ProxyGroupConfig {
    /// Create a new proxy group config
    pub fn new(name: impl Into<String>, group_type: ProxyGroupType, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            group_type,
            url: None,
            interval: None,
            tolerance: None,
            max_failed_times: None,
            strategy: None,
            lazy: None,
            proxies,
            icon: None,
            hidden: None,
        }
    }

    /// Plain manual selector
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self::new(name, ProxyGroupType::Select, proxies)
    }

    /// Latency-tested auto selector with the shared health check settings
    pub fn url_test(name: impl Into<String>, proxies: Vec<String>, hidden: bool) -> Self {
        Self {
            url: Some(HEALTH_CHECK_URL.to_string()),
            interval: Some(HEALTH_CHECK_INTERVAL),
            tolerance: Some(URL_TEST_TOLERANCE),
            hidden: Some(hidden),
            ..Self::new(name, ProxyGroupType::URLTest, proxies)
        }
    }

    /// Lazy load balancer over `proxies`
    pub fn load_balance(
        name: impl Into<String>,
        strategy: BalanceStrategy,
        proxies: Vec<String>,
    ) -> Self {
        Self {
            url: Some(HEALTH_CHECK_URL.to_string()),
            interval: Some(HEALTH_CHECK_INTERVAL),
            max_failed_times: Some(MAX_FAILED_TIMES),
            strategy: Some(strategy),
            lazy: Some(true),
            ..Self::new(name, ProxyGroupType::LoadBalance, proxies)
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A collection of proxy group configurations
pub type ProxyGroupConfigs = Vec<ProxyGroupConfig>;
