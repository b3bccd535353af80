use crate::models::ProxyRecord;

/// Display name used for the `ordinal`-th subscription when the source
/// declares none.
pub fn default_subscription_name(ordinal: usize) -> String {
    format!("订阅{}", ordinal)
}

/// Proxies decoded from one subscription source.
#[derive(Debug, Clone, Default)]
pub struct ParsedSubscription {
    pub name: String,
    pub proxies: Vec<ProxyRecord>,
}

/// Links a subscription source to the proxy names it contributed.
///
/// Only lives for the duration of one merge; it never reaches the output
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionGroup {
    pub name: String,
    /// Member names as returned by the source, before deduplication.
    pub proxies: Vec<String>,
    /// 1-based position in the input URL list.
    pub index: usize,
}
