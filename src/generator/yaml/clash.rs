use linked_hash_map::LinkedHashMap;
use serde::Serialize;

use crate::models::{ProxyGroupConfigs, ProxyRecord};

/// The merged Clash document
///
/// Field order is the order keys appear in the output.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergedConfig {
    pub proxies: Vec<ProxyRecord>,

    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub rule_providers: LinkedHashMap<String, RuleProvider>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub proxy_groups: ProxyGroupConfigs,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<ClashDns>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_delay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcp_concurrent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ClashProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sniffer: Option<ClashSniffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geodata_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geox_url: Option<GeoxUrl>,
}

impl MergedConfig {
    pub fn new(proxies: Vec<ProxyRecord>, proxy_groups: ProxyGroupConfigs) -> Self {
        Self {
            proxies,
            proxy_groups,
            ..Default::default()
        }
    }
}

/// Remote rule set referenced by `RULE-SET` rules
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleProvider {
    #[serde(rename = "type")]
    pub provider_type: String,
    pub behavior: String,
    pub url: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

/// DNS configuration for Clash
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashDns {
    pub enable: bool,
    pub prefer_h3: bool,
    pub default_nameserver: Vec<String>,
    pub nameserver: Vec<String>,
    pub nameserver_policy: LinkedHashMap<String, Vec<String>>,
    pub fallback: Vec<String>,
    pub fallback_filter: ClashDnsFallbackFilter,
}

/// DNS fallback filter configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashDnsFallbackFilter {
    pub geoip: bool,
    pub geoip_code: String,
    pub geosite: Vec<String>,
    pub ipcidr: Vec<String>,
    pub domain: Vec<String>,
}

/// Profile persistence options
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashProfile {
    pub store_selected: bool,
    pub store_fake_ip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashSniffer {
    pub enable: bool,
    pub sniff: SniffProtocols,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SniffProtocols {
    #[serde(rename = "TLS")]
    pub tls: SniffRule,
    #[serde(rename = "HTTP")]
    pub http: SniffRule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SniffRule {
    pub ports: Vec<SniffPort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_destination: Option<bool>,
}

/// A single port or a `"low-high"` range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SniffPort {
    Port(u16),
    Range(String),
}

/// Download locations of the GEO databases
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoxUrl {
    pub geoip: String,
    pub geosite: String,
    pub mmdb: String,
}
