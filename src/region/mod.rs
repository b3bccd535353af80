//! Region classification
//!
//! A proxy is placed by, in order of precedence:
//!
//! 1. the informational filter (excluded entirely),
//! 2. keywords in its name,
//! 3. the static IPv4 prefix table, for IP-literal servers,
//! 4. live geolocation, for IP-literal servers the table does not cover.
//!
//! Anything left over is grouped under the catch-all region.

pub mod geoip;

use std::collections::HashMap;
use std::net::IpAddr;

use futures::stream::{self, StreamExt};
use log::debug;
use regex::Regex;

use crate::constants::regions::{region_by_code, RegionRule, REGION_RULES};
use crate::models::{Classification, ProxyRecord, RegionInfo};
use geoip::GeoLocate;

pub use geoip::{CountryInfo, GeoIpChain, GeoProvider};

/// Display name used when a provider reports a code but no country name
const UNNAMED_COUNTRY: &str = "未知";

/// Classification of every proxy in a request, keyed by proxy name.
pub type RegionMap = HashMap<String, Classification>;

fn region_of(rule: &RegionRule) -> RegionInfo {
    RegionInfo::new(rule.name, rule.code)
}

/// Tier 2: first region in table order with a keyword contained in `name`.
pub fn detect_region_by_name(name: &str) -> Option<RegionInfo> {
    let upper = name.to_uppercase();
    REGION_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| upper.contains(keyword)))
        .map(region_of)
}

/// Tier 3: first region in table order whose prefix matches `ip`.
pub fn detect_region_by_ip_range(ip: &IpAddr) -> Option<RegionInfo> {
    let ip = match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(_) => return None,
    };
    REGION_RULES
        .iter()
        .find(|rule| rule.ip_prefixes.iter().any(|prefix| ip.starts_with(prefix)))
        .map(region_of)
}

/// Map a geolocated country onto the curated table, or synthesize a region.
pub fn region_from_country(country: &CountryInfo) -> RegionInfo {
    match region_by_code(&country.code) {
        Some(rule) => region_of(rule),
        None => RegionInfo::new(
            country.name.as_deref().unwrap_or(UNNAMED_COUNTRY),
            country.code.as_str(),
        ),
    }
}

pub struct RegionClassifier<G> {
    geo: G,
    informational: Regex,
}

impl<G: GeoLocate + Sync> RegionClassifier<G> {
    /// `informational_pattern` matches names of entries that are not proxies.
    pub fn new(geo: G, informational_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            geo,
            informational: Regex::new(informational_pattern)?,
        })
    }

    pub fn is_informational(&self, name: &str) -> bool {
        self.informational.is_match(name)
    }

    pub async fn classify(&self, proxy: &ProxyRecord) -> Classification {
        if self.is_informational(&proxy.name) {
            debug!("Excluding informational entry: {}", proxy.name);
            return Classification::Excluded;
        }

        if let Some(region) = detect_region_by_name(&proxy.name) {
            debug!("Name match: {} -> {}", proxy.name, region.name);
            return Classification::Detected(region);
        }

        // hostnames are never resolved
        let ip = match proxy.server.trim().parse::<IpAddr>() {
            Ok(ip) => ip,
            Err(_) => {
                debug!("Unclassified hostname: {} ({})", proxy.name, proxy.server);
                return Classification::unknown();
            }
        };

        if let Some(region) = detect_region_by_ip_range(&ip) {
            debug!("IP range match: {} -> {}", ip, region.name);
            return Classification::Detected(region);
        }

        match self.geo.locate(&ip.to_string()).await {
            Some(country) => Classification::Detected(region_from_country(&country)),
            None => {
                debug!("Unclassified proxy: {} ({})", proxy.name, ip);
                Classification::unknown()
            }
        }
    }

    /// Classify every proxy, at most `concurrency` at a time.
    pub async fn classify_all(&self, proxies: &[ProxyRecord], concurrency: usize) -> RegionMap {
        stream::iter(proxies)
            .map(|proxy| async move { (proxy.name.clone(), self.classify(proxy).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
