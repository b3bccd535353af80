//! Resolver lists and GEO data sources for the anti-leak DNS block

/// Domestic resolvers; also used to resolve proxy hostnames.
pub const CN_DNS: &[&str] = &["https://223.5.5.5/dns-query", "https://1.12.12.12/dns-query"];

/// Resolvers trusted for everything outside the domestic policy.
pub const TRUST_DNS: &[&str] = &[
    "quic://dns.cooluc.com",
    "https://1.0.0.1/dns-query",
    "https://1.1.1.1/dns-query",
];

pub const FALLBACK_GEOIP_CODE: &str = "CN";
pub const FALLBACK_GEOSITE: &[&str] = &["gfw"];
pub const FALLBACK_IPCIDR: &[&str] = &["240.0.0.0/4"];
pub const FALLBACK_DOMAIN: &[&str] = &["+.google.com", "+.facebook.com", "+.youtube.com"];

/// Acceleration prefix put in front of the GitHub release URLs.
pub const GITHUB_PREFIX: &str = "https://fastgh.lainbo.com/";

pub const GEOIP_URL: &str =
    "https://github.com/MetaCubeX/meta-rules-dat/releases/download/latest/geoip-lite.dat";
pub const GEOSITE_URL: &str =
    "https://github.com/MetaCubeX/meta-rules-dat/releases/download/latest/geosite.dat";
pub const MMDB_URL: &str =
    "https://github.com/MetaCubeX/meta-rules-dat/releases/download/latest/country-lite.mmdb";
