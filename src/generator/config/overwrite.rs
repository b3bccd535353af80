//! Static rule and DNS sections
//!
//! These blocks are fixed configuration; they are copied into every merged
//! document unchanged.

use linked_hash_map::LinkedHashMap;

use crate::constants::dns::{
    CN_DNS, FALLBACK_DOMAIN, FALLBACK_GEOIP_CODE, FALLBACK_GEOSITE, FALLBACK_IPCIDR, GEOIP_URL,
    GEOSITE_URL, GITHUB_PREFIX, MMDB_URL, TRUST_DNS,
};
use crate::constants::rules::{default_rules, RULE_PROVIDERS};
use crate::generator::yaml::clash::{
    ClashDns, ClashDnsFallbackFilter, ClashProfile, ClashSniffer, GeoxUrl, MergedConfig,
    RuleProvider, SniffPort, SniffProtocols, SniffRule,
};

fn to_strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Attach the rule-provider table and the rule list.
pub fn overwrite_rules(config: &mut MergedConfig) {
    config.rule_providers = RULE_PROVIDERS
        .iter()
        .map(|def| {
            (
                def.name.to_string(),
                RuleProvider {
                    provider_type: "http".to_string(),
                    behavior: def.behavior.as_str().to_string(),
                    url: def.url.to_string(),
                    path: def.path.to_string(),
                    interval: def.interval,
                },
            )
        })
        .collect();
    config.rules = default_rules();
}

pub fn anti_leak_dns() -> ClashDns {
    let mut policy = LinkedHashMap::new();
    policy.insert("geosite:cn".to_string(), to_strings(CN_DNS));
    policy.insert("geosite:geolocation-!cn".to_string(), to_strings(TRUST_DNS));

    ClashDns {
        enable: true,
        prefer_h3: true,
        default_nameserver: to_strings(CN_DNS),
        nameserver: to_strings(TRUST_DNS),
        nameserver_policy: policy,
        fallback: to_strings(TRUST_DNS),
        fallback_filter: ClashDnsFallbackFilter {
            geoip: true,
            geoip_code: FALLBACK_GEOIP_CODE.to_string(),
            geosite: to_strings(FALLBACK_GEOSITE),
            ipcidr: to_strings(FALLBACK_IPCIDR),
            domain: to_strings(FALLBACK_DOMAIN),
        },
    }
}

/// Attach the DNS block together with the sniffer, profile and GEO data
/// options.
pub fn overwrite_dns(config: &mut MergedConfig) {
    config.dns = Some(anti_leak_dns());
    config.unified_delay = Some(true);
    config.tcp_concurrent = Some(true);
    config.profile = Some(ClashProfile {
        store_selected: true,
        store_fake_ip: true,
    });
    config.sniffer = Some(ClashSniffer {
        enable: true,
        sniff: SniffProtocols {
            tls: SniffRule {
                ports: vec![SniffPort::Port(443), SniffPort::Port(8443)],
                override_destination: None,
            },
            http: SniffRule {
                ports: vec![SniffPort::Port(80), SniffPort::Range("8080-8880".to_string())],
                override_destination: Some(true),
            },
        },
    });
    config.geodata_mode = Some(true);
    config.geox_url = Some(GeoxUrl {
        geoip: format!("{}{}", GITHUB_PREFIX, GEOIP_URL),
        geosite: format!("{}{}", GITHUB_PREFIX, GEOSITE_URL),
        mmdb: format!("{}{}", GITHUB_PREFIX, MMDB_URL),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_reference_declared_providers() {
        let mut config = MergedConfig::default();
        overwrite_rules(&mut config);
        assert_eq!(config.rule_providers.len(), RULE_PROVIDERS.len());
        assert_eq!(config.rules.last().map(String::as_str), Some("MATCH,漏网之鱼"));

        for rule in config.rules.iter().filter(|r| r.starts_with("RULE-SET,")) {
            let provider = rule.split(',').nth(1).unwrap();
            assert!(config.rule_providers.contains_key(provider), "{}", rule);
        }
        assert_eq!(config.rule_providers["openai"].interval, None);
        assert_eq!(config.rule_providers["reject"].interval, Some(86400));
    }

    #[test]
    fn test_dns_block_yaml() {
        let mut config = MergedConfig::default();
        overwrite_dns(&mut config);
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("prefer-h3: true"));
        assert!(yaml.contains("geosite:geolocation-!cn:"));
        assert!(yaml.contains("geoip-code: CN"));
        assert!(yaml.contains("- 240.0.0.0/4"));
        assert!(yaml.contains("override-destination: true"));
        assert!(yaml.contains("geoip: https://fastgh.lainbo.com/https://github.com/"));
        assert!(yaml.contains("store-fake-ip: true"));
    }
}
