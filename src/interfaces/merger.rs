//! The merge pipeline
//!
//! fetch every subscription → merge and deduplicate → classify → build
//! groups → attach rules and DNS → serialize.

use std::collections::HashSet;

use futures::future::join_all;
use log::{info, warn};
use thiserror::Error;

use crate::constants::groups::{FIXED_GROUPS, SUBSCRIPTION_AUTO_SUFFIX, SUBSCRIPTION_MANUAL_SUFFIX};
use crate::generator::{
    append_manual_proxies, build_proxy_groups, overwrite_dns, overwrite_rules, MergedConfig,
};
use crate::models::{default_subscription_name, ParsedSubscription, ProxyRecord, SubscriptionGroup};
use crate::parser::explodes::ExplodeRegistry;
use crate::parser::subparser::{fetch_subscription, SubscriptionFetcher};
use crate::region::geoip::GeoLocate;
use crate::region::RegionClassifier;
use crate::settings::Settings;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("no subscription URLs given")]
    NoUrls,

    #[error("no valid proxies found in the provided URLs")]
    EmptyResult,

    #[error("failed to serialize merged config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl MergeError {
    /// HTTP status the request boundary answers with.
    pub fn http_status(&self) -> u16 {
        match self {
            MergeError::EmptyResult => 400,
            MergeError::NoUrls | MergeError::Serialize(_) => 500,
        }
    }
}

/// Whether the groups generated for subscription `name` would clash with a
/// fixed group or with a subscription already recorded.
fn subscription_name_taken(name: &str, seen: &HashSet<String>) -> bool {
    seen.contains(name)
        || [SUBSCRIPTION_AUTO_SUFFIX, SUBSCRIPTION_MANUAL_SUFFIX]
            .iter()
            .any(|suffix| FIXED_GROUPS.contains(&format!("{} - {}", name, suffix).as_str()))
}

/// Pick a display name for the subscription at `index` whose generated
/// groups are unique, appending `" #<n>"` from `index` upwards if needed.
fn unique_subscription_name(name: String, index: usize, seen: &HashSet<String>) -> String {
    if !subscription_name_taken(&name, seen) {
        return name;
    }
    let mut n = index;
    loop {
        let candidate = format!("{} #{}", name, n);
        if !subscription_name_taken(&candidate, seen) {
            return candidate;
        }
        n += 1;
    }
}

/// Concatenate subscriptions in input order and drop later duplicates by
/// name.
///
/// A [`SubscriptionGroup`] is recorded for every source that contributed at
/// least one proxy. Its member list is the source's own, taken before
/// deduplication.
pub fn merge_subscriptions(
    subscriptions: Vec<ParsedSubscription>,
) -> (Vec<ProxyRecord>, Vec<SubscriptionGroup>) {
    let mut proxies = Vec::new();
    let mut groups = Vec::new();
    let mut seen_proxies = HashSet::new();
    let mut seen_groups = HashSet::new();
    let mut total = 0;

    for (position, sub) in subscriptions.into_iter().enumerate() {
        let index = position + 1;
        if sub.proxies.is_empty() {
            continue;
        }
        total += sub.proxies.len();

        let name = unique_subscription_name(sub.name, index, &seen_groups);
        seen_groups.insert(name.clone());

        groups.push(SubscriptionGroup {
            name,
            proxies: sub.proxies.iter().map(|p| p.name.clone()).collect(),
            index,
        });

        for proxy in sub.proxies {
            if seen_proxies.insert(proxy.name.clone()) {
                proxies.push(proxy);
            }
        }
    }

    info!("Total merged proxies (before deduplication): {}", total);
    info!("Total merged proxies (after deduplication): {}", proxies.len());
    (proxies, groups)
}

/// Fetch every URL concurrently; results come back in input order.
///
/// A source that fails is logged and contributes nothing.
pub async fn fetch_all<F: SubscriptionFetcher>(
    urls: &[String],
    fetcher: &F,
    registry: &ExplodeRegistry,
) -> Vec<ParsedSubscription> {
    join_all(urls.iter().enumerate().map(|(position, url)| async move {
        let ordinal = position + 1;
        match fetch_subscription(fetcher, url, ordinal, registry).await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Subscription {} ({}) skipped: {}", ordinal, url, e);
                ParsedSubscription {
                    name: default_subscription_name(ordinal),
                    proxies: Vec::new(),
                }
            }
        }
    }))
    .await
}

/// Run the pipeline up to the finished document.
pub async fn merge_config<F, G>(
    urls: &[String],
    fetcher: &F,
    classifier: &RegionClassifier<G>,
    registry: &ExplodeRegistry,
    settings: &Settings,
) -> Result<MergedConfig, MergeError>
where
    F: SubscriptionFetcher,
    G: GeoLocate + Sync,
{
    if urls.is_empty() {
        return Err(MergeError::NoUrls);
    }

    let parsed = fetch_all(urls, fetcher, registry).await;
    let (mut proxies, subscriptions) = merge_subscriptions(parsed);
    if proxies.is_empty() {
        return Err(MergeError::EmptyResult);
    }

    append_manual_proxies(&mut proxies, &settings.manual_proxies);

    let regions = classifier
        .classify_all(&proxies, settings.max_concurrent_lookups)
        .await;
    let groups = build_proxy_groups(&proxies, &subscriptions, &regions);

    let mut config = MergedConfig::new(proxies, groups);
    overwrite_rules(&mut config);
    overwrite_dns(&mut config);
    Ok(config)
}

/// Run the whole pipeline and return the YAML document.
pub async fn merge_urls<F, G>(
    urls: &[String],
    fetcher: &F,
    classifier: &RegionClassifier<G>,
    registry: &ExplodeRegistry,
    settings: &Settings,
) -> Result<String, MergeError>
where
    F: SubscriptionFetcher,
    G: GeoLocate + Sync,
{
    let config = merge_config(urls, fetcher, classifier, registry, settings).await?;
    Ok(serde_yaml::to_string(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::regions::INFORMATIONAL_PATTERN;
    use crate::region::CountryInfo;
    use crate::utils::http::HttpError;
    use std::collections::HashMap;
    use std::future::Future;
    use std::time::Duration;

    /// Serves canned bodies; a missing URL is a network failure.
    struct StubFetcher {
        bodies: HashMap<String, (String, u64)>,
    }

    impl StubFetcher {
        fn new(entries: &[(&str, &str, u64)]) -> Self {
            Self {
                bodies: entries
                    .iter()
                    .map(|(url, body, delay)| (url.to_string(), (body.to_string(), *delay)))
                    .collect(),
            }
        }
    }

    impl SubscriptionFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> impl Future<Output = Result<String, HttpError>> + Send {
            let entry = self.bodies.get(url).cloned();
            async move {
                let (body, delay) = entry.ok_or(HttpError::Timeout)?;
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(body)
            }
        }
    }

    struct NoGeo;

    impl GeoLocate for NoGeo {
        fn locate(&self, _ip: &str) -> impl Future<Output = Option<CountryInfo>> + Send {
            async { None }
        }
    }

    fn classifier() -> RegionClassifier<NoGeo> {
        RegionClassifier::new(NoGeo, INFORMATIONAL_PATTERN).unwrap()
    }

    fn sub(name: &str, proxies: &[(&str, &str)]) -> ParsedSubscription {
        ParsedSubscription {
            name: name.to_string(),
            proxies: proxies
                .iter()
                .map(|(n, server)| ProxyRecord::new(*n, "vless", server, 443))
                .collect(),
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let (proxies, groups) = merge_subscriptions(vec![
            sub("a", &[("A", "1.1.1.1"), ("B", "2.2.2.2")]),
            sub("b", &[("A", "9.9.9.9"), ("C", "3.3.3.3")]),
        ]);
        let names: Vec<_> = proxies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(proxies[0].server, "1.1.1.1");
        // membership is recorded before deduplication
        assert_eq!(groups[1].proxies, vec!["A", "C"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_subscriptions(vec![sub("a", &[("A", "1.1.1.1"), ("B", "2.2.2.2")])]).0;
        let twice = merge_subscriptions(vec![
            sub("a", &[("A", "1.1.1.1"), ("B", "2.2.2.2")]),
            sub("a", &[("A", "1.1.1.1"), ("B", "2.2.2.2")]),
        ])
        .0;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_sources_have_no_group() {
        let (_, groups) = merge_subscriptions(vec![
            sub("订阅1", &[]),
            sub("x", &[("A", "1.1.1.1")]),
            sub("x", &[("B", "1.1.1.1")]),
        ]);
        let names: Vec<_> = groups.iter().map(|g| (g.name.as_str(), g.index)).collect();
        assert_eq!(names, vec![("x", 2), ("x #3", 3)]);
    }

    #[test]
    fn test_suffixed_names_skip_declared_ones() {
        let (_, groups) = merge_subscriptions(vec![
            sub("x", &[("A", "1.1.1.1")]),
            sub("x #3", &[("B", "1.1.1.1")]),
            sub("x", &[("C", "1.1.1.1")]),
        ]);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["x", "x #3", "x #4"]);
    }

    #[test]
    fn test_names_colliding_with_fixed_groups_are_suffixed() {
        let (_, groups) = merge_subscriptions(vec![sub("ALL", &[("A", "1.1.1.1")])]);
        assert_eq!(groups[0].name, "ALL #1");
    }

    #[tokio::test]
    async fn test_group_names_unique_for_subscription_named_all() {
        let body = "name: ALL\nproxies:\n  - {name: HK-1, type: vless, server: 103.10.1.1, port: 443}\n";
        let fetcher = StubFetcher::new(&[("https://a/sub", body, 0)]);
        let config = merge_config(
            &urls(&["https://a/sub"]),
            &fetcher,
            &classifier(),
            &ExplodeRegistry::default(),
            &Settings::default(),
        )
        .await
        .unwrap();

        let mut seen = HashSet::new();
        for group in &config.proxy_groups {
            assert!(seen.insert(group.name.as_str()), "duplicate group {}", group.name);
        }
        assert!(seen.contains("ALL #1 - 自动选择"));
    }

    #[test]
    fn test_http_status() {
        assert_eq!(MergeError::EmptyResult.http_status(), 400);
        assert_eq!(MergeError::NoUrls.http_status(), 500);
    }

    #[tokio::test]
    async fn test_first_wins_regardless_of_completion_order() {
        let first = "proxies:\n  - {name: A, type: vless, server: 1.1.1.1, port: 443}\n";
        let second = "proxies:\n  - {name: A, type: vless, server: 2.2.2.2, port: 443}\n";
        // the first source answers last
        let fetcher = StubFetcher::new(&[("https://a/sub", first, 50), ("https://b/sub", second, 0)]);
        let config = merge_config(
            &urls(&["https://a/sub", "https://b/sub"]),
            &fetcher,
            &classifier(),
            &ExplodeRegistry::default(),
            &Settings::default(),
        )
        .await
        .unwrap();
        assert_eq!(config.proxies.len(), 1);
        assert_eq!(config.proxies[0].server, "1.1.1.1");
    }

    #[tokio::test]
    async fn test_unreachable_source_is_skipped() {
        let body = "proxies:\n  - {name: HK-1, type: vless, server: 103.10.1.1, port: 443}\n";
        let fetcher = StubFetcher::new(&[("https://a/sub", body, 0)]);
        let config = merge_config(
            &urls(&["https://a/sub", "https://down/sub"]),
            &fetcher,
            &classifier(),
            &ExplodeRegistry::default(),
            &Settings::default(),
        )
        .await
        .unwrap();
        assert_eq!(config.proxies.len(), 1);
        assert!(config.proxy_groups.iter().all(|g| !g.name.starts_with("订阅2")));
        assert!(config.proxy_groups.iter().any(|g| g.name == "订阅1 - 香港"));
    }

    #[tokio::test]
    async fn test_empty_result() {
        let fetcher = StubFetcher::new(&[("https://a/sub", "<html>nope</html>", 0)]);
        let err = merge_urls(
            &urls(&["https://a/sub", "https://down/sub"]),
            &fetcher,
            &classifier(),
            &ExplodeRegistry::default(),
            &Settings::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MergeError::EmptyResult));

        let err = merge_urls(
            &[],
            &fetcher,
            &classifier(),
            &ExplodeRegistry::default(),
            &Settings::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MergeError::NoUrls));
    }

    #[tokio::test]
    async fn test_manual_proxies_appended() {
        let body = "proxies:\n  - {name: A, type: vless, server: 1.1.1.1, port: 443}\n";
        let fetcher = StubFetcher::new(&[("https://a/sub", body, 0)]);
        let mut settings = Settings::default();
        settings.manual_proxies = vec![
            ProxyRecord::new("A", "socks5", "10.0.0.1", 1080),
            ProxyRecord::new("home", "socks5", "10.0.0.2", 1080),
        ];
        let config = merge_config(
            &urls(&["https://a/sub"]),
            &fetcher,
            &classifier(),
            &ExplodeRegistry::default(),
            &settings,
        )
        .await
        .unwrap();
        let names: Vec<_> = config.proxies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "home"]);
        assert_eq!(config.proxies[0].proxy_type, "vless");
    }
}
