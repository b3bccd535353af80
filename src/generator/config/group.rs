//! Group generation utilities
//!
//! Builds the layered `proxy-groups` section from the merged proxy set, the
//! per-subscription membership lists and the precomputed region of every
//! proxy. Nothing here performs I/O.

use std::collections::HashSet;

use linked_hash_map::LinkedHashMap;
use log::{debug, info, warn};

use crate::constants::groups::{
    icon_url, AD_BLOCK_GROUP, ALL_AUTO_GROUP, AUTO_SELECT_GROUP, CHATGPT_GROUP, CLAUDE_GROUP,
    DIRECT, FINAL_GROUP, GLOBAL_REGION_SUFFIX, LOAD_BALANCE_HASH_GROUP,
    LOAD_BALANCE_ROUND_ROBIN_GROUP, MANUAL_SELECT_GROUP, PROXY_MODE_GROUP, REJECT, SPOTIFY_GROUP,
    SPOTIFY_ICON, SUBSCRIPTION_AUTO_SUFFIX, SUBSCRIPTION_MANUAL_SUFFIX, TELEGRAM_GROUP,
};
use crate::models::{
    BalanceStrategy, Classification, ProxyGroupConfig, ProxyGroupConfigs, ProxyRecord, RegionInfo,
    SubscriptionGroup, HEALTH_CHECK_URL,
};
use crate::region::RegionMap;

/// Proxies sharing one region, in encounter order.
struct RegionBucket {
    info: RegionInfo,
    proxies: Vec<String>,
}

/// Bucket `names` by region name, skipping excluded entries.
///
/// A name missing from `regions` is grouped under the catch-all region.
fn bucket_by_region<'a>(
    names: impl IntoIterator<Item = &'a str>,
    regions: &RegionMap,
) -> LinkedHashMap<String, RegionBucket> {
    let mut buckets: LinkedHashMap<String, RegionBucket> = LinkedHashMap::new();
    for name in names {
        let info = match regions.get(name) {
            Some(Classification::Excluded) => continue,
            Some(classification) => classification.region().cloned(),
            None => None,
        }
        .unwrap_or_else(RegionInfo::other);

        buckets
            .entry(info.name.clone())
            .or_insert_with(|| RegionBucket {
                info,
                proxies: Vec::new(),
            })
            .proxies
            .push(name.to_string());
    }
    buckets
}

/// Append statically configured proxies, skipping names already present.
pub fn append_manual_proxies(proxies: &mut Vec<ProxyRecord>, manual: &[ProxyRecord]) {
    let mut seen: HashSet<String> = proxies.iter().map(|p| p.name.clone()).collect();
    for proxy in manual {
        if !seen.insert(proxy.name.clone()) {
            warn!("Skipping manual proxy with duplicate name: {}", proxy.name);
            continue;
        }
        proxies.push(proxy.clone());
    }
}

/// Groups generated for one subscription
#[derive(Default)]
struct SubscriptionGroups {
    auto: Vec<ProxyGroupConfig>,
    regional: Vec<ProxyGroupConfig>,
    manual: Vec<ProxyGroupConfig>,
}

fn subscription_groups(
    proxies: &[ProxyRecord],
    subscriptions: &[SubscriptionGroup],
    regions: &RegionMap,
) -> SubscriptionGroups {
    let mut out = SubscriptionGroups::default();

    for sub in subscriptions {
        let members: HashSet<&str> = sub.proxies.iter().map(String::as_str).collect();
        let owned = proxies
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| members.contains(name));
        let buckets = bucket_by_region(owned, regions);

        info!(
            "Subscription \"{}\": {} proxies in {} regions",
            sub.name,
            buckets.values().map(|b| b.proxies.len()).sum::<usize>(),
            buckets.len()
        );

        let mut classified = Vec::new();
        for bucket in buckets.values() {
            debug!("  {}: {} proxies", bucket.info.name, bucket.proxies.len());
            out.regional.push(
                ProxyGroupConfig::url_test(
                    format!("{} - {}", sub.name, bucket.info.name),
                    bucket.proxies.clone(),
                    false,
                )
                .with_icon(bucket.info.icon.clone()),
            );
            classified.extend(bucket.proxies.iter().cloned());
        }

        if !classified.is_empty() {
            out.auto.push(ProxyGroupConfig::url_test(
                format!("{} - {}", sub.name, SUBSCRIPTION_AUTO_SUFFIX),
                classified,
                true,
            ));
        }

        let mut seen = HashSet::new();
        let manual_members: Vec<String> = sub
            .proxies
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();
        out.manual.push(
            ProxyGroupConfig::select(
                format!("{} - {}", sub.name, SUBSCRIPTION_MANUAL_SUFFIX),
                manual_members,
            )
            .with_icon(icon_url("link.svg")),
        );
    }

    out
}

fn global_region_groups(proxies: &[ProxyRecord], regions: &RegionMap) -> ProxyGroupConfigs {
    bucket_by_region(proxies.iter().map(|p| p.name.as_str()), regions)
        .into_iter()
        .map(|(_, bucket)| {
            ProxyGroupConfig::url_test(
                format!("{} - {}", bucket.info.name, GLOBAL_REGION_SUFFIX),
                bucket.proxies,
                true,
            )
            .with_icon(bucket.info.icon)
        })
        .collect()
}

/// Names offered by the automatic selector, without duplicates, with the
/// aggregate group last.
fn auto_selection_menu<'a>(groups: impl IntoIterator<Item = &'a ProxyGroupConfig>) -> Vec<String> {
    let mut menu: Vec<String> = Vec::new();
    for group in groups {
        if !menu.contains(&group.name) {
            menu.push(group.name.clone());
        }
    }
    menu.push(ALL_AUTO_GROUP.to_string());
    menu
}

fn service_selector(name: &str, menu: &[String], icon: String) -> ProxyGroupConfig {
    let mut members = vec![PROXY_MODE_GROUP.to_string()];
    // every menu entry except the trailing aggregate
    members.extend(menu[..menu.len() - 1].iter().cloned());
    ProxyGroupConfig::select(name, members).with_icon(icon)
}

/// Build the complete `proxy-groups` section.
///
/// `proxies` is the deduplicated set including manual entries, and `regions`
/// holds the classification of each of them.
pub fn build_proxy_groups(
    proxies: &[ProxyRecord],
    subscriptions: &[SubscriptionGroup],
    regions: &RegionMap,
) -> ProxyGroupConfigs {
    let all_proxies: Vec<String> = proxies.iter().map(|p| p.name.clone()).collect();

    let per_sub = subscription_groups(proxies, subscriptions, regions);
    let global = global_region_groups(proxies, regions);
    let menu = auto_selection_menu(
        per_sub
            .auto
            .iter()
            .chain(per_sub.regional.iter())
            .chain(global.iter()),
    );

    let mut groups = vec![
        ProxyGroupConfig::select(
            PROXY_MODE_GROUP,
            vec![
                AUTO_SELECT_GROUP.to_string(),
                MANUAL_SELECT_GROUP.to_string(),
                LOAD_BALANCE_HASH_GROUP.to_string(),
                LOAD_BALANCE_ROUND_ROBIN_GROUP.to_string(),
                DIRECT.to_string(),
            ],
        )
        .with_url(HEALTH_CHECK_URL)
        .with_icon(icon_url("adjust.svg")),
        ProxyGroupConfig::select(MANUAL_SELECT_GROUP, all_proxies.clone())
            .with_icon(icon_url("link.svg")),
        ProxyGroupConfig::select(AUTO_SELECT_GROUP, menu.clone()).with_icon(icon_url("speed.svg")),
        ProxyGroupConfig::load_balance(
            LOAD_BALANCE_HASH_GROUP,
            BalanceStrategy::ConsistentHashing,
            all_proxies.clone(),
        )
        .with_icon(icon_url("balance.svg")),
        ProxyGroupConfig::load_balance(
            LOAD_BALANCE_ROUND_ROBIN_GROUP,
            BalanceStrategy::RoundRobin,
            all_proxies.clone(),
        )
        .with_icon(icon_url("merry_go.svg")),
        ProxyGroupConfig::url_test(ALL_AUTO_GROUP, all_proxies, true),
        service_selector(TELEGRAM_GROUP, &menu, icon_url("telegram.svg")),
        service_selector(CHATGPT_GROUP, &menu, icon_url("chatgpt.svg")),
        service_selector(CLAUDE_GROUP, &menu, icon_url("claude.svg")),
        service_selector(SPOTIFY_GROUP, &menu, SPOTIFY_ICON.to_string()),
        ProxyGroupConfig::select(
            FINAL_GROUP,
            vec![DIRECT.to_string(), PROXY_MODE_GROUP.to_string()],
        )
        .with_icon(icon_url("fish.svg")),
        ProxyGroupConfig::select(
            AD_BLOCK_GROUP,
            vec![
                REJECT.to_string(),
                DIRECT.to_string(),
                PROXY_MODE_GROUP.to_string(),
            ],
        )
        .with_icon(icon_url("block.svg")),
    ];

    groups.extend(per_sub.auto);
    groups.extend(global);
    groups.extend(per_sub.regional);
    groups.extend(per_sub.manual);

    info!("Generated {} proxy groups", groups.len());
    groups
}
