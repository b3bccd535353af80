//! Subscription fetching and format detection
//!
//! A subscription body is first read as a Clash document. Only when that
//! fails, or the document has no `proxies` sequence, is it treated as a
//! Base64-encoded list of proxy URIs.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use serde_yaml::Value;
use thiserror::Error;

use crate::constants::groups::PROXY_MODE_GROUP;
use crate::models::{default_subscription_name, ParsedSubscription, ProxyRecord};
use crate::parser::explodes::ExplodeRegistry;
use crate::utils::base64::base64_decode;
use crate::utils::http::{web_get_async, HttpError};

#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("failed to fetch subscription: {0}")]
    Fetch(#[from] HttpError),

    #[error("failed to decode subscription: {0}")]
    Decode(String),
}

/// Source of raw subscription bodies.
pub trait SubscriptionFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, HttpError>> + Send;
}

/// Fetches subscriptions over HTTP with a fixed client identifier.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

impl SubscriptionFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, HttpError>> + Send {
        let url = url.to_string();
        async move { web_get_async(&self.client, &url, &self.user_agent, self.timeout).await }
    }
}

/// Parse a Clash document into its proxies and declared name.
///
/// Returns `None` when `content` is not a mapping with a `proxies` sequence.
/// Entries of the sequence are lifted as-is; only entries without a usable
/// name or port are dropped.
pub fn explode_clash(content: &str, ordinal: usize) -> Option<ParsedSubscription> {
    let yaml: Value = match serde_yaml::from_str(content) {
        Ok(y) => y,
        Err(e) => {
            debug!("Subscription {} is not a YAML document: {}", ordinal, e);
            return None;
        }
    };

    let entries = match yaml.get("proxies") {
        Some(Value::Sequence(seq)) => seq,
        _ => {
            debug!("Subscription {} has no proxies sequence", ordinal);
            return None;
        }
    };

    let proxies: Vec<ProxyRecord> = entries.iter().filter_map(ProxyRecord::from_yaml).collect();
    if proxies.len() < entries.len() {
        warn!(
            "Subscription {}: dropped {} proxy entries without a name or port",
            ordinal,
            entries.len() - proxies.len()
        );
    }

    Some(ParsedSubscription {
        name: clash_subscription_name(&yaml).unwrap_or_else(|| default_subscription_name(ordinal)),
        proxies,
    })
}

/// Top-level `name`, else the first proxy group unless it is the reserved
/// master selector.
fn clash_subscription_name(yaml: &Value) -> Option<String> {
    if let Some(name) = yaml.get("name").and_then(Value::as_str) {
        if !name.trim().is_empty() {
            return Some(name.trim().to_string());
        }
    }
    yaml.get("proxy-groups")
        .and_then(Value::as_sequence)
        .and_then(|groups| groups.first())
        .and_then(|group| group.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != PROXY_MODE_GROUP)
        .map(str::to_string)
}

/// Decode a Base64 body into proxy records, one URI per line.
pub fn explode_sub(
    content: &str,
    ordinal: usize,
    registry: &ExplodeRegistry,
) -> Result<ParsedSubscription, SubscriptionError> {
    let decoded = base64_decode(content)
        .ok_or_else(|| SubscriptionError::Decode("neither a Clash document nor Base64".into()))?;

    let links: Vec<&str> = decoded
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if links.is_empty() {
        info!("Subscription {} decoded to 0 proxy URIs", ordinal);
    }

    let proxies: Vec<ProxyRecord> = links.iter().filter_map(|link| registry.explode(link)).collect();
    info!(
        "Subscription {}: parsed {} of {} proxy URIs",
        ordinal,
        proxies.len(),
        links.len()
    );

    Ok(ParsedSubscription {
        name: default_subscription_name(ordinal),
        proxies,
    })
}

/// Interpret a subscription body, Clash document first and Base64 second.
pub fn parse_subscription(
    content: &str,
    ordinal: usize,
    registry: &ExplodeRegistry,
) -> Result<ParsedSubscription, SubscriptionError> {
    if let Some(parsed) = explode_clash(content, ordinal) {
        info!(
            "Subscription {}: parsed {} proxies as YAML",
            ordinal,
            parsed.proxies.len()
        );
        return Ok(parsed);
    }
    explode_sub(content, ordinal, registry)
}

/// Fetch and decode the `ordinal`-th (1-based) subscription.
pub async fn fetch_subscription<F: SubscriptionFetcher>(
    fetcher: &F,
    url: &str,
    ordinal: usize,
    registry: &ExplodeRegistry,
) -> Result<ParsedSubscription, SubscriptionError> {
    info!("Fetching subscription {} from: {}", ordinal, url);
    let body = fetcher.fetch(url).await?;
    parse_subscription(&body, ordinal, registry)
}
