use std::collections::HashMap;

use log::warn;
use thiserror::Error;
use url::Url;

use crate::models::ProxyRecord;
use crate::utils::url_decode;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExplodeError {
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("malformed URI: {0}")]
    MalformedUri(String),

    #[error("missing {0}")]
    MissingField(&'static str),
}

/// Decodes one proxy URI of a given scheme.
pub type Explode = fn(&str) -> Result<ProxyRecord, ExplodeError>;

/// Scheme-keyed table of URI decoders
///
/// New protocols are added with [`ExplodeRegistry::register`]; nothing else
/// depends on which schemes are known.
#[derive(Clone)]
pub struct ExplodeRegistry {
    decoders: HashMap<String, Explode>,
}

impl Default for ExplodeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("vless", super::vless::explode_vless);
        registry.register("hysteria2", super::hysteria2::explode_hysteria2);
        registry.register("hy2", super::hysteria2::explode_hysteria2);
        registry.register("trojan", super::trojan::explode_trojan);
        registry
    }
}

impl ExplodeRegistry {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub fn register(&mut self, scheme: &str, decoder: Explode) {
        self.decoders.insert(scheme.to_lowercase(), decoder);
    }

    /// Decode one URI, reporting why it failed.
    pub fn try_explode(&self, link: &str) -> Result<ProxyRecord, ExplodeError> {
        let link = link.trim();
        let scheme = link
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| ExplodeError::MalformedUri("missing scheme".to_string()))?;
        let decoder = self
            .decoders
            .get(&scheme.to_lowercase())
            .ok_or_else(|| ExplodeError::UnsupportedProtocol(scheme.to_string()))?;
        decoder(link)
    }

    /// Decode one URI. Failures are logged and yield `None`.
    pub fn explode(&self, link: &str) -> Option<ProxyRecord> {
        match self.try_explode(link) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping proxy URI ({}): {}", e, link.trim());
                None
            }
        }
    }
}

/// Parse `link` with the `url` crate.
pub(super) fn parse_url(link: &str) -> Result<Url, ExplodeError> {
    Url::parse(link).map_err(|e| ExplodeError::MalformedUri(e.to_string()))
}

pub(super) fn host_of(url: &Url) -> Result<String, ExplodeError> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(ExplodeError::MissingField("server"))?;
    // IPv6 literals come back bracketed
    Ok(host.trim_start_matches('[').trim_end_matches(']').to_string())
}

/// Display name from the fragment, falling back to `server:port`.
pub(super) fn name_of(url: &Url, server: &str, port: u16) -> String {
    let name = url_decode(url.fragment().unwrap_or("")).trim().to_string();
    if name.is_empty() {
        format!("{}:{}", server, port)
    } else {
        name
    }
}

/// Userinfo credential, percent-decoded.
pub(super) fn credential_of(url: &Url, field: &'static str) -> Result<String, ExplodeError> {
    let credential = url_decode(url.username());
    if credential.is_empty() {
        Err(ExplodeError::MissingField(field))
    } else {
        Ok(credential)
    }
}

/// First non-empty value of `key` in the query string.
pub(super) fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy(_: &str) -> Result<ProxyRecord, ExplodeError> {
        Ok(ProxyRecord::new("dummy", "dummy", "example.com", 1))
    }

    #[test]
    fn test_unsupported_protocol() {
        let registry = ExplodeRegistry::default();
        assert_eq!(
            registry.try_explode("ss://YWVzOnBhc3M@host:8388#x"),
            Err(ExplodeError::UnsupportedProtocol("ss".to_string()))
        );
        assert!(registry.explode("ss://YWVzOnBhc3M@host:8388#x").is_none());
    }

    #[test]
    fn test_missing_scheme_is_malformed() {
        let registry = ExplodeRegistry::default();
        assert!(matches!(
            registry.try_explode("just some text"),
            Err(ExplodeError::MalformedUri(_))
        ));
    }

    #[test]
    fn test_register_new_scheme() {
        let mut registry = ExplodeRegistry::empty();
        assert!(matches!(
            registry.try_explode("dummy://x"),
            Err(ExplodeError::UnsupportedProtocol(_))
        ));
        registry.register("Dummy", dummy);
        assert_eq!(registry.explode("DUMMY://x").map(|p| p.name).as_deref(), Some("dummy"));
    }

    #[test]
    fn test_default_schemes() {
        let registry = ExplodeRegistry::default();
        for scheme in ["vless", "hysteria2", "hy2", "trojan"] {
            // known schemes fail on content, never on dispatch
            let result = registry.try_explode(&format!("{}://", scheme));
            assert!(
                !matches!(result, Err(ExplodeError::UnsupportedProtocol(_))),
                "{}",
                scheme
            );
        }
    }
}
