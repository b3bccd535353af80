//! Live IP geolocation across several public providers

use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::utils::first_success;
use crate::utils::http::{web_get_json_async, HttpError};

/// Per-provider deadline in seconds
pub const DEFAULT_GEOIP_TIMEOUT: u64 = 3;
pub const DEFAULT_GEOIP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("no country code in response")]
    NoCountry,
}

/// Country reported by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    /// Upper-case ISO code
    pub code: String,
    pub name: Option<String>,
}

impl CountryInfo {
    fn from_fields(code: Option<&str>, name: Option<&str>) -> Option<Self> {
        let code = code.map(str::trim).filter(|c| !c.is_empty())?;
        Some(Self {
            code: code.to_uppercase(),
            name: name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

/// Something that can place an IP address in a country.
pub trait GeoLocate {
    fn locate(&self, ip: &str) -> impl Future<Output = Option<CountryInfo>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoProvider {
    IpApiCom,
    IpapiCo,
    IpinfoIo,
}

impl GeoProvider {
    /// Default provider order
    pub const ALL: [GeoProvider; 3] = [
        GeoProvider::IpApiCom,
        GeoProvider::IpapiCo,
        GeoProvider::IpinfoIo,
    ];

    pub fn url(&self, ip: &str) -> String {
        match self {
            GeoProvider::IpApiCom => {
                format!("http://ip-api.com/json/{}?fields=status,country,countryCode", ip)
            }
            GeoProvider::IpapiCo => format!("https://ipapi.co/{}/json/", ip),
            GeoProvider::IpinfoIo => format!("https://ipinfo.io/{}/json", ip),
        }
    }

    /// Extract the country from a provider's JSON body.
    pub fn parse(&self, body: &JsonValue) -> Option<CountryInfo> {
        let field = |key: &str| body.get(key).and_then(JsonValue::as_str);
        match self {
            GeoProvider::IpApiCom => {
                if field("status") != Some("success") {
                    return None;
                }
                CountryInfo::from_fields(field("countryCode"), field("country"))
            }
            GeoProvider::IpapiCo => {
                CountryInfo::from_fields(field("country_code"), field("country_name"))
            }
            // ipinfo only reports the code
            GeoProvider::IpinfoIo => CountryInfo::from_fields(field("country"), field("country")),
        }
    }
}

impl fmt::Display for GeoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeoProvider::IpApiCom => "ip-api.com",
            GeoProvider::IpapiCo => "ipapi.co",
            GeoProvider::IpinfoIo => "ipinfo.io",
        };
        f.write_str(name)
    }
}

/// Queries providers one at a time until one answers with a country.
#[derive(Debug, Clone)]
pub struct GeoIpChain {
    client: Client,
    providers: Vec<GeoProvider>,
    timeout: Duration,
    user_agent: String,
}

impl GeoIpChain {
    pub fn new(
        client: Client,
        providers: Vec<GeoProvider>,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client,
            providers,
            timeout,
            user_agent: user_agent.into(),
        }
    }

    async fn query(&self, provider: GeoProvider, ip: &str) -> Result<CountryInfo, GeoError> {
        let body =
            web_get_json_async(&self.client, &provider.url(ip), &self.user_agent, self.timeout)
                .await?;
        provider.parse(&body).ok_or(GeoError::NoCountry)
    }
}

impl GeoLocate for GeoIpChain {
    fn locate(&self, ip: &str) -> impl Future<Output = Option<CountryInfo>> + Send {
        async move {
            let found = first_success(&self.providers, self.timeout, |provider| {
                self.query(*provider, ip)
            })
            .await;
            match &found {
                Some(country) => debug!("Geolocated {} -> {}", ip, country.code),
                None if !self.providers.is_empty() => {
                    warn!("All geolocation providers failed for {}", ip)
                }
                None => {}
            }
            found
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ip_api() {
        let ok = json!({"status": "success", "country": "Japan", "countryCode": "JP"});
        assert_eq!(
            GeoProvider::IpApiCom.parse(&ok),
            Some(CountryInfo {
                code: "JP".into(),
                name: Some("Japan".into())
            })
        );
        let failed = json!({"status": "fail", "message": "reserved range"});
        assert_eq!(GeoProvider::IpApiCom.parse(&failed), None);
    }

    #[test]
    fn test_parse_ipapi_co_and_ipinfo() {
        let ipapi = json!({"country_code": "de", "country_name": "Germany"});
        assert_eq!(GeoProvider::IpapiCo.parse(&ipapi).unwrap().code, "DE");

        let ipinfo = json!({"ip": "1.1.1.1", "country": "AU"});
        let info = GeoProvider::IpinfoIo.parse(&ipinfo).unwrap();
        assert_eq!(info.code, "AU");
        assert_eq!(info.name.as_deref(), Some("AU"));

        assert_eq!(GeoProvider::IpinfoIo.parse(&json!({"bogon": true})), None);
    }

    #[test]
    fn test_provider_urls() {
        assert_eq!(
            GeoProvider::IpApiCom.url("1.2.3.4"),
            "http://ip-api.com/json/1.2.3.4?fields=status,country,countryCode"
        );
        assert_eq!(GeoProvider::IpapiCo.url("1.2.3.4"), "https://ipapi.co/1.2.3.4/json/");
        assert_eq!(GeoProvider::IpinfoIo.to_string(), "ipinfo.io");
    }

    #[tokio::test]
    async fn test_empty_chain_yields_none() {
        let chain = GeoIpChain::new(
            Client::new(),
            Vec::new(),
            Duration::from_millis(10),
            DEFAULT_GEOIP_USER_AGENT,
        );
        assert_eq!(chain.locate("1.2.3.4").await, None);
    }
}
