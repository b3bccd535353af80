use std::sync::Arc;
use std::time::Duration;

use crate::constants::regions::INFORMATIONAL_PATTERN;
use crate::parser::explodes::ExplodeRegistry;
use crate::parser::subparser::HttpFetcher;
use crate::region::{GeoIpChain, GeoProvider, RegionClassifier};
use crate::settings::Settings;
use crate::utils::http::{build_client, HttpError};

#[derive(thiserror::Error, Debug)]
pub enum AppStateError {
    #[error("{0}")]
    Http(#[from] HttpError),

    #[error("invalid informational pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Application state structure for the web server
///
/// Everything here is built once at start-up and shared read-only between
/// requests.
pub struct AppState {
    /// Settings snapshot the collaborators below were built from
    pub config: Arc<Settings>,
    pub fetcher: HttpFetcher,
    pub classifier: RegionClassifier<GeoIpChain>,
    pub registry: ExplodeRegistry,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(config: Arc<Settings>) -> Result<Self, AppStateError> {
        let client = build_client()?;

        let fetcher = HttpFetcher::new(
            client.clone(),
            config.subscription_user_agent.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
        );

        let providers = if config.geoip_enabled {
            GeoProvider::ALL.to_vec()
        } else {
            Vec::new()
        };
        let geo = GeoIpChain::new(
            client,
            providers,
            Duration::from_secs(config.geoip_timeout_secs),
            config.geoip_user_agent.clone(),
        );
        let classifier = RegionClassifier::new(geo, INFORMATIONAL_PATTERN)?;

        Ok(Self {
            config,
            fetcher,
            classifier,
            registry: ExplodeRegistry::default(),
        })
    }
}
