//! Runtime configuration, assembled from command-line flags.

use crate::address::{AddressResolver, Nominatim};
use crate::location::{
    Coordinate, FixedProvider, IpApiProvider, LocationAcquirer, LocationOptions, LocationProvider,
};
use std::sync::Arc;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_LANGUAGE: &str = "pt-br";
pub const DEFAULT_IPAPI_URL: &str = "https://ipapi.co/json/";
/// Nominatim's usage policy requires an identifying User-Agent.
pub const USER_AGENT: &str = concat!("onde/", env!("CARGO_PKG_VERSION"));

/// Where location fixes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// No location capability.
    None,
    Fixed(Coordinate),
    IpApi,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: LocationSource,
    pub location: LocationOptions,
    pub nominatim_url: String,
    pub language: String,
    pub ipapi_url: String,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: LocationSource::None,
            location: LocationOptions::default(),
            nominatim_url: DEFAULT_NOMINATIM_URL.into(),
            language: DEFAULT_LANGUAGE.into(),
            ipapi_url: DEFAULT_IPAPI_URL.into(),
            user_agent: USER_AGENT.into(),
        }
    }
}

impl Config {
    pub fn location_provider(&self) -> Option<Arc<dyn LocationProvider>> {
        let provider: Arc<dyn LocationProvider> = match self.source {
            LocationSource::None => return None,
            LocationSource::Fixed(c) => Arc::new(FixedProvider::new(c)),
            LocationSource::IpApi => Arc::new(IpApiProvider::new(
                self.ipapi_url.clone(),
                self.user_agent.clone(),
            )),
        };
        Some(provider)
    }

    pub fn acquirer(&self) -> LocationAcquirer {
        let acquirer = match self.location_provider() {
            Some(provider) => LocationAcquirer::new(provider),
            None => LocationAcquirer::unsupported(),
        };
        acquirer.with_options(self.location.clone())
    }

    pub fn resolver(&self) -> AddressResolver {
        AddressResolver::new(Arc::new(Nominatim::new(
            self.nominatim_url.clone(),
            self.language.clone(),
            self.user_agent.clone(),
        )))
    }
}
