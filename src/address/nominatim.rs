//! Reverse geocoding against OpenStreetMap Nominatim.

use super::types::{AddressDetails, GeocodeError};
use crate::location::Coordinate;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;

pub type AddressFuture<'a> =
    Pin<Box<dyn Future<Output = Result<AddressDetails, GeocodeError>> + Send + 'a>>;

/// Resolves a coordinate to a structured address.
pub trait ReverseGeocoder: Send + Sync + 'static {
    fn reverse(&self, coordinate: Coordinate) -> AddressFuture<'_>;
}

#[derive(Deserialize, Debug)]
struct ReverseResult {
    address: Option<RawAddress>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct RawAddress {
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    suburb: Option<String>,
    road: Option<String>,
    postcode: Option<String>,
}

impl From<RawAddress> for AddressDetails {
    fn from(raw: RawAddress) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            country: present(raw.country),
            state: present(raw.state),
            city: present(raw.city)
                .or_else(|| present(raw.town))
                .or_else(|| present(raw.village)),
            suburb: present(raw.suburb),
            road: present(raw.road),
            postcode: present(raw.postcode),
        }
    }
}

/// Nominatim `/reverse` client.
#[derive(Debug, Clone)]
pub struct Nominatim {
    base_url: String,
    language: String,
    user_agent: String,
}

impl Nominatim {
    pub fn new(
        base_url: impl Into<String>,
        language: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            language: language.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn reverse_url(&self, c: Coordinate) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}&accept-language={}",
            self.base_url.trim_end_matches('/'),
            c.lat,
            c.lon,
            urlencod(&self.language),
        )
    }

    fn lookup(&self, c: Coordinate) -> Result<AddressDetails, GeocodeError> {
        let url = self.reverse_url(c);
        log::debug!("GET {url}");

        let response = ureq::get(&url)
            .set("User-Agent", &self.user_agent)
            .call()
            .map_err(geocode_error)?;

        let body = response
            .into_string()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        log::debug!("Nominatim response: {body}");

        parse_reverse(&body)
    }
}

impl ReverseGeocoder for Nominatim {
    fn reverse(&self, coordinate: Coordinate) -> AddressFuture<'_> {
        let client = self.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || client.lookup(coordinate))
                .await
                .map_err(|e| GeocodeError::Task(e.to_string()))?
        })
    }
}

fn geocode_error(err: ureq::Error) -> GeocodeError {
    match err {
        ureq::Error::Status(code, _) => GeocodeError::Status(code),
        ureq::Error::Transport(t) => GeocodeError::Transport(t.to_string()),
    }
}

fn parse_reverse(body: &str) -> Result<AddressDetails, GeocodeError> {
    let result: ReverseResult =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

    match result.address {
        Some(raw) => Ok(raw.into()),
        None => Err(GeocodeError::MissingAddress(
            result.error.unwrap_or_else(|| "no address object".into()),
        )),
    }
}

// ─── URL encoding (minimal, no extra dep) ───────────────────────

fn urlencod(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            _ if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '~' => {
                c.to_string()
            }
            _ => {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{:02X}", b))
                    .collect::<String>()
            }
        })
        .collect()
}
