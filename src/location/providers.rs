//! Location providers: a fix reported by the user's device, a fixed fix from
//! the command line, and IP geolocation.

use super::types::{Coordinate, LocationError, LocationOptions, Position};
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type PositionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Position, LocationError>> + Send + 'a>>;

/// The host's location capability.
///
/// Every call resolves exactly once, either with a fix or with one of the
/// four [`LocationError`] kinds.
pub trait LocationProvider: Send + Sync + 'static {
    fn current_position(&self, options: &LocationOptions) -> PositionFuture<'_>;
}

// ─── Fixed provider ─────────────────────────────────────────────

/// Reports the same coordinate on every request, stamped with the request time.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    coordinate: Coordinate,
}

impl FixedProvider {
    pub const fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl LocationProvider for FixedProvider {
    fn current_position(&self, _options: &LocationOptions) -> PositionFuture<'_> {
        let position = Position::now(self.coordinate);
        Box::pin(async move { Ok(position) })
    }
}

// ─── Device-reported fix ────────────────────────────────────────

/// What the page's geolocation call produced: a fix, or the numeric error
/// code of the failure.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DeviceReport {
    Fix {
        lat: f64,
        lon: f64,
        #[serde(default)]
        accuracy: Option<f64>,
    },
    Failed {
        code: u16,
    },
}

/// Replays one report from the user's device.
///
/// The device applies its own timeout and cache policy, so the fix is
/// stamped when it reaches us.
#[derive(Debug, Clone)]
pub struct BrowserProvider {
    report: DeviceReport,
}

impl BrowserProvider {
    pub const fn new(report: DeviceReport) -> Self {
        Self { report }
    }
}

impl LocationProvider for BrowserProvider {
    fn current_position(&self, _options: &LocationOptions) -> PositionFuture<'_> {
        let outcome = match self.report {
            DeviceReport::Fix { lat, lon, accuracy } => {
                let position = Position::now(Coordinate::new(lat, lon));
                Ok(match accuracy {
                    Some(metres) => position.with_accuracy(metres),
                    None => position,
                })
            }
            DeviceReport::Failed { code } => Err(LocationError::from_code(code)),
        };
        Box::pin(async move { outcome })
    }
}

// ─── IP-based geolocation ───────────────────────────────────────

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// Locates the host by its public IP address (ipapi.co).
#[derive(Debug, Clone)]
pub struct IpApiProvider {
    url: String,
    user_agent: String,
}

impl IpApiProvider {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl LocationProvider for IpApiProvider {
    fn current_position(&self, options: &LocationOptions) -> PositionFuture<'_> {
        let timeout = options.timeout;
        Box::pin(async move {
            let url = self.url.clone();
            let user_agent = self.user_agent.clone();
            tokio::task::spawn_blocking(move || ip_geolocate(&url, &user_agent, timeout))
                .await
                .unwrap_or_else(|e| {
                    log::error!("IP geolocation task failed: {e}");
                    Err(LocationError::Unknown)
                })
        })
    }
}

fn ip_geolocate(url: &str, user_agent: &str, timeout: Duration) -> Result<Position, LocationError> {
    let response = ureq::get(url)
        .set("User-Agent", user_agent)
        .timeout(timeout)
        .call()
        .map_err(classify_error)?;

    let body = response.into_string().map_err(|e| {
        log::warn!("IP geolocation body unreadable: {e}");
        LocationError::PositionUnavailable
    })?;

    position_from_body(&body)
}

fn classify_error(err: ureq::Error) -> LocationError {
    match err {
        ureq::Error::Status(401 | 403, _) => LocationError::PermissionDenied,
        ureq::Error::Status(code, _) => {
            log::warn!("IP geolocation returned status {code}");
            LocationError::PositionUnavailable
        }
        ureq::Error::Transport(t) => {
            log::warn!("IP geolocation transport error: {t}");
            LocationError::PositionUnavailable
        }
    }
}

fn position_from_body(body: &str) -> Result<Position, LocationError> {
    let r: IpApiResult = serde_json::from_str(body).map_err(|e| {
        log::warn!("IP geolocation returned invalid JSON: {e}");
        LocationError::PositionUnavailable
    })?;

    if r.error {
        log::warn!(
            "IP geolocation refused: {}",
            r.reason.as_deref().unwrap_or("no reason given")
        );
        return Err(LocationError::PositionUnavailable);
    }

    match (r.latitude, r.longitude) {
        (Some(lat), Some(lon)) => Ok(Position::now(Coordinate::new(lat, lon))),
        _ => Err(LocationError::PositionUnavailable),
    }
}
