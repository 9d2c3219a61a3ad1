use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::location::{BrowserProvider, Coordinate, DeviceReport, LocationAcquirer};
use crate::map::MapView;

use super::state::AppState;
use super::static_files;

// ─── Static file handlers ────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

pub async fn style() -> Response {
    (
        [(header::CONTENT_TYPE, "text/css")],
        static_files::STYLE_CSS,
    )
        .into_response()
}

pub async fn script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        static_files::APP_JS,
    )
        .into_response()
}

// ─── Region responses ────────────────────────────────────────────

/// What the page needs after an action: the region to fill and its content.
///
/// `html` is the region's current content, which may come from a newer
/// request than the one answered here.
#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub region: &'static str,
    pub html: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
}

// ─── POST /api/location ──────────────────────────────────────────

/// Body of `POST /api/location`.
///
/// The page sends what its geolocation call produced, or
/// `{"supported": false}` when the browser has no geolocation. An empty
/// body uses the location source the server was started with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationRequest {
    Device(DeviceReport),
    Capability { supported: bool },
}

pub async fn locate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<RegionResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let request: Option<LocationRequest> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let parsed = serde_json::from_slice(&body).map_err(|e| {
            log::warn!("POST /api/location -> invalid body: {e}");
            (StatusCode::BAD_REQUEST, format!("invalid location report: {e}"))
        })?;
        Some(parsed)
    };

    let device = match request {
        None | Some(LocationRequest::Capability { supported: true }) => None,
        Some(LocationRequest::Capability { supported: false }) => {
            Some(LocationAcquirer::unsupported())
        }
        Some(LocationRequest::Device(report)) => Some(
            LocationAcquirer::new(Arc::new(BrowserProvider::new(report)))
                .with_options(state.acquirer.options().clone()),
        ),
    };
    let acquirer = device.as_ref().unwrap_or(&state.acquirer);
    let result = acquirer.acquire_location(&state.session).await;

    let outcome = match &result {
        Ok(_) => "fix".to_string(),
        Err(e) => format!("{:?}", e),
    };
    log::info!(
        "POST /api/location -> {} ({:.1}ms)",
        outcome,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    let region = state.session.location_region();
    Ok(Json(RegionResponse {
        region: region.id(),
        html: region.html(),
        ok: result.is_ok(),
        coordinate: state.session.coordinate(),
        map: Some(state.session.map()),
    }))
}

// ─── POST /api/address ───────────────────────────────────────────

pub async fn address(State(state): State<Arc<AppState>>) -> Json<RegionResponse> {
    let start = Instant::now();
    let result = state.resolver.resolve_address(&state.session).await;

    let outcome = match &result {
        Ok(details) => details.city.clone().unwrap_or_else(|| "address".into()),
        Err(e) => format!("{:?}", e),
    };
    log::info!(
        "POST /api/address -> {} ({:.1}ms)",
        outcome,
        start.elapsed().as_secs_f64() * 1000.0,
    );

    let region = state.session.address_region();
    Json(RegionResponse {
        region: region.id(),
        html: region.html(),
        ok: result.is_ok(),
        coordinate: None,
        map: None,
    })
}

// ─── GET /api/map ────────────────────────────────────────────────

pub async fn map(State(state): State<Arc<AppState>>) -> Json<MapView> {
    Json(state.session.map())
}
