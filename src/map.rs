//! Map widget state.
//!
//! The server keeps the map as plain data; the page replays it onto Leaflet
//! after every change, keyed by `revision`.

use crate::location::Coordinate;
use serde::Serialize;

pub const DEFAULT_ZOOM: u8 = 2;
/// Zoom used when centring on a fresh fix.
pub const POSITION_ZOOM: u8 = 18;
pub const POSITION_POPUP: &str = "📍 Você está aqui!";

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinate,
    pub popup: Option<String>,
    pub popup_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerId(usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    center: Coordinate,
    zoom: u8,
    tile_layers: Vec<TileLayer>,
    markers: Vec<Marker>,
    revision: u64,
}

impl MapView {
    pub fn initialize(center: Coordinate, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            tile_layers: Vec::new(),
            markers: Vec::new(),
            revision: 0,
        }
    }

    /// World view over OpenStreetMap tiles.
    pub fn openstreetmap() -> Self {
        let mut map = Self::initialize(Coordinate::new(0.0, 0.0), DEFAULT_ZOOM);
        map.add_tile_layer(OSM_TILE_URL, OSM_ATTRIBUTION);
        map
    }

    pub fn add_tile_layer(&mut self, url: impl Into<String>, attribution: impl Into<String>) {
        self.tile_layers.push(TileLayer {
            url: url.into(),
            attribution: attribution.into(),
        });
        self.revision += 1;
    }

    pub fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.revision += 1;
    }

    pub fn add_marker(&mut self, position: Coordinate) -> MarkerId {
        self.markers.push(Marker {
            position,
            popup: None,
            popup_open: false,
        });
        self.revision += 1;
        MarkerId(self.markers.len() - 1)
    }

    pub fn bind_popup(&mut self, id: MarkerId, text: impl Into<String>) {
        if let Some(marker) = self.markers.get_mut(id.0) {
            marker.popup = Some(text.into());
            self.revision += 1;
        }
    }

    /// Opens the marker's popup and closes any other. No-op without a bound popup.
    pub fn open_popup(&mut self, id: MarkerId) {
        let has_popup = self
            .markers
            .get(id.0)
            .is_some_and(|m| m.popup.is_some());
        if !has_popup {
            return;
        }
        for (i, marker) in self.markers.iter_mut().enumerate() {
            marker.popup_open = i == id.0;
        }
        self.revision += 1;
    }

    /// Centre on a fix and pin it with the "you are here" popup.
    pub fn show_position(&mut self, position: Coordinate) {
        self.set_view(position, POSITION_ZOOM);
        let marker = self.add_marker(position);
        self.bind_popup(marker, POSITION_POPUP);
        self.open_popup(marker);
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::openstreetmap()
    }
}
