//! Display regions and the markup written into them.

use crate::address::AddressDetails;
use crate::location::Coordinate;
use crate::session::lock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Region showing the outcome of a location request.
pub const LOCATION_REGION: &str = "resultado";
/// Region showing the outcome of an address lookup.
pub const ADDRESS_REGION: &str = "resultado2";

/// Placeholder for an address field the geocoder did not return.
pub const NOT_AVAILABLE: &str = "N/A";

// ─── Regions ────────────────────────────────────────────────────

/// Claim on a region, taken when an operation starts.
#[derive(Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Default)]
struct RegionState {
    applied: u64,
    html: String,
}

/// An output target holding HTML.
///
/// Writes carry the ticket handed out when their operation started; a write
/// whose ticket is not newer than the last applied one is discarded.
pub struct Region {
    id: &'static str,
    issued: AtomicU64,
    state: Mutex<RegionState>,
}

impl Region {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            issued: AtomicU64::new(0),
            state: Mutex::new(RegionState::default()),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn html(&self) -> String {
        lock(&self.state).html.clone()
    }

    pub fn write(&self, ticket: Ticket, html: impl Into<String>) -> bool {
        self.write_with(ticket, html, || ())
    }

    /// Write `html` and run `apply` atomically, unless the ticket is stale.
    pub fn write_with(&self, ticket: Ticket, html: impl Into<String>, apply: impl FnOnce()) -> bool {
        let mut state = lock(&self.state);
        if ticket.0 <= state.applied {
            log::debug!(
                "discarding stale write to #{} (ticket {}, applied {})",
                self.id,
                ticket.0,
                state.applied
            );
            return false;
        }
        state.applied = ticket.0;
        state.html = html.into();
        apply();
        true
    }
}

// ─── Markup ─────────────────────────────────────────────────────

pub fn google_maps_url(c: Coordinate) -> String {
    format!("https://www.google.com.br/maps/@{},{},20z?entry=ttu", c.lat, c.lon)
}

pub fn openstreetmap_url(c: Coordinate) -> String {
    format!("https://www.openstreetmap.org/?mlat={}&mlon={}", c.lat, c.lon)
}

pub fn location_html(c: Coordinate) -> String {
    format!(
        "Latitude: {lat}\n<br>Longitude: {lon}\n<br> <a href=\"{url}\" target=\"_blank\">\n<h4>🌍 Ver no Google Maps</h4></a>",
        lat = c.lat,
        lon = c.lon,
        url = google_maps_url(c),
    )
}

pub fn address_html(details: &AddressDetails, c: Coordinate) -> String {
    let field = |v: &Option<String>| escape_html(v.as_deref().unwrap_or(NOT_AVAILABLE));
    format!(
        "\n    <h3>📍 Detalhes do endereço:</h3>\n    \
         País: {}<br>\n    \
         Estado: {}<br>\n    \
         Cidade: {}<br>\n    \
         Bairro: {}<br>\n    \
         Rua: {}<br>\n    \
         CEP: {}<br>\n    \
         <a href=\"{}\" target=\"_blank\">\n        \
         <h4>🌍 Ver no OpenStreetMap</h4>\n    \
         </a>\n",
        field(&details.country),
        field(&details.state),
        field(&details.city),
        field(&details.suburb),
        field(&details.road),
        field(&details.postcode),
        openstreetmap_url(c),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_html_embeds_coordinates() {
        let html = location_html(Coordinate::new(-23.5, -46.6));
        assert!(html.contains("Latitude: -23.5"));
        assert!(html.contains("Longitude: -46.6"));
        assert!(html.contains(
            "<a href=\"https://www.google.com.br/maps/@-23.5,-46.6,20z?entry=ttu\" target=\"_blank\">"
        ));
        assert!(html.ends_with("<h4>🌍 Ver no Google Maps</h4></a>"));
    }

    #[test]
    fn test_full_precision_is_kept() {
        let c = Coordinate::new(59.329323, 18.068581);
        assert_eq!(
            google_maps_url(c),
            "https://www.google.com.br/maps/@59.329323,18.068581,20z?entry=ttu"
        );
        assert_eq!(
            openstreetmap_url(c),
            "https://www.openstreetmap.org/?mlat=59.329323&mlon=18.068581"
        );
    }

    #[test]
    fn test_address_html_placeholders() {
        let details = AddressDetails {
            country: Some("Brasil".into()),
            city: Some("São Paulo".into()),
            ..AddressDetails::default()
        };
        let html = address_html(&details, Coordinate::new(-23.5, -46.6));
        assert!(html.contains("País: Brasil<br>"));
        assert!(html.contains("Estado: N/A<br>"));
        assert!(html.contains("Cidade: São Paulo<br>"));
        assert!(html.contains("Bairro: N/A<br>"));
        assert!(html.contains("Rua: N/A<br>"));
        assert!(html.contains("CEP: N/A<br>"));
        assert!(html.contains("https://www.openstreetmap.org/?mlat=-23.5&mlon=-46.6"));
    }

    #[test]
    fn test_address_values_are_escaped() {
        let details = AddressDetails {
            road: Some("Rua <b>\"A\" & B</b>".into()),
            ..AddressDetails::default()
        };
        let html = address_html(&details, Coordinate::new(0.0, 0.0));
        assert!(html.contains("Rua: Rua &lt;b&gt;&quot;A&quot; &amp; B&lt;/b&gt;<br>"));
    }

    #[test]
    fn test_region_applies_newer_tickets() {
        let region = Region::new(ADDRESS_REGION);
        let first = region.begin();
        let second = region.begin();

        assert!(region.write(second, "second"));
        assert!(!region.write(first, "first"));
        assert_eq!(region.html(), "second");
    }

    #[test]
    fn test_region_in_order_completions() {
        let region = Region::new(LOCATION_REGION);
        let first = region.begin();
        let second = region.begin();

        assert!(region.write(first, "first"));
        assert_eq!(region.html(), "first");
        assert!(region.write(second, "second"));
        assert_eq!(region.html(), "second");
    }

    #[test]
    fn test_stale_write_skips_side_effect() {
        let region = Region::new(LOCATION_REGION);
        let old = region.begin();
        let new = region.begin();
        region.write(new, "new");

        let mut ran = false;
        assert!(!region.write_with(old, "old", || ran = true));
        assert!(!ran);
    }
}
