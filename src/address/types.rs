//! Address types and errors.

use serde::{Deserialize, Serialize};

/// The address fields shown to the user. Missing fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    pub country: Option<String>,
    pub state: Option<String>,
    /// City, falling back to town, then village.
    pub city: Option<String>,
    pub suburb: Option<String>,
    pub road: Option<String>,
    pub postcode: Option<String>,
}

/// Why the geocoder produced no address. Logged, never shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Parse(String),
    #[error("response has no address: {0}")]
    MissingAddress(String),
    #[error("lookup task failed: {0}")]
    Task(String),
}

/// Failure of an address resolution as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("⚠️ Primeiro obtenha as coordenadas!")]
    CoordinatesMissing,
    #[error("❌ Erro ao buscar o endereço!")]
    LookupFailed(#[source] GeocodeError),
}
