//! Reverse geocoding: from the session's coordinate to a postal address.

pub mod nominatim;
pub mod resolver;
pub mod types;

pub use nominatim::{AddressFuture, Nominatim, ReverseGeocoder};
pub use resolver::AddressResolver;
pub use types::{AddressDetails, GeocodeError, ResolveError};
