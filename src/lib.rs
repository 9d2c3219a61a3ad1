//! Onde: find the device on a map and resolve it to a postal address.
//!
//! Two user-triggered operations share a [`session::Session`]:
//! [`location::LocationAcquirer`] asks a location provider for a fix, and
//! [`address::AddressResolver`] reverse-geocodes the last fix through
//! Nominatim. Both write their outcome as HTML into a display region.

pub mod address;
pub mod config;
pub mod display;
pub mod location;
pub mod map;
pub mod server;
pub mod session;
