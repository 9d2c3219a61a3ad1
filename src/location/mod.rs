//! Location acquisition: providers and the acquirer that drives them.

pub mod acquirer;
pub mod providers;
pub mod types;

pub use acquirer::LocationAcquirer;
pub use providers::{
    BrowserProvider, DeviceReport, FixedProvider, IpApiProvider, LocationProvider, PositionFuture,
};
pub use types::{AcquireError, Coordinate, LocationError, LocationOptions, Position};
