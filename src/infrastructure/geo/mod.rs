//! IP geolocation for click events.
//!
//! - [`IpApiGeoLookup`] - External HTTP API with a request timeout
//! - [`NullGeoLookup`] - No-op provider when geolocation is disabled

mod ip_api;
mod null;
mod provider;

pub use ip_api::IpApiGeoLookup;
pub use null::NullGeoLookup;
pub use provider::{GeoInfo, GeoLookup, is_routable};

#[cfg(test)]
pub use provider::MockGeoLookup;
