//! Geolocation lookup abstraction.

use async_trait::async_trait;
use std::net::IpAddr;

/// Location resolved for an IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub city: Option<String>,
}

impl GeoInfo {
    /// Renders the location as stored on a click.
    ///
    /// `"City, Country"`, or `"Country"` when the city is empty. `None` when
    /// no country is known.
    pub fn display(&self) -> Option<String> {
        let country = non_empty(self.country.as_deref())?;
        match non_empty(self.city.as_deref()) {
            Some(city) => Some(format!("{city}, {country}")),
            None => Some(country.to_string()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves IP addresses to locations.
///
/// Lookups never fail: any provider error yields `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}

/// Whether an address can be meaningfully geolocated.
///
/// Loopback, private, link-local and unspecified addresses are skipped, as
/// are strings that do not parse as an IP.
pub fn is_routable(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            !(v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified())
        }
        Ok(IpAddr::V6(v6)) => !(v6.is_loopback() || v6.is_unspecified()),
        Err(_) => false,
    }
}
