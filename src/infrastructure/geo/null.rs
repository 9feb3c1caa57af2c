//! Disabled geolocation.

use super::provider::{GeoInfo, GeoLookup};
use async_trait::async_trait;

/// Geolocation provider used when `GEO_ENABLED=false`. Every lookup yields `None`.
#[derive(Debug, Default)]
pub struct NullGeoLookup;

#[async_trait]
impl GeoLookup for NullGeoLookup {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
