//! HTTP geolocation provider compatible with ip-api.com.

use super::provider::{GeoInfo, GeoLookup, is_routable};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{trace, warn};

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: Option<String>,
    country: Option<String>,
    city: Option<String>,
}

/// Queries an external JSON API for each address.
///
/// The URL template uses `{ip}` as a placeholder, e.g.
/// `http://ip-api.com/json/{ip}?fields=status,country,city`.
pub struct IpApiGeoLookup {
    client: reqwest::Client,
    url_template: String,
}

impl IpApiGeoLookup {
    /// Builds a provider whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the HTTP client cannot be built.
    pub fn new(url_template: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url_template: url_template.to_string(),
        })
    }

    fn url_for(&self, ip: &str) -> String {
        self.url_template.replace("{ip}", ip)
    }
}

#[async_trait]
impl GeoLookup for IpApiGeoLookup {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        if !is_routable(ip) {
            trace!(ip, "Skipping geolocation for non-routable address");
            return None;
        }

        let url = self.url_for(ip);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(ip, error = %e, "Geolocation request failed");
                return None;
            }
        };

        let body: IpApiResponse = match response.error_for_status() {
            Ok(r) => match r.json().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(ip, error = %e, "Geolocation response parse failed");
                    return None;
                }
            },
            Err(e) => {
                warn!(ip, error = %e, "Geolocation provider returned an error status");
                return None;
            }
        };

        if body.status.as_deref() == Some("fail") {
            trace!(ip, "Geolocation provider reported fail status");
            return None;
        }

        Some(GeoInfo {
            country: body.country,
            city: body.city,
        })
    }

    fn name(&self) -> &'static str {
        "ip-api"
    }
}
