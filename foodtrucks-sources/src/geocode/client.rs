//! Address-only lookups against the Google Geocoding API.
//!
//! The raw user input goes out as the `address` parameter and the first
//! result's location comes back. The API key, when configured, travels as
//! the `key` query parameter and is redacted by the HTTP layer's logging.
use super::types::GeocodeResponse;
use async_trait::async_trait;
use foodtrucks_common::{FoodTruckError, Result};
use foodtrucks_core::{GeoCoordinate, Geocoder};
use foodtrucks_http::{Auth, HttpClient, RequestOpts};
use std::borrow::Cow;

#[derive(Clone)]
pub struct GoogleGeocoder {
    http: HttpClient,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self> {
        let http = HttpClient::new(endpoint)
            .map_err(|e| FoodTruckError::Config(format!("geocoding endpoint: {e}")))?;
        Ok(Self::with_http(http, api_key))
    }

    pub fn with_http(http: HttpClient, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    pub async fn lookup(&self, address: &str) -> Result<GeocodeResponse> {
        let opts = RequestOpts {
            query: Some(vec![("address", Cow::Borrowed(address))]),
            auth: self.api_key.as_deref().map(|key| Auth::Query {
                name: "key",
                value: Cow::Borrowed(key),
            }),
            ..Default::default()
        };

        self.http
            .get_json("", opts)
            .await
            .map_err(|e| FoodTruckError::Geocode(e.to_string()))
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoCoordinate> {
        let resp = self.lookup(address).await?;

        let Some(first) = resp.results.first() else {
            tracing::warn!(
                address,
                status = ?resp.status,
                error_message = ?resp.error_message,
                "geocode.no_results"
            );
            return Err(FoodTruckError::NoGeocodeResult(address.to_string()));
        };

        let loc = first.geometry.location;
        tracing::debug!(
            address,
            lat = loc.lat,
            lng = loc.lng,
            formatted = ?first.formatted_address,
            "geocode.resolved"
        );
        GeoCoordinate::new(loc.lat, loc.lng).ok_or_else(|| {
            FoodTruckError::Geocode(format!(
                "coordinate out of range: {}, {}",
                loc.lat, loc.lng
            ))
        })
    }

    fn name(&self) -> &str {
        "google-geocoding"
    }
}
