//! Client for the SF mobile food facility permit dataset (Socrata JSON endpoint).
//!
//! One GET, no paging parameters: the endpoint's default result set is the
//! whole dataset as far as the view is concerned. An optional Socrata app
//! token goes out as `X-App-Token` to lift the anonymous throttling limits.
use async_trait::async_trait;
use foodtrucks_common::{FoodTruckError, Result};
use foodtrucks_core::{FoodTruckRecord, TruckSource};
use foodtrucks_http::{Auth, HeaderName, HeaderValue, HttpClient, HttpError, RequestOpts};

const APP_TOKEN_HEADER: &str = "x-app-token";

#[derive(Clone)]
pub struct SfDatasetApi {
    http: HttpClient,
    app_token: Option<HeaderValue>,
}

impl SfDatasetApi {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = HttpClient::new(endpoint)
            .map_err(|e| FoodTruckError::Config(format!("dataset endpoint: {e}")))?;
        Ok(Self::with_http(http))
    }

    pub fn with_http(http: HttpClient) -> Self {
        Self {
            http,
            app_token: None,
        }
    }

    /// Send `token` as `X-App-Token` on every request.
    pub fn with_app_token(mut self, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(token.trim())
            .map_err(|e| FoodTruckError::Config(format!("dataset app token: {e}")))?;
        value.set_sensitive(true);
        self.app_token = Some(value);
        Ok(self)
    }

    pub async fn fetch_records(&self) -> std::result::Result<Vec<FoodTruckRecord>, HttpError> {
        let opts = RequestOpts {
            auth: self.app_token.clone().map(|value| Auth::Header {
                name: HeaderName::from_static(APP_TOKEN_HEADER),
                value,
            }),
            ..Default::default()
        };
        let records: Vec<FoodTruckRecord> = self.http.get_json("", opts).await?;
        tracing::debug!(
            endpoint = %self.http.base(),
            records = records.len(),
            "dataset.fetched"
        );
        Ok(records)
    }
}

#[async_trait]
impl TruckSource for SfDatasetApi {
    async fn fetch_all(&self) -> Result<Vec<FoodTruckRecord>> {
        self.fetch_records()
            .await
            .map_err(|e| FoodTruckError::Dataset(e.to_string()))
    }

    fn name(&self) -> &str {
        "sf-mobile-food-facility-permits"
    }
}
