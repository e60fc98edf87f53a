use crate::model::{FoodTruckRecord, GeoCoordinate};
use async_trait::async_trait;
use foodtrucks_common::Result;

/// Where the food truck dataset comes from.
#[async_trait]
pub trait TruckSource: Send + Sync {
    /// Fetch the whole dataset in source order.
    async fn fetch_all(&self) -> Result<Vec<FoodTruckRecord>>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Turns a free-text address (here: a ZIP code) into a coordinate.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Location of the first match for `address`. No match is an error.
    async fn geocode(&self, address: &str) -> Result<GeoCoordinate>;

    fn name(&self) -> &str;
}
