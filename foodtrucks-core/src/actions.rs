//! The two network-backed actions, as plain async functions.
//!
//! [`load_dataset`] and [`locate_nearby`] do the I/O and return an outcome
//! ready for the matching `ViewState::finish_*` step. [`run_initial_load`]
//! and [`run_find_nearby`] chain begin, I/O and finish for callers that own
//! the state across the await (headless commands, tests).
use crate::geo::{self, NearbyFailure, NearbyPolicy};
use crate::model::{FoodTruckRecord, NearbyTruck};
use crate::source::{Geocoder, TruckSource};
use crate::state::ViewState;

pub async fn load_dataset(source: &dyn TruckSource) -> Result<Vec<FoodTruckRecord>, String> {
    tracing::debug!(source = source.name(), "dataset.fetch.start");
    source.fetch_all().await.map_err(|e| e.to_string())
}

/// Geocode `zip_code` and filter `candidates` around it.
pub async fn locate_nearby(
    geocoder: &dyn Geocoder,
    zip_code: &str,
    candidates: &[FoodTruckRecord],
    radius_km: f64,
) -> Result<Vec<NearbyTruck>, NearbyFailure> {
    tracing::debug!(geocoder = geocoder.name(), zip = zip_code, "nearby.geocode.start");
    let origin = geocoder.geocode(zip_code).await.map_err(|e| {
        tracing::warn!(zip = zip_code, error = %e, "nearby.geocode.failed");
        NearbyFailure::Geocode
    })?;
    tracing::debug!(lat = origin.lat, lng = origin.lng, "nearby.geocode.done");
    geo::nearby_trucks(origin, candidates, radius_km)
}

pub async fn run_initial_load(state: &mut ViewState, source: &dyn TruckSource, limit: usize) {
    state.begin_load();
    let outcome = load_dataset(source).await;
    state.finish_load(outcome, limit);
}

pub async fn run_find_nearby(state: &mut ViewState, geocoder: &dyn Geocoder, policy: NearbyPolicy) {
    state.begin_nearby();
    let candidates = state.nearby_candidates(policy.scope).to_vec();
    let zip_code = state.zip_code().to_string();
    let outcome = locate_nearby(geocoder, &zip_code, &candidates, policy.radius_km).await;
    state.finish_nearby(outcome);
}
