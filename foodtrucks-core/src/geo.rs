//! Great-circle distance and the proximity filter behind "find nearby".
use crate::model::{FoodTruckRecord, GeoCoordinate, NearbyTruck};
use std::cmp::Ordering;

/// Mean Earth radius (IUGG), kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Terminal failures of the nearby action. `Display` is the text shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NearbyFailure {
    #[error("Failed to get location coordinates.")]
    Geocode,
    #[error("Failed to find nearby food trucks.")]
    Compute,
}

/// Which loaded records the nearby action evaluates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NearbyScope {
    #[default]
    Available,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyPolicy {
    pub radius_km: f64,
    pub scope: NearbyScope,
}

impl Default for NearbyPolicy {
    fn default() -> Self {
        Self {
            radius_km: 2.0,
            scope: NearbyScope::Available,
        }
    }
}

/// Haversine distance between two points, in kilometres.
pub fn distance_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Trucks within `radius_km` of `origin`, closest first.
///
/// Records without usable coordinates are skipped. Equal distances keep
/// their input order.
pub fn nearby_trucks(
    origin: GeoCoordinate,
    trucks: &[FoodTruckRecord],
    radius_km: f64,
) -> Result<Vec<NearbyTruck>, NearbyFailure> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        tracing::warn!(radius_km, "nearby.invalid_radius");
        return Err(NearbyFailure::Compute);
    }

    let mut hits: Vec<NearbyTruck> = trucks
        .iter()
        .filter_map(|truck| {
            let at = truck.coordinate()?;
            let distance_km = distance_km(origin, at);
            (distance_km <= radius_km).then(|| NearbyTruck {
                record: truck.clone(),
                distance_km,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    Ok(hits)
}
