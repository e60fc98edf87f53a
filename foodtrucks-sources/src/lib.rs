//! HTTP-backed implementations of the core [`TruckSource`] and [`Geocoder`] traits.
//!
//! [`TruckSource`]: foodtrucks_core::TruckSource
//! [`Geocoder`]: foodtrucks_core::Geocoder
pub mod dataset;
pub mod geocode;

pub use dataset::SfDatasetApi;
pub use geocode::GoogleGeocoder;
