//! Domain logic for the food truck finder.
//!
//! Everything here is independent of terminals and HTTP: the dataset record
//! model, the taco filter, distance math, and [`ViewState`], the single
//! owner of what the view shows. Network access comes in through the
//! [`TruckSource`] and [`Geocoder`] traits so actions can run against
//! in-memory fakes.
pub mod actions;
pub mod filter;
pub mod geo;
pub mod model;
pub mod source;
pub mod state;

pub use geo::{NearbyFailure, NearbyPolicy, NearbyScope};
pub use model::{FoodTruckRecord, GeoCoordinate, NearbyTruck, TacoTruckSummary, TruckDetails};
pub use source::{Geocoder, TruckSource};
pub use state::{EMPTY_DETAILS_MESSAGE, ViewState};
