//! A small tokio actor runtime plus the one domain actor the view talks to.
//!
//! The view owns [`foodtrucks_core::ViewState`]; network work is delegated
//! to [`finder::FinderActor`], which answers on a oneshot channel so the view
//! never blocks its own mailbox.
pub mod actor;
pub mod builder;
pub mod finder;
pub mod system;

use foodtrucks_core::{FoodTruckRecord, NearbyFailure, NearbyTruck};
use tokio::sync::oneshot;

/// Outcome of the dataset fetch, ready for `ViewState::finish_load`.
pub type LoadOutcome = Result<Vec<FoodTruckRecord>, String>;

/// Outcome of a nearby lookup, ready for `ViewState::finish_nearby`.
pub type NearbyOutcome = Result<Vec<NearbyTruck>, NearbyFailure>;

pub enum FinderMsg {
    LoadDataset {
        reply: oneshot::Sender<LoadOutcome>,
    },
    FindNearby {
        zip_code: String,
        candidates: Vec<FoodTruckRecord>,
        radius_km: f64,
        reply: oneshot::Sender<NearbyOutcome>,
    },
}
