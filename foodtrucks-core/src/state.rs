//! Everything the view renders, and the only code that changes it.
//!
//! Each async action is split into a `begin_*` step (run when the action is
//! triggered) and a `finish_*` step (run with the action's outcome). The
//! owner may interleave them freely; when two nearby lookups overlap, the
//! one that finishes last decides what is shown.
use crate::filter;
use crate::geo::{NearbyFailure, NearbyScope};
use crate::model::{FoodTruckRecord, NearbyTruck, TacoTruckSummary, TruckDetails};

pub const EMPTY_DETAILS_MESSAGE: &str = "Selected taco truck has empty details.";

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    loading: bool,
    error: Option<String>,
    loaded: Vec<FoodTruckRecord>,
    available: Vec<FoodTruckRecord>,
    taco_trucks: Vec<TacoTruckSummary>,
    selected: Option<FoodTruckRecord>,
    zip_code: String,
    nearby: Vec<NearbyTruck>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The first `available_limit` records of the dataset.
    pub fn available(&self) -> &[FoodTruckRecord] {
        &self.available
    }

    pub fn taco_trucks(&self) -> &[TacoTruckSummary] {
        &self.taco_trucks
    }

    pub fn selected(&self) -> Option<&FoodTruckRecord> {
        self.selected.as_ref()
    }

    /// Details panel contents for the current selection.
    pub fn details(&self) -> Option<TruckDetails> {
        self.selected.as_ref().and_then(FoodTruckRecord::details)
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn nearby(&self) -> &[NearbyTruck] {
        &self.nearby
    }

    /// Records the nearby action should evaluate.
    pub fn nearby_candidates(&self, scope: NearbyScope) -> &[FoodTruckRecord] {
        match scope {
            NearbyScope::Available => &self.available,
            NearbyScope::All => &self.loaded,
        }
    }

    pub fn set_zip_code(&mut self, zip_code: impl Into<String>) {
        self.zip_code = zip_code.into();
    }

    // ----- DataLoader -----

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply the dataset response. Both lists derive from the same response.
    pub fn finish_load(&mut self, outcome: Result<Vec<FoodTruckRecord>, String>, limit: usize) {
        match outcome {
            Ok(records) => {
                self.available = filter::available_trucks(&records, limit);
                self.taco_trucks = filter::taco_trucks(&records);
                self.loaded = records;
                tracing::info!(
                    loaded = self.loaded.len(),
                    available = self.available.len(),
                    taco_trucks = self.taco_trucks.len(),
                    "dataset.loaded"
                );
            }
            Err(message) => {
                tracing::warn!(error = %message, "dataset.failed");
                self.loaded.clear();
                self.available.clear();
                self.taco_trucks.clear();
                self.error = Some(message);
            }
        }
        self.loading = false;
    }

    // ----- TacoSelector -----

    /// Resolve `permit` against the available list and show its details.
    ///
    /// Resolution only looks at the available list, so a taco truck that sits
    /// past the first `limit` records is reported as having empty details.
    pub fn select_taco_truck(&mut self, permit: &str) -> bool {
        let resolved = filter::find_by_permit(&self.available, permit)
            .filter(|truck| truck.details().is_some())
            .cloned();

        match resolved {
            Some(truck) => {
                tracing::debug!(permit, applicant = truck.name(), "taco.selected");
                self.error = None;
                self.selected = Some(truck);
                true
            }
            None => {
                tracing::debug!(permit, "taco.selection_incomplete");
                self.error = Some(EMPTY_DETAILS_MESSAGE.to_string());
                self.selected = None;
                false
            }
        }
    }

    // ----- NearbyFinder -----

    pub fn begin_nearby(&mut self) {
        self.loading = true;
        self.error = None;
        self.nearby.clear();
    }

    pub fn finish_nearby(&mut self, outcome: Result<Vec<NearbyTruck>, NearbyFailure>) {
        match outcome {
            Ok(hits) => {
                tracing::info!(zip = %self.zip_code, hits = hits.len(), "nearby.done");
                self.nearby = hits;
            }
            Err(failure) => {
                tracing::warn!(zip = %self.zip_code, ?failure, "nearby.failed");
                self.nearby.clear();
                self.error = Some(failure.to_string());
            }
        }
        self.loading = false;
    }
}
