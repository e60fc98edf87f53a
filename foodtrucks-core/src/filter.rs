//! Projections of a freshly fetched dataset.
use crate::model::{FoodTruckRecord, TacoTruckSummary};

/// The leading `limit` records in source order.
pub fn available_trucks(records: &[FoodTruckRecord], limit: usize) -> Vec<FoodTruckRecord> {
    records.iter().take(limit).cloned().collect()
}

/// Every record whose food items mention tacos, projected to selector entries.
pub fn taco_trucks(records: &[FoodTruckRecord]) -> Vec<TacoTruckSummary> {
    records
        .iter()
        .filter(|r| r.serves_tacos())
        .map(TacoTruckSummary::from)
        .collect()
}

/// First record whose permit equals `permit`.
pub fn find_by_permit<'a>(
    records: &'a [FoodTruckRecord],
    permit: &str,
) -> Option<&'a FoodTruckRecord> {
    records.iter().find(|r| r.permit.as_deref() == Some(permit))
}
