//! Shared primitive types used across the predictor.

use serde::Serialize;

/// Unix timestamp in whole seconds.
pub type UnixSeconds = i64;

/// Shop type key ("Seed", "Gear", "Egg", ...). Free-form text: the
/// upstream catalog can introduce new shop types without a code change.
pub type ShopType = String;

/// One predicted shop entry.
///
/// Produced fresh per call and never persisted by this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub item: String,
    pub stock: i64,
    /// How many restock cycles ahead of the current one this entry is for.
    pub restocks_ahead: u64,
    /// Wall-clock time of the cycle, set by occurrence searches only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at_unix: Option<UnixSeconds>,
}
