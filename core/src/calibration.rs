//! Seed calibration: anchoring the predicted seed sequence to a known
//! seed observed at a known wall-clock time.
//!
//! The derived per-type offset is constant for the process lifetime:
//!   offset = observed_seed - floor(observed_unix / cycle_seconds)
//! and every restock seed, past or future, is then
//!   floor(now / cycle_seconds) + offset, wrapped into u32 range.

use crate::catalog::cycle_seconds;
use crate::types::{ShopType, UnixSeconds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// A known-good (seed, time) observation from the data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    pub shop_type: ShopType,
    pub seed: i64,
    pub observed_at: UnixSeconds,
}

/// A reference (seed, time) pair supplied through configuration.
///
/// These drift whenever the upstream game resynchronizes its RNG stream,
/// so they are configuration data, never baked-in constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReference {
    pub shop_type: ShopType,
    pub seed: i64,
    pub observed_at: UnixSeconds,
}

/// Wrap an arbitrarily large or negative tick count into the u32 seed
/// domain. Wrapping, never overflow.
pub fn normalize_seed(value: i128) -> u32 {
    value.rem_euclid(1 << 32) as u32
}

/// Owns the per-type seed offsets, derived lazily on first use and held
/// for the process lifetime. The map is Mutex-guarded so a multi-threaded
/// host never observes a torn first-populate; the compute branch is cheap
/// enough that a plain lock is fine.
pub struct Calibrator {
    references: HashMap<ShopType, SeedReference>,
    offsets: Mutex<HashMap<ShopType, i64>>,
}

impl Calibrator {
    pub fn new(references: Vec<SeedReference>) -> Self {
        Self {
            references: references
                .into_iter()
                .map(|r| (r.shop_type.clone(), r))
                .collect(),
            offsets: Mutex::new(HashMap::new()),
        }
    }

    /// Seed for the restock cycle containing `now`.
    ///
    /// `stored` is consulted only when no configured reference exists for
    /// the type and the offset is not yet cached; it reads one
    /// calibration record from the data store.
    pub fn base_seed(
        &self,
        shop_type: &str,
        now: UnixSeconds,
        stored: impl FnOnce() -> Option<CalibrationRecord>,
    ) -> u32 {
        let cycle = cycle_seconds(shop_type);
        let cycles_since_epoch = now.div_euclid(cycle);
        let offset = self.offset_for(shop_type, cycle, stored);
        normalize_seed(i128::from(cycles_since_epoch) + i128::from(offset))
    }

    fn offset_for(
        &self,
        shop_type: &str,
        cycle: i64,
        stored: impl FnOnce() -> Option<CalibrationRecord>,
    ) -> i64 {
        let mut offsets = self
            .offsets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(offset) = offsets.get(shop_type) {
            return *offset;
        }

        let offset = if let Some(reference) = self.references.get(shop_type) {
            reference.seed - reference.observed_at.div_euclid(cycle)
        } else if let Some(record) = stored() {
            record.seed - record.observed_at.div_euclid(cycle)
        } else {
            log::warn!("no calibration for shop type {shop_type}; assuming offset 0");
            0
        };

        log::debug!("shop type {shop_type}: derived seed offset {offset}");
        offsets.insert(shop_type.to_string(), offset);
        offset
    }
}
