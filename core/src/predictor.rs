//! The stock prediction engine.
//!
//! DRAW ORDER (fixed, never reordered):
//!   For every item slot in canonical catalog order the game engine draws
//!   the stock roll and then the stock amount — always both, even when
//!   the roll misses. Egg shops instead run three roll-only passes over
//!   the catalog, one per egg slot. Predictions replicate those draws
//!   exactly; skipping or reordering a single draw corrupts every
//!   prediction after it, silently.

use crate::{
    calibration::{CalibrationRecord, Calibrator},
    catalog::{canonical_order, cycle_seconds, ItemDefinition, COMMON_EGG, EGG, EGG_SLOTS},
    clock::{Clock, SystemClock},
    config::PredictorConfig,
    rng::GameRng,
    types::{PredictionResult, ShopType, UnixSeconds},
};

/// Hard ceiling on occurrence-search iterations. A correctness safety
/// valve, not a latency guarantee — callers that need bounded time must
/// impose their own timeout around the call.
pub const MAX_SEARCH: u64 = 2_000_000;

/// The data-store seam the predictor reads through.
///
/// "No data" is `None`; load failures surface as `None` too, never as a
/// panic — the caller renders both the same way.
pub trait CatalogSource {
    /// Full catalog for a shop type, or None when no data is available.
    fn catalog(&self, shop_type: &str) -> Option<Vec<ItemDefinition>>;

    /// Stored seed observation for a shop type, if any.
    fn calibration(&self, shop_type: &str) -> Option<CalibrationRecord>;

    /// All shop types the store knows about.
    fn shop_types(&self) -> Vec<ShopType>;
}

pub struct StockPredictor {
    source: Box<dyn CatalogSource>,
    clock: Box<dyn Clock>,
    calibrator: Calibrator,
}

impl StockPredictor {
    pub fn new(source: Box<dyn CatalogSource>, config: PredictorConfig) -> Self {
        Self::with_clock(source, config, Box::new(SystemClock))
    }

    /// Predictor with an explicit clock; tests pin it so predictions are
    /// pure functions of catalog + calibration + time.
    pub fn with_clock(
        source: Box<dyn CatalogSource>,
        config: PredictorConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            source,
            clock,
            calibrator: Calibrator::new(config.references),
        }
    }

    /// Seed for the restock cycle containing the current time.
    pub fn base_seed(&self, shop_type: &str) -> u32 {
        let now = self.clock.now_unix();
        self.calibrator
            .base_seed(shop_type, now, || self.source.calibration(shop_type))
    }

    /// Everything in stock `restocks_ahead` cycles from now.
    ///
    /// Returns None when no catalog is available for the type, an empty
    /// vec when the catalog loaded but nothing hits. Negative offsets
    /// clamp to 0.
    pub fn predict_stock(
        &self,
        shop_type: &str,
        restocks_ahead: i64,
    ) -> Option<Vec<PredictionResult>> {
        let raw = self.source.catalog(shop_type)?;
        let items = canonical_order(shop_type, &raw);

        let ahead = restocks_ahead.max(0) as u64;
        let seed = u64::from(self.base_seed(shop_type)) + ahead;
        let mut rng = GameRng::new(seed);

        let results = if shop_type == EGG {
            roll_egg_slots(&mut rng, &items, ahead)
        } else {
            roll_item_slots(&mut rng, &items, ahead)
        };
        Some(results)
    }

    /// Which shop type carries an item with this exact name, if any.
    pub fn find_type_for_item(&self, item_name: &str) -> Option<ShopType> {
        self.source.shop_types().into_iter().find(|shop_type| {
            self.source
                .catalog(shop_type)
                .is_some_and(|items| items.iter().any(|i| i.name == item_name))
        })
    }

    /// The next `count` restock cycles containing the named item,
    /// resolving its shop type by scanning known catalogs.
    pub fn predict_occurrences(&self, item_name: &str, count: usize) -> Vec<PredictionResult> {
        match self.find_type_for_item(item_name) {
            Some(shop_type) => self.predict_occurrences_in(&shop_type, item_name, count),
            None => Vec::new(),
        }
    }

    /// Occurrence search with an explicit shop type.
    ///
    /// Results carry `occurred_at_unix` and strictly increasing
    /// `restocks_ahead`. Display-in-shop filtering is deliberately NOT
    /// applied here — that is the caller's call to make. Fewer than
    /// `count` results means the search ceiling was reached.
    pub fn predict_occurrences_in(
        &self,
        shop_type: &str,
        item_name: &str,
        count: usize,
    ) -> Vec<PredictionResult> {
        let Some(raw) = self.source.catalog(shop_type) else {
            return Vec::new();
        };
        let items = canonical_order(shop_type, &raw);
        let is_egg = shop_type == EGG;

        let present = if is_egg {
            items.iter().any(|i| i.egg_group() == item_name)
        } else {
            items.iter().any(|i| i.name == item_name)
        };
        if !present {
            return Vec::new();
        }

        let cycle = cycle_seconds(shop_type);
        let now = self.clock.now_unix();
        let base = u64::from(self.base_seed(shop_type));

        let mut results = Vec::with_capacity(count);
        for offset in 0..=MAX_SEARCH {
            if results.len() >= count {
                break;
            }
            let mut rng = GameRng::new(base + offset);
            let stock = if is_egg {
                egg_quantity(&mut rng, &items, item_name)
            } else {
                item_quantity(&mut rng, &items, item_name)
            };
            if let Some(stock) = stock {
                results.push(PredictionResult {
                    item: item_name.to_string(),
                    stock,
                    restocks_ahead: offset,
                    occurred_at_unix: Some(restock_unix(now, cycle, offset)),
                });
            }
        }

        if results.len() < count {
            log::debug!(
                "occurrence search for {item_name} stopped at the \
                 {MAX_SEARCH}-iteration ceiling with {} result(s)",
                results.len()
            );
        }
        results
    }

    /// How many restocks ahead a target time is, counting from the next
    /// cycle boundary. The target rounds up to a boundary; anything at or
    /// before the next boundary is 0.
    pub fn restocks_until(&self, shop_type: &str, target_unix: UnixSeconds) -> u64 {
        let cycle = cycle_seconds(shop_type);
        let now = self.clock.now_unix();

        let remainder = target_unix.rem_euclid(cycle);
        let rounded_target = if remainder == 0 {
            target_unix
        } else {
            target_unix - remainder + cycle
        };
        let next_boundary = now.div_euclid(cycle) * cycle + cycle;

        if rounded_target <= next_boundary {
            0
        } else {
            ((rounded_target - next_boundary) / cycle) as u64
        }
    }
}

fn roll_item_slots(
    rng: &mut GameRng,
    items: &[ItemDefinition],
    ahead: u64,
) -> Vec<PredictionResult> {
    let mut results = Vec::new();
    for item in items {
        // Both draws happen for every slot, hit or miss, to stay in
        // lockstep with the game engine.
        let roll = rng.next_integer(1, item.chance_denominator());
        let amount = rng.next_integer(item.stock_amount.min, item.stock_amount.max);

        if roll == 1 && amount > 0 && item.display_in_shop {
            results.push(PredictionResult {
                item: item.name.clone(),
                stock: amount,
                restocks_ahead: ahead,
                occurred_at_unix: None,
            });
        }
    }
    results
}

fn roll_egg_slots(
    rng: &mut GameRng,
    items: &[ItemDefinition],
    ahead: u64,
) -> Vec<PredictionResult> {
    let counts = egg_counts(rng, items);
    let claimed: i64 = counts
        .iter()
        .filter(|(name, _)| name != COMMON_EGG)
        .map(|(_, hits)| hits)
        .sum();

    counts
        .into_iter()
        .filter_map(|(name, hits)| {
            // Common Egg fills whatever slots no other egg claimed.
            let stock = if name == COMMON_EGG {
                (EGG_SLOTS - claimed).max(0)
            } else {
                hits
            };
            (stock > 0).then_some(PredictionResult {
                item: name,
                stock,
                restocks_ahead: ahead,
                occurred_at_unix: None,
            })
        })
        .collect()
}

/// Per-egg-name hit counters over the three slot passes, keyed in
/// catalog encounter order.
fn egg_counts(rng: &mut GameRng, items: &[ItemDefinition]) -> Vec<(String, i64)> {
    let mut counts: Vec<(String, i64)> = Vec::new();
    for item in items {
        if !counts.iter().any(|(name, _)| name == item.egg_group()) {
            counts.push((item.egg_group().to_string(), 0));
        }
    }

    for _slot in 0..EGG_SLOTS {
        for item in items {
            let roll = rng.next_integer(1, item.chance_denominator());
            if roll == 1 {
                if let Some(entry) = counts.iter_mut().find(|(name, _)| name == item.egg_group()) {
                    entry.1 += 1;
                }
            }
        }
    }
    counts
}

/// Quantity of one named item in the cycle a fresh `rng` represents.
///
/// Draws the same roll/amount sequence as a full prediction but returns
/// at the named item's slot; the generator is discarded afterwards, so
/// the remaining slots never need their draws.
fn item_quantity(rng: &mut GameRng, items: &[ItemDefinition], item_name: &str) -> Option<i64> {
    for item in items {
        let roll = rng.next_integer(1, item.chance_denominator());
        let amount = rng.next_integer(item.stock_amount.min, item.stock_amount.max);
        if item.name == item_name {
            return (roll == 1 && amount > 0).then_some(amount);
        }
    }
    None
}

/// Egg quantity for one egg name over the full three-pass roll loop.
fn egg_quantity(rng: &mut GameRng, items: &[ItemDefinition], egg_name: &str) -> Option<i64> {
    let counts = egg_counts(rng, items);
    let claimed: i64 = counts
        .iter()
        .filter(|(name, _)| name != COMMON_EGG)
        .map(|(_, hits)| hits)
        .sum();
    let hits = counts
        .iter()
        .find(|(name, _)| name == egg_name)
        .map(|(_, hits)| *hits)?;
    let stock = if egg_name == COMMON_EGG {
        (EGG_SLOTS - claimed).max(0)
    } else {
        hits
    };
    (stock > 0).then_some(stock)
}

/// Wall-clock time of restock cycle `offset`, rounded to the nearest
/// minute. Offset 0 is the cycle currently on display, reported as the
/// upcoming boundary; each further offset adds one full cycle.
fn restock_unix(now: UnixSeconds, cycle: i64, offset: u64) -> UnixSeconds {
    let until_boundary = cycle - now.rem_euclid(cycle);
    let extra = offset.saturating_sub(1) as i64 * cycle;
    round_to_minute(now + until_boundary + extra)
}

fn round_to_minute(t: UnixSeconds) -> UnixSeconds {
    (t + 30).div_euclid(60) * 60
}
