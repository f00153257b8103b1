//! Shop catalog model, stock-amount normalization and canonical ordering.
//!
//! RULE: The game engine consumes RNG draws once per item slot in catalog
//! order. Any deviation from its iteration order desynchronizes every
//! draw after it, so the ordering rules here are load-bearing — do not
//! "tidy up" the special cases.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

pub const SEED: &str = "Seed";
pub const GEAR: &str = "Gear";
pub const EGG: &str = "Egg";

/// Egg cycles fill exactly this many slots per restock.
pub const EGG_SLOTS: i64 = 3;

/// The egg that fills any slot no other egg claims.
pub const COMMON_EGG: &str = "Common Egg";

// The live game iterates "Medium Treat" before "Medium Toy" even though
// they share a price; every other Gear item follows the default rule.
const GEAR_FORCED_FIRST: &str = "Medium Treat";
const GEAR_FORCED_SECOND: &str = "Medium Toy";

/// Restock cycle length for a shop type, in seconds.
pub fn cycle_seconds(shop_type: &str) -> i64 {
    match shop_type {
        SEED | GEAR => 5 * 60,
        EGG => 30 * 60,
        _ => 300,
    }
}

/// Stock amount range, normalized from the several shapes the upstream
/// data dump has used over time: `[min, max]`, `[n]` (meaning exactly n),
/// `{"0":..,"1":..}`, `{"1":..,"2":..}` and `{"Min":..,"Max":..}`.
/// Unrecognized or non-finite input collapses to (1, 1) so a draw can
/// never fail on malformed upstream data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct StockAmount {
    pub min: i64,
    pub max: i64,
}

impl StockAmount {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn from_value(value: &Value) -> Self {
        if let Some(arr) = value.as_array() {
            if arr.len() >= 2 {
                if let (Some(min), Some(max)) = (as_int(&arr[0]), as_int(&arr[1])) {
                    return Self { min, max };
                }
            } else if arr.len() == 1 {
                if let Some(exact) = as_int(&arr[0]) {
                    return Self { min: exact, max: exact };
                }
            }
        }

        if let Some(obj) = value.as_object() {
            for (lo_key, hi_key) in [("0", "1"), ("1", "2"), ("Min", "Max")] {
                let pair = (
                    obj.get(lo_key).and_then(as_int),
                    obj.get(hi_key).and_then(as_int),
                );
                if let (Some(min), Some(max)) = pair {
                    return Self { min, max };
                }
            }
        }

        Self::default()
    }
}

impl Default for StockAmount {
    fn default() -> Self {
        Self { min: 1, max: 1 }
    }
}

impl From<Value> for StockAmount {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// One shop catalog entry, as supplied by the data store.
///
/// Deserializes straight from the upstream data-dump key style
/// (`Name`, `Price`, `StockChance`, ...) via aliases. Read-only snapshot:
/// the predictor never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Price")]
    pub price: f64,
    #[serde(default, alias = "LayoutOrder")]
    pub layout_order: i64,
    /// Stock chance denominator: the item stocks when a roll over
    /// [1, denominator] lands on 1.
    #[serde(default = "default_stock_chance", alias = "StockChance")]
    pub stock_chance: i64,
    #[serde(default, alias = "StockAmount")]
    pub stock_amount: StockAmount,
    #[serde(default = "default_display", alias = "DisplayInShop")]
    pub display_in_shop: bool,
    /// Grouping key for the Egg roll loop; unset for other types.
    #[serde(default, alias = "EggName", skip_serializing_if = "Option::is_none")]
    pub egg_name: Option<String>,
}

fn default_stock_chance() -> i64 {
    1
}

fn default_display() -> bool {
    true
}

impl ItemDefinition {
    /// Egg grouping key, falling back to the item name.
    pub fn egg_group(&self) -> &str {
        self.egg_name.as_deref().unwrap_or(&self.name)
    }

    /// Chance denominator clamped into a rollable range.
    pub fn chance_denominator(&self) -> i64 {
        self.stock_chance.max(1)
    }
}

fn price_then_layout(a: &ItemDefinition, b: &ItemDefinition) -> Ordering {
    a.price
        .total_cmp(&b.price)
        .then_with(|| a.layout_order.cmp(&b.layout_order))
}

/// Sort a catalog into the exact iteration order the game engine uses:
/// ascending price, ties broken by ascending layout order.
///
/// Seed catalogs first drop zero-chance items — those never roll in-game
/// and must not consume draws. Gear catalogs force-order the one known
/// pair that the game iterates against its price order.
pub fn canonical_order(shop_type: &str, items: &[ItemDefinition]) -> Vec<ItemDefinition> {
    let mut ordered: Vec<ItemDefinition> = if shop_type == SEED {
        items.iter().filter(|i| i.stock_chance != 0).cloned().collect()
    } else {
        items.to_vec()
    };

    if shop_type == GEAR {
        ordered.sort_by(|a, b| {
            if a.name == GEAR_FORCED_FIRST && b.name == GEAR_FORCED_SECOND {
                return Ordering::Less;
            }
            if a.name == GEAR_FORCED_SECOND && b.name == GEAR_FORCED_FIRST {
                return Ordering::Greater;
            }
            price_then_layout(a, b)
        });
    } else {
        ordered.sort_by(price_then_layout);
    }

    ordered
}
