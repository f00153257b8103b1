//! SQLite persistence for shop catalogs and calibration observations.
//!
//! RULE: Only store.rs talks to the database. The predictor reads
//! through the CatalogSource trait and never executes SQL.

use crate::{
    calibration::CalibrationRecord,
    catalog::{ItemDefinition, StockAmount},
    error::StoreResult,
    predictor::CatalogSource,
    types::ShopType,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct ShopStore {
    conn: Connection,
}

impl ShopStore {
    /// Open (or create) the shop database at `path`.
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Catalog ────────────────────────────────────────────────

    pub fn upsert_item(&self, shop_type: &str, item: &ItemDefinition) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO catalog_item
               (shop_type, name, price, layout_order, stock_chance,
                stock_min, stock_max, display_in_shop, egg_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                shop_type,
                item.name,
                item.price,
                item.layout_order,
                item.stock_chance,
                item.stock_amount.min,
                item.stock_amount.max,
                item.display_in_shop as i32,
                item.egg_name,
            ],
        )?;
        Ok(())
    }

    /// Replace a shop type's whole catalog in one go.
    pub fn replace_catalog(&self, shop_type: &str, items: &[ItemDefinition]) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM catalog_item WHERE shop_type = ?1",
            params![shop_type],
        )?;
        for item in items {
            self.upsert_item(shop_type, item)?;
        }
        Ok(())
    }

    /// All items for a shop type. Row order is incidental — the
    /// predictor re-sorts into canonical order itself.
    pub fn catalog_items(&self, shop_type: &str) -> StoreResult<Vec<ItemDefinition>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, price, layout_order, stock_chance,
                    stock_min, stock_max, display_in_shop, egg_name
             FROM catalog_item WHERE shop_type = ?1
             ORDER BY name ASC",
        )?;
        let rows = stmt.query_map(params![shop_type], |row| {
            Ok(ItemDefinition {
                name: row.get(0)?,
                price: row.get(1)?,
                layout_order: row.get(2)?,
                stock_chance: row.get(3)?,
                stock_amount: StockAmount::new(row.get(4)?, row.get(5)?),
                display_in_shop: row.get::<_, i32>(6)? != 0,
                egg_name: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn shop_types_list(&self) -> StoreResult<Vec<ShopType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT shop_type FROM catalog_item ORDER BY shop_type ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Calibration ────────────────────────────────────────────

    pub fn set_calibration(&self, record: &CalibrationRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO calibration (shop_type, seed, observed_at)
             VALUES (?1, ?2, ?3)",
            params![record.shop_type, record.seed, record.observed_at],
        )?;
        Ok(())
    }

    pub fn calibration_record(&self, shop_type: &str) -> StoreResult<Option<CalibrationRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT shop_type, seed, observed_at FROM calibration WHERE shop_type = ?1",
                params![shop_type],
                |row| {
                    Ok(CalibrationRecord {
                        shop_type: row.get(0)?,
                        seed: row.get(1)?,
                        observed_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

// Failed loads are logged and surface as "no data" — the predictor never
// retries and never panics on store trouble.
impl CatalogSource for ShopStore {
    fn catalog(&self, shop_type: &str) -> Option<Vec<ItemDefinition>> {
        match self.catalog_items(shop_type) {
            Ok(items) if items.is_empty() => None,
            Ok(items) => Some(items),
            Err(e) => {
                log::warn!("catalog load failed for shop type {shop_type}: {e}");
                None
            }
        }
    }

    fn calibration(&self, shop_type: &str) -> Option<CalibrationRecord> {
        match self.calibration_record(shop_type) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("calibration load failed for shop type {shop_type}: {e}");
                None
            }
        }
    }

    fn shop_types(&self) -> Vec<ShopType> {
        self.shop_types_list().unwrap_or_else(|e| {
            log::warn!("shop type listing failed: {e}");
            Vec::new()
        })
    }
}
