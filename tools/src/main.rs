//! restock-runner: headless prediction runner for the restock core.
//!
//! Usage:
//!   restock-runner --db shop.db --type Seed --restocks 3
//!   restock-runner --db shop.db --item "Carrot" --count 5
//!   restock-runner --db shop.db --import dump.json --type Seed
//!   restock-runner --db shop.db --observe 473451234 --at 1700000000 --type Seed

use anyhow::Result;
use restock_core::{
    config::PredictorConfig, store::ShopStore, CalibrationRecord, ItemDefinition, StockPredictor,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = str_arg(&args, "--db").unwrap_or_else(|| "shop.db".into());
    let shop_type = str_arg(&args, "--type");
    let item = str_arg(&args, "--item");
    let import = str_arg(&args, "--import");
    let observe = str_arg(&args, "--observe");
    let calibration_file = str_arg(&args, "--calibration");
    let restocks = parse_arg(&args, "--restocks", 0i64);
    let count = parse_arg(&args, "--count", 5usize);

    let store = ShopStore::open(&db)?;
    store.migrate()?;

    if let Some(dump_path) = import {
        let shop_type = shop_type
            .ok_or_else(|| anyhow::anyhow!("--import requires --type"))?;
        let content = std::fs::read_to_string(&dump_path)?;
        let items: Vec<ItemDefinition> = serde_json::from_str(&content)?;
        store.replace_catalog(&shop_type, &items)?;
        println!("imported {} item(s) into {shop_type}", items.len());
        return Ok(());
    }

    if let Some(seed) = observe {
        let shop_type = shop_type
            .ok_or_else(|| anyhow::anyhow!("--observe requires --type"))?;
        let seed: i64 = seed.parse()?;
        let observed_at = observed_at_arg(&args)?;
        store.set_calibration(&CalibrationRecord {
            shop_type: shop_type.clone(),
            seed,
            observed_at,
        })?;
        println!("recorded calibration for {shop_type}: seed {seed} at {observed_at}");
        return Ok(());
    }

    let config = match calibration_file {
        Some(path) => PredictorConfig::load(&path)?,
        None => PredictorConfig::default(),
    };
    let predictor = StockPredictor::new(Box::new(store), config);

    if let Some(item) = item {
        let occurrences = predictor.predict_occurrences(&item, count);
        if occurrences.is_empty() {
            println!("no occurrences of \"{item}\" found within search limits");
            return Ok(());
        }
        println!("=== OCCURRENCES: {item} ===");
        for occ in &occurrences {
            let when = occ
                .occurred_at_unix
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".into());
            println!(
                "  +{:<6} restock(s) | x{:<4} | at unix {when}",
                occ.restocks_ahead, occ.stock
            );
        }
        return Ok(());
    }

    if let Some(shop_type) = shop_type {
        println!("=== PREDICTED STOCK: {shop_type} (+{restocks}) ===");
        println!("  base seed: {}", predictor.base_seed(&shop_type));
        match predictor.predict_stock(&shop_type, restocks) {
            None => println!("  no catalog data for {shop_type}"),
            Some(results) if results.is_empty() => println!("  nothing in stock"),
            Some(results) => {
                for entry in &results {
                    println!("  {:<24} x{}", entry.item, entry.stock);
                }
            }
        }
        return Ok(());
    }

    log::warn!("nothing to do; pass --type, --item, --import or --observe");
    Ok(())
}

/// `--at` for `--observe`. Any unix time is a valid observation instant,
/// 0 included; only a missing flag is an error.
fn observed_at_arg(args: &[String]) -> Result<i64> {
    match str_arg(args, "--at") {
        Some(raw) => Ok(raw.parse()?),
        None => anyhow::bail!("--observe requires --at UNIX_SECONDS"),
    }
}

fn str_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
