//! SQLite store round-trips.

use restock_core::{
    calibration::CalibrationRecord,
    catalog::{ItemDefinition, StockAmount},
    store::ShopStore,
    CatalogSource,
};

fn store() -> ShopStore {
    let store = ShopStore::in_memory().unwrap();
    store.migrate().unwrap();
    store
}

fn carrot() -> ItemDefinition {
    ItemDefinition {
        name: "Carrot".into(),
        price: 10.0,
        layout_order: 2,
        stock_chance: 1,
        stock_amount: StockAmount::new(5, 25),
        display_in_shop: true,
        egg_name: None,
    }
}

#[test]
fn migrate_is_idempotent() {
    let store = store();
    store.migrate().unwrap();
    store.upsert_item("Seed", &carrot()).unwrap();
    store.migrate().unwrap();
    assert_eq!(store.catalog_items("Seed").unwrap().len(), 1);
}

#[test]
fn items_round_trip_every_field() {
    let store = store();
    let item = ItemDefinition {
        name: "Rare Egg".into(),
        price: 0.0,
        layout_order: 7,
        stock_chance: 4,
        stock_amount: StockAmount::new(1, 3),
        display_in_shop: false,
        egg_name: Some("Rare Egg".into()),
    };
    store.upsert_item("Egg", &item).unwrap();

    let loaded = store.catalog_items("Egg").unwrap();
    assert_eq!(loaded, vec![item]);
}

#[test]
fn upsert_replaces_by_name_within_a_type() {
    let store = store();
    store.upsert_item("Seed", &carrot()).unwrap();

    let mut cheaper = carrot();
    cheaper.price = 8.0;
    store.upsert_item("Seed", &cheaper).unwrap();

    let loaded = store.catalog_items("Seed").unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].price, 8.0);

    // Same name under another shop type is a distinct row.
    store.upsert_item("Gear", &carrot()).unwrap();
    assert_eq!(store.catalog_items("Gear").unwrap().len(), 1);
    assert_eq!(store.catalog_items("Seed").unwrap().len(), 1);
}

#[test]
fn replace_catalog_drops_stale_rows() {
    let store = store();
    store.upsert_item("Seed", &carrot()).unwrap();

    let mut tomato = carrot();
    tomato.name = "Tomato".into();
    store.replace_catalog("Seed", &[tomato]).unwrap();

    let names: Vec<String> = store
        .catalog_items("Seed")
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Tomato"]);
}

#[test]
fn shop_types_list_is_distinct_and_sorted() {
    let store = store();
    store.upsert_item("Seed", &carrot()).unwrap();
    store.upsert_item("Gear", &carrot()).unwrap();
    let mut tomato = carrot();
    tomato.name = "Tomato".into();
    store.upsert_item("Seed", &tomato).unwrap();

    assert_eq!(store.shop_types_list().unwrap(), vec!["Gear", "Seed"]);
}

#[test]
fn calibration_round_trips_and_overwrites() {
    let store = store();
    assert_eq!(store.calibration_record("Seed").unwrap(), None);

    let first = CalibrationRecord {
        shop_type: "Seed".into(),
        seed: 12345,
        observed_at: 1_700_000_000,
    };
    store.set_calibration(&first).unwrap();
    assert_eq!(store.calibration_record("Seed").unwrap(), Some(first));

    let second = CalibrationRecord {
        shop_type: "Seed".into(),
        seed: 99999,
        observed_at: 1_700_009_000,
    };
    store.set_calibration(&second).unwrap();
    assert_eq!(store.calibration_record("Seed").unwrap(), Some(second));
}

#[test]
fn catalog_source_reports_empty_types_as_none() {
    let store = store();
    assert_eq!(store.catalog("Seed"), None);

    store.upsert_item("Seed", &carrot()).unwrap();
    assert_eq!(store.catalog("Seed"), Some(vec![carrot()]));
    assert_eq!(store.catalog("Gear"), None);
    assert_eq!(store.shop_types(), vec!["Seed"]);
}
