//! Occurrence search over a store-backed catalog with a pinned clock.
//!
//! Same fixture as the prediction tests: calibration seed 12345 observed
//! at unix 1_700_000_000, clock at 1_700_000_300, so the Seed base seed
//! is 12346 and the next cycle boundary is 1_700_000_400.

use restock_core::{
    catalog::{ItemDefinition, StockAmount},
    clock::FixedClock,
    config::PredictorConfig,
    store::ShopStore,
    StockPredictor,
};

const NOW: i64 = 1_700_000_300;

fn item(name: &str, price: f64, chance: i64, min: i64, max: i64) -> ItemDefinition {
    ItemDefinition {
        name: name.into(),
        price,
        layout_order: 0,
        stock_chance: chance,
        stock_amount: StockAmount::new(min, max),
        display_in_shop: true,
        egg_name: None,
    }
}

fn seed_catalog() -> Vec<ItemDefinition> {
    vec![
        item("Carrot", 10.0, 1, 5, 25),
        item("Blueberry", 400.0, 3, 2, 6),
        item("Tomato", 800.0, 2, 1, 3),
    ]
}

fn seed_store() -> ShopStore {
    let store = ShopStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.replace_catalog("Seed", &seed_catalog()).unwrap();
    store
}

fn seed_predictor(store: ShopStore) -> StockPredictor {
    StockPredictor::with_clock(
        Box::new(store),
        PredictorConfig::default_test(),
        Box::new(FixedClock(NOW)),
    )
}

#[test]
fn blueberry_occurrences_match_known_cycles() {
    let predictor = seed_predictor(seed_store());
    let hits = predictor.predict_occurrences_in("Seed", "Blueberry", 3);

    let summary: Vec<(u64, i64, i64)> = hits
        .iter()
        .map(|r| (r.restocks_ahead, r.stock, r.occurred_at_unix.unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, 2, 1_700_000_700),
            (3, 2, 1_700_001_000),
            (7, 6, 1_700_002_200),
        ]
    );
}

#[test]
fn occurrence_offsets_increase_strictly() {
    let predictor = seed_predictor(seed_store());
    let hits = predictor.predict_occurrences_in("Seed", "Tomato", 8);
    assert_eq!(hits.len(), 8);

    for pair in hits.windows(2) {
        assert!(pair[0].restocks_ahead < pair[1].restocks_ahead);
        assert!(pair[0].occurred_at_unix.unwrap() <= pair[1].occurred_at_unix.unwrap());
    }
}

#[test]
fn first_two_offsets_share_the_next_boundary() {
    // Offsets 0 and 1 both describe the upcoming boundary: 0 is the
    // cycle already on display, 1 is the restock that replaces it.
    let predictor = seed_predictor(seed_store());
    let hits = predictor.predict_occurrences_in("Seed", "Carrot", 3);

    let summary: Vec<(u64, i64, i64)> = hits
        .iter()
        .map(|r| (r.restocks_ahead, r.stock, r.occurred_at_unix.unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, 10, 1_700_000_400),
            (1, 14, 1_700_000_400),
            (2, 20, 1_700_000_700),
        ]
    );
}

#[test]
fn occurrence_search_ignores_display_flag() {
    let mut hidden = seed_catalog();
    hidden[0].display_in_shop = false; // Carrot

    let store = ShopStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.replace_catalog("Seed", &hidden).unwrap();

    // Hiding an item changes what the shop shows, not when it restocks.
    let predictor = seed_predictor(store);
    let hits = predictor.predict_occurrences_in("Seed", "Carrot", 3);
    let offsets: Vec<u64> = hits.iter().map(|r| r.restocks_ahead).collect();
    assert_eq!(offsets, vec![0, 1, 2]);
}

#[test]
fn unknown_item_yields_no_occurrences() {
    let predictor = seed_predictor(seed_store());
    assert!(predictor.predict_occurrences_in("Seed", "Durian", 3).is_empty());
    assert!(predictor.predict_occurrences("Durian", 3).is_empty());
}

#[test]
fn item_names_resolve_to_their_shop_type() {
    let store = seed_store();
    store
        .replace_catalog("Gear", &[item("Trowel", 50.0, 2, 1, 1)])
        .unwrap();

    let predictor = seed_predictor(store);
    assert_eq!(predictor.find_type_for_item("Trowel").as_deref(), Some("Gear"));
    assert_eq!(predictor.find_type_for_item("Carrot").as_deref(), Some("Seed"));
    assert_eq!(predictor.find_type_for_item("Durian"), None);
}

#[test]
fn type_resolving_search_matches_explicit_search() {
    let predictor = seed_predictor(seed_store());
    assert_eq!(
        predictor.predict_occurrences("Blueberry", 3),
        predictor.predict_occurrences_in("Seed", "Blueberry", 3)
    );
}

#[test]
fn common_egg_occurs_at_the_base_cycle() {
    let mut common = item("Common Egg", 0.0, 1, 1, 1);
    common.egg_name = Some("Common Egg".into());
    let mut rare = item("Rare Egg", 10.0, 4, 1, 1);
    rare.egg_name = Some("Rare Egg".into());

    let store = ShopStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.replace_catalog("Egg", &[common, rare]).unwrap();

    let predictor = StockPredictor::with_clock(
        Box::new(store),
        PredictorConfig::default(),
        Box::new(FixedClock(100)),
    );
    let hits = predictor.predict_occurrences_in("Egg", "Common Egg", 1);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].stock, 2);
    assert_eq!(hits[0].restocks_ahead, 0);
    assert_eq!(hits[0].occurred_at_unix, Some(1800));
}

#[test]
fn restocks_until_counts_from_the_next_boundary() {
    let predictor = seed_predictor(seed_store());

    // Targets at or before the next boundary (1_700_000_400) are 0.
    assert_eq!(predictor.restocks_until("Seed", 1_700_000_400), 0);
    assert_eq!(predictor.restocks_until("Seed", NOW), 0);
    assert_eq!(predictor.restocks_until("Seed", 1_699_999_000), 0);

    // One second past the boundary rounds up to the cycle after it.
    assert_eq!(predictor.restocks_until("Seed", 1_700_000_401), 1);
    assert_eq!(predictor.restocks_until("Seed", 1_700_002_200), 6);
}
