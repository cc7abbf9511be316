use chrono::Utc;
use tempfile::{tempdir, TempDir};

use dropwatch_core::VariantRecord;

use super::*;

fn empty_store() -> (TempDir, StateStore) {
    let dir = tempdir().unwrap();
    let store = StateStore::open(dir.path()).unwrap();
    (dir, store)
}

fn raw(id: &str, title: &str, price: &str) -> RawProduct {
    RawProduct {
        id: id.to_string(),
        handle: format!("{id}-handle"),
        title: title.to_string(),
        price: price.to_string(),
        image: String::new(),
    }
}

fn variants(entries: &[(&str, u32)]) -> VariantMap {
    entries
        .iter()
        .enumerate()
        .map(|(i, (key, stock))| {
            (
                (*key).to_string(),
                VariantRecord::from_stock_level(Some(i as i64), Some(*stock)),
            )
        })
        .collect()
}

#[test]
fn new_product_is_reported_and_persisted_with_matching_fields() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    let fresh = vec![(
        raw("1", "Shell Jacket", "£398"),
        VariantFetch::Fetched(variants(&[("Black - M", 2)])),
    )];
    let outcome = reconcile(&mut store, "jackets", fresh, &mut stats, Utc::now());

    assert_eq!(outcome.new_products, vec!["Shell Jacket"]);
    assert_eq!(stats.new_products, 1);

    let snapshot = &store.products()["1"];
    assert_eq!(snapshot.title, "Shell Jacket");
    assert_eq!(snapshot.price, "£398");
    assert_eq!(snapshot.category, "jackets");
    assert_eq!(snapshot.handle, "1-handle");

    // Every variant of a first-sighted product is an availability event.
    assert_eq!(stats.variants_found, 1);
    assert_eq!(outcome.touched, vec!["1"]);
}

#[test]
fn reconciling_identical_data_twice_is_idempotent() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    let build = || {
        vec![
            (
                raw("1", "Shell Jacket", "£398"),
                VariantFetch::Fetched(variants(&[("Black - M", 2), ("Black - L", 0)])),
            ),
            (
                raw("2", "Small Box Tee", "£54"),
                VariantFetch::Fetched(variants(&[("White - S", 5)])),
            ),
        ]
    };

    reconcile(&mut store, "jackets", build(), &mut stats, Utc::now());
    assert_eq!(stats.new_products, 2);
    assert_eq!(stats.variants_found, 3);

    let second = reconcile(&mut store, "jackets", build(), &mut stats, Utc::now());
    assert!(second.new_products.is_empty());
    assert!(second.availability_events.is_empty());
    assert_eq!(stats.new_products, 2, "no new-product events on identical data");
    assert_eq!(stats.variants_found, 3, "no availability events on identical data");
}

#[test]
fn products_absent_from_the_scrape_are_left_untouched() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    let seeded = vec![(
        raw("1", "Shell Jacket", "£398"),
        VariantFetch::Fetched(variants(&[("Black - M", 2)])),
    )];
    reconcile(&mut store, "jackets", seeded, &mut stats, Utc::now());
    let before = store.products()["1"].clone();

    // Next cycle sees a page where product 1 failed to load at all.
    let fresh = vec![(
        raw("2", "Small Box Tee", "£54"),
        VariantFetch::Fetched(VariantMap::new()),
    )];
    reconcile(&mut store, "jackets", fresh, &mut stats, Utc::now());

    let after = &store.products()["1"];
    assert_eq!(after.title, before.title);
    assert_eq!(after.last_updated, before.last_updated);
    assert_eq!(
        store.variants_for("1").unwrap().variants.len(),
        1,
        "variants of an unobserved product must survive"
    );
}

#[test]
fn fetch_failure_retains_prior_variants_exactly() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    let seeded = vec![(
        raw("1", "Shell Jacket", "£398"),
        VariantFetch::Fetched(variants(&[("Black - M", 2), ("Black - L", 1)])),
    )];
    reconcile(&mut store, "jackets", seeded, &mut stats, Utc::now());
    let before = store.variants_for("1").unwrap().variants.clone();

    let outcome = reconcile(
        &mut store,
        "jackets",
        vec![(raw("1", "Shell Jacket", "£398"), VariantFetch::Failed)],
        &mut stats,
        Utc::now(),
    );

    assert_eq!(store.variants_for("1").unwrap().variants, before);
    assert!(outcome.availability_events.is_empty());
    assert!(
        outcome.touched.is_empty(),
        "a failed fetch must not mark variant state for persistence"
    );
}

#[test]
fn restock_flip_is_one_availability_event() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    reconcile(
        &mut store,
        "sweatshirts",
        vec![(
            raw("9", "Box Logo Hooded Sweatshirt", "£158"),
            VariantFetch::Fetched(variants(&[("M - Black", 0)])),
        )],
        &mut stats,
        Utc::now(),
    );
    let events_before = stats.variants_found;
    assert!(!store.variants_for("9").unwrap().variants["M - Black"].available);

    let outcome = reconcile(
        &mut store,
        "sweatshirts",
        vec![(
            raw("9", "Box Logo Hooded Sweatshirt", "£158"),
            VariantFetch::Fetched(variants(&[("M - Black", 4)])),
        )],
        &mut stats,
        Utc::now(),
    );

    assert_eq!(
        outcome.availability_events,
        vec!["Box Logo Hooded Sweatshirt: M - Black"]
    );
    assert_eq!(stats.variants_found, events_before + 1);
    assert!(store.variants_for("9").unwrap().variants["M - Black"].available);
}

#[test]
fn going_out_of_stock_is_not_an_event() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    reconcile(
        &mut store,
        "hats",
        vec![(
            raw("3", "Camp Cap", "£48"),
            VariantFetch::Fetched(variants(&[("Red - OS", 5)])),
        )],
        &mut stats,
        Utc::now(),
    );
    let events_before = stats.variants_found;

    let outcome = reconcile(
        &mut store,
        "hats",
        vec![(
            raw("3", "Camp Cap", "£48"),
            VariantFetch::Fetched(variants(&[("Red - OS", 0)])),
        )],
        &mut stats,
        Utc::now(),
    );

    assert!(outcome.availability_events.is_empty());
    assert_eq!(stats.variants_found, events_before);
    // The sell-out itself still overwrites the stored record.
    assert!(!store.variants_for("3").unwrap().variants["Red - OS"].available);
}

#[test]
fn update_overwrites_descriptive_fields_without_an_event() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    reconcile(
        &mut store,
        "jackets",
        vec![(
            raw("1", "Shell Jacket", "£398"),
            VariantFetch::Fetched(VariantMap::new()),
        )],
        &mut stats,
        Utc::now(),
    );

    // Price change: silently absorbed, no distinct event type.
    let outcome = reconcile(
        &mut store,
        "jackets",
        vec![(
            raw("1", "Shell Jacket", "£420"),
            VariantFetch::Fetched(VariantMap::new()),
        )],
        &mut stats,
        Utc::now(),
    );

    assert!(outcome.new_products.is_empty());
    assert!(outcome.availability_events.is_empty());
    assert_eq!(store.products()["1"].price, "£420");
    assert_eq!(stats.new_products, 1);
}

#[test]
fn partially_observed_variant_map_merges_over_stored_state() {
    let (_dir, mut store) = empty_store();
    let mut stats = MonitorStats::default();

    reconcile(
        &mut store,
        "shirts",
        vec![(
            raw("5", "Flannel Shirt", "£118"),
            VariantFetch::Fetched(variants(&[("Plaid - M", 1), ("Plaid - L", 2)])),
        )],
        &mut stats,
        Utc::now(),
    );

    reconcile(
        &mut store,
        "shirts",
        vec![(
            raw("5", "Flannel Shirt", "£118"),
            VariantFetch::Fetched(variants(&[("Plaid - M", 0)])),
        )],
        &mut stats,
        Utc::now(),
    );

    let merged = &store.variants_for("5").unwrap().variants;
    assert_eq!(merged.len(), 2);
    assert!(!merged["Plaid - M"].available, "fresh key overrides stored");
    assert!(merged["Plaid - L"].available, "stored-only key survives");
}
