//! The diff engine: reconciles freshly scraped products and variants
//! against the state store.
//!
//! Classification rules:
//! - an id absent from the store is a **new product**;
//! - a known id is an **update**: descriptive fields and `last_updated` are
//!   overwritten, and price changes are absorbed silently rather than
//!   emitted as events;
//! - a variant key seen for the first time, or an `available` flip from
//!   false to true, is an **availability event**;
//! - a stored variant key missing from the fresh fetch is retained: absence
//!   means "not observed this cycle", never "removed";
//! - a failed variant fetch contributes no information, so the stored
//!   mapping stays exactly as it was.

use chrono::{DateTime, Utc};

use dropwatch_core::{MonitorStats, ProductSnapshot, VariantMap};
use dropwatch_scraper::RawProduct;
use dropwatch_store::StateStore;

/// Outcome of the variant fetch for one product.
#[derive(Debug)]
pub enum VariantFetch {
    Fetched(VariantMap),
    /// The endpoint was unreachable or unparsable; prior state is retained.
    Failed,
}

/// What one reconcile pass found, for logging and persistence.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Titles of products seen for the first time.
    pub new_products: Vec<String>,
    /// Human-readable availability events: first sightings and restocks,
    /// as `"{title}: {variant key}"`.
    pub availability_events: Vec<String>,
    /// Product ids whose variant state changed and needs persisting.
    pub touched: Vec<String>,
}

/// Reconciles one category's fresh scrape against the store.
///
/// Mutates only the in-memory store; persistence is the caller's step.
pub fn reconcile(
    store: &mut StateStore,
    category: &str,
    fresh: Vec<(RawProduct, VariantFetch)>,
    stats: &mut MonitorStats,
    now: DateTime<Utc>,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();

    for (product, fetch) in fresh {
        let is_new = !store.contains_product(&product.id);
        if is_new {
            stats.new_products += 1;
            tracing::info!(
                category,
                id = %product.id,
                title = %product.title,
                price = %product.price,
                "new product"
            );
            outcome.new_products.push(product.title.clone());
        }

        store.upsert_product(ProductSnapshot {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            category: category.to_owned(),
            handle: product.handle,
            image: product.image,
            last_updated: now,
        });

        match fetch {
            VariantFetch::Fetched(variants) => {
                record_availability_events(store, &product.id, &product.title, &variants, stats, &mut outcome);
                store.merge_variants(&product.id, &product.title, variants, now);
                outcome.touched.push(product.id);
            }
            VariantFetch::Failed => {
                tracing::debug!(
                    id = %product.id,
                    title = %product.title,
                    "variant fetch failed, retaining prior variant state"
                );
            }
        }
    }

    outcome
}

/// Compares a fresh variant map against the stored one, recording first
/// sightings and false→true availability flips.
fn record_availability_events(
    store: &StateStore,
    id: &str,
    title: &str,
    fresh: &VariantMap,
    stats: &mut MonitorStats,
    outcome: &mut ReconcileOutcome,
) {
    let stored = store.variants_for(id).map(|state| &state.variants);

    for (key, record) in fresh {
        let event = match stored.and_then(|map| map.get(key)) {
            None => {
                tracing::info!(id, title, variant = %key, available = record.available, "new variant");
                true
            }
            Some(prev) if !prev.available && record.available => {
                tracing::info!(id, title, variant = %key, "restock");
                true
            }
            Some(_) => false,
        };
        if event {
            stats.variants_found += 1;
            outcome.availability_events.push(format!("{title}: {key}"));
        }
    }
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
