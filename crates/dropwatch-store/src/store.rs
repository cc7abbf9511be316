//! Durable product/variant state backed by local JSON files.
//!
//! Layout under one data directory:
//!
//! ```text
//! dropwatch-data/
//! ├── products.json      # map: product id → snapshot
//! └── variants/
//!     └── <id>.json      # per-product variant record
//! ```
//!
//! The store is singly owned by the monitor loop: all mutation happens
//! in-memory through it sequentially, and persistence is explicit. Loading
//! is tolerant — a missing or corrupt file yields an empty state with a
//! warning, never a startup failure.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use dropwatch_core::{ProductSnapshot, VariantMap, VariantState};

use crate::error::StoreError;

pub struct StateStore {
    data_dir: PathBuf,
    products: BTreeMap<String, ProductSnapshot>,
    variants: BTreeMap<String, VariantState>,
}

impl StateStore {
    /// Opens the store at `data_dir`, creating the directory layout if
    /// needed and loading any previously persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] only when the directories cannot be
    /// created; unreadable or corrupt data files load as empty state.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let variants_dir = data_dir.join("variants");
        for dir in [data_dir, variants_dir.as_path()] {
            fs::create_dir_all(dir).map_err(|e| StoreError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let products = load_products(&data_dir.join("products.json"));
        let variants = load_variant_states(&variants_dir);

        tracing::info!(
            products = products.len(),
            variant_records = variants.len(),
            data_dir = %data_dir.display(),
            "state store opened"
        );

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            products,
            variants,
        })
    }

    #[must_use]
    pub fn products(&self) -> &BTreeMap<String, ProductSnapshot> {
        &self.products
    }

    #[must_use]
    pub fn contains_product(&self, id: &str) -> bool {
        self.products.contains_key(id)
    }

    #[must_use]
    pub fn variants_for(&self, id: &str) -> Option<&VariantState> {
        self.variants.get(id)
    }

    /// Inserts or overwrites a product snapshot. Descriptive fields are
    /// replaced wholesale; known products are never removed.
    pub fn upsert_product(&mut self, snapshot: ProductSnapshot) {
        self.products.insert(snapshot.id.clone(), snapshot);
    }

    /// Merges a freshly fetched variant map into the stored state for a
    /// product: fresh keys override stored keys, stored-only keys survive
    /// untouched. A key missing from `fresh` means "not observed this
    /// cycle", not "removed".
    pub fn merge_variants(
        &mut self,
        id: &str,
        product_title: &str,
        fresh: VariantMap,
        now: DateTime<Utc>,
    ) {
        let state = self
            .variants
            .entry(id.to_owned())
            .or_insert_with(|| VariantState {
                product_id: id.to_owned(),
                product_title: product_title.to_owned(),
                variants: VariantMap::new(),
                timestamp: now,
            });
        state.product_title = product_title.to_owned();
        state.timestamp = now;
        state.variants.extend(fresh);
    }

    /// Writes `products.json`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on serialization or write failure.
    pub fn persist_products(&self) -> Result<(), StoreError> {
        let path = self.data_dir.join("products.json");
        write_json(&path, &self.products)
    }

    /// Writes the variant record file for one product. Unknown ids are a
    /// no-op so callers can persist from a touched-id list blindly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on serialization or write failure.
    pub fn persist_variants(&self, id: &str) -> Result<(), StoreError> {
        let Some(state) = self.variants.get(id) else {
            return Ok(());
        };
        let path = self.data_dir.join("variants").join(format!("{id}.json"));
        write_json(&path, state)
    }

    /// Persists everything currently in memory. Used on shutdown so state
    /// observed mid-cycle is not lost.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.persist_products()?;
        for id in self.variants.keys() {
            self.persist_variants(id)?;
        }
        Ok(())
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, content).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn load_products(path: &Path) -> BTreeMap<String, ProductSnapshot> {
    let Ok(content) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str::<BTreeMap<String, ProductSnapshot>>(&content) {
        Ok(mut products) => {
            // The id is the map key on disk; re-inject it into each value.
            for (id, snapshot) in &mut products {
                snapshot.id.clone_from(id);
            }
            products
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt products file, starting empty");
            BTreeMap::new()
        }
    }
}

fn load_variant_states(dir: &Path) -> BTreeMap<String, VariantState> {
    let mut states = BTreeMap::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return states;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            tracing::warn!(path = %path.display(), "unreadable variant file, skipping");
            continue;
        };
        match serde_json::from_str::<VariantState>(&content) {
            Ok(state) => {
                states.insert(state.product_id.clone(), state);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt variant file, skipping");
            }
        }
    }
    states
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
