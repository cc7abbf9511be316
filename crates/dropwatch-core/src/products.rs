use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fresh-or-stored variant data for one product, keyed by
/// `"{style} - {size}"`.
pub type VariantMap = BTreeMap<String, VariantRecord>;

/// The last-known descriptive state of a product, keyed by its upstream id
/// in the store.
///
/// A snapshot is created on first sighting and overwritten on every later
/// sighting. It is never deleted by the monitor: absence from a scrape means
/// "not observed this cycle" (partial page loads are common), not "removed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Upstream product id, stored as a string to avoid precision loss.
    #[serde(skip)]
    pub id: String,
    pub title: String,
    /// Display price exactly as scraped, e.g. `"£148"`. Opaque; price
    /// changes are absorbed on update, not emitted as events.
    pub price: String,
    /// Category the product was discovered under, e.g. `"jackets"`.
    pub category: String,
    /// URL slug used to fetch the product's variant detail.
    pub handle: String,
    pub image: String,
    /// Timestamp of the last successful scrape that saw this product.
    pub last_updated: DateTime<Utc>,
}

/// One purchasable style+size combination of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Upstream variant (size) id, if the endpoint provided one.
    pub id: Option<i64>,
    /// Units in stock; `None` when the endpoint did not report a level.
    pub stock_level: Option<u32>,
    /// Derived at fetch time as `stock_level > 0`; an unknown level counts
    /// as unavailable. Never trusted from upstream.
    pub available: bool,
}

impl VariantRecord {
    /// Builds a record from a reported stock level, deriving `available`.
    #[must_use]
    pub fn from_stock_level(id: Option<i64>, stock_level: Option<u32>) -> Self {
        Self {
            id,
            stock_level,
            available: stock_level.unwrap_or(0) > 0,
        }
    }
}

/// The durable per-product variant record: the full variant map plus the
/// identity fields written alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantState {
    pub product_id: String,
    pub product_title: String,
    pub variants: VariantMap,
    /// Time of the last successful variant fetch merged into this state.
    pub timestamp: DateTime<Utc>,
}

impl VariantState {
    /// Returns `true` if at least one variant is currently purchasable.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.values().any(|v| v.available)
    }
}
