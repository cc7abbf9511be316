//! Raw shapes returned by the storefront's JSON endpoints.
//!
//! ## Category listings (`/shop/all/<category>.json`)
//!
//! A `{"products": [...]}` document. Observed descriptor fields vary:
//! `id` arrives as a JSON number on some categories and a string on others,
//! `price` may be a display string (`"£148"`) or a bare number, and the
//! image may be a plain `image_url` string or a nested `image.src` object.
//! Individual descriptors are frequently incomplete on partially loaded
//! pages, which is why extraction is per-item tolerant rather than a single
//! typed deserialize of the whole array.
//!
//! ## Product detail (`/shop/<handle>.json`)
//!
//! A `{"styles": [...]}` document where each style carries a `name` and a
//! `sizes` array of `{id, name, stock_level}`. Style or size entries with
//! missing names appear in practice and are skipped individually. The
//! endpoint's own availability flags are not trusted; availability is
//! derived from `stock_level`.

use serde::Deserialize;

/// A product descriptor extracted from one category listing.
///
/// `title`, `price`, and `image` are opaque display strings and default to
/// empty when the listing omits them; `id` and `handle` are required for a
/// descriptor to classify at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProduct {
    /// Upstream product id, normalized to a string.
    pub id: String,
    /// URL slug used to fetch the product's variant detail.
    pub handle: String,
    pub title: String,
    pub price: String,
    pub image: String,
}

/// Top-level response from the per-product detail endpoint.
#[derive(Debug, Deserialize)]
pub struct ProductDetail {
    /// Absent on some malformed or placeholder products; treated as an
    /// empty style list.
    #[serde(default)]
    pub styles: Vec<StyleEntry>,
}

/// One colorway/style of a product.
#[derive(Debug, Deserialize)]
pub struct StyleEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
}

/// One size of a style, with its stock status.
#[derive(Debug, Deserialize)]
pub struct SizeEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Units in stock. Absent when the storefront does not expose a level.
    #[serde(default)]
    pub stock_level: Option<u32>,
}
