//! Extraction adapter: rendered category content to raw product descriptors.
//!
//! Partial extraction is the expected common case, not an error: a
//! descriptor missing a required field is skipped and logged, and never
//! aborts the rest of the page.

use serde_json::Value;

use crate::error::ScraperError;
use crate::types::RawProduct;

/// Extracts product descriptors from one category listing document.
///
/// Descriptors missing an `id` or a `handle` are skipped with a warning.
///
/// # Errors
///
/// Returns [`ScraperError::Extraction`] only when the document as a whole
/// has no `products` array — a malformed or partially rendered page, treated
/// by the caller as a per-category failure.
pub fn extract_products(category: &str, page: &Value) -> Result<Vec<RawProduct>, ScraperError> {
    let Some(items) = page.get("products").and_then(Value::as_array) else {
        return Err(ScraperError::Extraction {
            category: category.to_owned(),
            reason: "document has no products array".to_owned(),
        });
    };

    let mut products = Vec::with_capacity(items.len());
    for item in items {
        if let Some(product) = parse_descriptor(category, item) {
            products.push(product);
        }
    }
    Ok(products)
}

/// Parses one listing entry, or returns `None` (with a warning) when a
/// required field is missing.
fn parse_descriptor(category: &str, item: &Value) -> Option<RawProduct> {
    let Some(id) = id_string(item.get("id")) else {
        tracing::warn!(category, "skipping listing entry without a product id");
        return None;
    };
    let Some(handle) = item.get("handle").and_then(Value::as_str) else {
        tracing::warn!(category, id, "skipping listing entry without a handle");
        return None;
    };

    Some(RawProduct {
        id,
        handle: handle.to_owned(),
        title: display_string(item.get("title")),
        price: display_string(item.get("price")),
        image: image_url(item),
    })
}

/// Normalizes a product id that may arrive as a JSON number or string.
fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Renders an optional scalar as an opaque display string, empty when absent.
fn display_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// The image field appears either as a plain `image_url` string or as a
/// nested `image.src` object depending on the listing variant.
fn image_url(item: &Value) -> String {
    if let Some(url) = item.get("image_url").and_then(Value::as_str) {
        return url.to_owned();
    }
    match item.get("image") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(obj)) => obj
            .get("src")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
