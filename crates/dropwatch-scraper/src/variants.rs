//! Variant fetcher: per-product style/size stock detail.

use serde_json::Value;

use dropwatch_core::{VariantMap, VariantRecord};

use crate::error::ScraperError;
use crate::renderer::PageRenderer;
use crate::types::ProductDetail;

/// Fetches the variant map for one product handle.
///
/// Any failure here is the caller's `FetchFailure` signal: prior state is
/// retained and nothing is escalated.
///
/// # Errors
///
/// Returns [`ScraperError`] when the endpoint is unreachable or the body is
/// not a parseable product detail document.
pub async fn fetch_variants<R: PageRenderer>(
    renderer: &R,
    url: &str,
) -> Result<VariantMap, ScraperError> {
    let body = renderer.fetch_json(url).await?;
    parse_variant_detail(url, &body)
}

fn parse_variant_detail(url: &str, body: &Value) -> Result<VariantMap, ScraperError> {
    let detail: ProductDetail =
        serde_json::from_value(body.clone()).map_err(|e| ScraperError::Deserialize {
            context: format!("product detail from {url}"),
            source: e,
        })?;
    Ok(parse_variant_map(&detail))
}

/// Builds the variant map from a parsed detail document.
///
/// Keys are `"{style} - {size}"`. Style or size entries with a missing name
/// are skipped individually; they never abort the rest of the product.
/// Availability is derived from the stock level, never trusted from
/// upstream.
#[must_use]
pub fn parse_variant_map(detail: &ProductDetail) -> VariantMap {
    let mut variants = VariantMap::new();
    for style in &detail.styles {
        let Some(style_name) = style.name.as_deref() else {
            tracing::debug!("skipping style entry without a name");
            continue;
        };
        for size in &style.sizes {
            let Some(size_name) = size.name.as_deref() else {
                tracing::debug!(style = style_name, "skipping size entry without a name");
                continue;
            };
            variants.insert(
                format!("{style_name} - {size_name}"),
                VariantRecord::from_stock_level(size.id, size.stock_level),
            );
        }
    }
    variants
}

#[cfg(test)]
#[path = "variants_test.rs"]
mod tests;
