use std::path::PathBuf;

/// Runtime configuration for the monitor, sourced from `DROPWATCH_*`
/// environment variables. Every knob has a default, so an empty environment
/// yields a working configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storefront origin, e.g. `https://eu.supreme.com`.
    pub base_url: String,
    /// Root directory for the persisted product/variant store.
    pub data_dir: PathBuf,
    pub log_level: String,
    /// Category slugs polled each cycle, in fixed order.
    pub categories: Vec<String>,
    /// Fixed pause between full cycles, in seconds.
    pub check_interval_secs: u64,
    /// Bounds for the randomized pause between categories.
    pub category_pause_min_ms: u64,
    pub category_pause_max_ms: u64,
    /// Per-render/fetch timeout; a hung page load is bounded by this.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    /// Consecutive failed categories tolerated before the loop gives up.
    pub max_consecutive_failures: u32,
}

impl AppConfig {
    /// URL of the JSON listing endpoint for one category.
    #[must_use]
    pub fn category_url(&self, category: &str) -> String {
        format!("{}/shop/all/{category}.json", self.base_url)
    }

    /// URL of the per-product variant/stock endpoint.
    #[must_use]
    pub fn product_url(&self, handle: &str) -> String {
        format!("{}/shop/{handle}.json", self.base_url)
    }

    /// URL of the shop landing page used for session warm-up.
    #[must_use]
    pub fn shop_url(&self) -> String {
        format!("{}/pages/shop", self.base_url)
    }
}
