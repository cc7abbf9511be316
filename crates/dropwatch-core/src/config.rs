use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default category coverage for the storefront, in fixed polling order.
const DEFAULT_CATEGORIES: &[&str] = &[
    "jackets",
    "shirts",
    "tops_sweaters",
    "sweatshirts",
    "pants",
    "shorts",
    "t-shirts",
    "hats",
    "bags",
    "accessories",
    "shoes",
    "skate",
];

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Load monitor configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load monitor configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// The parsing/validation core is decoupled from the real environment so it
/// can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("DROPWATCH_BASE_URL", "https://eu.supreme.com")
        .trim_end_matches('/')
        .to_string();
    let data_dir = PathBuf::from(or_default("DROPWATCH_DATA_DIR", "./dropwatch-data"));
    let log_level = or_default("DROPWATCH_LOG_LEVEL", "info");

    let categories = parse_categories(
        "DROPWATCH_CATEGORIES",
        lookup("DROPWATCH_CATEGORIES").ok().as_deref(),
    )?;

    let check_interval_secs = parse_u64("DROPWATCH_CHECK_INTERVAL_SECS", "600")?;
    let category_pause_min_ms = parse_u64("DROPWATCH_CATEGORY_PAUSE_MIN_MS", "2000")?;
    let category_pause_max_ms = parse_u64("DROPWATCH_CATEGORY_PAUSE_MAX_MS", "4000")?;
    if category_pause_max_ms < category_pause_min_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "DROPWATCH_CATEGORY_PAUSE_MAX_MS".to_string(),
            reason: format!(
                "must be >= DROPWATCH_CATEGORY_PAUSE_MIN_MS ({category_pause_min_ms})"
            ),
        });
    }

    let request_timeout_secs = parse_u64("DROPWATCH_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("DROPWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let max_retries = parse_u32("DROPWATCH_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("DROPWATCH_RETRY_BACKOFF_BASE_SECS", "5")?;
    let max_consecutive_failures = parse_u32("DROPWATCH_MAX_CONSECUTIVE_FAILURES", "3")?;

    Ok(AppConfig {
        base_url,
        data_dir,
        log_level,
        categories,
        check_interval_secs,
        category_pause_min_ms,
        category_pause_max_ms,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        max_consecutive_failures,
    })
}

/// Parses a comma-separated category list, falling back to the default
/// coverage when the variable is unset.
fn parse_categories(var: &str, raw: Option<&str>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect());
    };

    let categories: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if categories.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "category list is empty".to_string(),
        });
    }

    Ok(categories)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
