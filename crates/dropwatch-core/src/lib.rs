mod app_config;
mod config;
pub mod products;
pub mod stats;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{ProductSnapshot, VariantMap, VariantRecord, VariantState};
pub use stats::MonitorStats;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
