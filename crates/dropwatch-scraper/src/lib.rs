pub mod error;
pub mod extract;
pub mod renderer;
mod retry;
pub mod types;
pub mod variants;

pub use error::ScraperError;
pub use extract::extract_products;
pub use renderer::{HttpRenderer, PageRenderer};
pub use types::RawProduct;
pub use variants::{fetch_variants, parse_variant_map};
