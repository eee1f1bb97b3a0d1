pub mod config_loader;
pub mod price_cache;

pub use config_loader::{LoadConfigError, load_from_file, load_from_file_sync};
pub use price_cache::{PriceCache, PriceCacheStats};
