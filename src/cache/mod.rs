//! Page cache
//!
//! Three tiers keep database load bounded for a catalogue that changes rarely:
//!
//! - **page-data**: slug → `{custom page, blog, country, menu}` snapshot
//! - **country-page-data**: country id → menus, packages, FAQ, blogs, comments
//! - **response**: rendered HTML, the outer revalidation ceiling
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! page_data_ttl_seconds = 3600
//! country_data_ttl_seconds = 3600
//! response_ttl_seconds = 7200
//! ```

mod config;
mod keys;
mod lock;
mod middleware;
mod page_cache;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheTag, ResponseKey, UnknownTag};
pub use middleware::response_cache_layer;
pub use page_cache::PageCache;
pub use store::{CachedResponse, Fresh, TtlStore};
pub(crate) use store::{METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_MISS};
