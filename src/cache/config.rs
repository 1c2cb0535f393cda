//! Cache configuration.
//!
//! Controls the two data tiers and the outer response tier via the `[cache]`
//! section of `vizesayfa.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_PAGE_DATA_TTL_SECS: u64 = 3600;
const DEFAULT_COUNTRY_DATA_TTL_SECS: u64 = 3600;
const DEFAULT_RESPONSE_TTL_SECS: u64 = 7200;
const DEFAULT_PAGE_DATA_LIMIT: usize = 1000;
const DEFAULT_COUNTRY_DATA_LIMIT: usize = 300;
const DEFAULT_RESPONSE_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Master switch; a disabled cache always calls the loader.
    pub enabled: bool,
    /// Tier A: slug → page data.
    pub page_data_ttl: Duration,
    /// Tier B: country id → country aggregate.
    pub country_data_ttl: Duration,
    /// Outer tier: rendered responses.
    pub response_ttl: Duration,
    pub page_data_limit: usize,
    pub country_data_limit: usize,
    pub response_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_data_ttl: Duration::from_secs(DEFAULT_PAGE_DATA_TTL_SECS),
            country_data_ttl: Duration::from_secs(DEFAULT_COUNTRY_DATA_TTL_SECS),
            response_ttl: Duration::from_secs(DEFAULT_RESPONSE_TTL_SECS),
            page_data_limit: DEFAULT_PAGE_DATA_LIMIT,
            country_data_limit: DEFAULT_COUNTRY_DATA_LIMIT,
            response_limit: DEFAULT_RESPONSE_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            page_data_ttl: settings.page_data_ttl,
            country_data_ttl: settings.country_data_ttl,
            response_ttl: settings.response_ttl,
            page_data_limit: settings.page_data_limit,
            country_data_limit: settings.country_data_limit,
            response_limit: settings.response_limit,
        }
    }
}

impl CacheConfig {
    pub fn page_data_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_data_limit).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn country_data_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.country_data_limit).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn response_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.response_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Seconds advertised to shared caches for the outer revalidation window.
    pub fn response_max_age_secs(&self) -> u64 {
        self.response_ttl.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.page_data_ttl, Duration::from_secs(3600));
        assert_eq!(config.country_data_ttl, Duration::from_secs(3600));
        assert_eq!(config.response_ttl, Duration::from_secs(7200));
        assert_eq!(config.response_max_age_secs(), 7200);
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            page_data_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.page_data_limit_non_zero().get(), 1);
    }
}
