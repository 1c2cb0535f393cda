//! The page cache: two data tiers plus the outer response tier.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{CountryId, CountryPageData, PageData};

use super::config::CacheConfig;
use super::keys::{CacheTag, ResponseKey};
use super::store::{CachedResponse, Fresh, TtlStore};

const PAGE_DATA_TAGS: &[CacheTag] = &[CacheTag::PageData];
const COUNTRY_DATA_TAGS: &[CacheTag] = &[CacheTag::CountryPageData];
// Rendered pages embed both tiers, so either purge drops them.
const RESPONSE_TAGS: &[CacheTag] = &[CacheTag::PageData, CacheTag::CountryPageData];

pub struct PageCache {
    config: CacheConfig,
    page_data: TtlStore<String, PageData>,
    country_data: TtlStore<CountryId, CountryPageData>,
    responses: TtlStore<ResponseKey, CachedResponse>,
}

impl PageCache {
    pub fn new(config: CacheConfig) -> Self {
        let page_data = TtlStore::new(
            "page-data",
            PAGE_DATA_TAGS,
            config.page_data_ttl,
            config.page_data_limit_non_zero(),
            config.enabled,
        );
        let country_data = TtlStore::new(
            "country-page-data",
            COUNTRY_DATA_TAGS,
            config.country_data_ttl,
            config.country_data_limit_non_zero(),
            config.enabled,
        );
        let responses = TtlStore::new(
            "response",
            RESPONSE_TAGS,
            config.response_ttl,
            config.response_limit_non_zero(),
            config.enabled,
        );

        Self {
            config,
            page_data,
            country_data,
            responses,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Tier A lookup keyed by slug.
    pub async fn page_data<F, Fut>(&self, slug: &str, loader: F) -> Arc<PageData>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Fresh<PageData>>,
    {
        self.page_data.get_or_load(slug.to_string(), loader).await
    }

    /// Tier B lookup keyed by country id.
    pub async fn country_data<F, Fut>(&self, country_id: CountryId, loader: F) -> Arc<CountryPageData>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Fresh<CountryPageData>>,
    {
        self.country_data.get_or_load(country_id, loader).await
    }

    pub fn response(&self, key: &ResponseKey) -> Option<Arc<CachedResponse>> {
        self.responses.get(key)
    }

    pub fn store_response(&self, key: ResponseKey, response: CachedResponse) {
        self.responses.insert(key, response);
    }

    /// Drop every tier that declares `tag`.
    pub fn invalidate_tag(&self, tag: CacheTag) {
        let mut purged = Vec::with_capacity(3);
        if self.page_data.carries(tag) {
            self.page_data.clear();
            purged.push(self.page_data.tier());
        }
        if self.country_data.carries(tag) {
            self.country_data.clear();
            purged.push(self.country_data.tier());
        }
        if self.responses.carries(tag) {
            self.responses.clear();
            purged.push(self.responses.tier());
        }

        info!(
            target = "vizesayfa::cache",
            tag = tag.as_str(),
            tiers = ?purged,
            "Cache tag revalidated"
        );
    }

    pub fn invalidate_all(&self) {
        for tag in CacheTag::ALL {
            self.invalidate_tag(tag);
        }
    }

    pub fn page_data_len(&self) -> usize {
        self.page_data.len()
    }

    pub fn country_data_len(&self) -> usize {
        self.country_data.len()
    }

    pub fn response_len(&self) -> usize {
        self.responses.len()
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn response() -> CachedResponse {
        CachedResponse {
            status: 200,
            headers: Vec::new(),
            body: Bytes::from_static(b"<html></html>"),
        }
    }

    async fn warm(cache: &PageCache) {
        cache
            .page_data("fransa", || async { Fresh::cacheable(PageData::default()) })
            .await;
        cache
            .country_data(7, || async {
                Fresh::cacheable(CountryPageData::default())
            })
            .await;
        cache.store_response(ResponseKey::new("/fransa", None), response());
    }

    #[tokio::test]
    async fn page_data_tag_keeps_country_aggregates() {
        let cache = PageCache::new(CacheConfig::default());
        warm(&cache).await;

        cache.invalidate_tag(CacheTag::PageData);

        assert_eq!(cache.page_data_len(), 0);
        assert_eq!(cache.country_data_len(), 1);
        assert_eq!(cache.response_len(), 0);
    }

    #[tokio::test]
    async fn country_tag_drops_aggregates_and_responses() {
        let cache = PageCache::new(CacheConfig::default());
        warm(&cache).await;

        cache.invalidate_tag(CacheTag::CountryPageData);

        assert_eq!(cache.page_data_len(), 1);
        assert_eq!(cache.country_data_len(), 0);
        assert!(cache.response(&ResponseKey::new("/fransa", None)).is_none());
    }

    #[tokio::test]
    async fn invalidate_all_empties_every_tier() {
        let cache = PageCache::new(CacheConfig::default());
        warm(&cache).await;

        cache.invalidate_all();

        assert_eq!(cache.page_data_len(), 0);
        assert_eq!(cache.country_data_len(), 0);
        assert_eq!(cache.response_len(), 0);
    }

    #[tokio::test]
    async fn disabled_cache_reloads_every_time() {
        let cache = PageCache::disabled();
        let first = cache
            .page_data("fransa", || async { Fresh::cacheable(PageData::default()) })
            .await;
        let second = cache
            .page_data("fransa", || async { Fresh::cacheable(PageData::default()) })
            .await;

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.page_data_len(), 0);
    }
}
