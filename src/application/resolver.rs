//! Slug resolution.
//!
//! One URL segment can name a custom page, a blog post, a country, an
//! announcement or a country subpage, and slugs are not unique across those
//! tables. A single fan-out fetches every candidate (Tier A), then the
//! strategies in [`RESOLUTION_ORDER`] are tried left to right and the first
//! match wins. A failing lookup is logged and treated as "no candidate";
//! the snapshot it produced is then marked degraded and never cached, and
//! the [`Resolved`] outcome carries the flag so callers can skip caching the
//! rendered page as well.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, warn};

use crate::application::matcher::{MatchSource, SubpageCountryMatcher};
use crate::application::repos::{
    ANNOUNCEMENT_TYPE_PATTERN, COUNTRY_TYPE_PATTERN, ContentRepo, CountryCollectionsRepo,
    RepoError,
};
use crate::cache::{Fresh, PageCache};
use crate::domain::entities::{
    CountryMenuRecord, CountryPageData, CountryRecord, CustomPageRecord, PageData,
};
use crate::domain::error::DomainError;
use crate::domain::types::{ContentKind, Locale};

pub(crate) const METRIC_RESOLVE: &str = "vizesayfa_resolve_total";

/// Blogs listed on a country page.
const COUNTRY_BLOG_LIMIT: u32 = 6;

/// One step of the resolution cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    CustomPage,
    Blog,
    Country,
    Announcement,
    Menu,
}

/// Business precedence of slug kinds. Reordering this changes what URLs mean.
pub const RESOLUTION_ORDER: [ResolutionStrategy; 5] = [
    ResolutionStrategy::CustomPage,
    ResolutionStrategy::Blog,
    ResolutionStrategy::Country,
    ResolutionStrategy::Announcement,
    ResolutionStrategy::Menu,
];

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    CustomPage(CustomPageRecord),
    BlogRedirect { location: String },
    Country(CountryResolution),
    AnnouncementRedirect { location: String },
    Menu(MenuResolution),
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryResolution {
    pub country: CountryRecord,
    pub aggregate: Arc<CountryPageData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuResolution {
    pub menu: CountryMenuRecord,
    pub parent: Option<ParentCountry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParentCountry {
    pub country: CountryRecord,
    pub source: MatchSource,
    pub aggregate: Arc<CountryPageData>,
}

/// A resolution together with whether any lookup behind it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub resolution: Resolution,
    pub degraded: bool,
}

impl Resolution {
    pub fn kind(&self) -> ContentKind {
        match self {
            Resolution::CustomPage(_) => ContentKind::CustomPage,
            Resolution::BlogRedirect { .. } => ContentKind::BlogRedirect,
            Resolution::Country(_) => ContentKind::Country,
            Resolution::AnnouncementRedirect { .. } => ContentKind::AnnouncementRedirect,
            Resolution::Menu(_) => ContentKind::Menu,
            Resolution::NotFound => ContentKind::NotFound,
        }
    }
}

/// Trim surrounding slashes; reject empty and multi-segment slugs.
pub fn normalize_slug(raw: &str) -> Result<&str, DomainError> {
    let slug = raw.trim().trim_matches('/');
    if slug.is_empty() {
        Err(DomainError::invalid_slug(raw, "empty slug"))
    } else if slug.contains('/') {
        Err(DomainError::invalid_slug(raw, "nested path"))
    } else {
        Ok(slug)
    }
}

#[derive(Clone)]
pub struct SlugResolver {
    content: Arc<dyn ContentRepo>,
    collections: Arc<dyn CountryCollectionsRepo>,
    cache: Arc<PageCache>,
    matcher: SubpageCountryMatcher,
    source_country_code: String,
}

impl SlugResolver {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        collections: Arc<dyn CountryCollectionsRepo>,
        cache: Arc<PageCache>,
        source_country_code: impl Into<String>,
    ) -> Self {
        Self {
            matcher: SubpageCountryMatcher::new(Arc::clone(&content)),
            content,
            collections,
            cache,
            source_country_code: source_country_code.into(),
        }
    }

    pub fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    pub async fn resolve(&self, raw_slug: &str, locale: Locale) -> Resolution {
        self.resolve_tracked(raw_slug, locale).await.resolution
    }

    /// Like [`resolve`](Self::resolve), also reporting whether a failed
    /// lookup may have changed the outcome.
    pub async fn resolve_tracked(&self, raw_slug: &str, locale: Locale) -> Resolved {
        let slug = match normalize_slug(raw_slug) {
            Ok(slug) => slug,
            Err(err) => {
                debug!(
                    target = "vizesayfa::application::resolver",
                    error = %err,
                    "rejected malformed slug"
                );
                return self.finish(raw_slug, locale, Resolution::NotFound, false);
            }
        };

        let snapshot = self.page_data(slug).await;
        let mut degraded = snapshot.degraded;

        for strategy in RESOLUTION_ORDER {
            if let Some(resolution) = self
                .attempt(strategy, slug, locale, &snapshot, &mut degraded)
                .await
            {
                return self.finish(slug, locale, resolution, degraded);
            }
        }

        self.finish(slug, locale, Resolution::NotFound, degraded)
    }

    /// Tier A snapshot for `slug`.
    pub async fn page_data(&self, slug: &str) -> Arc<PageData> {
        self.cache
            .page_data(slug, || self.fetch_page_data(slug))
            .await
    }

    /// Tier B aggregate for `country`.
    pub async fn country_data(&self, country: &CountryRecord) -> Arc<CountryPageData> {
        self.cache
            .country_data(country.id, || self.fetch_country_data(country))
            .await
    }

    fn finish(
        &self,
        slug: &str,
        locale: Locale,
        resolution: Resolution,
        degraded: bool,
    ) -> Resolved {
        let kind = resolution.kind();
        counter!(METRIC_RESOLVE, "kind" => kind.as_str()).increment(1);
        debug!(
            target = "vizesayfa::application::resolver",
            slug,
            locale = locale.as_str(),
            kind = kind.as_str(),
            degraded,
            "slug resolved"
        );
        Resolved {
            resolution,
            degraded,
        }
    }

    async fn attempt(
        &self,
        strategy: ResolutionStrategy,
        slug: &str,
        locale: Locale,
        snapshot: &PageData,
        degraded: &mut bool,
    ) -> Option<Resolution> {
        match strategy {
            ResolutionStrategy::CustomPage => snapshot
                .custom_page
                .as_ref()
                .filter(|page| page.published)
                .map(|page| Resolution::CustomPage(page.clone())),
            ResolutionStrategy::Blog => snapshot.blog.as_ref().map(|_| Resolution::BlogRedirect {
                location: format!("/{}blog/{slug}", locale.path_prefix()),
            }),
            ResolutionStrategy::Country => {
                let country = snapshot.country.as_ref()?;
                let aggregate = self.country_data(country).await;
                *degraded |= aggregate.degraded;
                Some(Resolution::Country(CountryResolution {
                    country: country.clone(),
                    aggregate,
                }))
            }
            ResolutionStrategy::Announcement => {
                let probe = self
                    .content
                    .find_taxonomy(&format!("duyuru/{slug}"), ANNOUNCEMENT_TYPE_PATTERN)
                    .await;
                isolate(slug, "announcement", probe, degraded).map(|_| {
                    Resolution::AnnouncementRedirect {
                        location: format!("/duyuru/{slug}"),
                    }
                })
            }
            ResolutionStrategy::Menu => {
                let menu = snapshot.menu.as_ref()?;
                let lookup = self.matcher.match_parent(menu).await;
                *degraded |= lookup.degraded;
                let parent = match lookup.matched {
                    Some(matched) => {
                        let aggregate = self.country_data(&matched.country).await;
                        *degraded |= aggregate.degraded;
                        Some(ParentCountry {
                            country: matched.country,
                            source: matched.source,
                            aggregate,
                        })
                    }
                    None => None,
                };
                Some(Resolution::Menu(MenuResolution {
                    menu: menu.clone(),
                    parent,
                }))
            }
        }
    }

    async fn fetch_page_data(&self, slug: &str) -> Fresh<PageData> {
        let (custom_page, blog, country, menu) = tokio::join!(
            self.content.find_custom_page(slug),
            self.content.find_blog(slug),
            self.content.find_country_by_slug(slug),
            self.content.find_menu(slug),
        );

        let mut degraded = false;
        let data = PageData {
            custom_page: isolate(slug, "custom_page", custom_page, &mut degraded),
            blog: isolate(slug, "blog", blog, &mut degraded),
            country: isolate(slug, "country", country, &mut degraded),
            menu: isolate(slug, "menu", menu, &mut degraded),
            degraded,
        };

        seal(data, degraded)
    }

    async fn fetch_country_data(&self, country: &CountryRecord) -> Fresh<CountryPageData> {
        let id = country.id;
        let country_code = country
            .country_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());

        let visa_requirement = async {
            match country_code {
                Some(code) => {
                    self.collections
                        .find_visa_requirement(&self.source_country_code, code)
                        .await
                }
                None => Ok(None),
            }
        };

        let (menus, products, faq, blogs, comments, taxonomy, visa_requirement) = tokio::join!(
            self.collections.list_menus(id),
            self.collections.list_products(id),
            self.collections.list_faq(id),
            self.collections.list_blogs(id, COUNTRY_BLOG_LIMIT),
            self.collections.list_comments(id),
            self.content.find_taxonomy(&country.slug, COUNTRY_TYPE_PATTERN),
            visa_requirement,
        );

        let slug = country.slug.as_str();
        let mut degraded = false;
        let data = CountryPageData {
            menus: isolate(slug, "menus", menus, &mut degraded),
            products: isolate(slug, "products", products, &mut degraded),
            faq: isolate(slug, "faq", faq, &mut degraded),
            blogs: isolate(slug, "blogs", blogs, &mut degraded),
            comments: isolate(slug, "comments", comments, &mut degraded),
            taxonomy: isolate(slug, "taxonomy", taxonomy, &mut degraded),
            visa_requirement: isolate(slug, "visa_requirement", visa_requirement, &mut degraded),
            degraded,
        };

        seal(data, degraded)
    }
}

fn seal<T>(data: T, degraded: bool) -> Fresh<T> {
    if degraded {
        Fresh::transient(data)
    } else {
        Fresh::cacheable(data)
    }
}

/// Map a failed branch to its empty value, flagging the snapshot.
fn isolate<T: Default>(
    slug: &str,
    branch: &'static str,
    result: Result<T, RepoError>,
    degraded: &mut bool,
) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(
                target = "vizesayfa::application::resolver",
                slug,
                branch,
                error = %err,
                "lookup failed; treating branch as empty"
            );
            *degraded = true;
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_order_is_the_business_precedence() {
        assert_eq!(
            RESOLUTION_ORDER,
            [
                ResolutionStrategy::CustomPage,
                ResolutionStrategy::Blog,
                ResolutionStrategy::Country,
                ResolutionStrategy::Announcement,
                ResolutionStrategy::Menu,
            ]
        );
    }

    #[test]
    fn normalize_slug_trims_slashes() {
        assert_eq!(normalize_slug("/fransa/").ok(), Some("fransa"));
        assert_eq!(normalize_slug("fransa").ok(), Some("fransa"));
    }

    #[test]
    fn normalize_slug_rejects_empty_and_nested() {
        assert!(matches!(
            normalize_slug("//"),
            Err(DomainError::InvalidSlug { reason: "empty slug", .. })
        ));
        assert!(matches!(
            normalize_slug("blog/fransa"),
            Err(DomainError::InvalidSlug { reason: "nested path", .. })
        ));
    }
}
