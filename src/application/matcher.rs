//! Parent-country matching for country subpages ("menus").

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::application::repos::{ContentRepo, RepoError};
use crate::domain::entities::{CountryMenuRecord, CountryRecord};

/// How a subpage was tied to its country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    SlugPrefix,
    ParentId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryMatch {
    pub country: CountryRecord,
    pub source: MatchSource,
}

/// Result of [`SubpageCountryMatcher::match_parent`].
///
/// `degraded` is set when either lookup failed, in which case `matched` may
/// differ from what a healthy store would produce.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParentLookup {
    pub matched: Option<CountryMatch>,
    pub degraded: bool,
}

/// Resolves a subpage to its country.
///
/// The slug prefix (`almanya-calisma-vizesi` → `almanya`) wins over
/// `parent_id`, which is frequently stale in the catalogue.
#[derive(Clone)]
pub struct SubpageCountryMatcher {
    content: Arc<dyn ContentRepo>,
}

impl SubpageCountryMatcher {
    pub fn new(content: Arc<dyn ContentRepo>) -> Self {
        Self { content }
    }

    /// Candidate country slug: everything before the first hyphen.
    ///
    /// Slugs without a hyphen, or with an empty head or tail, have no prefix.
    pub fn slug_prefix(slug: &str) -> Option<&str> {
        let (head, tail) = slug.split_once('-')?;
        if head.is_empty() || tail.is_empty() {
            None
        } else {
            Some(head)
        }
    }

    pub async fn match_parent(&self, menu: &CountryMenuRecord) -> ParentLookup {
        let prefix = Self::slug_prefix(&menu.slug);

        let by_prefix = async {
            match prefix {
                Some(prefix) => self.content.find_country_by_slug(prefix).await,
                None => Ok(None),
            }
        };
        let by_parent = async {
            match menu.parent_id {
                Some(id) => self.content.find_country_by_id(id).await,
                None => Ok(None),
            }
        };
        let (by_prefix, by_parent) = tokio::join!(by_prefix, by_parent);

        let mut degraded = false;
        let by_prefix = discard_failure(&menu.slug, "country_by_prefix", by_prefix, &mut degraded);
        let by_parent = discard_failure(&menu.slug, "country_by_parent", by_parent, &mut degraded);

        let matched = match (by_prefix, by_parent) {
            (Some(country), _) => Some(CountryMatch {
                country,
                source: MatchSource::SlugPrefix,
            }),
            (None, parent) => parent.map(|country| CountryMatch {
                country,
                source: MatchSource::ParentId,
            }),
        };

        ParentLookup { matched, degraded }
    }
}

fn discard_failure(
    slug: &str,
    branch: &'static str,
    result: Result<Option<CountryRecord>, RepoError>,
    degraded: &mut bool,
) -> Option<CountryRecord> {
    result.unwrap_or_else(|err| {
        warn!(
            target = "vizesayfa::application::matcher",
            slug,
            branch,
            error = %err,
            "parent country lookup failed; treating as missing"
        );
        *degraded = true;
        None
    })
}
