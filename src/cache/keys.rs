//! Cache tags and response keys.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Invalidation tag declared by a cache tier.
///
/// The admin tooling purges tags after writing countries or menus; each tier
/// is dropped whenever any tag it carries is purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Tier A: slug lookups across all content kinds.
    PageData,
    /// Tier B: per-country aggregates.
    CountryPageData,
}

impl CacheTag {
    pub const ALL: [CacheTag; 2] = [CacheTag::PageData, CacheTag::CountryPageData];

    pub fn as_str(self) -> &'static str {
        match self {
            CacheTag::PageData => "page-data",
            CacheTag::CountryPageData => "country-page-data",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown cache tag `{0}`")]
pub struct UnknownTag(pub String);

impl FromStr for CacheTag {
    type Err = UnknownTag;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CacheTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == value.trim())
            .ok_or_else(|| UnknownTag(value.to_string()))
    }
}

/// Outer-tier key: one rendered response per path and query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseKey {
    pub path: String,
    pub query: String,
}

impl ResponseKey {
    pub fn new(path: impl Into<String>, query: Option<&str>) -> Self {
        Self {
            path: path.into(),
            query: query.unwrap_or_default().to_string(),
        }
    }
}
