//! Repository traits describing the read paths of the data store.
//!
//! The store is owned by the admin tooling; everything here is read-only.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    BlogRecord, CommentRecord, CountryId, CountryMenuRecord, CountryRecord, CustomPageRecord,
    ProductRecord, TaxonomyRecord, VisaRequirementRecord,
};
use crate::domain::faq::FaqEntry;

/// `type` pattern of taxonomy rows that point at announcements.
pub const ANNOUNCEMENT_TYPE_PATTERN: &str = "%Announcement%";
/// `type` pattern of taxonomy rows that carry legacy country titles.
pub const COUNTRY_TYPE_PATTERN: &str = "%Country%";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Slug- and id-keyed lookups used by the resolver cascade.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn find_custom_page(&self, slug: &str) -> Result<Option<CustomPageRecord>, RepoError>;

    async fn find_blog(&self, slug: &str) -> Result<Option<BlogRecord>, RepoError>;

    async fn find_country_by_slug(&self, slug: &str) -> Result<Option<CountryRecord>, RepoError>;

    async fn find_country_by_id(&self, id: CountryId) -> Result<Option<CountryRecord>, RepoError>;

    async fn find_menu(&self, slug: &str) -> Result<Option<CountryMenuRecord>, RepoError>;

    /// Taxonomy row with exactly `slug` whose type matches the SQL `LIKE` pattern.
    async fn find_taxonomy(
        &self,
        slug: &str,
        type_pattern: &str,
    ) -> Result<Option<TaxonomyRecord>, RepoError>;
}

/// Sub-collections attached to a resolved country.
#[async_trait]
pub trait CountryCollectionsRepo: Send + Sync {
    async fn list_menus(&self, country_id: CountryId) -> Result<Vec<CountryMenuRecord>, RepoError>;

    async fn list_products(&self, country_id: CountryId) -> Result<Vec<ProductRecord>, RepoError>;

    /// Questions with their answers, already normalized.
    async fn list_faq(&self, country_id: CountryId) -> Result<Vec<FaqEntry>, RepoError>;

    async fn list_blogs(
        &self,
        country_id: CountryId,
        limit: u32,
    ) -> Result<Vec<BlogRecord>, RepoError>;

    async fn list_comments(&self, country_id: CountryId) -> Result<Vec<CommentRecord>, RepoError>;

    async fn find_visa_requirement(
        &self,
        source_code: &str,
        destination_code: &str,
    ) -> Result<Option<VisaRequirementRecord>, RepoError>;
}

/// Liveness probe of the backing store, served on `/_health/db`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<(), RepoError>;
}
