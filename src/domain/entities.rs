//! Domain entities mirrored from persistent storage.
//!
//! Every record here is owned and mutated by the admin tooling; the page
//! engine only ever reads them. Translatable fields come in base / `_en`
//! pairs and are resolved through [`crate::domain::locale`].

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::faq::FaqEntry;

pub type CountryId = i64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomPageRecord {
    pub id: i64,
    pub slug: String,
    pub published: bool,
    pub title: String,
    pub title_en: Option<String>,
    pub content: String,
    pub content_en: Option<String>,
    pub meta_title: Option<String>,
    pub meta_title_en: Option<String>,
    pub meta_description: Option<String>,
    pub meta_description_en: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogRecord {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// The seven list sections a country page renders, each with an English twin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountrySections {
    pub visa_types: Vec<String>,
    pub visa_types_en: Vec<String>,
    pub required_documents: Vec<String>,
    pub required_documents_en: Vec<String>,
    pub application_steps: Vec<String>,
    pub application_steps_en: Vec<String>,
    pub fees: Vec<String>,
    pub fees_en: Vec<String>,
    pub processing_notes: Vec<String>,
    pub processing_notes_en: Vec<String>,
    pub tips: Vec<String>,
    pub tips_en: Vec<String>,
    pub embassy_contacts: Vec<String>,
    pub embassy_contacts_en: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRecord {
    pub id: CountryId,
    pub slug: String,
    pub country_code: Option<String>,
    pub name: String,
    pub name_en: Option<String>,
    pub title: String,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub contents: Option<String>,
    pub contents_en: Option<String>,
    pub meta_title: Option<String>,
    pub meta_title_en: Option<String>,
    pub meta_description: Option<String>,
    pub meta_description_en: Option<String>,
    pub sections: CountrySections,
    pub process_time: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryMenuRecord {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub contents: Option<String>,
    pub parent_id: Option<CountryId>,
}

/// Row of the legacy slug → (type, model id) indirection table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyRecord {
    pub id: i64,
    pub model_id: i64,
    pub slug: String,
    pub type_name: String,
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: i64,
    pub country_id: CountryId,
    pub name: String,
    pub name_en: Option<String>,
    pub description: Option<String>,
    pub description_en: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub id: i64,
    pub country_id: CountryId,
    pub author_name: Option<String>,
    pub content: String,
    pub rating: Option<i16>,
    pub created_at: OffsetDateTime,
}

/// Structured entry requirements for the source passport visiting a country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisaRequirementRecord {
    pub country_code: String,
    pub status: Option<String>,
    pub allowed_stay: Option<String>,
    pub conditions: Option<String>,
}

/// Everything a slug may point at, fetched in one fan-out.
///
/// `degraded` is set when at least one branch failed and was treated as a
/// miss; such snapshots are served but never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageData {
    pub custom_page: Option<CustomPageRecord>,
    pub blog: Option<BlogRecord>,
    pub country: Option<CountryRecord>,
    pub menu: Option<CountryMenuRecord>,
    pub degraded: bool,
}

/// Heavy per-country aggregate loaded once a country has been resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryPageData {
    pub menus: Vec<CountryMenuRecord>,
    pub products: Vec<ProductRecord>,
    pub faq: Vec<FaqEntry>,
    pub blogs: Vec<BlogRecord>,
    pub comments: Vec<CommentRecord>,
    pub taxonomy: Option<TaxonomyRecord>,
    pub visa_requirement: Option<VisaRequirementRecord>,
    pub degraded: bool,
}
