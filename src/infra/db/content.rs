use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    application::repos::{ContentRepo, RepoError},
    domain::entities::{
        BlogRecord, CountryId, CountryMenuRecord, CountryRecord, CountrySections,
        CustomPageRecord, TaxonomyRecord,
    },
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(FromRow)]
struct CustomPageRow {
    id: i64,
    slug: String,
    published: bool,
    title: String,
    title_en: Option<String>,
    content: String,
    content_en: Option<String>,
    meta_title: Option<String>,
    meta_title_en: Option<String>,
    meta_description: Option<String>,
    meta_description_en: Option<String>,
}

impl From<CustomPageRow> for CustomPageRecord {
    fn from(row: CustomPageRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            published: row.published,
            title: row.title,
            title_en: row.title_en,
            content: row.content,
            content_en: row.content_en,
            meta_title: row.meta_title,
            meta_title_en: row.meta_title_en,
            meta_description: row.meta_description,
            meta_description_en: row.meta_description_en,
        }
    }
}

#[derive(FromRow)]
pub(super) struct BlogRow {
    id: i64,
    slug: String,
    title: String,
    content: String,
    image_url: Option<String>,
    created_at: OffsetDateTime,
}

impl From<BlogRow> for BlogRecord {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct CountryRow {
    id: i64,
    slug: String,
    country_code: Option<String>,
    name: String,
    name_en: Option<String>,
    title: String,
    title_en: Option<String>,
    description: Option<String>,
    description_en: Option<String>,
    contents: Option<String>,
    contents_en: Option<String>,
    meta_title: Option<String>,
    meta_title_en: Option<String>,
    meta_description: Option<String>,
    meta_description_en: Option<String>,
    visa_types: Vec<String>,
    visa_types_en: Vec<String>,
    required_documents: Vec<String>,
    required_documents_en: Vec<String>,
    application_steps: Vec<String>,
    application_steps_en: Vec<String>,
    fees: Vec<String>,
    fees_en: Vec<String>,
    processing_notes: Vec<String>,
    processing_notes_en: Vec<String>,
    tips: Vec<String>,
    tips_en: Vec<String>,
    embassy_contacts: Vec<String>,
    embassy_contacts_en: Vec<String>,
    process_time: Option<String>,
    image_url: Option<String>,
}

impl From<CountryRow> for CountryRecord {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            country_code: row.country_code,
            name: row.name,
            name_en: row.name_en,
            title: row.title,
            title_en: row.title_en,
            description: row.description,
            description_en: row.description_en,
            contents: row.contents,
            contents_en: row.contents_en,
            meta_title: row.meta_title,
            meta_title_en: row.meta_title_en,
            meta_description: row.meta_description,
            meta_description_en: row.meta_description_en,
            sections: CountrySections {
                visa_types: row.visa_types,
                visa_types_en: row.visa_types_en,
                required_documents: row.required_documents,
                required_documents_en: row.required_documents_en,
                application_steps: row.application_steps,
                application_steps_en: row.application_steps_en,
                fees: row.fees,
                fees_en: row.fees_en,
                processing_notes: row.processing_notes,
                processing_notes_en: row.processing_notes_en,
                tips: row.tips,
                tips_en: row.tips_en,
                embassy_contacts: row.embassy_contacts,
                embassy_contacts_en: row.embassy_contacts_en,
            },
            process_time: row.process_time,
            image_url: row.image_url,
        }
    }
}

#[derive(FromRow)]
pub(super) struct MenuRow {
    id: i64,
    slug: String,
    name: String,
    description: Option<String>,
    contents: Option<String>,
    parent_id: Option<i64>,
}

impl From<MenuRow> for CountryMenuRecord {
    fn from(row: MenuRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            contents: row.contents,
            parent_id: row.parent_id,
        }
    }
}

#[derive(FromRow)]
struct TaxonomyRow {
    id: i64,
    model_id: i64,
    slug: String,
    type_name: String,
    title: Option<String>,
    title_en: Option<String>,
    description: Option<String>,
    description_en: Option<String>,
}

impl From<TaxonomyRow> for TaxonomyRecord {
    fn from(row: TaxonomyRow) -> Self {
        Self {
            id: row.id,
            model_id: row.model_id,
            slug: row.slug,
            type_name: row.type_name,
            title: row.title,
            title_en: row.title_en,
            description: row.description,
            description_en: row.description_en,
        }
    }
}

pub(super) const BLOG_COLUMNS: &str = "id, slug, title, content, image_url, created_at";
pub(super) const MENU_COLUMNS: &str = "id, slug, name, description, contents, parent_id";

const COUNTRY_SELECT: &str = r#"
    SELECT id, slug, country_code, name, name_en, title, title_en,
           description, description_en, contents, contents_en,
           meta_title, meta_title_en, meta_description, meta_description_en,
           COALESCE(visa_types, '{}') AS visa_types,
           COALESCE(visa_types_en, '{}') AS visa_types_en,
           COALESCE(required_documents, '{}') AS required_documents,
           COALESCE(required_documents_en, '{}') AS required_documents_en,
           COALESCE(application_steps, '{}') AS application_steps,
           COALESCE(application_steps_en, '{}') AS application_steps_en,
           COALESCE(fees, '{}') AS fees,
           COALESCE(fees_en, '{}') AS fees_en,
           COALESCE(processing_notes, '{}') AS processing_notes,
           COALESCE(processing_notes_en, '{}') AS processing_notes_en,
           COALESCE(tips, '{}') AS tips,
           COALESCE(tips_en, '{}') AS tips_en,
           COALESCE(embassy_contacts, '{}') AS embassy_contacts,
           COALESCE(embassy_contacts_en, '{}') AS embassy_contacts_en,
           process_time, image_url
    FROM countries
"#;

#[async_trait]
impl ContentRepo for PostgresRepositories {
    async fn find_custom_page(&self, slug: &str) -> Result<Option<CustomPageRecord>, RepoError> {
        let row = sqlx::query_as::<_, CustomPageRow>(
            r#"
            SELECT id, slug, published, title, title_en, content, content_en,
                   meta_title, meta_title_en, meta_description, meta_description_en
            FROM custom_pages
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CustomPageRecord::from))
    }

    async fn find_blog(&self, slug: &str) -> Result<Option<BlogRecord>, RepoError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = $1");
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(BlogRecord::from))
    }

    async fn find_country_by_slug(&self, slug: &str) -> Result<Option<CountryRecord>, RepoError> {
        let sql = format!("{COUNTRY_SELECT} WHERE slug = $1");
        let row = sqlx::query_as::<_, CountryRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CountryRecord::from))
    }

    async fn find_country_by_id(&self, id: CountryId) -> Result<Option<CountryRecord>, RepoError> {
        let sql = format!("{COUNTRY_SELECT} WHERE id = $1");
        let row = sqlx::query_as::<_, CountryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CountryRecord::from))
    }

    async fn find_menu(&self, slug: &str) -> Result<Option<CountryMenuRecord>, RepoError> {
        let sql = format!("SELECT {MENU_COLUMNS} FROM country_menus WHERE slug = $1");
        let row = sqlx::query_as::<_, MenuRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(CountryMenuRecord::from))
    }

    async fn find_taxonomy(
        &self,
        slug: &str,
        type_pattern: &str,
    ) -> Result<Option<TaxonomyRecord>, RepoError> {
        let row = sqlx::query_as::<_, TaxonomyRow>(
            r#"
            SELECT id, model_id, slug, type AS type_name,
                   title, title_en, description, description_en
            FROM taxonomies
            WHERE slug = $1 AND type LIKE $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(slug)
        .bind(type_pattern)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(TaxonomyRecord::from))
    }
}
