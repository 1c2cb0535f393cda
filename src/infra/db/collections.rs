use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    application::repos::{CountryCollectionsRepo, RepoError},
    domain::{
        entities::{
            BlogRecord, CommentRecord, CountryId, CountryMenuRecord, ProductRecord,
            VisaRequirementRecord,
        },
        faq::{self, FaqEntry, QuestionRow},
    },
};

use super::{
    PostgresRepositories,
    content::{BLOG_COLUMNS, BlogRow, MENU_COLUMNS, MenuRow},
    map_sqlx_error,
};

const COMMENT_LIMIT: i64 = 20;

#[derive(FromRow)]
struct ProductRow {
    id: i64,
    country_id: i64,
    name: String,
    name_en: Option<String>,
    description: Option<String>,
    description_en: Option<String>,
    price: Option<f64>,
    currency: String,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            country_id: row.country_id,
            name: row.name,
            name_en: row.name_en,
            description: row.description,
            description_en: row.description_en,
            price: row.price,
            currency: row.currency,
        }
    }
}

#[derive(FromRow)]
struct FaqRow {
    id: i64,
    parent_id: Option<i64>,
    content: String,
}

impl From<FaqRow> for QuestionRow {
    fn from(row: FaqRow) -> Self {
        Self {
            id: row.id,
            parent_id: row.parent_id,
            content: row.content,
            answers: None,
        }
    }
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    country_id: i64,
    author_name: Option<String>,
    content: String,
    rating: Option<i16>,
    created_at: OffsetDateTime,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            country_id: row.country_id,
            author_name: row.author_name,
            content: row.content,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct VisaRequirementRow {
    country_code: String,
    status: Option<String>,
    allowed_stay: Option<String>,
    conditions: Option<String>,
}

impl From<VisaRequirementRow> for VisaRequirementRecord {
    fn from(row: VisaRequirementRow) -> Self {
        Self {
            country_code: row.country_code,
            status: row.status,
            allowed_stay: row.allowed_stay,
            conditions: row.conditions,
        }
    }
}

#[async_trait]
impl CountryCollectionsRepo for PostgresRepositories {
    async fn list_menus(&self, country_id: CountryId) -> Result<Vec<CountryMenuRecord>, RepoError> {
        let sql = format!(
            "SELECT {MENU_COLUMNS} FROM country_menus WHERE parent_id = $1 ORDER BY name, id"
        );
        let rows = sqlx::query_as::<_, MenuRow>(&sql)
            .bind(country_id)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CountryMenuRecord::from).collect())
    }

    async fn list_products(&self, country_id: CountryId) -> Result<Vec<ProductRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, country_id, name, name_en, description, description_en,
                   price::float8 AS price, currency
            FROM products
            WHERE country_id = $1
            ORDER BY price NULLS LAST, id
            "#,
        )
        .bind(country_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn list_faq(&self, country_id: CountryId) -> Result<Vec<FaqEntry>, RepoError> {
        // Questions carry the country; answers only point at their question.
        let rows = sqlx::query_as::<_, FaqRow>(
            r#"
            SELECT q.id, q.parent_id, q.content
            FROM questions q
            WHERE q.country_id = $1
               OR q.parent_id IN (SELECT id FROM questions WHERE country_id = $1)
            ORDER BY q.parent_id NULLS FIRST, q.id
            "#,
        )
        .bind(country_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(faq::normalize(
            rows.into_iter().map(QuestionRow::from).collect(),
        ))
    }

    async fn list_blogs(
        &self,
        country_id: CountryId,
        limit: u32,
    ) -> Result<Vec<BlogRecord>, RepoError> {
        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE country_id = $1 ORDER BY created_at DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(country_id)
            .bind(i64::from(limit))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogRecord::from).collect())
    }

    async fn list_comments(&self, country_id: CountryId) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, country_id, author_name, content, rating, created_at
            FROM comments
            WHERE country_id = $1 AND approved
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(country_id)
        .bind(COMMENT_LIMIT)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn find_visa_requirement(
        &self,
        source_code: &str,
        destination_code: &str,
    ) -> Result<Option<VisaRequirementRecord>, RepoError> {
        let row = sqlx::query_as::<_, VisaRequirementRow>(
            r#"
            SELECT destination_code AS country_code, status, allowed_stay, conditions
            FROM visa_requirements
            WHERE source_code = $1 AND destination_code = $2
            "#,
        )
        .bind(source_code)
        .bind(destination_code)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(VisaRequirementRecord::from))
    }
}
