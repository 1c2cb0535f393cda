use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("locale `{tag}` is not served")]
    UnsupportedLocale { tag: String },
    #[error("slug `{slug}` cannot be resolved: {reason}")]
    InvalidSlug { slug: String, reason: &'static str },
}

impl DomainError {
    pub fn unsupported_locale(tag: impl Into<String>) -> Self {
        Self::UnsupportedLocale { tag: tag.into() }
    }

    pub fn invalid_slug(slug: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSlug {
            slug: slug.into(),
            reason,
        }
    }
}
