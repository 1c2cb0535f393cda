//! Static site identity shared by metadata and structured data.

use crate::config::SiteSettings;
use crate::domain::types::Locale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteIdentity {
    /// Absolute origin without a trailing slash, e.g. `https://vize.example`.
    pub domain: String,
    pub brand_name: String,
    pub logo_url: Option<String>,
    pub default_og_image: Option<String>,
}

impl SiteIdentity {
    pub fn new(public_url: &str, brand_name: impl Into<String>) -> Self {
        Self {
            domain: public_url.trim().trim_end_matches('/').to_string(),
            brand_name: brand_name.into(),
            logo_url: None,
            default_og_image: None,
        }
    }

    pub fn with_logo(mut self, logo_url: Option<String>) -> Self {
        self.logo_url = logo_url;
        self
    }

    pub fn with_default_og_image(mut self, image: Option<String>) -> Self {
        self.default_og_image = image;
        self
    }

    /// `<domain>/[en/]<slug>`
    pub fn page_url(&self, slug: &str, locale: Locale) -> String {
        format!("{}/{}{}", self.domain, locale.path_prefix(), slug)
    }

    /// Locale home page, `<domain>/` or `<domain>/en/`.
    pub fn home_url(&self, locale: Locale) -> String {
        format!("{}/{}", self.domain, locale.path_prefix())
    }

    /// Make a stored asset path absolute against the domain.
    pub fn absolute(&self, path: &str) -> String {
        let path = path.trim();
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.domain, path.trim_start_matches('/'))
        }
    }
}

impl From<&SiteSettings> for SiteIdentity {
    fn from(settings: &SiteSettings) -> Self {
        Self::new(&settings.public_url, settings.brand_name.clone())
            .with_logo(settings.logo_url.clone())
            .with_default_og_image(settings.default_og_image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_urls_carry_locale_prefix() {
        let site = SiteIdentity::new("https://vize.example/", "Vize Merkezi");
        assert_eq!(site.page_url("fransa", Locale::Tr), "https://vize.example/fransa");
        assert_eq!(
            site.page_url("fransa", Locale::En),
            "https://vize.example/en/fransa"
        );
        assert_eq!(site.home_url(Locale::En), "https://vize.example/en/");
    }

    #[test]
    fn absolute_keeps_full_urls() {
        let site = SiteIdentity::new("https://vize.example", "Vize Merkezi");
        assert_eq!(
            site.absolute("/uploads/fr.jpg"),
            "https://vize.example/uploads/fr.jpg"
        );
        assert_eq!(
            site.absolute("https://cdn.example/fr.jpg"),
            "https://cdn.example/fr.jpg"
        );
    }
}
