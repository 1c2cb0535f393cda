//! SEO metadata for resolved pages.
//!
//! Titles and descriptions follow a fixed precedence (editor override first,
//! generated text last). Every title ends with exactly one brand suffix.

use serde::Serialize;

use crate::application::site::SiteIdentity;
use crate::application::text::{plain_summary, strip_html, truncate_at_word};
use crate::domain::entities::{CountryMenuRecord, TaxonomyRecord, VisaRequirementRecord};
use crate::domain::locale::{
    LocalizedCountry, LocalizedCustomPage, taxonomy_description, taxonomy_title,
};
use crate::domain::types::Locale;

pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MAX_CHARS: usize = 155;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hreflang {
    pub tr: String,
    pub en: String,
    pub x_default: String,
}

impl Hreflang {
    /// `(hreflang, href)` pairs in document order.
    pub fn entries(&self) -> [(&'static str, &str); 3] {
        [
            ("tr", self.tr.as_str()),
            ("en", self.en.as_str()),
            ("x-default", self.x_default.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub hreflang: Hreflang,
    pub og_image: Option<String>,
}

/// Inputs for a country page beyond the localized record itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryExtras<'a> {
    pub taxonomy: Option<&'a TaxonomyRecord>,
    pub visa_requirement: Option<&'a VisaRequirementRecord>,
}

#[derive(Debug, Clone)]
pub struct MetadataSynthesizer {
    site: SiteIdentity,
}

impl MetadataSynthesizer {
    pub fn new(site: SiteIdentity) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteIdentity {
        &self.site
    }

    pub fn for_country(
        &self,
        country: &LocalizedCountry,
        extras: CountryExtras<'_>,
        locale: Locale,
    ) -> PageMetadata {
        let title = first_text([
            country.meta_title.as_deref(),
            extras.taxonomy.and_then(|tax| taxonomy_title(tax, locale)),
            Some(country.title.as_str()),
        ])
        .map(str::to_string)
        .unwrap_or_else(|| fallback_title(&country.name, locale));

        let description = first_text([country.meta_description.as_deref()])
            .map(str::to_string)
            .or_else(|| {
                extras
                    .taxonomy
                    .and_then(|tax| taxonomy_description(tax, locale))
                    .and_then(|text| plain_summary(text, DESCRIPTION_MAX_CHARS))
            })
            .or_else(|| {
                country
                    .description
                    .as_deref()
                    .and_then(|text| plain_summary(text, DESCRIPTION_MAX_CHARS))
            })
            .or_else(|| {
                extras
                    .visa_requirement
                    .and_then(|req| requirement_description(&country.name, req, locale))
            })
            .unwrap_or_else(|| generic_country_description(&country.name, locale));

        PageMetadata {
            title: self.ensure_brand_suffix(&title),
            description,
            canonical_url: self.site.page_url(&country.slug, locale),
            hreflang: self.hreflang(&country.slug),
            og_image: self.og_image(country.image_url.as_deref()),
        }
    }

    pub fn for_custom_page(&self, page: &LocalizedCustomPage, locale: Locale) -> PageMetadata {
        let title = first_text([page.meta_title.as_deref(), Some(page.title.as_str())])
            .unwrap_or(self.site.brand_name.as_str())
            .to_string();

        let description = first_text([page.meta_description.as_deref()])
            .map(str::to_string)
            .or_else(|| plain_summary(&page.content, DESCRIPTION_MAX_CHARS))
            .unwrap_or_else(|| generic_site_description(&self.site.brand_name, locale));

        PageMetadata {
            title: self.ensure_brand_suffix(&title),
            description,
            canonical_url: self.site.page_url(&page.slug, locale),
            hreflang: self.hreflang(&page.slug),
            og_image: self.og_image(None),
        }
    }

    pub fn for_menu(
        &self,
        menu: &CountryMenuRecord,
        parent: Option<&LocalizedCountry>,
        locale: Locale,
    ) -> PageMetadata {
        let name = menu.name.trim();
        let title = match parent {
            Some(country) if name.is_empty() => fallback_title(&country.name, locale),
            Some(country) if !contains_ignore_case(name, &country.name) => {
                format!("{name} - {}", country.name)
            }
            _ if name.is_empty() => self.site.brand_name.clone(),
            _ => name.to_string(),
        };

        let description = [menu.description.as_deref(), menu.contents.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|text| plain_summary(text, DESCRIPTION_MAX_CHARS))
            .unwrap_or_else(|| match parent {
                Some(country) => generic_country_description(&country.name, locale),
                None => generic_site_description(&self.site.brand_name, locale),
            });

        PageMetadata {
            title: self.ensure_brand_suffix(&title),
            description,
            canonical_url: self.site.page_url(&menu.slug, locale),
            hreflang: self.hreflang(&menu.slug),
            og_image: self.og_image(parent.and_then(|country| country.image_url.as_deref())),
        }
    }

    /// Exactly `{tr, en, x-default}`; x-default is the Turkish URL.
    pub fn hreflang(&self, slug: &str) -> Hreflang {
        let tr = self.site.page_url(slug, Locale::Tr);
        Hreflang {
            en: self.site.page_url(slug, Locale::En),
            x_default: tr.clone(),
            tr,
        }
    }

    /// Append ` | <brand>` unless the title already ends with it.
    pub fn ensure_brand_suffix(&self, title: &str) -> String {
        let suffix = format!(" | {}", self.site.brand_name);
        let title = title.trim();
        if title.ends_with(&suffix) {
            title.to_string()
        } else {
            format!("{title}{suffix}")
        }
    }

    fn og_image(&self, image: Option<&str>) -> Option<String> {
        image
            .filter(|path| !path.trim().is_empty())
            .or(self.site.default_og_image.as_deref())
            .map(|path| self.site.absolute(path))
    }
}

/// `"<Name> Vizesi"` / `"<Name> Visa"`, word-safely capped.
pub fn fallback_title(name: &str, locale: Locale) -> String {
    let title = match locale {
        Locale::Tr => format!("{} Vizesi", name.trim()),
        Locale::En => format!("{} Visa", name.trim()),
    };
    truncate_at_word(&title, TITLE_MAX_CHARS)
}

/// A sentence built from the structured entry requirements, when any exist.
pub fn requirement_description(
    name: &str,
    requirement: &VisaRequirementRecord,
    locale: Locale,
) -> Option<String> {
    let field = |value: Option<&str>| {
        value
            .map(strip_html)
            .filter(|value| !value.is_empty())
    };
    let status = field(requirement.status.as_deref());
    let stay = field(requirement.allowed_stay.as_deref());
    let conditions = field(requirement.conditions.as_deref());

    if status.is_none() && stay.is_none() && conditions.is_none() {
        return None;
    }

    let (status_label, stay_label) = match locale {
        Locale::Tr => ("vizesi", "Kalış süresi"),
        Locale::En => ("visa", "Allowed stay"),
    };

    let mut parts = Vec::with_capacity(3);
    if let Some(status) = status {
        parts.push(format!("{} {status_label}: {status}.", name.trim()));
    }
    if let Some(stay) = stay {
        parts.push(format!("{stay_label}: {stay}."));
    }
    if let Some(conditions) = conditions {
        parts.push(conditions);
    }

    Some(truncate_at_word(&parts.join(" "), DESCRIPTION_MAX_CHARS))
}

fn generic_country_description(name: &str, locale: Locale) -> String {
    let text = match locale {
        Locale::Tr => format!(
            "{} vizesi için gerekli belgeler, ücretler ve güncel başvuru süreci.",
            name.trim()
        ),
        Locale::En => format!(
            "Required documents, fees and the current application process for a {} visa.",
            name.trim()
        ),
    };
    truncate_at_word(&text, DESCRIPTION_MAX_CHARS)
}

fn generic_site_description(brand: &str, locale: Locale) -> String {
    match locale {
        Locale::Tr => format!("{brand} ile vize başvurunuzu kolayca planlayın."),
        Locale::En => format!("Plan your visa application with {brand}."),
    }
}

fn first_text<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::locale::LocalizedSections;

    fn synthesizer() -> MetadataSynthesizer {
        MetadataSynthesizer::new(
            SiteIdentity::new("https://vize.example", "Vize Merkezi")
                .with_default_og_image(Some("/og.png".to_string())),
        )
    }

    fn country() -> LocalizedCountry {
        LocalizedCountry {
            id: 1,
            slug: "fransa".to_string(),
            country_code: Some("FR".to_string()),
            name: "Fransa".to_string(),
            base_name: "Fransa".to_string(),
            title: String::new(),
            description: None,
            contents: None,
            meta_title: None,
            meta_description: None,
            sections: LocalizedSections::default(),
            process_time: None,
            image_url: None,
        }
    }

    fn taxonomy() -> TaxonomyRecord {
        TaxonomyRecord {
            id: 3,
            model_id: 1,
            slug: "fransa".to_string(),
            type_name: "App\\Models\\Country".to_string(),
            title: Some("Fransa Schengen Vizesi".to_string()),
            title_en: None,
            description: Some("<p>Fransa&nbsp;için <b>Schengen</b> başvurusu</p>".to_string()),
            description_en: None,
        }
    }

    #[test]
    fn brand_suffix_is_a_fixed_point() {
        let meta = synthesizer();
        let once = meta.ensure_brand_suffix("Fransa Vizesi");
        let twice = meta.ensure_brand_suffix(&once);
        assert_eq!(once, "Fransa Vizesi | Vize Merkezi");
        assert_eq!(once, twice);
    }

    #[test]
    fn meta_title_override_wins() {
        let mut country = country();
        country.meta_title = Some("Özel Başlık".to_string());
        country.title = "Fransa".to_string();
        let tax = taxonomy();

        let meta = synthesizer().for_country(
            &country,
            CountryExtras {
                taxonomy: Some(&tax),
                visa_requirement: None,
            },
            Locale::Tr,
        );
        assert_eq!(meta.title, "Özel Başlık | Vize Merkezi");
    }

    #[test]
    fn taxonomy_fills_title_and_stripped_description() {
        let tax = taxonomy();
        let meta = synthesizer().for_country(
            &country(),
            CountryExtras {
                taxonomy: Some(&tax),
                visa_requirement: None,
            },
            Locale::Tr,
        );
        assert_eq!(meta.title, "Fransa Schengen Vizesi | Vize Merkezi");
        assert_eq!(meta.description, "Fransa için Schengen başvurusu");
    }

    #[test]
    fn fallback_title_is_generated_per_locale() {
        let meta = synthesizer();
        let tr = meta.for_country(&country(), CountryExtras::default(), Locale::Tr);
        let en = meta.for_country(&country(), CountryExtras::default(), Locale::En);
        assert_eq!(tr.title, "Fransa Vizesi | Vize Merkezi");
        assert_eq!(en.title, "Fransa Visa | Vize Merkezi");
    }

    #[test]
    fn fallback_title_is_capped_at_word_boundary() {
        let name = "Saint Vincent ve Grenadinler Federasyonu Kraliyet Bağımsız Adaları";
        let title = fallback_title(name, Locale::Tr);
        assert!(title.ends_with('…'));
        assert!(title.chars().count() <= TITLE_MAX_CHARS + 1);
        assert!(name.starts_with(title.trim_end_matches('…')));
    }

    #[test]
    fn description_is_synthesized_from_requirements() {
        let requirement = VisaRequirementRecord {
            country_code: "FR".to_string(),
            status: Some("Vize gerekli".to_string()),
            allowed_stay: Some("90 gün".to_string()),
            conditions: None,
        };
        let meta = synthesizer().for_country(
            &country(),
            CountryExtras {
                taxonomy: None,
                visa_requirement: Some(&requirement),
            },
            Locale::Tr,
        );
        assert_eq!(
            meta.description,
            "Fransa vizesi: Vize gerekli. Kalış süresi: 90 gün."
        );
    }

    #[test]
    fn free_text_description_beats_requirements() {
        let mut country = country();
        country.description = Some("<p>Schengen bölgesi</p>".to_string());
        let requirement = VisaRequirementRecord {
            country_code: "FR".to_string(),
            status: Some("Vize gerekli".to_string()),
            allowed_stay: None,
            conditions: None,
        };
        let meta = synthesizer().for_country(
            &country,
            CountryExtras {
                taxonomy: None,
                visa_requirement: Some(&requirement),
            },
            Locale::Tr,
        );
        assert_eq!(meta.description, "Schengen bölgesi");
    }

    #[test]
    fn hreflang_has_exactly_three_alternates() {
        let meta = synthesizer().for_country(&country(), CountryExtras::default(), Locale::En);
        assert_eq!(meta.canonical_url, "https://vize.example/en/fransa");
        assert_eq!(
            meta.hreflang.entries(),
            [
                ("tr", "https://vize.example/fransa"),
                ("en", "https://vize.example/en/fransa"),
                ("x-default", "https://vize.example/fransa"),
            ]
        );
    }

    #[test]
    fn og_image_falls_back_to_default() {
        let meta = synthesizer();
        let without = meta.for_country(&country(), CountryExtras::default(), Locale::Tr);
        assert_eq!(without.og_image.as_deref(), Some("https://vize.example/og.png"));

        let mut with_image = country();
        with_image.image_url = Some("uploads/fr.jpg".to_string());
        let with = meta.for_country(&with_image, CountryExtras::default(), Locale::Tr);
        assert_eq!(
            with.og_image.as_deref(),
            Some("https://vize.example/uploads/fr.jpg")
        );
    }

    #[test]
    fn menu_title_mentions_parent_country() {
        let menu = CountryMenuRecord {
            id: 9,
            slug: "fransa-ogrenci-vizesi".to_string(),
            name: "Öğrenci Vizesi".to_string(),
            description: None,
            contents: Some("<p>Okul kabul belgesi gerekir.</p>".to_string()),
            parent_id: Some(1),
        };
        let meta = synthesizer().for_menu(&menu, Some(&country()), Locale::Tr);
        assert_eq!(meta.title, "Öğrenci Vizesi - Fransa | Vize Merkezi");
        assert_eq!(meta.description, "Okul kabul belgesi gerekir.");
        assert_eq!(meta.canonical_url, "https://vize.example/fransa-ogrenci-vizesi");
    }

    #[test]
    fn custom_page_description_comes_from_content() {
        let page = LocalizedCustomPage {
            slug: "hakkimizda".to_string(),
            title: "Hakkımızda".to_string(),
            content: "<h1>Biz</h1><p>Vize danışmanlığı</p>".to_string(),
            meta_title: None,
            meta_description: None,
        };
        let meta = synthesizer().for_custom_page(&page, Locale::Tr);
        assert_eq!(meta.title, "Hakkımızda | Vize Merkezi");
        assert_eq!(meta.description, "Biz Vize danışmanlığı");
    }
}
