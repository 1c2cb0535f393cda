//! Per-locale field fallback.
//!
//! Every translatable field has a base (Turkish) value and at most one `_en`
//! twin. The English twin is used only when the request is English *and* the
//! twin carries content; otherwise the base value is served so a missing
//! translation never renders an empty section.

use serde::Serialize;

use crate::domain::entities::{
    CountryRecord, CountrySections, CustomPageRecord, ProductRecord, TaxonomyRecord,
};
use crate::domain::types::Locale;

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve a required scalar field.
pub fn pick<'a>(locale: Locale, base: &'a str, twin: Option<&'a str>) -> &'a str {
    match twin {
        Some(twin) if locale.is_english() && has_text(twin) => twin,
        _ => base,
    }
}

/// Resolve an optional scalar field. Blank results collapse to `None`.
pub fn pick_opt<'a>(
    locale: Locale,
    base: Option<&'a str>,
    twin: Option<&'a str>,
) -> Option<&'a str> {
    let chosen = match twin {
        Some(twin) if locale.is_english() && has_text(twin) => Some(twin),
        _ => base,
    };
    chosen.filter(|value| has_text(value))
}

/// Resolve an array field. A twin counts as present when any element has text.
pub fn pick_list<'a>(locale: Locale, base: &'a [String], twin: &'a [String]) -> &'a [String] {
    if locale.is_english() && twin.iter().any(|item| has_text(item)) {
        twin
    } else {
        base
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalizedSections {
    pub visa_types: Vec<String>,
    pub required_documents: Vec<String>,
    pub application_steps: Vec<String>,
    pub fees: Vec<String>,
    pub processing_notes: Vec<String>,
    pub tips: Vec<String>,
    pub embassy_contacts: Vec<String>,
}

impl LocalizedSections {
    pub fn from_record(sections: &CountrySections, locale: Locale) -> Self {
        let list = |base: &[String], twin: &[String]| -> Vec<String> {
            pick_list(locale, base, twin)
                .iter()
                .filter(|item| has_text(item))
                .cloned()
                .collect()
        };

        Self {
            visa_types: list(&sections.visa_types, &sections.visa_types_en),
            required_documents: list(
                &sections.required_documents,
                &sections.required_documents_en,
            ),
            application_steps: list(&sections.application_steps, &sections.application_steps_en),
            fees: list(&sections.fees, &sections.fees_en),
            processing_notes: list(&sections.processing_notes, &sections.processing_notes_en),
            tips: list(&sections.tips, &sections.tips_en),
            embassy_contacts: list(&sections.embassy_contacts, &sections.embassy_contacts_en),
        }
    }
}

/// A country with every translatable field already resolved for one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedCountry {
    pub id: i64,
    pub slug: String,
    pub country_code: Option<String>,
    pub name: String,
    /// Untranslated name; stable across locales.
    pub base_name: String,
    pub title: String,
    pub description: Option<String>,
    pub contents: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub sections: LocalizedSections,
    pub process_time: Option<String>,
    pub image_url: Option<String>,
}

impl LocalizedCountry {
    pub fn from_record(country: &CountryRecord, locale: Locale) -> Self {
        Self {
            id: country.id,
            slug: country.slug.clone(),
            country_code: country
                .country_code
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
            name: pick(locale, &country.name, country.name_en.as_deref()).to_string(),
            base_name: country.name.clone(),
            title: pick(locale, &country.title, country.title_en.as_deref()).to_string(),
            description: pick_opt(
                locale,
                country.description.as_deref(),
                country.description_en.as_deref(),
            )
            .map(str::to_string),
            contents: pick_opt(
                locale,
                country.contents.as_deref(),
                country.contents_en.as_deref(),
            )
            .map(str::to_string),
            meta_title: pick_opt(
                locale,
                country.meta_title.as_deref(),
                country.meta_title_en.as_deref(),
            )
            .map(str::to_string),
            meta_description: pick_opt(
                locale,
                country.meta_description.as_deref(),
                country.meta_description_en.as_deref(),
            )
            .map(str::to_string),
            sections: LocalizedSections::from_record(&country.sections, locale),
            process_time: country.process_time.clone(),
            image_url: country.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedCustomPage {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

impl LocalizedCustomPage {
    pub fn from_record(page: &CustomPageRecord, locale: Locale) -> Self {
        Self {
            slug: page.slug.clone(),
            title: pick(locale, &page.title, page.title_en.as_deref()).to_string(),
            content: pick(locale, &page.content, page.content_en.as_deref()).to_string(),
            meta_title: pick_opt(
                locale,
                page.meta_title.as_deref(),
                page.meta_title_en.as_deref(),
            )
            .map(str::to_string),
            meta_description: pick_opt(
                locale,
                page.meta_description.as_deref(),
                page.meta_description_en.as_deref(),
            )
            .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedProduct {
    pub id: i64,
    pub name: String,
    pub base_name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
}

impl LocalizedProduct {
    pub fn from_record(product: &ProductRecord, locale: Locale) -> Self {
        Self {
            id: product.id,
            name: pick(locale, &product.name, product.name_en.as_deref()).to_string(),
            base_name: product.name.clone(),
            description: pick_opt(
                locale,
                product.description.as_deref(),
                product.description_en.as_deref(),
            )
            .map(str::to_string),
            price: product.price,
            currency: product.currency.clone(),
        }
    }
}

/// Legacy taxonomy title/description for one locale.
pub fn taxonomy_title(taxonomy: &TaxonomyRecord, locale: Locale) -> Option<&str> {
    pick_opt(
        locale,
        taxonomy.title.as_deref(),
        taxonomy.title_en.as_deref(),
    )
}

pub fn taxonomy_description(taxonomy: &TaxonomyRecord, locale: Locale) -> Option<&str> {
    pick_opt(
        locale,
        taxonomy.description.as_deref(),
        taxonomy.description_en.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn english_uses_twin_when_present() {
        assert_eq!(pick(Locale::En, "Fransa", Some("France")), "France");
        assert_eq!(pick(Locale::Tr, "Fransa", Some("France")), "Fransa");
    }

    #[test]
    fn blank_twin_falls_back_to_base() {
        assert_eq!(pick(Locale::En, "Fransa", Some("   ")), "Fransa");
        assert_eq!(pick(Locale::En, "Fransa", None), "Fransa");
    }

    #[test]
    fn empty_english_description_resolves_to_turkish_one() {
        let resolved = pick_opt(Locale::En, Some("Schengen ülkesi"), Some(""));
        assert_eq!(resolved, Some("Schengen ülkesi"));
    }

    #[test]
    fn optional_field_is_none_only_when_both_are_empty() {
        assert_eq!(pick_opt(Locale::En, Some(""), Some("")), None);
        assert_eq!(pick_opt(Locale::Tr, None, Some("only english")), None);
    }

    #[test]
    fn list_twin_needs_at_least_one_non_blank_entry() {
        let base = strings(&["Pasaport"]);
        let blank_twin = strings(&["", " "]);
        let twin = strings(&["Passport"]);

        assert_eq!(pick_list(Locale::En, &base, &blank_twin), base.as_slice());
        assert_eq!(pick_list(Locale::En, &base, &twin), twin.as_slice());
        assert_eq!(pick_list(Locale::Tr, &base, &twin), base.as_slice());
    }

    #[test]
    fn localized_sections_drop_blank_items() {
        let sections = CountrySections {
            tips: strings(&["Erken başvurun", ""]),
            ..Default::default()
        };

        let localized = LocalizedSections::from_record(&sections, Locale::En);
        assert_eq!(localized.tips, strings(&["Erken başvurun"]));
        assert!(localized.fees.is_empty());
    }
}
