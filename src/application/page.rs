//! Turns a `(slug, locale)` request into a renderable page or a redirect.

use time::macros::format_description;

use crate::application::metadata::{CountryExtras, MetadataSynthesizer};
use crate::application::resolver::{
    CountryResolution, MenuResolution, Resolution, SlugResolver,
};
use crate::application::site::SiteIdentity;
use crate::application::structured_data::{JsonLdBlock, StructuredDataBuilder};
use crate::application::text::{sanitize_html, strip_html};
use crate::domain::entities::{
    BlogRecord, CommentRecord, CountryMenuRecord, CountryPageData, VisaRequirementRecord,
};
use crate::domain::faq::FaqEntry;
use crate::domain::locale::{LocalizedCountry, LocalizedCustomPage, LocalizedProduct};
use crate::domain::types::Locale;
use crate::presentation::views::{
    BrandView, CommentView, CountryLabels, CountryPageView, CustomPageView, FaqView,
    LayoutContext, LinkView, MenuPageView, ProductCard, RequirementView, SectionView,
    section_headings,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Country(Box<LayoutContext<CountryPageView>>),
    CustomPage(Box<LayoutContext<CustomPageView>>),
    Menu(Box<LayoutContext<MenuPageView>>),
    /// Permanent redirect to a path on this site.
    Redirect(String),
    NotFound,
}

/// A page outcome plus whether it was built from a degraded resolution.
/// Degraded pages must not be cached by any outer layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub outcome: PageOutcome,
    pub degraded: bool,
}

#[derive(Clone)]
pub struct PageService {
    resolver: SlugResolver,
    metadata: MetadataSynthesizer,
    structured: StructuredDataBuilder,
    brand_name: String,
}

impl PageService {
    pub fn new(resolver: SlugResolver, site: SiteIdentity) -> Self {
        Self {
            brand_name: site.brand_name.clone(),
            metadata: MetadataSynthesizer::new(site.clone()),
            structured: StructuredDataBuilder::new(site),
            resolver,
        }
    }

    pub fn resolver(&self) -> &SlugResolver {
        &self.resolver
    }

    pub fn brand(&self, locale: Locale) -> BrandView {
        BrandView::new(self.brand_name.clone(), locale)
    }

    pub async fn load(&self, slug: &str, locale: Locale) -> PageOutcome {
        self.load_tracked(slug, locale).await.outcome
    }

    pub async fn load_tracked(&self, slug: &str, locale: Locale) -> LoadedPage {
        let resolved = self.resolver.resolve_tracked(slug, locale).await;
        LoadedPage {
            outcome: self.build(resolved.resolution, locale),
            degraded: resolved.degraded,
        }
    }

    fn build(&self, resolution: Resolution, locale: Locale) -> PageOutcome {
        match resolution {
            Resolution::CustomPage(record) => {
                let page = LocalizedCustomPage::from_record(&record, locale);
                let meta = self.metadata.for_custom_page(&page, locale);
                let json_ld = scripts([self.structured.organization()]);
                PageOutcome::CustomPage(Box::new(LayoutContext {
                    brand: self.brand(locale),
                    lang: locale.as_str(),
                    meta: Some(meta),
                    json_ld,
                    content: CustomPageView {
                        title: page.title,
                        content_html: sanitize_html(&page.content).unwrap_or_default(),
                    },
                }))
            }
            Resolution::BlogRedirect { location }
            | Resolution::AnnouncementRedirect { location } => PageOutcome::Redirect(location),
            Resolution::Country(resolution) => self.country_page(resolution, locale),
            Resolution::Menu(resolution) => self.menu_page(resolution, locale),
            Resolution::NotFound => PageOutcome::NotFound,
        }
    }

    fn country_page(&self, resolution: CountryResolution, locale: Locale) -> PageOutcome {
        let CountryResolution { country, aggregate } = resolution;
        let localized = LocalizedCountry::from_record(&country, locale);

        let meta = self.metadata.for_country(
            &localized,
            CountryExtras {
                taxonomy: aggregate.taxonomy.as_ref(),
                visa_requirement: aggregate.visa_requirement.as_ref(),
            },
            locale,
        );
        let json_ld = scripts(self.structured.for_country(
            &localized,
            &aggregate.products,
            &aggregate.faq,
            &aggregate.comments,
            &meta.canonical_url,
            locale,
        ));
        let content = country_view(&localized, &aggregate, locale);

        PageOutcome::Country(Box::new(LayoutContext {
            brand: self.brand(locale),
            lang: locale.as_str(),
            meta: Some(meta),
            json_ld,
            content,
        }))
    }

    fn menu_page(&self, resolution: MenuResolution, locale: Locale) -> PageOutcome {
        let MenuResolution { menu, parent } = resolution;
        let parent = parent.map(|parent| {
            (
                LocalizedCountry::from_record(&parent.country, locale),
                parent.aggregate,
            )
        });

        let meta = self
            .metadata
            .for_menu(&menu, parent.as_ref().map(|(country, _)| country), locale);
        let json_ld = scripts([
            self.structured.organization(),
            self.structured
                .breadcrumb(&menu.name, &meta.canonical_url, locale),
        ]);

        let (country, siblings) = match &parent {
            Some((country, aggregate)) => (
                Some(LinkView {
                    label: country.name.clone(),
                    href: page_path(&country.slug, locale),
                }),
                menu_links(
                    aggregate.menus.iter().filter(|sibling| sibling.slug != menu.slug),
                    locale,
                ),
            ),
            None => (None, Vec::new()),
        };

        PageOutcome::Menu(Box::new(LayoutContext {
            brand: self.brand(locale),
            lang: locale.as_str(),
            meta: Some(meta),
            json_ld,
            content: MenuPageView {
                name: menu.name,
                description_html: menu.description.as_deref().and_then(sanitize_html),
                contents_html: menu.contents.as_deref().and_then(sanitize_html),
                country,
                siblings,
                siblings_label: CountryLabels::for_locale(locale).subpages,
            },
        }))
    }
}

fn scripts(blocks: impl IntoIterator<Item = JsonLdBlock>) -> Vec<String> {
    blocks
        .into_iter()
        .map(|block| block.to_script_body())
        .collect()
}

fn page_path(slug: &str, locale: Locale) -> String {
    format!("/{}{slug}", locale.path_prefix())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn country_view(
    country: &LocalizedCountry,
    aggregate: &CountryPageData,
    locale: Locale,
) -> CountryPageView {
    let sections = &country.sections;
    let lists = [
        &sections.visa_types,
        &sections.required_documents,
        &sections.application_steps,
        &sections.fees,
        &sections.processing_notes,
        &sections.tips,
        &sections.embassy_contacts,
    ];
    let sections = section_headings(locale)
        .into_iter()
        .zip(lists)
        .filter(|(_, items)| !items.is_empty())
        .map(|(heading, items)| SectionView {
            heading,
            items: items.clone(),
        })
        .collect();

    let heading = if country.title.trim().is_empty() {
        country.name.clone()
    } else {
        country.title.clone()
    };

    CountryPageView {
        name: country.name.clone(),
        heading,
        description_html: country.description.as_deref().and_then(sanitize_html),
        contents_html: country.contents.as_deref().and_then(sanitize_html),
        image_url: country.image_url.clone(),
        process_time: non_blank(country.process_time.clone()),
        requirement: aggregate.visa_requirement.as_ref().and_then(requirement_view),
        sections,
        products: aggregate
            .products
            .iter()
            .map(|record| product_card(&LocalizedProduct::from_record(record, locale)))
            .collect(),
        faq: faq_views(&aggregate.faq),
        menus: menu_links(aggregate.menus.iter(), locale),
        blogs: blog_links(&aggregate.blogs, locale),
        comments: comment_views(&aggregate.comments, locale),
        labels: CountryLabels::for_locale(locale),
    }
}

fn requirement_view(requirement: &VisaRequirementRecord) -> Option<RequirementView> {
    let view = RequirementView {
        status: non_blank(requirement.status.clone()),
        allowed_stay: non_blank(requirement.allowed_stay.clone()),
        conditions: requirement
            .conditions
            .as_deref()
            .map(strip_html)
            .filter(|text| !text.is_empty()),
    };
    if view.status.is_none() && view.allowed_stay.is_none() && view.conditions.is_none() {
        None
    } else {
        Some(view)
    }
}

fn product_card(product: &LocalizedProduct) -> ProductCard {
    ProductCard {
        name: product.name.clone(),
        description_html: product.description.as_deref().and_then(sanitize_html),
        price_label: product
            .price
            .map(|price| format!("{price:.2} {}", product.currency)),
    }
}

fn faq_views(entries: &[FaqEntry]) -> Vec<FaqView> {
    entries
        .iter()
        .map(|entry| FaqView {
            question: strip_html(&entry.question),
            answers_html: entry
                .answers
                .iter()
                .filter_map(|answer| sanitize_html(&answer.content))
                .collect(),
        })
        .collect()
}

fn menu_links<'a>(
    menus: impl Iterator<Item = &'a CountryMenuRecord>,
    locale: Locale,
) -> Vec<LinkView> {
    menus
        .map(|menu| LinkView {
            label: menu.name.clone(),
            href: page_path(&menu.slug, locale),
        })
        .collect()
}

fn blog_links(blogs: &[BlogRecord], locale: Locale) -> Vec<LinkView> {
    blogs
        .iter()
        .map(|blog| LinkView {
            label: blog.title.clone(),
            href: format!("/{}blog/{}", locale.path_prefix(), blog.slug),
        })
        .collect()
}

fn comment_views(comments: &[CommentRecord], locale: Locale) -> Vec<CommentView> {
    let anonymous = match locale {
        Locale::Tr => "Anonim",
        Locale::En => "Anonymous",
    };
    let date_format = format_description!("[year]-[month]-[day]");

    comments
        .iter()
        .map(|comment| CommentView {
            author: comment
                .author_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(anonymous)
                .to_string(),
            body: strip_html(&comment.content),
            date: comment
                .created_at
                .date()
                .format(&date_format)
                .unwrap_or_default(),
            rating: comment.rating.filter(|rating| (1..=5).contains(rating)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CountrySections;
    use crate::domain::faq::FaqAnswer;

    fn localized(sections: CountrySections) -> LocalizedCountry {
        LocalizedCountry::from_record(
            &crate::domain::entities::CountryRecord {
                id: 1,
                slug: "fransa".to_string(),
                country_code: Some("FR".to_string()),
                name: "Fransa".to_string(),
                name_en: Some("France".to_string()),
                title: String::new(),
                title_en: None,
                description: None,
                description_en: None,
                contents: None,
                contents_en: None,
                meta_title: None,
                meta_title_en: None,
                meta_description: None,
                meta_description_en: None,
                sections,
                process_time: Some("15 gün".to_string()),
                image_url: None,
            },
            Locale::En,
        )
    }

    #[test]
    fn country_view_skips_empty_sections() {
        let sections = CountrySections {
            required_documents: vec!["Pasaport".to_string()],
            required_documents_en: vec!["Passport".to_string()],
            ..Default::default()
        };
        let view = country_view(&localized(sections), &CountryPageData::default(), Locale::En);

        assert_eq!(view.heading, "France");
        assert_eq!(
            view.sections,
            vec![SectionView {
                heading: "Required Documents",
                items: vec!["Passport".to_string()],
            }]
        );
    }

    #[test]
    fn country_view_links_carry_locale_prefix() {
        let aggregate = CountryPageData {
            menus: vec![CountryMenuRecord {
                id: 2,
                slug: "fransa-ogrenci-vizesi".to_string(),
                name: "Öğrenci Vizesi".to_string(),
                description: None,
                contents: None,
                parent_id: Some(1),
            }],
            faq: vec![FaqEntry {
                id: 1,
                question: "<b>Süre?</b>".to_string(),
                answers: vec![FaqAnswer {
                    id: 2,
                    content: "<p>15 gün</p>".to_string(),
                }],
            }],
            ..Default::default()
        };
        let view = country_view(&localized(CountrySections::default()), &aggregate, Locale::En);

        assert_eq!(view.menus[0].href, "/en/fransa-ogrenci-vizesi");
        assert_eq!(view.faq[0].question, "Süre?");
    }
}
