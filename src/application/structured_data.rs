//! schema.org JSON-LD blocks for country pages.
//!
//! Each block is independent and only emitted when it has content. All text
//! placed into a block is HTML-stripped first.

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use time::macros::format_description;

use crate::application::site::SiteIdentity;
use crate::application::text::strip_html;
use crate::domain::entities::{CommentRecord, ProductRecord};
use crate::domain::faq::FaqEntry;
use crate::domain::locale::{LocalizedCountry, LocalizedProduct};
use crate::domain::types::Locale;

const SCHEMA_CONTEXT: &str = "https://schema.org";
const DEFAULT_PROCESS_DAYS: u32 = 14;

/// One serialized `<script type="application/ld+json">` body.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonLdBlock {
    pub kind: &'static str,
    pub value: Value,
}

impl JsonLdBlock {
    fn new(kind: &'static str, value: Value) -> Self {
        Self { kind, value }
    }

    /// JSON text safe to embed inside a `<script>` element.
    pub fn to_script_body(&self) -> String {
        self.value.to_string().replace("</", "<\\/")
    }
}

/// Deterministic aggregate rating derived from a seed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRating {
    /// Rating times ten, in `40..=50`.
    pub rating_tenths: u8,
    /// In `40..=100`.
    pub review_count: u32,
}

impl SeededRating {
    pub fn rating_value(&self) -> String {
        format!("{}.{}", self.rating_tenths / 10, self.rating_tenths % 10)
    }
}

pub fn seeded_rating(seed: &str) -> SeededRating {
    let digest = Sha256::digest(seed.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let hash = u64::from_be_bytes(head);

    SeededRating {
        rating_tenths: 40 + ((hash >> 32) % 11) as u8,
        review_count: 40 + (hash % 61) as u32,
    }
}

/// Days taken from the first number in a free-text processing time.
pub fn process_days(process_time: Option<&str>) -> u32 {
    let Some(text) = process_time else {
        return DEFAULT_PROCESS_DAYS;
    };

    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<u32>() {
        Ok(days) if days > 0 => days,
        _ => DEFAULT_PROCESS_DAYS,
    }
}

#[derive(Debug, Clone)]
pub struct StructuredDataBuilder {
    site: SiteIdentity,
}

impl StructuredDataBuilder {
    pub fn new(site: SiteIdentity) -> Self {
        Self { site }
    }

    /// Every block a country page carries, in render order.
    pub fn for_country(
        &self,
        country: &LocalizedCountry,
        products: &[ProductRecord],
        faq: &[FaqEntry],
        comments: &[CommentRecord],
        canonical_url: &str,
        locale: Locale,
    ) -> Vec<JsonLdBlock> {
        let mut blocks = vec![
            self.organization(),
            self.breadcrumb(&country.name, canonical_url, locale),
            how_to(&country.name, country.process_time.as_deref(), locale),
        ];
        blocks.extend(faq_page(faq));
        blocks.extend(self.products(country, products, canonical_url, locale));
        blocks.extend(self.reviews(&country.name, comments, locale));
        blocks
    }

    pub fn organization(&self) -> JsonLdBlock {
        let mut value = json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "Organization",
            "name": self.site.brand_name,
            "url": self.site.home_url(Locale::Tr),
        });
        if let Some(logo) = self.site.logo_url.as_deref() {
            value["logo"] = Value::String(self.site.absolute(logo));
        }
        JsonLdBlock::new("organization", value)
    }

    pub fn breadcrumb(&self, name: &str, canonical_url: &str, locale: Locale) -> JsonLdBlock {
        let home = match locale {
            Locale::Tr => "Ana Sayfa",
            Locale::En => "Home",
        };
        JsonLdBlock::new(
            "breadcrumb",
            json!({
                "@context": SCHEMA_CONTEXT,
                "@type": "BreadcrumbList",
                "itemListElement": [
                    {
                        "@type": "ListItem",
                        "position": 1,
                        "name": home,
                        "item": self.site.home_url(locale),
                    },
                    {
                        "@type": "ListItem",
                        "position": 2,
                        "name": strip_html(name),
                        "item": canonical_url,
                    },
                ],
            }),
        )
    }

    /// One `Product` per package, rated by a seed stable across locales.
    pub fn products(
        &self,
        country: &LocalizedCountry,
        products: &[ProductRecord],
        canonical_url: &str,
        locale: Locale,
    ) -> Vec<JsonLdBlock> {
        products
            .iter()
            .map(|record| {
                let product = LocalizedProduct::from_record(record, locale);
                let rating = seeded_rating(&format!("{}-{}", country.base_name, product.base_name));
                let name = strip_html(&product.name);
                let description = product
                    .description
                    .as_deref()
                    .map(strip_html)
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| format!("{} - {}", strip_html(&country.name), name));

                let mut value = json!({
                    "@context": SCHEMA_CONTEXT,
                    "@type": "Product",
                    "name": name,
                    "description": description,
                    "brand": { "@type": "Brand", "name": self.site.brand_name },
                    "url": canonical_url,
                    "aggregateRating": {
                        "@type": "AggregateRating",
                        "ratingValue": rating.rating_value(),
                        "bestRating": "5",
                        "worstRating": "1",
                        "reviewCount": rating.review_count,
                    },
                });
                if let Some(price) = product.price {
                    value["offers"] = json!({
                        "@type": "Offer",
                        "price": format!("{price:.2}"),
                        "priceCurrency": product.currency,
                        "availability": "https://schema.org/InStock",
                        "url": canonical_url,
                    });
                }
                JsonLdBlock::new("product", value)
            })
            .collect()
    }

    pub fn reviews(
        &self,
        country_name: &str,
        comments: &[CommentRecord],
        locale: Locale,
    ) -> Option<JsonLdBlock> {
        let (anonymous, service) = match locale {
            Locale::Tr => ("Anonim", format!("{} vize danışmanlığı", strip_html(country_name))),
            Locale::En => ("Anonymous", format!("{} visa consultancy", strip_html(country_name))),
        };
        let date_format = format_description!("[year]-[month]-[day]");

        let reviews: Vec<Value> = comments
            .iter()
            .filter_map(|comment| {
                let body = strip_html(&comment.content);
                if body.is_empty() {
                    return None;
                }
                let author = comment
                    .author_name
                    .as_deref()
                    .map(strip_html)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| anonymous.to_string());

                let mut review = json!({
                    "@type": "Review",
                    "author": { "@type": "Person", "name": author },
                    "reviewBody": body,
                    "itemReviewed": {
                        "@type": "Service",
                        "name": service,
                        "provider": { "@type": "Organization", "name": self.site.brand_name },
                    },
                });
                if let Ok(date) = comment.created_at.date().format(&date_format) {
                    review["datePublished"] = Value::String(date);
                }
                if let Some(rating) = comment.rating.filter(|r| (1..=5).contains(r)) {
                    review["reviewRating"] = json!({
                        "@type": "Rating",
                        "ratingValue": rating,
                        "bestRating": 5,
                        "worstRating": 1,
                    });
                }
                Some(review)
            })
            .collect();

        if reviews.is_empty() {
            return None;
        }

        Some(JsonLdBlock::new(
            "review",
            json!({
                "@context": SCHEMA_CONTEXT,
                "@graph": reviews,
            }),
        ))
    }
}

/// `FAQPage` over questions that have at least one non-empty answer.
pub fn faq_page(entries: &[FaqEntry]) -> Option<JsonLdBlock> {
    let questions: Vec<Value> = entries
        .iter()
        .filter_map(|entry| {
            let question = strip_html(&entry.question);
            let answer = strip_html(
                &entry
                    .answers
                    .iter()
                    .map(|answer| answer.content.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            if question.is_empty() || answer.is_empty() {
                return None;
            }
            Some(json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": { "@type": "Answer", "text": answer },
            }))
        })
        .collect();

    if questions.is_empty() {
        return None;
    }

    Some(JsonLdBlock::new(
        "faq",
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "FAQPage",
            "mainEntity": questions,
        }),
    ))
}

/// Five editorial application steps with the country name filled in.
pub fn how_to(name: &str, process_time: Option<&str>, locale: Locale) -> JsonLdBlock {
    let name = strip_html(name);
    let (title, steps): (String, [(String, String); 5]) = match locale {
        Locale::Tr => (
            format!("{name} Vizesi Nasıl Alınır?"),
            [
                (
                    "Belgelerinizi hazırlayın".to_string(),
                    format!("{name} vizesi için gerekli belgeleri eksiksiz hazırlayın."),
                ),
                (
                    "Başvuru formunu doldurun".to_string(),
                    format!("{name} vize başvuru formunu doğru bilgilerle doldurun."),
                ),
                (
                    "Randevu alın".to_string(),
                    format!("{name} konsolosluğu veya yetkili başvuru merkezinden randevu alın."),
                ),
                (
                    "Başvurunuzu teslim edin".to_string(),
                    "Randevu gününde belgelerinizi teslim edip biyometrik işlemleri tamamlayın."
                        .to_string(),
                ),
                (
                    "Sonucu takip edin".to_string(),
                    format!("{name} vize başvurunuzun sonucunu takip edip pasaportunuzu teslim alın."),
                ),
            ],
        ),
        Locale::En => (
            format!("How to Get a {name} Visa"),
            [
                (
                    "Prepare your documents".to_string(),
                    format!("Gather every document required for a {name} visa."),
                ),
                (
                    "Fill in the application form".to_string(),
                    format!("Complete the {name} visa application form accurately."),
                ),
                (
                    "Book an appointment".to_string(),
                    format!("Book an appointment with the {name} consulate or its visa centre."),
                ),
                (
                    "Submit your application".to_string(),
                    "Hand in your documents and give your biometrics on the appointment day."
                        .to_string(),
                ),
                (
                    "Track the result".to_string(),
                    format!("Follow your {name} visa decision and collect your passport."),
                ),
            ],
        ),
    };

    let steps: Vec<Value> = steps
        .into_iter()
        .enumerate()
        .map(|(idx, (step_name, text))| {
            json!({
                "@type": "HowToStep",
                "position": idx + 1,
                "name": step_name,
                "text": text,
            })
        })
        .collect();

    JsonLdBlock::new(
        "how_to",
        json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "HowTo",
            "name": title,
            "totalTime": format!("P{}D", process_days(process_time)),
            "step": steps,
        }),
    )
}
