use crate::application::error::{ErrorReport, HttpError};
use crate::application::metadata::PageMetadata;
use crate::domain::types::Locale;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(brand: BrandView, locale: Locale) -> Response {
    let view = LayoutContext {
        brand,
        lang: locale.as_str(),
        meta: None,
        json_ld: Vec::new(),
        content: ErrorPageView::not_found(locale),
    };
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

impl BrandView {
    pub fn new(title: impl Into<String>, locale: Locale) -> Self {
        Self {
            title: title.into(),
            href: format!("/{}", locale.path_prefix()),
        }
    }
}

/// Shared shell of every public page.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    /// `<html lang>` value.
    pub lang: &'static str,
    pub meta: Option<PageMetadata>,
    /// Serialized JSON-LD bodies, already safe for `<script>`.
    pub json_ld: Vec<String>,
    pub content: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub heading: &'static str,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub name: String,
    pub description_html: Option<String>,
    pub price_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaqView {
    pub question: String,
    pub answers_html: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentView {
    pub author: String,
    pub body: String,
    pub date: String,
    pub rating: Option<i16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequirementView {
    pub status: Option<String>,
    pub allowed_stay: Option<String>,
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryPageView {
    pub name: String,
    pub heading: String,
    pub description_html: Option<String>,
    pub contents_html: Option<String>,
    pub image_url: Option<String>,
    pub process_time: Option<String>,
    pub requirement: Option<RequirementView>,
    pub sections: Vec<SectionView>,
    pub products: Vec<ProductCard>,
    pub faq: Vec<FaqView>,
    pub menus: Vec<LinkView>,
    pub blogs: Vec<LinkView>,
    pub comments: Vec<CommentView>,
    pub labels: CountryLabels,
}

/// Static UI copy of the country page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryLabels {
    pub requirement: &'static str,
    pub status: &'static str,
    pub allowed_stay: &'static str,
    pub process_time: &'static str,
    pub packages: &'static str,
    pub faq: &'static str,
    pub subpages: &'static str,
    pub blogs: &'static str,
    pub comments: &'static str,
}

impl CountryLabels {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Tr => Self {
                requirement: "Vize Durumu",
                status: "Durum",
                allowed_stay: "Kalış süresi",
                process_time: "İşlem süresi",
                packages: "Vize Paketleri",
                faq: "Sıkça Sorulan Sorular",
                subpages: "Vize Türleri",
                blogs: "Blog Yazıları",
                comments: "Müşteri Yorumları",
            },
            Locale::En => Self {
                requirement: "Visa Status",
                status: "Status",
                allowed_stay: "Allowed stay",
                process_time: "Processing time",
                packages: "Visa Packages",
                faq: "Frequently Asked Questions",
                subpages: "Visa Categories",
                blogs: "Blog Posts",
                comments: "Customer Reviews",
            },
        }
    }
}

/// Headings of the seven list sections, in render order.
pub fn section_headings(locale: Locale) -> [&'static str; 7] {
    match locale {
        Locale::Tr => [
            "Vize Türleri",
            "Gerekli Belgeler",
            "Başvuru Adımları",
            "Ücretler",
            "İşlem Süresi",
            "İpuçları",
            "Konsolosluk İletişim Bilgileri",
        ],
        Locale::En => [
            "Visa Types",
            "Required Documents",
            "Application Steps",
            "Fees",
            "Processing Time",
            "Tips",
            "Embassy Contacts",
        ],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomPageView {
    pub title: String,
    pub content_html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuPageView {
    pub name: String,
    pub description_html: Option<String>,
    pub contents_html: Option<String>,
    pub country: Option<LinkView>,
    pub siblings: Vec<LinkView>,
    pub siblings_label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found(locale: Locale) -> Self {
        match locale {
            Locale::Tr => Self {
                title: "Sayfa Bulunamadı".to_string(),
                message: "Aradığınız sayfa taşınmış ya da kaldırılmış olabilir.".to_string(),
                primary_action: Some(ErrorAction::home(locale)),
            },
            Locale::En => Self {
                title: "Page Not Found".to_string(),
                message: "The page you requested may have moved or no longer exists.".to_string(),
                primary_action: Some(ErrorAction::home(locale)),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home(locale: Locale) -> Self {
        Self {
            href: format!("/{}", locale.path_prefix()),
            label: match locale {
                Locale::Tr => "Ana sayfaya dön".to_string(),
                Locale::En => "Back to home".to_string(),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "country.html")]
pub struct CountryTemplate {
    pub view: LayoutContext<CountryPageView>,
}

#[derive(Template)]
#[template(path = "custom_page.html")]
pub struct CustomPageTemplate {
    pub view: LayoutContext<CustomPageView>,
}

#[derive(Template)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub view: LayoutContext<MenuPageView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
