//! Shared domain enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Locales the public site is served in. Turkish is the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Tr, Locale::En];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Tr => "tr",
            Locale::En => "en",
        }
    }

    /// Path prefix placed in front of a slug, including the trailing slash.
    pub fn path_prefix(self) -> &'static str {
        match self {
            Locale::Tr => "",
            Locale::En => "en/",
        }
    }

    pub fn is_english(self) -> bool {
        matches!(self, Locale::En)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tr" => Ok(Locale::Tr),
            "en" => Ok(Locale::En),
            other => Err(DomainError::unsupported_locale(other)),
        }
    }
}

/// The mutually exclusive kinds a slug can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    CustomPage,
    BlogRedirect,
    Country,
    Menu,
    AnnouncementRedirect,
    NotFound,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::CustomPage => "custom_page",
            ContentKind::BlogRedirect => "blog_redirect",
            ContentKind::Country => "country",
            ContentKind::Menu => "menu",
            ContentKind::AnnouncementRedirect => "announcement_redirect",
            ContentKind::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_locales_case_insensitively() {
        assert_eq!("TR".parse::<Locale>().expect("tr"), Locale::Tr);
        assert_eq!(" en ".parse::<Locale>().expect("en"), Locale::En);
    }

    #[test]
    fn rejects_unknown_locale() {
        let err = "de".parse::<Locale>().expect_err("unsupported");
        assert!(matches!(err, DomainError::UnsupportedLocale { .. }));
    }

    #[test]
    fn english_prefix_carries_trailing_slash() {
        assert_eq!(Locale::En.path_prefix(), "en/");
        assert_eq!(Locale::Tr.path_prefix(), "");
    }
}
