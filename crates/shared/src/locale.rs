use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Languages the site is published in. [`Locale::En`] is the default and the
/// fallback for every lookup.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ar,
    Ru,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale '{0}'")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Ar, Locale::Ru];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
            Self::Ru => "ru",
        }
    }

    pub const fn is_default(self) -> bool {
        matches!(self, Self::En)
    }

    pub const fn direction(self) -> TextDirection {
        match self {
            Self::Ar => TextDirection::Rtl,
            Self::En | Self::Ru => TextDirection::Ltr,
        }
    }

    /// Case-insensitive, tolerant of region tags (`ar-AE`, `ru_RU`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or_default();
        match lang {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            "ru" => Some(Self::Ru),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

/// A text field with a default value and per-locale variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub default: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<Locale, String>,
}

impl LocalizedText {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            variants: BTreeMap::new(),
        }
    }

    pub fn with_variant(mut self, locale: Locale, value: impl Into<String>) -> Self {
        self.set_variant(locale, value);
        self
    }

    /// Empty values are not stored; they would never win resolution anyway.
    pub fn set_variant(&mut self, locale: Locale, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.variants.remove(&locale);
        } else {
            self.variants.insert(locale, value);
        }
    }

    pub fn resolve(&self, locale: Locale) -> &str {
        if locale.is_default() {
            return &self.default;
        }
        match self.variants.get(&locale) {
            Some(value) if !value.is_empty() => value,
            _ => &self.default,
        }
    }
}

/// Picks the variant for `locale`, falling back to the default value. An unset
/// locale resolves like the default one.
pub fn resolve_field(text: &LocalizedText, locale: Option<Locale>) -> String {
    text.resolve(locale.unwrap_or_default()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foo() -> LocalizedText {
        LocalizedText::new("Foo")
            .with_variant(Locale::Ar, "فو")
            .with_variant(Locale::Ru, "Фу")
    }

    #[test]
    fn default_locale_ignores_variants() {
        assert_eq!(resolve_field(&foo(), Some(Locale::En)), "Foo");
        assert_eq!(resolve_field(&foo(), None), "Foo");
    }

    #[test]
    fn variant_wins_when_present() {
        assert_eq!(resolve_field(&foo(), Some(Locale::Ar)), "فو");
        assert_eq!(resolve_field(&foo(), Some(Locale::Ru)), "Фу");
    }

    #[test]
    fn missing_or_empty_variant_falls_back_to_default() {
        let text = LocalizedText::new("Foo").with_variant(Locale::Ar, "");
        assert_eq!(resolve_field(&text, Some(Locale::Ar)), "Foo");
        assert_eq!(resolve_field(&text, Some(Locale::Ru)), "Foo");
    }

    #[test]
    fn absent_default_resolves_to_empty_string() {
        let text = LocalizedText::default();
        assert_eq!(resolve_field(&text, Some(Locale::En)), "");
        assert_eq!(resolve_field(&text, Some(Locale::Ar)), "");

        let only_arabic = LocalizedText::default().with_variant(Locale::Ar, "فو");
        assert_eq!(resolve_field(&only_arabic, None), "");
        assert_eq!(resolve_field(&only_arabic, Some(Locale::Ar)), "فو");
    }

    #[test]
    fn parses_region_tags_case_insensitively() {
        assert_eq!(Locale::parse("AR-ae"), Some(Locale::Ar));
        assert_eq!(Locale::parse("ru_RU"), Some(Locale::Ru));
        assert_eq!(Locale::parse(" en "), Some(Locale::En));
        assert_eq!(Locale::parse("fr"), None);
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn arabic_is_right_to_left() {
        assert_eq!(Locale::Ar.direction(), TextDirection::Rtl);
        assert_eq!(Locale::Ru.direction(), TextDirection::Ltr);
    }
}
