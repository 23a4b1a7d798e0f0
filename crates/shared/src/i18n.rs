//! Translation lookup keyed by namespace and flat key.
//!
//! Tables are embedded per locale. A lookup tries the active locale, then
//! English, then returns the key itself, so `t` never fails.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::locale::Locale;

const EN_TABLE: &str = include_str!("../locales/en.toml");
const AR_TABLE: &str = include_str!("../locales/ar.toml");
const RU_TABLE: &str = include_str!("../locales/ru.toml");

type Namespaces = HashMap<String, HashMap<String, String>>;

#[derive(Debug, Error)]
#[error("invalid translation table for '{locale}': {source}")]
pub struct TranslationTableError {
    pub locale: Locale,
    #[source]
    pub source: toml::de::Error,
}

#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
    tables: HashMap<Locale, Namespaces>,
}

impl Translator {
    /// Builds a translator over the tables compiled into the crate.
    pub fn embedded(locale: Locale) -> Result<Self, TranslationTableError> {
        Self::empty(locale)
            .with_table(Locale::En, EN_TABLE)?
            .with_table(Locale::Ar, AR_TABLE)?
            .with_table(Locale::Ru, RU_TABLE)
    }

    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            tables: HashMap::new(),
        }
    }

    pub fn with_table(mut self, locale: Locale, raw: &str) -> Result<Self, TranslationTableError> {
        let parsed: Namespaces =
            toml::from_str(raw).map_err(|source| TranslationTableError { locale, source })?;
        self.tables.insert(locale, parsed);
        Ok(self)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Same tables, different active locale.
    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            locale,
            tables: self.tables.clone(),
        }
    }

    pub fn t(&self, namespace: &str, key: &str) -> String {
        self.lookup(self.locale, namespace, key)
            .or_else(|| self.lookup(Locale::En, namespace, key))
            .unwrap_or(key)
            .to_string()
    }

    fn lookup(&self, locale: Locale, namespace: &str, key: &str) -> Option<&str> {
        self.tables
            .get(&locale)?
            .get(namespace)?
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Locale and translations threaded explicitly into loaders and views.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    pub locale: Locale,
    pub translator: Arc<Translator>,
}

impl LocaleContext {
    pub fn new(translator: Translator) -> Self {
        Self {
            locale: translator.locale(),
            translator: Arc::new(translator),
        }
    }

    pub fn embedded(locale: Locale) -> Result<Self, TranslationTableError> {
        Translator::embedded(locale).map(Self::new)
    }

    pub fn switch_to(&self, locale: Locale) -> Self {
        Self::new(self.translator.with_locale(locale))
    }

    pub fn t(&self, namespace: &str, key: &str) -> String {
        self.translator.t(namespace, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse_for_every_locale() {
        let translator = Translator::embedded(Locale::En).expect("tables");
        for locale in Locale::ALL {
            let localized = translator.with_locale(locale);
            assert_ne!(localized.t("nav", "home"), "home", "{locale} nav.home");
        }
    }

    #[test]
    fn active_locale_wins() {
        let translator = Translator::embedded(Locale::Ar).expect("tables");
        assert_eq!(translator.t("nav", "clients"), "العملاء");
    }

    #[test]
    fn missing_translation_falls_back_to_english_then_key() {
        let translator = Translator::embedded(Locale::Ru).expect("tables");
        assert_eq!(translator.t("projects", "business-gifts"), "Business Gifts");
        assert_eq!(translator.t("projects", "no_such_key"), "no_such_key");
        assert_eq!(translator.t("no_such_namespace", "title"), "title");
    }

    #[test]
    fn switching_context_locale_switches_lookups() {
        let en = LocaleContext::embedded(Locale::En).expect("tables");
        let ru = en.switch_to(Locale::Ru);
        assert_eq!(ru.locale, Locale::Ru);
        assert_eq!(ru.t("nav", "contact"), "Контакты");
        assert_eq!(en.t("nav", "contact"), "Contact");
    }

    #[test]
    fn malformed_table_is_rejected() {
        let err = Translator::empty(Locale::En)
            .with_table(Locale::Ar, "[nav\nhome = 1")
            .expect_err("must fail");
        assert_eq!(err.locale, Locale::Ar);
    }
}
