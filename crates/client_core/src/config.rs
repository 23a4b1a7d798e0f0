use std::{collections::HashMap, fs};

use shared::locale::Locale;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::EmptyListPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const SETTINGS_FILE: &str = "site.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid api base url '{0}': expected an absolute http(s) url")]
    InvalidApiBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub api_base_url: String,
    pub default_locale: Locale,
    pub fallback_on_empty: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            default_locale: Locale::En,
            fallback_on_empty: true,
        }
    }
}

impl SiteSettings {
    pub fn empty_list_policy(&self) -> EmptyListPolicy {
        EmptyListPolicy::from_flag(self.fallback_on_empty)
    }
}

/// Defaults, then `site.toml` in the working directory, then environment.
pub fn load_settings() -> Result<SiteSettings, SettingsError> {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SiteSettings, SettingsError> {
    let mut settings = SiteSettings::default();

    if let Some(raw) = file {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_base_url").and_then(toml::Value::as_str) {
                    settings.api_base_url = v.to_string();
                }
                if let Some(v) = file_cfg.get("default_locale").and_then(toml::Value::as_str) {
                    apply_locale(&mut settings, v);
                }
                if let Some(v) = file_cfg.get("fallback_on_empty").and_then(toml::Value::as_bool) {
                    settings.fallback_on_empty = v;
                }
            }
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    for key in ["API_BASE_URL", "APP__API_BASE_URL"] {
        if let Some(v) = env(key) {
            settings.api_base_url = v;
        }
    }

    for key in ["SITE_LOCALE", "APP__DEFAULT_LOCALE"] {
        if let Some(v) = env(key) {
            apply_locale(&mut settings, &v);
        }
    }

    for key in ["CLIENTS_FALLBACK_ON_EMPTY", "APP__FALLBACK_ON_EMPTY"] {
        if let Some(v) = env(key) {
            match parse_flag(&v) {
                Some(flag) => settings.fallback_on_empty = flag,
                None => warn!(key, value = %v, "ignoring non-boolean flag"),
            }
        }
    }

    settings.api_base_url = normalize_api_base_url(&settings.api_base_url)?;
    Ok(settings)
}

fn apply_locale(settings: &mut SiteSettings, raw: &str) {
    match Locale::parse(raw) {
        Some(locale) => settings.default_locale = locale,
        None => warn!(value = raw, "ignoring unsupported default locale"),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Trims whitespace and trailing slashes; an empty value means the default.
pub fn normalize_api_base_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed =
        Url::parse(trimmed).map_err(|_| SettingsError::InvalidApiBaseUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(SettingsError::InvalidApiBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
