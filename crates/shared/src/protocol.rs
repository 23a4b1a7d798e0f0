use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::{ClientEntity, ClientId},
    locale::{Locale, LocalizedText},
};

pub const CLIENTS_ROUTE: &str = "/clients";
pub const HEALTHZ_ROUTE: &str = "/healthz";

/// Client entry as served by `GET /clients`. Localized names travel as
/// `name_<locale>` siblings of `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl ClientRecord {
    fn localized_name(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => self.name.as_deref(),
            Locale::Ar => self.name_ar.as_deref(),
            Locale::Ru => self.name_ru.as_deref(),
        }
    }
}

impl From<ClientRecord> for ClientEntity {
    fn from(record: ClientRecord) -> Self {
        let mut name = LocalizedText::new(record.name.clone().unwrap_or_default());
        for locale in Locale::ALL.into_iter().filter(|l| !l.is_default()) {
            if let Some(value) = record.localized_name(locale) {
                name.set_variant(locale, value);
            }
        }
        Self {
            id: ClientId(record.id),
            name,
            logo: record.logo,
        }
    }
}

/// Lenient view of an error response body. Anything beyond `message` is kept
/// as the raw JSON value by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Integer or string ids only. Any other shape (`1.0`, `null`) rejects the
/// record, and with it the whole list.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Int(value) => value.to_string(),
        RawId::Uint(value) => value.to_string(),
    })
}
