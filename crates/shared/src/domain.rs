use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locale::{Locale, LocalizedText};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ItemId);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of portfolio categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryCode {
    #[serde(rename = "architectural")]
    Architectural,
    #[serde(rename = "industrial")]
    Industrial,
    #[serde(rename = "masterplan")]
    Masterplan,
    #[serde(rename = "3d-printing")]
    ThreeDPrinting,
    #[serde(rename = "business-gifts")]
    BusinessGifts,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

impl CategoryCode {
    pub const ALL: [CategoryCode; 5] = [
        CategoryCode::Architectural,
        CategoryCode::Industrial,
        CategoryCode::Masterplan,
        CategoryCode::ThreeDPrinting,
        CategoryCode::BusinessGifts,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Architectural => "architectural",
            Self::Industrial => "industrial",
            Self::Masterplan => "masterplan",
            Self::ThreeDPrinting => "3d-printing",
            Self::BusinessGifts => "business-gifts",
        }
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryCode {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

pub const ALL_CATEGORIES_ID: &str = "all";

/// The value of the category selector. `All` is the wildcard; `Unknown` keeps
/// a value that named no category and therefore matches no item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryCode),
    Unknown(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: CategoryCode) -> bool {
        match self {
            Self::All => true,
            Self::Only(code) => *code == category,
            Self::Unknown(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES_ID,
            Self::Only(code) => code.as_str(),
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == ALL_CATEGORIES_ID {
            return Self::All;
        }
        match value.parse::<CategoryCode>() {
            Ok(code) => Self::Only(code),
            Err(UnknownCategory(raw)) => Self::Unknown(raw),
        }
    }
}

impl From<CategoryCode> for CategoryFilter {
    fn from(value: CategoryCode) -> Self {
        Self::Only(value)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItem {
    pub id: ItemId,
    pub title: String,
    pub category: CategoryCode,
    /// Markup, rendered as-is by the page.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub badge: String,
}

/// One entry of the category button row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryFilter,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEntity {
    pub id: ClientId,
    pub name: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl ClientEntity {
    pub fn resolve(&self, locale: Locale) -> ResolvedClient {
        ResolvedClient {
            id: self.id.clone(),
            name: self.name.resolve(locale).to_string(),
            logo: self.logo.clone().filter(|logo| !logo.is_empty()),
        }
    }
}

/// A client with every localized field resolved for one locale. `logo: None`
/// renders a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClient {
    pub id: ClientId,
    pub name: String,
    pub logo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_parses_wildcard_codes_and_unknowns() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("3d-printing"),
            CategoryFilter::Only(CategoryCode::ThreeDPrinting)
        );
        assert_eq!(
            CategoryFilter::from("sculpture"),
            CategoryFilter::Unknown("sculpture".to_string())
        );
    }

    #[test]
    fn unknown_filter_matches_nothing() {
        let filter = CategoryFilter::from("sculpture");
        assert!(CategoryCode::ALL.iter().all(|code| !filter.matches(*code)));
        assert!(CategoryCode::ALL
            .iter()
            .all(|code| CategoryFilter::All.matches(*code)));
    }

    #[test]
    fn category_codes_round_trip_through_their_wire_names() {
        for code in CategoryCode::ALL {
            let json = serde_json::to_string(&code).expect("serialize");
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(code.as_str().parse::<CategoryCode>(), Ok(code));
        }
    }

    #[test]
    fn empty_logo_resolves_to_placeholder() {
        let entity = ClientEntity {
            id: ClientId("7".into()),
            name: LocalizedText::new("Foo"),
            logo: Some(String::new()),
        };
        assert_eq!(entity.resolve(Locale::En).logo, None);
    }
}
