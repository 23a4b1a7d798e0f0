use std::{borrow::Borrow, collections::HashSet, sync::OnceLock};

use serde::Deserialize;
use shared::{
    domain::{CatalogueItem, Category, CategoryCode, CategoryFilter, ALL_CATEGORIES_ID},
    i18n::Translator,
};
use thiserror::Error;
use tracing::debug;

const BUILTIN_CATALOGUE: &str = include_str!("../data/catalogue.toml");
const LABEL_NAMESPACE: &str = "projects";

static BUILTIN: OnceLock<Catalogue> = OnceLock::new();

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate catalogue item id {0}")]
    DuplicateId(i64),
}

#[derive(Debug, Deserialize)]
struct CatalogueDocument {
    #[serde(default)]
    items: Vec<CatalogueItem>,
}

/// The portfolio, fixed once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    items: Vec<CatalogueItem>,
}

impl Catalogue {
    /// The catalogue compiled into the binary, parsed on first use.
    pub fn builtin() -> Result<&'static Catalogue, CatalogueError> {
        if let Some(catalogue) = BUILTIN.get() {
            return Ok(catalogue);
        }
        let parsed = Self::from_toml_str(BUILTIN_CATALOGUE)?;
        Ok(BUILTIN.get_or_init(|| parsed))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogueError> {
        let document: CatalogueDocument = toml::from_str(raw)?;
        Self::new(document.items)
    }

    pub fn new(items: Vec<CatalogueItem>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogueError::DuplicateId(item.id.0));
            }
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[CatalogueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn filtered(&self, selected: &CategoryFilter) -> Vec<&CatalogueItem> {
        filter(&self.items, selected)
    }
}

/// Stable filter over catalogue items: `All` keeps everything, a code keeps
/// its own items in their original order, an unknown id keeps nothing.
pub fn filter<I>(items: I, selected: &CategoryFilter) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Borrow<CatalogueItem>,
{
    items
        .into_iter()
        .filter(|item| {
            let item = <I::Item as Borrow<CatalogueItem>>::borrow(item);
            selected.matches(item.category)
        })
        .collect()
}

/// The category button row: the wildcard first, then every code in
/// declaration order.
pub fn categories(translator: &Translator) -> Vec<Category> {
    std::iter::once(Category {
        id: CategoryFilter::All,
        label: translator.t(LABEL_NAMESPACE, ALL_CATEGORIES_ID),
    })
    .chain(CategoryCode::ALL.into_iter().map(|code| Category {
        id: CategoryFilter::Only(code),
        label: translator.t(LABEL_NAMESPACE, code.as_str()),
    }))
    .collect()
}

/// Selection state of the projects page.
#[derive(Debug, Clone)]
pub struct CatalogueView<'a> {
    catalogue: &'a Catalogue,
    selected: CategoryFilter,
}

impl<'a> CatalogueView<'a> {
    pub fn new(catalogue: &'a Catalogue) -> Self {
        Self {
            catalogue,
            selected: CategoryFilter::All,
        }
    }

    pub fn selected(&self) -> &CategoryFilter {
        &self.selected
    }

    pub fn select(&mut self, selected: impl Into<CategoryFilter>) {
        let selected = selected.into();
        debug!(from = %self.selected, to = %selected, "category selected");
        self.selected = selected;
    }

    pub fn select_raw(&mut self, raw: &str) {
        self.select(CategoryFilter::from(raw));
    }

    pub fn visible(&self) -> Vec<&'a CatalogueItem> {
        filter(self.catalogue.items(), &self.selected)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
