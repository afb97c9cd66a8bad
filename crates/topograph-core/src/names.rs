//! Category name tables
//!
//! The name file holds one table per language:
//!
//! ```json
//! { "en": { "affected_type": { "1": "Civilians" }, "event": { ... } },
//!   "uk": { "affected_type": { "1": "Цивільні" } } }
//! ```
//!
//! The active table is the first whose key is a case-insensitive prefix of
//! the runtime locale tag, falling back to [`FALLBACK_LANGUAGE`].

use crate::{CategoryCode, Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Language used when no table matches the locale
pub const FALLBACK_LANGUAGE: &str = "en";

/// Display names for one language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocaleNames {
    /// Impact category names, keyed like `Record::affected_category`
    pub affected_type: BTreeMap<CategoryCode, String>,
    #[serde(default)]
    pub event: BTreeMap<u32, String>,
    #[serde(default)]
    pub object_status: BTreeMap<u32, String>,
    #[serde(default)]
    pub qualification: BTreeMap<u32, String>,
}

/// All languages of the name file, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTables(IndexMap<String, LocaleNames>);

impl NameTables {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, language: impl Into<String>, names: LocaleNames) {
        self.0.insert(language.into(), names);
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The table key chosen for `locale`, without fallback
    pub fn matching_language(&self, locale: &str) -> Option<&str> {
        let locale = locale.to_lowercase();
        self.languages()
            .find(|key| locale.starts_with(&key.to_lowercase()))
    }

    /// Pick the table for `locale`, falling back to English
    pub fn select(&self, locale: &str) -> Result<CategoryNames> {
        let language = self
            .matching_language(locale)
            .unwrap_or(FALLBACK_LANGUAGE);

        let names = self
            .0
            .get(language)
            .ok_or_else(|| Error::LocaleNotFound(locale.to_string()))?;

        tracing::debug!(locale, language, "selected name table");

        Ok(CategoryNames {
            language: language.to_string(),
            names: names.clone(),
        })
    }
}

/// The active category name table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryNames {
    language: String,
    names: LocaleNames,
}

impl CategoryNames {
    pub fn new(language: impl Into<String>, names: LocaleNames) -> Self {
        Self {
            language: language.into(),
            names,
        }
    }

    /// Key of the selected table
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn names(&self) -> &LocaleNames {
        &self.names
    }

    /// Display label for a category code
    ///
    /// A code missing from the table is not an error: the raw code is
    /// surfaced so the rendering side can choose a fallback.
    pub fn label(&self, code: CategoryCode) -> CategoryLabel<'_> {
        match self.names.affected_type.get(&code) {
            Some(name) => CategoryLabel::Named(name),
            None => {
                tracing::debug!(code, language = %self.language, "missing category name");
                CategoryLabel::Unnamed(code)
            }
        }
    }
}

/// Result of a category name lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLabel<'a> {
    Named(&'a str),
    /// No entry for this code in the active table
    Unnamed(CategoryCode),
}

impl CategoryLabel<'_> {
    pub fn is_named(&self) -> bool {
        matches!(self, CategoryLabel::Named(_))
    }
}

impl fmt::Display for CategoryLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryLabel::Named(name) => f.write_str(name),
            CategoryLabel::Unnamed(code) => write!(f, "#{code}"),
        }
    }
}
