//! Translation tables loaded from `i18n/<locale>.json`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use raised_beds_core::i18n::{missing_translation, Translations};

use crate::LoadError;

/// Flat key → text table, optionally layered over a fallback locale.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: HashMap<String, String>,
    fallback: Option<Box<TranslationTable>>,
}

impl TranslationTable {
    /// Parse a JSON object of string entries.
    pub fn parse(input: &str) -> Result<Self, LoadError> {
        Ok(Self {
            entries: serde_json::from_str(input)?,
            fallback: None,
        })
    }

    /// Read a table from disk.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Resolve keys missing here against `fallback`.
    pub fn with_fallback(mut self, fallback: TranslationTable) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .or_else(|| self.fallback.as_deref().and_then(|f| f.lookup(key)))
    }
}

impl Translations for TranslationTable {
    fn get(&self, key: &str) -> String {
        self.lookup(key)
            .map(str::to_string)
            .unwrap_or_else(|| missing_translation(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_falls_back_to_default() {
        let default =
            TranslationTable::parse(r#"{"item.name": "Raised Bed", "item.description": "Grow."}"#)
                .unwrap();
        let french = TranslationTable::parse(r#"{"item.name": "Jardinière"}"#)
            .unwrap()
            .with_fallback(default);

        assert_eq!(french.get("item.name"), "Jardinière");
        assert_eq!(french.get("item.description"), "Grow.");
        assert_eq!(french.get("event.0.dialogue"), "(no translation:event.0.dialogue)");
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(TranslationTable::parse(r#"{"item.name": 3}"#).is_err());
    }
}
