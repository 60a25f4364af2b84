//! Translated string lookup supplied by the host.

use std::collections::HashMap;

/// Host capability: resolve a translation key to display text.
pub trait Translations {
    /// Translated text for `key`, or a visible placeholder when missing.
    fn get(&self, key: &str) -> String;
}

/// Placeholder shown for keys with no translation.
pub fn missing_translation(key: &str) -> String {
    format!("(no translation:{key})")
}

impl Translations for HashMap<String, String> {
    fn get(&self, key: &str) -> String {
        HashMap::get(self, key)
            .cloned()
            .unwrap_or_else(|| missing_translation(key))
    }
}
