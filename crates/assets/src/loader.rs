use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{LoadError, RawDefinitions, VariantRegistry};

/// Parse an item definitions document into raw, ordered variant entries.
pub fn definitions_from_str(input: &str) -> Result<RawDefinitions, LoadError> {
    match serde_json::from_str::<Value>(input)? {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotAnObject {
            variant: String::new(),
        }),
    }
}

/// Read raw variant entries from an item definitions file.
pub fn definitions_from_file(path: &Path) -> Result<RawDefinitions, LoadError> {
    let data = fs::read_to_string(path)?;
    definitions_from_str(&data)
}

/// Load a variant registry from the provided JSON file path.
pub fn registry_from_file(path: &Path) -> Result<VariantRegistry, LoadError> {
    VariantRegistry::load(&definitions_from_file(path)?)
}

/// Load a variant registry from an in-memory JSON string.
pub fn registry_from_str(input: &str) -> Result<VariantRegistry, LoadError> {
    VariantRegistry::load(&definitions_from_str(input)?)
}
