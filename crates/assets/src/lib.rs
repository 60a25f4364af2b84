#![warn(missing_docs)]
//! Garden bed variant definitions and host content patching.

mod atlas;
mod events;
mod i18n;
mod injector;
mod loader;
pub mod record;
mod recipe;
mod registry;

pub use atlas::{
    big_craftable_rect, decode_spritesheet, overlay_region, AtlasError, SOIL_INDEX_IN_SHEET,
};
pub use events::{
    event_key, events_location, format_script, EventCatalog, EventDescriptor, EventError,
    EVENTS_FIELD, EVENT_ROOT,
};
pub use i18n::TranslationTable;
pub use injector::{
    trim_item_definitions, AssetData, ContentAsset, ContentInjector, ContentPipeline,
    CraftableIds, InjectError, InjectionLimits, PatchOutcome, ASSET_PREFIX, DEFINITIONS_ASSET,
    EVENT_DATA_ASSET,
};
pub use loader::{
    definitions_from_file, definitions_from_str, registry_from_file, registry_from_str,
};
pub use recipe::{Ingredient, Ingredients, IngredientsError, REFUND_RATIO};
pub use registry::{
    name_for_variant, sprite_row_offset, variant_key_from_name, UnknownVariant, VariantDefinition, VariantRegistry,
    GENERIC_NAME,
};

use thiserror::Error;

/// Raw variant definitions keyed by variant key, in file order.
pub type RawDefinitions = serde_json::Map<String, serde_json::Value>;

/// Errors emitted while loading variant definitions.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Wrap IO errors when reading definition files.
    #[error("failed to read item definitions: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse item definitions: {0}")]
    Parse(#[from] serde_json::Error),
    /// Top-level document or a variant entry is not a JSON object.
    #[error("definition for '{variant}' is not an object")]
    NotAnObject {
        /// Offending variant key (empty for the document itself).
        variant: String,
    },
    /// A required field is absent.
    #[error("variant '{variant}' is missing field {field}")]
    MissingField {
        /// Offending variant key.
        variant: String,
        /// Missing field name.
        field: &'static str,
    },
    /// A field is present but malformed.
    #[error("variant '{variant}' has invalid {field}: {value}")]
    InvalidField {
        /// Offending variant key.
        variant: String,
        /// Field name.
        field: &'static str,
        /// Offending value as written.
        value: String,
    },
    /// No variant survived loading.
    #[error("no garden bed variants defined")]
    Empty,
}
