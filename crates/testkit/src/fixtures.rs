//! Canned variant tables and translations.

use raised_beds_assets::{
    definitions_from_str, LoadError, RawDefinitions, TranslationTable, VariantRegistry,
};

/// Three variants in insertion order: `wood`, `stone`, `hardwood`.
///
/// `hardwood` never breaks (`DaysToBreak` 0). No key carries the author
/// namespace, so `wood` is the default variant.
pub const SAMPLE_DEFINITIONS: &str = r#"{
  "wood": {
    "SoilHeightAboveGround": "4",
    "DaysToBreak": "56",
    "RecipeItems": "388 10",
    "RecipeIsDefault": "true"
  },
  "stone": {
    "SoilHeightAboveGround": 2,
    "DaysToBreak": 112,
    "RecipeItems": "390 20",
    "RecipeIsDefault": false,
    "RecipeConditions": "f Robin 4"
  },
  "hardwood": {
    "SoilHeightAboveGround": "3",
    "DaysToBreak": "0",
    "RecipeItems": "709 5 388 2",
    "RecipeIsDefault": "false"
  }
}"#;

/// Event catalog with one descriptor for the farm.
pub const SAMPLE_EVENT_DATA: &str = r#"[
  {
    "Where": "Farm",
    "Conditions": "f Robin 1000/w sunny",
    "Script": "continue/64 15/farmer 64 16 2 {0} 66 16 3/speak {0} \"{1}\"/end",
    "Who": "Robin"
  }
]"#;

/// Sample definitions as a raw table.
pub fn sample_definitions() -> Result<RawDefinitions, LoadError> {
    definitions_from_str(SAMPLE_DEFINITIONS)
}

/// Registry loaded from [`SAMPLE_DEFINITIONS`].
pub fn sample_registry() -> Result<VariantRegistry, LoadError> {
    VariantRegistry::load_strict(&sample_definitions()?)
}

/// English strings for the sample variants.
pub fn sample_translations() -> TranslationTable {
    let mut table = TranslationTable::default();
    for (key, value) in [
        ("item.name", "Raised Bed"),
        ("item.description", "Grow crops above ground."),
        (
            "item.description.indoors",
            "Grow crops above ground, even indoors.",
        ),
        ("item.name.wood", "Wood Raised Bed"),
        ("item.name.stone", "Stone Raised Bed"),
        ("item.name.hardwood", "Hardwood Raised Bed"),
        ("event.0.dialogue", "You can build raised beds now!"),
    ] {
        table.insert(key, value);
    }
    table
}
