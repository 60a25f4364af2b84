//! Codec for the host's slash-delimited data records.
//!
//! Host tables store each record as a single string of `/`-separated fields
//! addressed by position. All positional coupling lives here; the injector
//! only touches fields through the named accessors below.

use thiserror::Error;

/// Field separator used by every host record.
pub const FIELD_SEPARATOR: char = '/';

/// Condition written when a recipe has no unlock condition.
pub const NULL_CONDITION: &str = "null";

/// Positional layout of big-craftable metadata records.
pub mod object_fields {
    /// Internal name.
    pub const NAME: usize = 0;
    /// Sell price.
    pub const PRICE: usize = 1;
    /// Edibility.
    pub const EDIBILITY: usize = 2;
    /// `"<type> <category>"`.
    pub const TYPE_AND_CATEGORY: usize = 3;
    /// Description shown in tooltips.
    pub const DESCRIPTION: usize = 4;
    /// May be placed outdoors.
    pub const OUTDOORS: usize = 5;
    /// May be placed indoors.
    pub const INDOORS: usize = 6;
    /// Fragility.
    pub const FRAGILITY: usize = 7;
    /// Display name.
    pub const DISPLAY_NAME: usize = 8;
    /// Minimum field count of a well-formed record.
    pub const COUNT: usize = 9;
}

/// Positional layout of crafting recipe records.
pub mod recipe_fields {
    /// Ingredient list.
    pub const INGREDIENTS: usize = 0;
    /// Unused by the host.
    pub const UNUSED: usize = 1;
    /// `"<output id> <quantity>"`.
    pub const OUTPUT: usize = 2;
    /// Recipe is always available.
    pub const ALWAYS_AVAILABLE: usize = 3;
    /// Unlock condition, or `null`.
    pub const CONDITION: usize = 4;
    /// Display name.
    pub const DISPLAY_NAME: usize = 5;
    /// Minimum field count for the fields the injector reads.
    pub const REQUIRED: usize = 3;
}

/// Errors raised while decoding a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Record has fewer fields than the schema requires.
    #[error("record has {found} fields, expected at least {expected}: '{raw}'")]
    TooShort {
        /// Fields present.
        found: usize,
        /// Fields required.
        expected: usize,
        /// Offending record.
        raw: String,
    },
    /// A field couldn't be parsed as its declared type.
    #[error("field {index} has invalid value '{value}'")]
    InvalidField {
        /// Field position.
        index: usize,
        /// Offending value.
        value: String,
    },
}

fn split(raw: &str, expected: usize) -> Result<Vec<String>, RecordError> {
    let fields: Vec<String> = raw.split(FIELD_SEPARATOR).map(str::to_string).collect();
    if fields.len() < expected {
        return Err(RecordError::TooShort {
            found: fields.len(),
            expected,
            raw: raw.to_string(),
        });
    }
    Ok(fields)
}

fn parse_bool(index: usize, value: &str) -> Result<bool, RecordError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RecordError::InvalidField {
            index,
            value: value.to_string(),
        }),
    }
}

/// Big-craftable metadata record with named field access.
///
/// Unknown trailing fields are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    fields: Vec<String>,
}

impl ObjectRecord {
    /// Decode a raw record.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        Ok(Self {
            fields: split(raw, object_fields::COUNT)?,
        })
    }

    /// Encode back into the host's string form.
    pub fn encode(&self) -> String {
        self.fields.join("/")
    }

    /// Replace the tooltip description.
    pub fn set_description(&mut self, value: impl Into<String>) {
        self.fields[object_fields::DESCRIPTION] = value.into();
    }

    /// Replace the display name.
    pub fn set_display_name(&mut self, value: impl Into<String>) {
        self.fields[object_fields::DISPLAY_NAME] = value.into();
    }
}

/// Crafting recipe record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    /// Raw ingredient list.
    pub ingredients: String,
    /// Unused field, carried through.
    pub unused: String,
    /// Output id and quantity, carried through.
    pub output: String,
    /// Recipe is always available.
    pub always_available: bool,
    /// Unlock condition, `None` encodes as `null`.
    pub condition: Option<String>,
    /// Display name.
    pub display_name: String,
}

impl RecipeRecord {
    /// Decode a raw recipe record; missing trailing fields take neutral defaults.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let fields = split(raw, recipe_fields::REQUIRED)?;
        let get = |index: usize| fields.get(index).map(String::as_str).unwrap_or_default();
        let always_available = match get(recipe_fields::ALWAYS_AVAILABLE) {
            "" => false,
            value => parse_bool(recipe_fields::ALWAYS_AVAILABLE, value)?,
        };
        let condition = match get(recipe_fields::CONDITION) {
            "" | NULL_CONDITION => None,
            value => Some(value.to_string()),
        };
        Ok(Self {
            ingredients: get(recipe_fields::INGREDIENTS).to_string(),
            unused: get(recipe_fields::UNUSED).to_string(),
            output: get(recipe_fields::OUTPUT).to_string(),
            always_available,
            condition,
            display_name: get(recipe_fields::DISPLAY_NAME).to_string(),
        })
    }

    /// Encode back into the host's string form.
    pub fn encode(&self) -> String {
        [
            self.ingredients.as_str(),
            self.unused.as_str(),
            self.output.as_str(),
            if self.always_available { "true" } else { "false" },
            self.condition.as_deref().unwrap_or(NULL_CONDITION),
            self.display_name.as_str(),
        ]
        .join("/")
    }
}
