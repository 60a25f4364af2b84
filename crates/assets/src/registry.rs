use std::collections::HashMap;

use raised_beds_core::{Translations, SMALLEST_TILE_SIZE};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::recipe::Ingredients;
use crate::{LoadError, RawDefinitions};

/// Common name and prefix for every garden bed object and recipe.
pub const GENERIC_NAME: &str = "blueberry.rgb.raisedbed";

/// Returned when a variant key is not present in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown garden bed variant '{0}'")]
pub struct UnknownVariant(pub String);

/// Variant metadata loaded from definition packs.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDefinition {
    /// Stable identifier (e.g., "wood").
    pub key: String,
    /// Row of this variant in the combined spritesheet.
    pub sprite_index: usize,
    /// Visual Y offset of the soil above the tile, in sprite pixels.
    pub soil_height_above_ground: i32,
    /// Days before the bed is ready to break; 0 disables breakage for the variant.
    pub days_to_break: i32,
    /// Crafting ingredients.
    pub recipe_items: Ingredients,
    /// Recipe is known without being unlocked.
    pub recipe_is_default: bool,
    /// Unlock condition for the recipe, if any.
    pub recipe_conditions: Option<String>,
}

impl VariantDefinition {
    /// Construct a definition from one raw variant entry.
    ///
    /// `position` is the entry's position among accepted variants and is used
    /// as the sprite row when the entry doesn't name one.
    pub fn from_raw(key: &str, fields: &Value, position: usize) -> Result<Self, LoadError> {
        let fields = fields.as_object().ok_or_else(|| LoadError::NotAnObject {
            variant: key.to_string(),
        })?;

        let recipe_raw = required_str(key, fields, "RecipeItems")?;
        let recipe_items =
            Ingredients::parse(&recipe_raw).map_err(|_| LoadError::InvalidField {
                variant: key.to_string(),
                field: "RecipeItems",
                value: recipe_raw.clone(),
            })?;

        let days_to_break = required_int(key, fields, "DaysToBreak")?;
        if days_to_break < 0 {
            return Err(LoadError::InvalidField {
                variant: key.to_string(),
                field: "DaysToBreak",
                value: days_to_break.to_string(),
            });
        }

        let sprite_index = match fields.get("SpriteIndex") {
            None | Some(Value::Null) => position,
            Some(_) => {
                let index = required_int(key, fields, "SpriteIndex")?;
                usize::try_from(index)
                    .ok()
                    .filter(|&index| sprite_row_offset(index).is_some())
                    .ok_or_else(|| LoadError::InvalidField {
                        variant: key.to_string(),
                        field: "SpriteIndex",
                        value: index.to_string(),
                    })?
            }
        };

        let recipe_conditions = match fields.get("RecipeConditions") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() || s == "null" => None,
            Some(_) => Some(required_str(key, fields, "RecipeConditions")?),
        };

        Ok(Self {
            key: key.to_string(),
            sprite_index,
            soil_height_above_ground: required_int(key, fields, "SoilHeightAboveGround")?,
            days_to_break,
            recipe_items,
            recipe_is_default: required_bool(key, fields, "RecipeIsDefault")?,
            recipe_conditions,
        })
    }

    /// Translation key for this variant's display name.
    pub fn name_translation_key(&self) -> String {
        format!("item.name.{}", self.key)
    }
}

fn field<'a>(
    key: &str,
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, LoadError> {
    match fields.get(name) {
        Some(Value::Null) | None => Err(LoadError::MissingField {
            variant: key.to_string(),
            field: name,
        }),
        Some(value) => Ok(value),
    }
}

fn invalid(key: &str, name: &'static str, value: &Value) -> LoadError {
    LoadError::InvalidField {
        variant: key.to_string(),
        field: name,
        value: value.to_string(),
    }
}

fn required_str(
    key: &str,
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<String, LoadError> {
    match field(key, fields, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(invalid(key, name, other)),
    }
}

fn required_int(
    key: &str,
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<i32, LoadError> {
    let value = field(key, fields, name)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(key, name, value))
}

fn required_bool(
    key: &str,
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<bool, LoadError> {
    let value = field(key, fields, name)?;
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid(key, name, value)),
        },
        _ => Err(invalid(key, name, value)),
    }
}

/// Ordered registry of garden bed variants.
///
/// Index order is insertion order and never changes after construction, other
/// than trailing entries being dropped by [`VariantRegistry::shrink_to_capacity`].
#[derive(Debug, Clone)]
pub struct VariantRegistry {
    definitions: Vec<VariantDefinition>,
    key_to_index: HashMap<String, usize>,
}

impl VariantRegistry {
    /// Construct a registry from the supplied definitions.
    pub fn new(definitions: Vec<VariantDefinition>) -> Self {
        let key_to_index = definitions
            .iter()
            .enumerate()
            .map(|(index, def)| (def.key.clone(), index))
            .collect();
        Self {
            definitions,
            key_to_index,
        }
    }

    /// Build a registry from raw definitions.
    ///
    /// Malformed variants are logged and excluded; an empty result fails.
    pub fn load(raw: &RawDefinitions) -> Result<Self, LoadError> {
        let mut definitions = Vec::with_capacity(raw.len());
        for (key, fields) in raw {
            match VariantDefinition::from_raw(key, fields, definitions.len()) {
                Ok(def) => definitions.push(def),
                Err(err) => warn!(variant = %key, "Excluding garden bed variant: {err}"),
            }
        }
        if definitions.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self::new(definitions))
    }

    /// Build a registry from raw definitions, failing on the first malformed variant.
    pub fn load_strict(raw: &RawDefinitions) -> Result<Self, LoadError> {
        let mut definitions = Vec::with_capacity(raw.len());
        for (key, fields) in raw {
            definitions.push(VariantDefinition::from_raw(key, fields, definitions.len())?);
        }
        if definitions.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self::new(definitions))
    }

    /// Look up a definition by key.
    pub fn get(&self, key: &str) -> Result<&VariantDefinition, UnknownVariant> {
        self.key_to_index
            .get(key)
            .map(|&index| &self.definitions[index])
            .ok_or_else(|| UnknownVariant(key.to_string()))
    }

    /// Registry position of a variant.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.key_to_index.get(key).copied()
    }

    /// Variant key at a registry position.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.definitions.get(index).map(|d| d.key.as_str())
    }

    /// Definition at a registry position.
    pub fn definition_at(&self, index: usize) -> Option<&VariantDefinition> {
        self.definitions.get(index)
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry holds no variants.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &VariantDefinition> {
        self.definitions.iter()
    }

    /// Keys in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.key.as_str())
    }

    /// Drop trailing variants beyond `max_count`, returning the dropped keys in removal order.
    pub fn shrink_to_capacity(&mut self, max_count: usize) -> Vec<String> {
        let mut dropped = Vec::new();
        while self.definitions.len() > max_count {
            let Some(def) = self.definitions.pop() else {
                break;
            };
            warn!(variant = %def.key, "Removing excess raised bed");
            self.key_to_index.remove(&def.key);
            dropped.push(def.key);
        }
        dropped
    }

    /// Key used for beds created without one: the first key in the preferred
    /// namespace, falling back to the first key overall.
    pub fn default_key(&self, preferred_prefix: Option<&str>) -> Option<&str> {
        preferred_prefix
            .and_then(|prefix| self.keys().find(|key| key.starts_with(prefix)))
            .or_else(|| self.key_at(0))
    }

    /// Translated display name for a variant.
    pub fn display_name(
        &self,
        key: &str,
        translations: &dyn Translations,
    ) -> Result<String, UnknownVariant> {
        let def = self.get(key)?;
        Ok(translations.get(&def.name_translation_key()))
    }

    /// Variant index encoded at the end of an object or recipe name.
    ///
    /// Dotted keys resolve through the full suffix first, then the last segment.
    pub fn index_from_name(&self, name: &str) -> Option<usize> {
        variant_key_from_name(name)
            .and_then(|key| self.index_of(key))
            .or_else(|| name.rsplit('.').next().and_then(|last| self.index_of(last)))
    }

    /// Variant key for a global atlas identifier, given the identifier of variant 0.
    pub fn key_from_sheet_index(&self, sheet_index: i32, base_index: i32) -> Option<&str> {
        let offset = sheet_index.checked_sub(base_index)?;
        usize::try_from(offset).ok().and_then(|i| self.key_at(i))
    }

    /// Keys whose object name or atlas identifier resolves to a different
    /// variant, with variant 0 at `base_id`.
    pub fn unresolvable_keys(&self, base_id: i32) -> Vec<&str> {
        self.definitions
            .iter()
            .enumerate()
            .filter(|(index, def)| {
                let by_name = self.index_from_name(&name_for_variant(&def.key)) == Some(*index);
                let by_id = i32::try_from(*index)
                    .ok()
                    .and_then(|offset| base_id.checked_add(offset))
                    .and_then(|id| self.key_from_sheet_index(id, base_id))
                    == Some(def.key.as_str());
                !(by_name && by_id)
            })
            .map(|(_, def)| def.key.as_str())
            .collect()
    }
}

/// Pixel row of sprite row `sprite_index` in the combined spritesheet, or
/// `None` when it doesn't fit in pixel coordinates.
pub fn sprite_row_offset(sprite_index: usize) -> Option<i32> {
    i32::try_from(sprite_index)
        .ok()?
        .checked_mul(SMALLEST_TILE_SIZE * 2)
}

/// Full object name for a variant, e.g. `blueberry.rgb.raisedbed.wood`.
pub fn name_for_variant(key: &str) -> String {
    format!("{GENERIC_NAME}.{key}")
}

/// Variant key embedded in a full object name.
///
/// The generic name has three dot-separated parts; everything after them is
/// the variant key, dots included.
pub fn variant_key_from_name(name: &str) -> Option<&str> {
    let mut parts = name.splitn(4, '.');
    parts.nth(3).filter(|rest| !rest.is_empty())
}
