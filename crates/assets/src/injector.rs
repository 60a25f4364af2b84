//! Patches host data tables with one entry per garden bed variant.
//!
//! Every patch is idempotent: applying it twice to the same table yields the
//! same table as applying it once. The host may reload a table at any time and
//! the injector is expected to run again on each load.

use std::collections::{BTreeMap, HashMap};

use image::RgbaImage;
use raised_beds_core::{GardenConfig, Rect, Translations, SMALLEST_TILE_SIZE};
use thiserror::Error;
use tracing::{debug, warn};

use crate::atlas::{big_craftable_rect, overlay_region, AtlasError, SOIL_INDEX_IN_SHEET};
use crate::events::{event_key, events_location, format_script, EventCatalog, EventError};
use crate::record::{ObjectRecord, RecipeRecord, RecordError};
use crate::registry::{name_for_variant, sprite_row_offset, VariantRegistry, GENERIC_NAME};
use crate::RawDefinitions;

/// Namespace of the assets this crate serves to the host.
pub const ASSET_PREFIX: &str = "blueberry.rgb.Assets";

/// Game content name of the variant definitions table.
pub const DEFINITIONS_ASSET: &str = "blueberry.rgb.Assets/ItemDefinitions";

/// Game content name of the event data table.
pub const EVENT_DATA_ASSET: &str = "blueberry.rgb.Assets/EventData";

const CRAFTABLES_ATLAS: &str = "TileSheets/Craftables";
const BIG_CRAFTABLES_INFO: &str = "Data/BigCraftablesInformation";
const CRAFTING_RECIPES: &str = "Data/CraftingRecipes";

/// Host capability: identifiers allocated to big craftables by name.
pub trait CraftableIds {
    /// Identifier of the named big craftable, if one has been allocated.
    fn big_craftable_id(&self, name: &str) -> Option<i32>;
}

impl CraftableIds for HashMap<String, i32> {
    fn big_craftable_id(&self, name: &str) -> Option<i32> {
        self.get(name).copied()
    }
}

/// Errors that skip a single table patch. None of these are fatal.
#[derive(Debug, Error)]
pub enum InjectError {
    /// The host hasn't allocated an identifier for the generic object yet.
    #[error("no identifier allocated for the garden bed object yet")]
    UnresolvedBaseIdentifier,
    /// The metadata table has no record at the base identifier.
    #[error("no big craftable record at id {0}")]
    MissingBaseRecord(i32),
    /// The recipe table has no generic recipe to copy from.
    #[error("no generic garden bed crafting recipe")]
    MissingGenericRecipe,
    /// A host record couldn't be decoded.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// A sprite region couldn't be copied.
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    /// Event data couldn't be read or formatted.
    #[error(transparent)]
    Event(#[from] EventError),
    /// The asset was handed over as the wrong kind of data.
    #[error("asset '{0}' was not supplied in the expected format")]
    WrongData(String),
}

/// Bounds on how many variants can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionLimits {
    /// Extra identifiers reserved after the base identifier.
    pub reserved_slots: usize,
    /// Pixel height of the combined garden bed spritesheet.
    pub sprite_sheet_height: u32,
}

impl InjectionLimits {
    /// Largest number of variants the reserved range and spritesheet can hold.
    pub fn max_variants(&self) -> usize {
        let rows = self.sprite_sheet_height as usize / SMALLEST_TILE_SIZE as usize * 2;
        self.reserved_slots.min(rows)
    }
}

/// Applies per-variant patches to host tables.
pub struct ContentInjector<'a> {
    registry: &'a VariantRegistry,
    translations: &'a dyn Translations,
    config: &'a GardenConfig,
    limits: InjectionLimits,
}

impl<'a> ContentInjector<'a> {
    /// Construct an injector over a loaded registry.
    pub fn new(
        registry: &'a VariantRegistry,
        translations: &'a dyn Translations,
        config: &'a GardenConfig,
        limits: InjectionLimits,
    ) -> Self {
        Self {
            registry,
            translations,
            config,
            limits,
        }
    }

    fn variant_count(&self) -> usize {
        self.registry.len().min(self.limits.max_variants())
    }

    fn variant_id(base_id: i32, index: usize) -> i32 {
        base_id.saturating_add(i32::try_from(index).unwrap_or(i32::MAX))
    }

    /// Copy each variant's body and soil sprites into the craftables atlas.
    pub fn patch_atlas(
        &self,
        atlas: &mut RgbaImage,
        sprites: &RgbaImage,
        base_id: i32,
    ) -> Result<usize, InjectError> {
        let tile = SMALLEST_TILE_SIZE;
        let mut patched = 0;
        for (index, def) in self.registry.iter().enumerate().take(self.variant_count()) {
            let destination = big_craftable_rect(atlas.width(), Self::variant_id(base_id, index))?;
            let row = sprite_row_offset(def.sprite_index).ok_or_else(|| {
                AtlasError::IndexOutOfRange(i64::try_from(def.sprite_index).unwrap_or(i64::MAX))
            })?;

            let soil = Rect::new(tile * SOIL_INDEX_IN_SHEET, row, tile, tile);
            let soil_target = (
                destination.x,
                destination.y + tile - def.soil_height_above_ground,
            );
            overlay_region(atlas, sprites, soil, soil_target)?;

            let body = Rect::new(0, row, destination.width, destination.height);
            overlay_region(atlas, sprites, body, (destination.x, destination.y))?;
            patched += 1;
        }
        debug!(variants = patched, base_id, "Patched craftables atlas");
        Ok(patched)
    }

    /// Rename the base record and clone it once per extra variant.
    pub fn patch_object_records(
        &self,
        table: &mut BTreeMap<i32, String>,
        base_id: i32,
    ) -> Result<usize, InjectError> {
        let raw = table
            .get(&base_id)
            .ok_or(InjectError::MissingBaseRecord(base_id))?;
        let mut base = ObjectRecord::parse(raw)?;
        let description_key = if self.config.can_be_placed_in_buildings {
            "item.description.indoors"
        } else {
            "item.description"
        };
        base.set_description(self.translations.get(description_key));
        base.set_display_name(self.translations.get("item.name"));

        let count = self.variant_count();
        for (index, def) in self.registry.iter().enumerate().take(count).skip(1) {
            let mut clone = base.clone();
            clone.set_display_name(self.translations.get(&def.name_translation_key()));
            table.insert(Self::variant_id(base_id, index), clone.encode());
        }
        table.insert(base_id, base.encode());
        debug!(variants = count, base_id, "Patched big craftable records");
        Ok(count)
    }

    /// Synthesize one crafting recipe per variant from the generic recipe.
    pub fn patch_recipes(&self, table: &mut BTreeMap<String, String>) -> Result<usize, InjectError> {
        let raw = table
            .get(GENERIC_NAME)
            .ok_or(InjectError::MissingGenericRecipe)?;
        let generic = RecipeRecord::parse(raw)?;

        let count = self.variant_count();
        for def in self.registry.iter().take(count) {
            let record = RecipeRecord {
                ingredients: def.recipe_items.to_string(),
                unused: generic.unused.clone(),
                output: generic.output.clone(),
                always_available: def.recipe_is_default || self.config.recipes_always_available,
                condition: def.recipe_conditions.clone(),
                display_name: self.translations.get(&def.name_translation_key()),
            };
            table.insert(name_for_variant(&def.key), record.encode());
        }
        debug!(variants = count, "Patched crafting recipes");
        Ok(count)
    }

    /// Add the catalog's event for `location`, if it has one.
    pub fn patch_location_events(
        &self,
        table: &mut BTreeMap<String, String>,
        location: &str,
        catalog: &EventCatalog,
    ) -> Result<bool, InjectError> {
        let Some((index, event)) = catalog.find(location) else {
            return Ok(false);
        };
        let dialogue = self.translations.get("event.0.dialogue");
        let script = format_script(&event.script, &[&event.who, &dialogue])?;
        table.insert(event_key(index, &event.conditions), script);
        debug!(location, index, "Patched location events");
        Ok(true)
    }
}

/// Remove trailing definitions while the table exceeds the injection bound.
///
/// Returns the removed keys in removal order.
pub fn trim_item_definitions(table: &mut RawDefinitions, limits: InjectionLimits) -> Vec<String> {
    let max = limits.max_variants();
    let mut removed = Vec::new();
    while table.len() > max {
        let Some(key) = table.keys().next_back().cloned() else {
            break;
        };
        if table.remove(&key).is_none() {
            break;
        }
        warn!(variant = %key, "Removing excess raised bed");
        removed.push(key);
    }
    removed
}

/// Host tables the pipeline knows how to edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAsset {
    /// Local variant definitions.
    ItemDefinitions,
    /// Local event descriptor table.
    EventData,
    /// The host's big craftable spritesheet.
    CraftablesAtlas,
    /// The host's big craftable metadata records.
    BigCraftablesInformation,
    /// The host's crafting recipes.
    CraftingRecipes,
    /// Events for one location.
    LocationEvents(String),
}

impl ContentAsset {
    /// Classify a host asset name, accepting either path separator.
    pub fn classify(name: &str) -> Option<Self> {
        let normalized = name.replace('\\', "/");
        match normalized.as_str() {
            DEFINITIONS_ASSET => Some(Self::ItemDefinitions),
            EVENT_DATA_ASSET => Some(Self::EventData),
            CRAFTABLES_ATLAS => Some(Self::CraftablesAtlas),
            BIG_CRAFTABLES_INFO => Some(Self::BigCraftablesInformation),
            CRAFTING_RECIPES => Some(Self::CraftingRecipes),
            other => events_location(other).map(Self::LocationEvents),
        }
    }
}

/// Mutable view of a table handed over by the host.
pub enum AssetData<'a> {
    /// An image asset.
    Image(&'a mut RgbaImage),
    /// Records keyed by integer id.
    IdTable(&'a mut BTreeMap<i32, String>),
    /// Records keyed by string.
    StringTable(&'a mut BTreeMap<String, String>),
    /// Raw variant definitions.
    Definitions(&'a mut RawDefinitions),
}

/// Result of offering an asset to the pipeline.
#[derive(Debug)]
pub enum PatchOutcome {
    /// The asset is not one this pipeline edits.
    NotApplicable,
    /// Sprites or identifiers aren't available yet, or the host is on the title screen.
    NotReady,
    /// The patch was skipped this cycle.
    Skipped(InjectError),
    /// The patch ran and touched this many entries.
    Applied(usize),
}

/// Host-facing entry point: decides which tables to edit and when.
pub struct ContentPipeline<T: Translations> {
    registry: VariantRegistry,
    translations: T,
    config: GardenConfig,
    reserved_slots: usize,
    sprites: Option<RgbaImage>,
    events: Option<EventCatalog>,
}

impl<T: Translations> ContentPipeline<T> {
    /// Construct a pipeline. Sprites are supplied later via [`Self::set_sprites`].
    pub fn new(
        registry: VariantRegistry,
        translations: T,
        config: GardenConfig,
        reserved_slots: usize,
    ) -> Self {
        Self {
            registry,
            translations,
            config,
            reserved_slots,
            sprites: None,
            events: None,
        }
    }

    /// Provide the combined garden bed spritesheet.
    ///
    /// Variants past the reserved identifiers or the sheet's rows are dropped
    /// from the registry.
    pub fn set_sprites(&mut self, sprites: RgbaImage) {
        self.sprites = Some(sprites);
        let dropped = self.registry.shrink_to_capacity(self.limits().max_variants());
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "Shrunk garden bed variants to fit spritesheet");
        }
    }

    /// Current variant registry.
    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// Event catalog, once the event data table has loaded.
    pub fn events(&self) -> Option<&EventCatalog> {
        self.events.as_ref()
    }

    /// Current injection bounds.
    pub fn limits(&self) -> InjectionLimits {
        InjectionLimits {
            reserved_slots: self.reserved_slots,
            sprite_sheet_height: self.sprites.as_ref().map_or(0, RgbaImage::height),
        }
    }

    fn is_ready(&self, ids: Option<&dyn CraftableIds>, on_title_screen: bool) -> bool {
        self.sprites.is_some() && ids.is_some() && !on_title_screen
    }

    /// Whether [`Self::edit`] would patch the named asset right now.
    pub fn can_edit(&self, name: &str, ids: Option<&dyn CraftableIds>, on_title_screen: bool) -> bool {
        let Some(asset) = ContentAsset::classify(name) else {
            return false;
        };
        let relevant = match &asset {
            ContentAsset::LocationEvents(location) => self
                .events
                .as_ref()
                .is_some_and(|events| events.has_location(location)),
            _ => true,
        };
        relevant && self.is_ready(ids, on_title_screen)
    }

    /// Offer a freshly loaded host asset for patching.
    pub fn edit(
        &mut self,
        name: &str,
        data: AssetData<'_>,
        ids: Option<&dyn CraftableIds>,
        on_title_screen: bool,
    ) -> PatchOutcome {
        let Some(asset) = ContentAsset::classify(name) else {
            return PatchOutcome::NotApplicable;
        };
        if !self.can_edit(name, ids, on_title_screen) {
            return if self.is_ready(ids, on_title_screen) {
                PatchOutcome::NotApplicable
            } else {
                PatchOutcome::NotReady
            };
        }
        let Some(ids) = ids else {
            return PatchOutcome::NotReady;
        };
        match self.apply(&asset, name, data, ids) {
            Ok(count) => PatchOutcome::Applied(count),
            Err(err) => {
                warn!(asset = name, "Skipping patch: {err}");
                PatchOutcome::Skipped(err)
            }
        }
    }

    fn apply(
        &mut self,
        asset: &ContentAsset,
        name: &str,
        data: AssetData<'_>,
        ids: &dyn CraftableIds,
    ) -> Result<usize, InjectError> {
        let limits = self.limits();
        match (asset, data) {
            (ContentAsset::ItemDefinitions, AssetData::Definitions(table)) => {
                let removed = trim_item_definitions(table, limits);
                match VariantRegistry::load(table) {
                    Ok(registry) => self.registry = registry,
                    Err(err) => warn!("Keeping previous garden bed variants: {err}"),
                }
                Ok(removed.len())
            }
            (ContentAsset::EventData, AssetData::StringTable(table)) => {
                let catalog = EventCatalog::from_event_data(table)?;
                let count = catalog.len();
                self.events = Some(catalog);
                Ok(count)
            }
            (asset, data) => {
                let base_id = ids
                    .big_craftable_id(GENERIC_NAME)
                    .filter(|id| *id >= 0)
                    .ok_or(InjectError::UnresolvedBaseIdentifier)?;
                let injector =
                    ContentInjector::new(&self.registry, &self.translations, &self.config, limits);
                match (asset, data) {
                    (ContentAsset::CraftablesAtlas, AssetData::Image(atlas)) => {
                        let sprites = self
                            .sprites
                            .as_ref()
                            .ok_or(InjectError::UnresolvedBaseIdentifier)?;
                        injector.patch_atlas(atlas, sprites, base_id)
                    }
                    (ContentAsset::BigCraftablesInformation, AssetData::IdTable(table)) => {
                        injector.patch_object_records(table, base_id)
                    }
                    (ContentAsset::CraftingRecipes, AssetData::StringTable(table)) => {
                        injector.patch_recipes(table)
                    }
                    (ContentAsset::LocationEvents(location), AssetData::StringTable(table)) => {
                        let catalog = self.events.as_ref().ok_or_else(|| {
                            InjectError::Event(EventError::MissingEvents)
                        })?;
                        injector
                            .patch_location_events(table, location, catalog)
                            .map(usize::from)
                    }
                    _ => Err(InjectError::WrongData(name.to_string())),
                }
            }
        }
    }
}
