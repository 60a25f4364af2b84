use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use image::RgbaImage;
use raised_beds_assets::{
    registry_from_file, AssetData, ContentPipeline, PatchOutcome, TranslationTable,
    EVENTS_FIELD, EVENT_DATA_ASSET, GENERIC_NAME,
};
use raised_beds_core::{GardenConfig, TilePos, Translations};
use raised_beds_world::{BedContext, Location, LocationKind, FARM};

const BASE_RECORD: &str = "Raised Bed/0/-300/Crafting -9/placeholder/true/true/0/Raised Bed";
const BASE_ID: i32 = 300;

fn shipped() -> (raised_beds_assets::VariantRegistry, TranslationTable) {
    let registry =
        registry_from_file(Path::new("config/itemDefinitions.json")).expect("shipped definitions");
    let translations =
        TranslationTable::from_file(Path::new("config/i18n/default.json")).expect("shipped strings");
    (registry, translations)
}

#[test]
fn shipped_definitions_patch_every_host_table() {
    let (registry, translations) = shipped();
    let variants = registry.len();
    let mut pipeline = ContentPipeline::new(registry, translations, GardenConfig::default(), 50);
    pipeline.set_sprites(RgbaImage::new(160, 16 * 2 * 8));
    let ids: HashMap<String, i32> = HashMap::from([(GENERIC_NAME.to_string(), BASE_ID)]);

    let mut objects = BTreeMap::from([(BASE_ID, BASE_RECORD.to_string())]);
    let outcome = pipeline.edit(
        "Data/BigCraftablesInformation",
        AssetData::IdTable(&mut objects),
        Some(&ids),
        false,
    );
    assert!(matches!(outcome, PatchOutcome::Applied(n) if n == variants));
    assert!(objects[&BASE_ID].ends_with("/Raised Bed"));
    assert!(objects[&(BASE_ID + 1)].ends_with("/Stone Raised Bed"));

    let mut recipes = BTreeMap::from([(
        GENERIC_NAME.to_string(),
        "388 10/Home/300 1/false/null/Raised Bed".to_string(),
    )]);
    let outcome = pipeline.edit(
        "Data/CraftingRecipes",
        AssetData::StringTable(&mut recipes),
        Some(&ids),
        false,
    );
    assert!(matches!(outcome, PatchOutcome::Applied(_)));
    assert_eq!(
        recipes[&format!("{GENERIC_NAME}.wood")],
        "388 10/Home/300 1/true/null/Wood Raised Bed"
    );
    assert_eq!(
        recipes[&format!("{GENERIC_NAME}.stone")],
        "390 20/Home/300 1/false/f Robin 4/Stone Raised Bed"
    );
}

#[test]
fn shipped_event_reaches_the_farm() {
    let (registry, translations) = shipped();
    let dialogue = translations.get("event.0.dialogue");
    let mut pipeline = ContentPipeline::new(registry, translations, GardenConfig::default(), 50);
    pipeline.set_sprites(RgbaImage::new(160, 96));
    let ids: HashMap<String, i32> = HashMap::from([(GENERIC_NAME.to_string(), BASE_ID)]);

    let events = fs::read_to_string("config/eventData.json").expect("shipped event data");
    let mut event_data = BTreeMap::from([(EVENTS_FIELD.to_string(), events)]);
    let outcome = pipeline.edit(
        EVENT_DATA_ASSET,
        AssetData::StringTable(&mut event_data),
        Some(&ids),
        false,
    );
    assert!(matches!(outcome, PatchOutcome::Applied(1)));

    let mut farm = BTreeMap::new();
    let outcome = pipeline.edit(
        "Data/Events/Farm",
        AssetData::StringTable(&mut farm),
        Some(&ids),
        false,
    );
    assert!(matches!(outcome, PatchOutcome::Applied(1)));
    let script = farm
        .get("463700/f Robin 1000/w sunny/t 600 1200")
        .expect("farm event key");
    assert!(script.contains("farmer 64 16 2 Robin"));
    assert!(script.contains(&dialogue));
}

#[test]
fn shipped_variants_can_be_placed_and_saved() {
    let (registry, translations) = shipped();
    let config = GardenConfig::default();
    let ctx = BedContext::new(&registry, &config, &translations);
    let mut farm = Location::new(FARM, LocationKind::Farm, 16, 16);
    for (x, key) in registry.keys().enumerate() {
        let x = i32::try_from(x).unwrap();
        farm.place_bed(&ctx, key, TilePos::new(2 + x, 2))
            .expect("placeable on the farm");
    }
    let json = farm.save_beds().expect("save");

    let mut restored = Location::new(FARM, LocationKind::Farm, 16, 16);
    assert_eq!(restored.load_beds(&json, &ctx).unwrap(), registry.len());
    assert_eq!(
        restored.bed(TilePos::new(3, 2)).map(|bed| bed.variant().to_string()),
        Some("stone".to_string())
    );
}
