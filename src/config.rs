use anyhow::{Context, Result};
use raised_beds_assets::{
    definitions_from_file, RawDefinitions, TranslationTable, VariantRegistry,
};
use raised_beds_core::GardenConfig;
use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::content_packs::{self, ContentPack};

pub const DEFAULT_CONFIG_PATH: &str = "config/raised_beds.toml";
pub const DEFAULT_DEFINITIONS_PATH: &str = "config/itemDefinitions.json";
pub const DEFAULT_TRANSLATIONS_PATH: &str = "config/i18n/default.json";
pub const DEFAULT_CONTENT_PACKS_DIR: &str = content_packs::CONTENT_PACKS_DIR;

/// Load the player toggles, falling back to defaults on errors.
pub fn load_garden_config(path: &Path) -> GardenConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GardenConfig>(&contents) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                GardenConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("Garden config not found at {}. Using defaults", path.display());
            GardenConfig::default()
        }
        Err(err) => {
            warn!("Failed to read {}: {err}. Using defaults", path.display());
            GardenConfig::default()
        }
    }
}

/// Write the player toggles as TOML.
pub fn save_garden_config(config: &GardenConfig, path: &Path) -> Result<()> {
    let toml = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Append `extra` to `merged`, skipping keys that are already defined.
fn merge_definitions(merged: &mut RawDefinitions, extra: RawDefinitions, source: &Path) -> usize {
    let mut added = 0;
    for (key, value) in extra {
        if merged.contains_key(&key) {
            warn!(
                "Ignoring duplicate garden bed variant {key} from {}",
                source.display()
            );
            continue;
        }
        merged.insert(key, value);
        added += 1;
    }
    added
}

/// Base definitions plus every enabled pack, logging and skipping bad packs.
///
/// Malformed variants inside a readable file are dropped by the registry
/// loader; only an unreadable base file fails the load.
pub fn load_variant_registry(base_path: &Path, packs_root: &Path) -> Result<VariantRegistry> {
    let mut merged = definitions_from_file(base_path)
        .with_context(|| format!("Failed to load {}", base_path.display()))?;
    for pack in content_packs::discover_lenient(packs_root) {
        let path = pack.definitions_path();
        if !path.exists() {
            continue;
        }
        match definitions_from_file(&path) {
            Ok(extra) => {
                let added = merge_definitions(&mut merged, extra, &path);
                debug!(pack = %pack.id, added, "Loaded content pack variants");
            }
            Err(err) => warn!("Failed to load content pack variants {}: {err}", path.display()),
        }
    }
    Ok(VariantRegistry::load(&merged)?)
}

/// Like [`load_variant_registry`] but any bad pack, duplicate key or
/// malformed variant fails the load.
pub fn load_variant_registry_strict(
    base_path: &Path,
    packs_root: &Path,
) -> Result<VariantRegistry> {
    let mut merged = definitions_from_file(base_path)
        .with_context(|| format!("Failed to load {}", base_path.display()))?;
    for pack in content_packs::discover_strict(packs_root)? {
        let path = pack.definitions_path();
        if !path.exists() {
            continue;
        }
        let extra = definitions_from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        if let Some(key) = extra.keys().find(|key| merged.contains_key(*key)) {
            anyhow::bail!(
                "Duplicate garden bed variant {key} while loading {}",
                path.display()
            );
        }
        merge_definitions(&mut merged, extra, &path);
    }
    Ok(VariantRegistry::load_strict(&merged)?)
}

fn pack_translations(pack: &ContentPack) -> Option<TranslationTable> {
    let path = pack.translations_path();
    if !path.exists() {
        return None;
    }
    match TranslationTable::from_file(&path) {
        Ok(table) => Some(table),
        Err(err) => {
            warn!("Failed to load content pack strings {}: {err}", path.display());
            None
        }
    }
}

/// Base strings layered over each enabled pack's strings, in pack order.
///
/// A missing or unreadable base file leaves only the pack strings.
pub fn load_translations(base_path: &Path, packs_root: &Path) -> TranslationTable {
    let packs = content_packs::discover_lenient(packs_root);
    let fallback = packs
        .iter()
        .rev()
        .filter_map(pack_translations)
        .fold(None, |below: Option<TranslationTable>, table| {
            Some(match below {
                Some(below) => table.with_fallback(below),
                None => table,
            })
        });
    let base = TranslationTable::from_file(base_path).unwrap_or_else(|err| {
        warn!("Failed to load strings {}: {err}", base_path.display());
        TranslationTable::default()
    });
    match fallback {
        Some(fallback) => base.with_fallback(fallback),
        None => base,
    }
}
