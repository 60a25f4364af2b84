//! Save records for placed beds.
//!
//! Only state that can't be rebuilt is stored. Soil offset, sprite row and
//! display name come back from the registry through `set_variant` on load,
//! and neighbour flags are recomputed.

use raised_beds_assets::UnknownVariant;
use raised_beds_core::{Item, TilePos};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::adjacency::adjust_all;
use crate::bed::{BedContext, GardenBed};
use crate::location::{Location, TileObject};
use crate::soil::{Bush, Soil};

/// Bed fields that change at runtime and must be kept in sync between peers.
///
/// Held object, soil and bush belong to the host's base object and are synced
/// there.
pub const SYNCED_FIELDS: [&str; 5] = [
    "variant",
    "soil_height_above_ground",
    "breakage_start",
    "breakage_timer",
    "neighbours",
];

/// Synced fields left out of [`BedSaveData`]. Soil offset and breakage start
/// come back from the variant definition, and neighbour flags are recomputed
/// by the adjacency pass after loading.
pub const REBUILT_ON_LOAD: [&str; 3] = ["soil_height_above_ground", "breakage_start", "neighbours"];

/// Errors raised while reading or writing bed saves.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Malformed save JSON.
    #[error("invalid bed save data: {0}")]
    Json(#[from] serde_json::Error),
    /// The saved variant is no longer loaded.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}

/// Persisted state of one bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedSaveData {
    /// Variant key.
    pub variant: String,
    /// Days left before breakage.
    pub breakage_timer: i32,
    /// Tile the bed stands on.
    pub tile: TilePos,
    /// Held object.
    #[serde(default)]
    pub held: Option<Item>,
    /// Soil and crop.
    #[serde(default)]
    pub soil: Soil,
    /// Bush.
    #[serde(default)]
    pub bush: Option<Bush>,
}

impl GardenBed {
    /// Snapshot the persistent state.
    pub fn to_save(&self) -> BedSaveData {
        BedSaveData {
            variant: self.variant().to_string(),
            breakage_timer: self.breakage_timer(),
            tile: self.tile(),
            held: self.held().cloned(),
            soil: self.soil().clone(),
            bush: self.bush().cloned(),
        }
    }

    /// Rebuild a bed from a save record.
    pub fn from_save(ctx: &BedContext<'_>, data: BedSaveData) -> Result<Self, UnknownVariant> {
        let mut bed = GardenBed::new(ctx, Some(&data.variant), data.tile, false)?;
        bed.set_breakage_timer(data.breakage_timer);
        bed.restore_contents(data.held, data.soil, data.bush);
        Ok(bed)
    }
}

impl Location {
    /// Serialize every bed in the location.
    pub fn save_beds(&self) -> Result<String, PersistError> {
        let records: Vec<BedSaveData> = self.beds().map(GardenBed::to_save).collect();
        Ok(serde_json::to_string(&records)?)
    }

    /// Restore beds from [`Location::save_beds`] output and reconnect them.
    ///
    /// Records of unknown variants are skipped with a warning. Returns the
    /// number of beds restored.
    pub fn load_beds(&mut self, json: &str, ctx: &BedContext<'_>) -> Result<usize, PersistError> {
        let records: Vec<BedSaveData> = serde_json::from_str(json)?;
        let mut restored = 0;
        for record in records {
            let tile = record.tile;
            match GardenBed::from_save(ctx, record) {
                Ok(bed) => {
                    self.insert_object(tile, TileObject::Bed(bed));
                    restored += 1;
                }
                Err(err) => {
                    warn!(location = %self.name(), %tile, error = %err, "Skipping saved garden bed");
                }
            }
        }
        adjust_all(self, ctx.config);
        debug!(location = %self.name(), restored, "Loaded garden beds");
        Ok(restored)
    }
}
