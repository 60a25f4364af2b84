//! Player interactions with beds: placing, hitting with tools, dropping items in.

use raised_beds_assets::{Ingredient, UnknownVariant, REFUND_RATIO};
use raised_beds_core::{GardenConfig, Item, Tool, ToolKind, TilePos};
use thiserror::Error;
use tracing::debug;

use crate::adjacency::adjust_with_neighbours;
use crate::bed::{BedContext, GardenBed};
use crate::location::{Location, TerrainFeature, TileObject};
use crate::scheduler::{AdjustTarget, DeferredAdjust};

/// Reasons a bed couldn't be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    /// The location or tile doesn't allow a bed.
    #[error("cannot place a garden bed at {tile} in {location}")]
    NotPlaceable {
        /// Target location.
        location: String,
        /// Target tile.
        tile: TilePos,
    },
    /// The bed's variant isn't loaded.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}

/// What a tool swing did to a bed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolEffect {
    /// Nothing happened.
    Ignored,
    /// The soil was watered.
    Watered,
    /// The swing landed but the bed stayed; held contents shook.
    Blocked,
    /// The bed came loose and returns to the player with any released contents.
    Popped {
        /// Contents released alongside the bed.
        released: Vec<Item>,
    },
    /// A broken bed was smashed.
    Destroyed {
        /// Contents released before smashing.
        released: Vec<Item>,
        /// Partial refund of the primary crafting ingredient.
        refund: Option<Ingredient>,
    },
}

/// What dropping an item into a bed did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropInEffect {
    /// The item was refused.
    Rejected,
    /// A broken bed was repaired with a bed of its own variant.
    Repaired,
    /// The item now sits in the bed.
    Held,
    /// The item went into the soil.
    Planted,
}

impl DropInEffect {
    /// Whether the item was taken.
    pub fn accepted(self) -> bool {
        self != DropInEffect::Rejected
    }
}

/// Objects that can be set down on a tile.
pub trait Placeable {
    /// Whether the object may be placed on `tile`.
    fn can_be_placed_here(&self, location: &Location, tile: TilePos, config: &GardenConfig)
        -> bool;

    /// Place a copy of the object and reconnect its neighbours.
    fn placement_action(
        &self,
        ctx: &BedContext<'_>,
        location: &mut Location,
        tile: TilePos,
    ) -> Result<(), PlaceError>;
}

/// Objects that react to tool swings.
pub trait ToolInteractable {
    /// React to `tool`; the caller applies the effect to the location.
    fn perform_tool_action(&mut self, tool: &Tool, ctx: &BedContext<'_>) -> ToolEffect;
}

/// Objects that accept items dropped into them.
pub trait DropInInteractable {
    /// React to `item`. With `dry_run`, report the effect without changing anything.
    fn perform_drop_in_action(
        &mut self,
        item: &Item,
        dry_run: bool,
        ctx: &BedContext<'_>,
    ) -> DropInEffect;
}

/// Whether a bed may go on `tile` in `location`.
pub fn can_be_placed_in(location: &Location, tile: TilePos, config: &GardenConfig) -> bool {
    use crate::location::LocationKind::*;

    let kind = location.kind();
    let ok_greenhouse = config.can_be_placed_in_green_house && kind == Greenhouse;
    let ok_farm_house =
        config.can_be_placed_in_farm_house && matches!(kind, FarmHouse | IslandFarmHouse);
    let ok_farm = (location.is_outdoors() && kind == Farm)
        || (!location.is_outdoors() && config.can_be_placed_in_buildings && kind == BuildingInterior);

    let no_crops = match location.terrain_at(tile) {
        None | Some(TerrainFeature::Flooring) => true,
        Some(TerrainFeature::Soil(soil)) => soil.crop.is_none(),
        Some(TerrainFeature::Grass) => false,
    };
    let no_obstructions = location.is_tile_clear(tile)
        && location.object_at(tile).is_none()
        && no_crops
        && !location.has_large_foliage(tile)
        && !location.has_resource_clump(tile);

    !location.is_temp() && (ok_greenhouse || ok_farm_house || ok_farm) && no_obstructions
}

/// Whether `item` goes into the soil.
pub fn is_item_plantable(item: &Item) -> bool {
    item.is_plantable()
}

/// Whether `item` sits on top of the soil instead of being planted.
pub fn is_item_placeable_no_crops(item: &Item, config: &GardenConfig) -> bool {
    !is_item_plantable(item) && config.sprinklers_enabled && item.is_sprinkler()
}

impl Placeable for GardenBed {
    fn can_be_placed_here(
        &self,
        location: &Location,
        tile: TilePos,
        config: &GardenConfig,
    ) -> bool {
        can_be_placed_in(location, tile, config)
    }

    fn placement_action(
        &self,
        ctx: &BedContext<'_>,
        location: &mut Location,
        tile: TilePos,
    ) -> Result<(), PlaceError> {
        location.place_bed(ctx, self.variant(), tile)
    }
}

impl ToolInteractable for GardenBed {
    fn perform_tool_action(&mut self, tool: &Tool, ctx: &BedContext<'_>) -> ToolEffect {
        if self.is_broken(ctx.config) {
            if tool.is_melee_weapon() || tool.kind == ToolKind::WateringCan {
                return ToolEffect::Ignored;
            }
            let toss = self.toss_held_item(true);
            if !toss.cleared {
                return ToolEffect::Blocked;
            }
            let refund = ctx
                .registry
                .get(self.variant())
                .ok()
                .and_then(|def| def.recipe_items.primary())
                .and_then(|primary| primary.refund(REFUND_RATIO));
            return ToolEffect::Destroyed {
                released: toss.released,
                refund,
            };
        }

        if tool.kind == ToolKind::WateringCan {
            self.water();
            return ToolEffect::Watered;
        }
        if !tool.dislodges_objects() {
            return ToolEffect::Ignored;
        }
        let toss = self.toss_held_item(false);
        if toss.cleared {
            ToolEffect::Popped {
                released: toss.released,
            }
        } else {
            ToolEffect::Blocked
        }
    }
}

impl DropInInteractable for GardenBed {
    fn perform_drop_in_action(
        &mut self,
        item: &Item,
        dry_run: bool,
        ctx: &BedContext<'_>,
    ) -> DropInEffect {
        let config = ctx.config;
        if self.is_broken(config) {
            if !self.can_stack_with(item) {
                return DropInEffect::Rejected;
            }
            if !dry_run {
                self.unbreak();
            }
            return DropInEffect::Repaired;
        }

        if self.is_open_for_placement(config, false, true) && is_item_placeable_no_crops(item, config) {
            if dry_run {
                return DropInEffect::Held;
            }
            let same_kind = self
                .held()
                .is_some_and(|held| held.parent_sheet_index() == item.parent_sheet_index());
            if same_kind || !self.toss_held_item(false).cleared {
                return DropInEffect::Rejected;
            }
            self.hold(item);
            return DropInEffect::Held;
        }

        if !self.is_open_for_placement(config, false, false) || !is_item_plantable(item) {
            return DropInEffect::Rejected;
        }
        match item {
            Item::Sapling { id } => {
                if !dry_run {
                    self.plant_bush(*id);
                }
                DropInEffect::Planted
            }
            _ if self.soil().can_accept(item) => {
                if !dry_run {
                    self.soil_mut().apply(item);
                }
                DropInEffect::Planted
            }
            _ => DropInEffect::Rejected,
        }
    }
}

impl Location {
    /// Place a new bed of `variant` and reconnect the beds around it.
    pub fn place_bed(
        &mut self,
        ctx: &BedContext<'_>,
        variant: &str,
        tile: TilePos,
    ) -> Result<(), PlaceError> {
        if !can_be_placed_in(self, tile, ctx.config) {
            return Err(PlaceError::NotPlaceable {
                location: self.name().to_string(),
                tile,
            });
        }
        let bed = GardenBed::new(ctx, Some(variant), tile, self.is_raining_here())?;
        self.insert_object(tile, TileObject::Bed(bed));
        adjust_with_neighbours(self, tile, 1, ctx.config);
        debug!(location = %self.name(), %tile, variant, "Placed garden bed");
        Ok(())
    }

    /// Remove the bed on `tile` if its contents can be released.
    ///
    /// The adjacency pass is deferred to the next tick, since removals often
    /// come in batches.
    pub fn remove_bed(&mut self, tile: TilePos, deferred: &mut DeferredAdjust) -> Option<GardenBed> {
        let cleared = self.bed_mut(tile)?.toss_held_item(false).cleared;
        if !cleared {
            return None;
        }
        let Some(TileObject::Bed(bed)) = self.take_object(tile) else {
            return None;
        };
        deferred.request(AdjustTarget::Location(self.name().to_string()));
        Some(bed)
    }

    /// Swing `tool` at the bed on `tile` and apply the outcome to the map.
    pub fn hit_with_tool(&mut self, tile: TilePos, tool: &Tool, ctx: &BedContext<'_>) -> ToolEffect {
        let Some(bed) = self.bed_mut(tile) else {
            return ToolEffect::Ignored;
        };
        let effect = bed.perform_tool_action(tool, ctx);
        match &effect {
            ToolEffect::Destroyed { released, refund } => {
                // Neighbours already ignore a broken bed, so no recompute.
                self.take_object(tile);
                for item in released {
                    self.drop_debris(item.clone(), tile);
                }
                if let Some(refund) = refund {
                    self.drop_debris(
                        Item::Object {
                            id: refund.item_id,
                            quantity: refund.quantity,
                        },
                        tile.offset(-1, -1),
                    );
                }
                debug!(location = %self.name(), %tile, "Destroyed broken garden bed");
            }
            ToolEffect::Popped { released } => {
                if let Some(TileObject::Bed(bed)) = self.take_object(tile) {
                    for item in released {
                        self.drop_debris(item.clone(), tile);
                    }
                    self.drop_debris(bed.get_one(), tile);
                    adjust_with_neighbours(self, tile, 1, ctx.config);
                }
            }
            ToolEffect::Ignored | ToolEffect::Watered | ToolEffect::Blocked => {}
        }
        effect
    }

    /// Drop `item` into the bed on `tile`.
    pub fn drop_in(
        &mut self,
        tile: TilePos,
        item: &Item,
        dry_run: bool,
        ctx: &BedContext<'_>,
    ) -> DropInEffect {
        let Some(bed) = self.bed_mut(tile) else {
            return DropInEffect::Rejected;
        };
        let effect = bed.perform_drop_in_action(item, dry_run, ctx);
        if effect == DropInEffect::Repaired && !dry_run {
            adjust_with_neighbours(self, tile, 1, ctx.config);
        }
        effect
    }
}
