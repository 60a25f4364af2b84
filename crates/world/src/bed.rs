//! The garden bed object placed on a single tile.

use raised_beds_assets::{UnknownVariant, VariantRegistry};
use raised_beds_core::{GardenConfig, Item, TilePos, Translations};
use tracing::warn;

use crate::adjacency::{Axis, NO_NEIGHBOURS};
use crate::breakage::{BreakageState, BREAKAGE_DEFINITE};
use crate::soil::{Bush, Soil};

/// Milliseconds a held object shakes after an action it rejected.
pub const SHAKE_DURATION: u32 = 300;

/// Namespace whose variants are preferred when a bed is created without one.
pub const AUTHOR_NAMESPACE: &str = "blueberry";

/// Shared services every bed operation reads from.
#[derive(Clone, Copy)]
pub struct BedContext<'a> {
    /// Loaded variants.
    pub registry: &'a VariantRegistry,
    /// Player toggles.
    pub config: &'a GardenConfig,
    /// Translated strings.
    pub translations: &'a dyn Translations,
    /// Namespace searched first when picking a default variant.
    pub preferred_prefix: Option<&'a str>,
}

impl<'a> BedContext<'a> {
    /// Context preferring the author's own variants.
    pub fn new(
        registry: &'a VariantRegistry,
        config: &'a GardenConfig,
        translations: &'a dyn Translations,
    ) -> Self {
        Self {
            registry,
            config,
            translations,
            preferred_prefix: Some(AUTHOR_NAMESPACE),
        }
    }
}

/// What releasing a bed's contents produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toss {
    /// Items ejected as debris.
    pub released: Vec<Item>,
    /// Whether the bed is now free to be removed.
    pub cleared: bool,
}

/// Result of a bed's overnight update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayOutcome {
    /// The bed was repaired because breakage was switched off.
    pub repaired: bool,
    /// Tiles its held sprinkler waters overnight.
    pub sprinkler_tiles: Vec<TilePos>,
}

/// A placed garden bed.
#[derive(Debug, Clone, PartialEq)]
pub struct GardenBed {
    variant: String,
    tile: TilePos,
    breakage_timer: i32,
    breakage_start: i32,
    soil_height_above_ground: i32,
    sprite_index: usize,
    display_name: String,
    neighbours: [Axis; 4],
    held: Option<Item>,
    soil: Soil,
    bush: Option<Bush>,
    held_shake_ms: u32,
}

impl GardenBed {
    /// Create a bed of `variant` (or the default variant) at `tile`.
    ///
    /// The breakage timer starts at the variant's full lifetime.
    pub fn new(
        ctx: &BedContext<'_>,
        variant: Option<&str>,
        tile: TilePos,
        watered: bool,
    ) -> Result<Self, UnknownVariant> {
        let mut bed = Self {
            variant: String::new(),
            tile,
            breakage_timer: 0,
            breakage_start: 0,
            soil_height_above_ground: 0,
            sprite_index: 0,
            display_name: String::new(),
            neighbours: NO_NEIGHBOURS,
            held: None,
            soil: Soil {
                watered,
                ..Soil::default()
            },
            bush: None,
            held_shake_ms: 0,
        };
        bed.set_variant(ctx, variant)?;
        bed.breakage_timer = bed.breakage_start;
        Ok(bed)
    }

    /// Reload every variant-derived field.
    ///
    /// With an explicit key the bed switches to it and keeps its timer. Without
    /// one it keeps its current variant (or takes the default) and the timer
    /// restarts.
    pub fn set_variant(
        &mut self,
        ctx: &BedContext<'_>,
        variant: Option<&str>,
    ) -> Result<(), UnknownVariant> {
        let reset_breakage = variant.is_none();
        let key = match variant {
            Some(key) => key.to_string(),
            None if !self.variant.is_empty() => self.variant.clone(),
            None => match ctx.registry.default_key(ctx.preferred_prefix) {
                Some(key) => key.to_string(),
                None => {
                    warn!(tile = %self.tile, "Did not set garden bed variant: no variants loaded");
                    return Err(UnknownVariant(String::new()));
                }
            },
        };
        let def = ctx.registry.get(&key)?;
        self.soil_height_above_ground = def.soil_height_above_ground;
        self.breakage_start = def.days_to_break;
        self.sprite_index = def.sprite_index;
        self.display_name = ctx.registry.display_name(&key, ctx.translations)?;
        self.variant = key;
        if reset_breakage {
            self.breakage_timer = self.breakage_start;
        }
        Ok(())
    }

    /// Variant key.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Tile the bed stands on.
    pub fn tile(&self) -> TilePos {
        self.tile
    }

    /// Translated name of the variant.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Row of the variant in the combined spritesheet.
    pub fn sprite_index(&self) -> usize {
        self.sprite_index
    }

    /// Soil offset above the tile in sprite pixels.
    pub fn soil_height_above_ground(&self) -> i32 {
        self.soil_height_above_ground
    }

    /// Days left before the bed is ready to break.
    pub fn breakage_timer(&self) -> i32 {
        self.breakage_timer
    }

    /// Overwrite the breakage timer, as when loading a save.
    pub fn set_breakage_timer(&mut self, timer: i32) {
        self.breakage_timer = timer;
    }

    /// Lifetime of the variant in days.
    pub fn breakage_start(&self) -> i32 {
        self.breakage_start
    }

    /// Corner flags from the last adjacency pass.
    pub fn neighbours(&self) -> [Axis; 4] {
        self.neighbours
    }

    pub(crate) fn set_neighbours(&mut self, neighbours: [Axis; 4]) {
        self.neighbours = neighbours;
    }

    /// Sub-object sitting in the bed, such as a sprinkler.
    pub fn held(&self) -> Option<&Item> {
        self.held.as_ref()
    }

    /// Soil state.
    pub fn soil(&self) -> &Soil {
        &self.soil
    }

    /// Mutable soil state.
    pub fn soil_mut(&mut self) -> &mut Soil {
        &mut self.soil
    }

    /// Bush growing in the bed.
    pub fn bush(&self) -> Option<&Bush> {
        self.bush.as_ref()
    }

    /// Remaining shake time of the held object in milliseconds.
    pub fn held_shake_ms(&self) -> u32 {
        self.held_shake_ms
    }

    /// Whether this variant ages at all under `config`.
    pub fn breakage_enabled(&self, config: &GardenConfig) -> bool {
        config.raised_beds_may_break_with_age && self.breakage_start > 0
    }

    /// Current ageing state.
    pub fn breakage_state(&self, config: &GardenConfig) -> BreakageState {
        BreakageState::from_timer(self.breakage_timer, self.breakage_enabled(config))
    }

    /// Whether the bed is broken.
    pub fn is_broken(&self, config: &GardenConfig) -> bool {
        self.breakage_state(config).is_broken()
    }

    /// Whether the next sweep will break the bed.
    pub fn is_ready_to_break(&self, config: &GardenConfig) -> bool {
        self.breakage_state(config) == BreakageState::ReadyToBreak
    }

    /// Mark the bed broken.
    pub fn break_bed(&mut self) {
        self.breakage_timer = BREAKAGE_DEFINITE;
    }

    /// Restore the bed to a full lifetime.
    pub fn unbreak(&mut self) {
        self.breakage_timer = self.breakage_start;
    }

    /// Whether nothing blocks placing into the bed. `ignore_objects` and
    /// `ignore_crops` skip the held-object and crop/bush checks.
    pub fn is_open_for_placement(
        &self,
        config: &GardenConfig,
        ignore_crops: bool,
        ignore_objects: bool,
    ) -> bool {
        let objects_clear = ignore_objects || self.held.is_none();
        let crops_clear = ignore_crops || (self.soil.crop.is_none() && self.bush.is_none());
        !self.is_broken(config) && objects_clear && crops_clear
    }

    /// Whether the bed holds a sprinkler.
    pub fn is_holding_sprinkler(&self) -> bool {
        self.held.as_ref().is_some_and(Item::is_sprinkler)
    }

    /// Radius of the held sprinkler, or -1 without one.
    pub fn sprinkler_radius(&self) -> i32 {
        self.held.as_ref().map_or(-1, Item::sprinkler_radius)
    }

    /// Tiles the held sprinkler waters.
    pub fn sprinkler_tiles(&self) -> Vec<TilePos> {
        sprinkler_tiles(self.tile, self.sprinkler_radius())
    }

    /// Put a single copy of `item` into the bed.
    pub fn hold(&mut self, item: &Item) {
        self.held = Some(item.clone());
    }

    /// Try to empty the bed.
    ///
    /// When popping, a ripe crop is harvested and the held object ejected.
    /// Otherwise the held object only shakes. The bed is cleared when
    /// something was released or nothing was there.
    pub fn toss_held_item(&mut self, pop: bool) -> Toss {
        let mut toss = Toss::default();
        if pop {
            if let Some(produce) = self.soil.harvest() {
                toss.released.push(produce);
            }
        }
        if let Some(held) = self.held.take() {
            if pop {
                toss.released.push(held);
            } else {
                self.held = Some(held);
                self.held_shake_ms = SHAKE_DURATION;
            }
        }
        toss.cleared =
            !toss.released.is_empty() || (self.soil.crop.is_none() && self.held.is_none());
        toss
    }

    /// Mark the soil watered.
    pub fn water(&mut self) {
        self.soil.watered = true;
    }

    /// Advance shake timers by `elapsed_ms`.
    pub fn update(&mut self, elapsed_ms: u32) {
        self.held_shake_ms = self.held_shake_ms.saturating_sub(elapsed_ms);
    }

    /// Overnight update for one bed.
    pub fn day_update(
        &mut self,
        config: &GardenConfig,
        outdoors: bool,
        raining_here: bool,
    ) -> DayOutcome {
        let mut outcome = DayOutcome::default();
        let broken = self.is_broken(config);
        if self.breakage_enabled(config) {
            if !broken {
                self.breakage_timer -= 1;
            }
        } else if self.breakage_timer <= BREAKAGE_DEFINITE {
            self.unbreak();
            outcome.repaired = true;
        }

        let radius = self.sprinkler_radius();
        if !self.is_broken(config)
            && config.sprinklers_enabled
            && self.is_holding_sprinkler()
            && radius >= 0
            && (!raining_here || !outdoors)
        {
            outcome.sprinkler_tiles = sprinkler_tiles(self.tile, radius);
        }

        self.soil.day_update(broken);
        if let Some(bush) = self.bush.as_mut() {
            bush.age_days += 1;
        }
        outcome
    }

    /// Whether `item` stacks with this bed: a bed item of the same variant.
    pub fn can_stack_with(&self, item: &Item) -> bool {
        matches!(item, Item::GardenBed { variant } if *variant == self.variant)
    }

    /// A fresh inventory item of this variant.
    pub fn get_one(&self) -> Item {
        Item::GardenBed {
            variant: self.variant.clone(),
        }
    }

    pub(crate) fn plant_bush(&mut self, sapling_id: i32) {
        self.bush = Some(Bush {
            sapling_id,
            age_days: 0,
        });
    }

    pub(crate) fn restore_contents(
        &mut self,
        held: Option<Item>,
        soil: Soil,
        bush: Option<Bush>,
    ) {
        self.held = held;
        self.soil = soil;
        self.bush = bush;
    }
}

/// Tiles watered by a sprinkler of `radius` at `origin`.
///
/// Radius 0 covers the four orthogonal tiles; larger radii cover the whole
/// square except the centre. Negative radii water nothing.
pub fn sprinkler_tiles(origin: TilePos, radius: i32) -> Vec<TilePos> {
    match radius {
        r if r < 0 => Vec::new(),
        0 => vec![
            origin.offset(0, -1),
            origin.offset(1, 0),
            origin.offset(0, 1),
            origin.offset(-1, 0),
        ],
        r => (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| (dx, dy) != (0, 0))
            .map(|(dx, dy)| origin.offset(dx, dy))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;

    fn fresh(variant: &str) -> (crate::test_support::Fixture, GardenBed) {
        let fx = context();
        let bed = GardenBed::new(&fx.ctx(), Some(variant), TilePos::new(3, 3), false).unwrap();
        (fx, bed)
    }

    #[test]
    fn new_bed_takes_variant_fields() {
        let (_fx, bed) = fresh("stone");
        assert_eq!(bed.variant(), "stone");
        assert_eq!(bed.sprite_index(), 1);
        assert_eq!(bed.breakage_timer(), 112);
        assert_eq!(bed.display_name(), "Stone Raised Bed");
        assert_eq!(bed.neighbours(), NO_NEIGHBOURS);
    }

    #[test]
    fn default_variant_prefers_namespace() {
        let fx = context();
        let bed = GardenBed::new(&fx.ctx(), None, TilePos::new(0, 1), false).unwrap();
        assert_eq!(bed.variant(), "wood");
        let unknown = GardenBed::new(&fx.ctx(), Some("gold"), TilePos::new(0, 1), false);
        assert_eq!(unknown.unwrap_err(), UnknownVariant("gold".into()));
    }

    #[test]
    fn set_variant_resets_timer_only_without_key() {
        let (fx, mut bed) = fresh("wood");
        bed.set_breakage_timer(5);
        bed.set_variant(&fx.ctx(), Some("stone")).unwrap();
        assert_eq!(bed.breakage_timer(), 5);
        assert_eq!(bed.soil_height_above_ground(), 2);
        bed.set_variant(&fx.ctx(), None).unwrap();
        assert_eq!(bed.variant(), "stone");
        assert_eq!(bed.breakage_timer(), 112);
    }

    #[test]
    fn day_update_ages_and_holds_when_broken() {
        let (fx, mut bed) = fresh("wood");
        bed.day_update(&fx.config, true, false);
        assert_eq!(bed.breakage_timer(), 55);

        bed.break_bed();
        bed.day_update(&fx.config, true, false);
        assert_eq!(bed.breakage_timer(), BREAKAGE_DEFINITE);
        assert!(bed.is_broken(&fx.config));
    }

    #[test]
    fn disabling_breakage_repairs_broken_beds() {
        let (mut fx, mut bed) = fresh("wood");
        bed.break_bed();
        fx.config.raised_beds_may_break_with_age = false;
        assert!(!bed.is_broken(&fx.config));
        let outcome = bed.day_update(&fx.config, true, false);
        assert!(outcome.repaired);
        assert_eq!(bed.breakage_timer(), 56);
    }

    #[test]
    fn variant_without_lifetime_never_ages() {
        let (fx, mut bed) = fresh("hardwood");
        bed.day_update(&fx.config, true, false);
        assert_eq!(bed.breakage_timer(), 0);
        assert_eq!(bed.breakage_state(&fx.config), BreakageState::Healthy);
    }

    #[test]
    fn toss_without_pop_shakes_held_object() {
        let (_fx, mut bed) = fresh("wood");
        assert!(bed.toss_held_item(false).cleared);

        let sprinkler = Item::Sprinkler { id: 599, radius: 0 };
        bed.hold(&sprinkler);
        let toss = bed.toss_held_item(false);
        assert!(!toss.cleared);
        assert_eq!(bed.held_shake_ms(), SHAKE_DURATION);
        bed.update(120);
        assert_eq!(bed.held_shake_ms(), 180);

        let toss = bed.toss_held_item(true);
        assert!(toss.cleared);
        assert_eq!(toss.released, vec![sprinkler]);
        assert!(bed.held().is_none());
    }

    #[test]
    fn sprinkler_waters_only_when_enabled_and_dry() {
        let (mut fx, mut bed) = fresh("wood");
        bed.hold(&Item::Sprinkler { id: 599, radius: 0 });
        assert!(bed.day_update(&fx.config, true, false).sprinkler_tiles.is_empty());

        fx.config.sprinklers_enabled = true;
        assert_eq!(bed.day_update(&fx.config, true, false).sprinkler_tiles.len(), 4);
        assert!(bed.day_update(&fx.config, true, true).sprinkler_tiles.is_empty());
        assert_eq!(bed.day_update(&fx.config, false, true).sprinkler_tiles.len(), 4);
    }

    #[test]
    fn sprinkler_tile_shapes() {
        let origin = TilePos::new(5, 5);
        let cross = sprinkler_tiles(origin, 0);
        assert_eq!(cross.len(), 4);
        assert!(cross.contains(&TilePos::new(5, 4)));
        assert!(!cross.contains(&origin));
        let square = sprinkler_tiles(origin, 2);
        assert_eq!(square.len(), 24);
        assert!(!square.contains(&origin));
        assert!(sprinkler_tiles(origin, -1).is_empty());
    }

    #[test]
    fn stacking_by_variant() {
        let (_fx, bed) = fresh("wood");
        assert!(bed.can_stack_with(&bed.get_one()));
        assert!(!bed.can_stack_with(&Item::GardenBed {
            variant: "stone".into()
        }));
        assert!(!bed.can_stack_with(&Item::Fertilizer { id: 368 }));
    }
}
