//! The set of locations beds can live in, plus the tick and day-boundary
//! entry points the host drives.

use std::collections::BTreeMap;

use raised_beds_core::{GameDay, GardenConfig, TilePos};
use tracing::{debug, info, warn};

use crate::adjacency;
use crate::bed::{BedContext, GardenBed};
use crate::location::{Location, LocationKind};
use crate::scheduler::{AdjustTarget, DeferredAdjust};

/// Name of the main farm map.
pub const FARM: &str = "Farm";
/// Name of the farmhouse.
pub const FARM_HOUSE: &str = "FarmHouse";
/// Name of the island farmhouse.
pub const ISLAND_FARM_HOUSE: &str = "IslandFarmHouse";
/// Name of the greenhouse.
pub const GREENHOUSE: &str = "Greenhouse";

/// All loaded locations and the shared clock.
#[derive(Debug, Clone, Default)]
pub struct World {
    locations: BTreeMap<String, Location>,
    day: GameDay,
    raining: bool,
    deferred: DeferredAdjust,
}

impl World {
    /// Empty world on day zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a location, keyed by its name.
    pub fn add_location(&mut self, mut location: Location) -> Option<Location> {
        location.set_raining(self.raining);
        self.locations.insert(location.name().to_string(), location)
    }

    /// Location by name.
    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    /// Mutable location by name.
    pub fn location_mut(&mut self, name: &str) -> Option<&mut Location> {
        self.locations.get_mut(name)
    }

    /// All locations in name order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// Current day.
    pub fn day(&self) -> GameDay {
        self.day
    }

    /// Whether it is raining today.
    pub fn is_raining(&self) -> bool {
        self.raining
    }

    /// Set today's weather everywhere.
    pub fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
        for location in self.locations.values_mut() {
            location.set_raining(raining);
        }
    }

    /// Pending deferred adjacency pass.
    pub fn deferred(&self) -> &DeferredAdjust {
        &self.deferred
    }

    /// Locations beds may exist in under `config`.
    ///
    /// Order: farm, farmhouses, greenhouse, then building interiors.
    pub fn valid_locations(&self, config: &GardenConfig) -> Vec<&str> {
        let mut names = Vec::new();
        let mut push = |name: &str| {
            if let Some(location) = self.locations.get(name) {
                names.push(location.name());
            }
        };
        push(FARM);
        if config.can_be_placed_in_farm_house {
            push(FARM_HOUSE);
            push(ISLAND_FARM_HOUSE);
        }
        if config.can_be_placed_in_green_house {
            push(GREENHOUSE);
        }
        if config.can_be_placed_in_buildings {
            names.extend(
                self.locations
                    .values()
                    .filter(|location| location.kind() == LocationKind::BuildingInterior)
                    .map(Location::name),
            );
        }
        names
    }

    fn resolve(&self, target: &AdjustTarget, config: &GardenConfig) -> Vec<String> {
        match target {
            AdjustTarget::Location(name) => vec![name.clone()],
            AdjustTarget::All => self
                .valid_locations(config)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Recompute neighbour flags in `target`.
    pub fn adjust_all(&mut self, target: &AdjustTarget, config: &GardenConfig) {
        for name in self.resolve(target, config) {
            match self.locations.get_mut(&name) {
                Some(location) => adjacency::adjust_all(location, config),
                None => debug!(location = %name, "Skipped adjacency pass for unloaded location"),
            }
        }
    }

    /// Reapply variant data to every bed in `target`, after a registry reload.
    pub fn reset_all(&mut self, target: &AdjustTarget, ctx: &BedContext<'_>) {
        for name in self.resolve(target, ctx.config) {
            let Some(location) = self.locations.get_mut(&name) else {
                continue;
            };
            for bed in location.beds_mut() {
                if let Err(err) = bed.set_variant(ctx, None) {
                    warn!(location = %name, tile = %bed.tile(), error = %err, "Failed to reset garden bed");
                }
            }
        }
    }

    /// Break every bed in `target` that is ready to break, then reconnect each
    /// location once. Returns the number of beds broken.
    pub fn break_all(&mut self, target: &AdjustTarget, config: &GardenConfig) -> usize {
        let mut broken = 0;
        for name in self.resolve(target, config) {
            let Some(location) = self.locations.get_mut(&name) else {
                continue;
            };
            let before = broken;
            for bed in location.beds_mut() {
                if bed.is_ready_to_break(config) {
                    bed.break_bed();
                    broken += 1;
                }
            }
            if broken > before {
                adjacency::adjust_all(location, config);
            }
        }
        if broken > 0 {
            info!(broken, "Garden beds broke with age");
        }
        broken
    }

    /// Schedule an adjacency pass for the next tick.
    pub fn request_adjust(&mut self, target: AdjustTarget) {
        self.deferred.request(target);
    }

    /// Remove the bed on `tile` in `location`, deferring the reconnect.
    pub fn remove_bed(&mut self, location: &str, tile: TilePos) -> Option<GardenBed> {
        self.locations
            .get_mut(location)?
            .remove_bed(tile, &mut self.deferred)
    }

    /// Per-frame update. Drains the deferred adjacency pass, if any, and
    /// returns the target it ran on.
    pub fn tick(&mut self, config: &GardenConfig, elapsed_ms: u32) -> Option<AdjustTarget> {
        for location in self.locations.values_mut() {
            location.update(elapsed_ms);
        }
        let target = self.deferred.take()?;
        self.adjust_all(&target, config);
        Some(target)
    }

    /// End the current day.
    ///
    /// On the last day of a season ready beds break first, then every
    /// location runs its overnight update and the clock moves on.
    pub fn advance_day(&mut self, ctx: &BedContext<'_>) {
        let config = ctx.config;
        if self.day.is_season_end() && config.raised_beds_may_break_with_age {
            self.break_all(&AdjustTarget::All, config);
        }
        for location in self.locations.values_mut() {
            location.day_update(config);
        }
        self.day = self.day.advance(1);
        debug!(day = self.day.0, "Advanced day");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, place};

    fn world() -> World {
        let mut world = World::new();
        world.add_location(Location::new(FARM, LocationKind::Farm, 16, 16));
        world.add_location(Location::new(FARM_HOUSE, LocationKind::FarmHouse, 8, 8));
        world.add_location(Location::new(GREENHOUSE, LocationKind::Greenhouse, 8, 8));
        world.add_location(Location::new("Barn", LocationKind::BuildingInterior, 8, 8));
        world
    }

    #[test]
    fn valid_locations_follow_config() {
        let fx = context();
        let world = world();
        assert_eq!(world.valid_locations(&fx.config), vec![FARM, GREENHOUSE]);

        let mut config = fx.config.clone();
        config.can_be_placed_in_farm_house = true;
        config.can_be_placed_in_buildings = true;
        config.can_be_placed_in_green_house = false;
        assert_eq!(world.valid_locations(&config), vec![FARM, FARM_HOUSE, "Barn"]);
    }

    #[test]
    fn tick_drains_deferred_once() {
        let fx = context();
        let mut world = world();
        world.request_adjust(AdjustTarget::Location(FARM.into()));
        world.request_adjust(AdjustTarget::All);
        assert_eq!(world.tick(&fx.config, 16), Some(AdjustTarget::All));
        assert_eq!(world.tick(&fx.config, 16), None);
    }

    #[test]
    fn season_end_breaks_ready_beds() {
        let fx = context();
        let mut world = world();
        let farm = world.location_mut(FARM).unwrap();
        place(farm, &fx, "wood", TilePos::new(2, 2));
        place(farm, &fx, "wood", TilePos::new(2, 3));
        farm.bed_mut(TilePos::new(2, 2)).unwrap().set_breakage_timer(0);
        adjacency::adjust_all(farm, &fx.config);

        for _ in 0..27 {
            world.advance_day(&fx.ctx());
        }
        let farm = world.location(FARM).unwrap();
        assert!(!farm.bed(TilePos::new(2, 2)).unwrap().is_broken(&fx.config));

        world.advance_day(&fx.ctx());
        let farm = world.location(FARM).unwrap();
        assert!(farm.bed(TilePos::new(2, 2)).unwrap().is_broken(&fx.config));
        assert!(farm.bed(TilePos::new(2, 3)).unwrap().neighbours()[0].is_empty());
    }

    #[test]
    fn reset_restarts_timers() {
        let fx = context();
        let mut world = world();
        let farm = world.location_mut(FARM).unwrap();
        place(farm, &fx, "stone", TilePos::new(1, 1));
        farm.bed_mut(TilePos::new(1, 1)).unwrap().set_breakage_timer(5);
        world.reset_all(&AdjustTarget::All, &fx.ctx());
        let bed = world.location(FARM).unwrap().bed(TilePos::new(1, 1)).unwrap();
        assert_eq!(bed.breakage_timer(), 112);
    }

    #[test]
    fn removal_is_reconnected_on_next_tick() {
        let fx = context();
        let mut world = world();
        let farm = world.location_mut(FARM).unwrap();
        place(farm, &fx, "wood", TilePos::new(2, 2));
        place(farm, &fx, "wood", TilePos::new(3, 2));
        adjacency::adjust_all(farm, &fx.config);

        assert!(world.remove_bed(FARM, TilePos::new(3, 2)).is_some());
        let flags = |world: &World| {
            world
                .location(FARM)
                .unwrap()
                .bed(TilePos::new(2, 2))
                .unwrap()
                .neighbours()
        };
        assert_eq!(flags(&world)[1], adjacency::Axis::HORIZONTAL);
        world.tick(&fx.config, 16);
        assert_eq!(flags(&world), adjacency::NO_NEIGHBOURS);
    }
}
