use anyhow::{ensure, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use raised_beds_assets::VariantRegistry;
use raised_beds_core::{GardenConfig, Item, TilePos, Tool, ToolKind, Translations};
use raised_beds_world::{
    BedContext, DropInEffect, Location, LocationKind, ToolEffect, World, FARM, FARM_HOUSE,
    GREENHOUSE,
};
use serde::Serialize;
use tracing::{debug, info};

/// Beds per horizontal run when laying out the farm.
const RUN_LENGTH: i32 = 4;

pub struct SimulationOptions {
    pub days: u32,
    pub seed: u64,
    pub beds: u32,
    /// Chance of rain per day, 0.0 to 1.0.
    pub rain_chance: f64,
    /// Chance that a broken bed is repaired rather than smashed.
    pub repair_chance: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    pub days: u32,
    pub placed: u32,
    pub rainy_days: u32,
    pub broken: u32,
    pub repaired: u32,
    pub destroyed: u32,
    pub planted: u32,
    pub remaining: u32,
}

fn build_world(config: &GardenConfig) -> World {
    let mut world = World::new();
    world.add_location(Location::new(FARM, LocationKind::Farm, 64, 48));
    if config.can_be_placed_in_green_house {
        world.add_location(Location::new(GREENHOUSE, LocationKind::Greenhouse, 16, 16));
    }
    if config.can_be_placed_in_farm_house {
        world.add_location(Location::new(FARM_HOUSE, LocationKind::FarmHouse, 12, 12));
    }
    world
}

fn layout_tile(index: i32) -> TilePos {
    let run = index / RUN_LENGTH;
    TilePos::new(4 + index % RUN_LENGTH + (run % 4) * (RUN_LENGTH + 2), 4 + (run / 4) * 3)
}

fn sample_seed() -> Item {
    Item::Seed {
        id: 472,
        phase_days: vec![1, 1, 2, 2],
        harvest_id: 24,
    }
}

/// Run a headless farm for `options.days` days and report what happened.
pub fn run(
    options: &SimulationOptions,
    registry: &VariantRegistry,
    translations: &dyn Translations,
    config: &GardenConfig,
) -> Result<SimulationSummary> {
    let ctx = BedContext::new(registry, config, translations);
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut world = build_world(config);
    let mut summary = SimulationSummary::default();

    let variants: Vec<String> = registry.keys().map(str::to_string).collect();
    ensure!(!variants.is_empty(), "no garden bed variants loaded");
    let farm = world
        .location_mut(FARM)
        .context("farm location missing")?;
    for index in 0..options.beds {
        let index = i32::try_from(index).context("too many beds")?;
        let variant = &variants[rng.gen_range(0..variants.len())];
        let tile = layout_tile(index);
        match farm.place_bed(&ctx, variant, tile) {
            Ok(()) => summary.placed += 1,
            Err(err) => debug!(%tile, error = %err, "Skipped bed placement"),
        }
    }
    info!(placed = summary.placed, "Laid out farm");

    let watering_can = Tool::new(ToolKind::WateringCan);
    let pickaxe = Tool::new(ToolKind::Pickaxe);
    for _ in 0..options.days {
        let day = world.day();
        let raining = rng.gen_bool(options.rain_chance.clamp(0.0, 1.0));
        world.set_raining(raining);
        if raining {
            summary.rainy_days += 1;
        }

        let farm = world
            .location_mut(FARM)
            .context("farm location missing")?;
        for tile in farm.bed_tiles() {
            let Some(bed) = farm.bed(tile) else {
                continue;
            };
            if bed.is_broken(config) {
                if rng.gen_bool(options.repair_chance.clamp(0.0, 1.0)) {
                    let item = bed.get_one();
                    if farm.drop_in(tile, &item, false, &ctx) == DropInEffect::Repaired {
                        summary.repaired += 1;
                        info!(day = day.0, %tile, "Repaired garden bed");
                    }
                } else if let ToolEffect::Destroyed { refund, .. } =
                    farm.hit_with_tool(tile, &pickaxe, &ctx)
                {
                    summary.destroyed += 1;
                    info!(day = day.0, %tile, ?refund, "Smashed broken garden bed");
                }
                continue;
            }
            if farm.drop_in(tile, &sample_seed(), false, &ctx) == DropInEffect::Planted {
                summary.planted += 1;
            }
            if !raining {
                farm.hit_with_tool(tile, &watering_can, &ctx);
            }
        }
        farm.take_debris();

        world.tick(config, 16);
        let broken_before = count_broken(&world, config);
        world.advance_day(&ctx);
        let broken_after = count_broken(&world, config);
        if broken_after > broken_before {
            summary.broken += u32::try_from(broken_after - broken_before).unwrap_or(u32::MAX);
        }
        summary.days += 1;
    }

    summary.remaining = u32::try_from(world.locations().map(|l| l.beds().count()).sum::<usize>())
        .unwrap_or(u32::MAX);
    info!(?summary, "Simulation finished");
    Ok(summary)
}

fn count_broken(world: &World, config: &GardenConfig) -> usize {
    world
        .locations()
        .flat_map(Location::beds)
        .filter(|bed| bed.is_broken(config))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use raised_beds_testkit::{sample_registry, sample_translations};

    fn options(seed: u64) -> SimulationOptions {
        SimulationOptions {
            days: 60,
            seed,
            beds: 12,
            rain_chance: 0.2,
            repair_chance: 0.5,
        }
    }

    #[test]
    fn simulation_is_deterministic_per_seed() {
        let registry = sample_registry().unwrap();
        let translations = sample_translations();
        let config = GardenConfig::default();
        let first = run(&options(9), &registry, &translations, &config).unwrap();
        let second = run(&options(9), &registry, &translations, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.placed, 12);
        assert_eq!(first.days, 60);
        assert_eq!(first.remaining, first.placed - first.destroyed);
    }

    #[test]
    fn disabled_breakage_keeps_every_bed() {
        let registry = sample_registry().unwrap();
        let translations = sample_translations();
        let config = GardenConfig {
            raised_beds_may_break_with_age: false,
            ..GardenConfig::default()
        };
        let summary = run(&options(3), &registry, &translations, &config).unwrap();
        assert_eq!(summary.broken, 0);
        assert_eq!(summary.destroyed, 0);
        assert_eq!(summary.repaired, 0);
        assert_eq!(summary.remaining, summary.placed);
    }

    #[test]
    fn rain_chance_is_clamped() {
        let registry = sample_registry().unwrap();
        let translations = sample_translations();
        let config = GardenConfig::default();
        let mut always = options(1);
        always.rain_chance = 4.0;
        always.days = 10;
        let summary = run(&always, &registry, &translations, &config).unwrap();
        assert_eq!(summary.rainy_days, 10);
    }
}
