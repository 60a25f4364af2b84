//! Adjacency worldtest scenarios.
//!
//! Places small bed layouts on a farm and checks the corner flags that the
//! adjacency passes produce, including the deferred pass driven by `tick`.

use raised_beds_assets::{TranslationTable, VariantRegistry};
use raised_beds_core::{GardenConfig, TilePos};
use raised_beds_testkit::{sample_registry, sample_translations};
use raised_beds_world::{
    adjust_all, adjust_with_neighbours, AdjustTarget, Axis, BedContext, Location, LocationKind,
    World, FARM, GREENHOUSE, NO_NEIGHBOURS,
};

struct Services {
    registry: VariantRegistry,
    translations: TranslationTable,
    config: GardenConfig,
}

impl Services {
    fn new() -> Self {
        Self {
            registry: sample_registry().expect("sample registry"),
            translations: sample_translations(),
            config: GardenConfig::default(),
        }
    }

    fn ctx(&self) -> BedContext<'_> {
        BedContext::new(&self.registry, &self.config, &self.translations)
    }
}

fn farm_with(services: &Services, beds: &[(&str, TilePos)]) -> Location {
    let mut farm = Location::new(FARM, LocationKind::Farm, 12, 12);
    for &(variant, tile) in beds {
        farm.place_bed(&services.ctx(), variant, tile)
            .expect("tile is placeable");
    }
    farm
}

#[test]
fn vertical_pair_links_facing_corners() {
    let services = Services::new();
    let mut farm = farm_with(
        &services,
        &[("wood", TilePos::new(2, 2)), ("wood", TilePos::new(2, 3))],
    );
    adjust_all(&mut farm, &services.config);

    let top = farm.bed(TilePos::new(2, 2)).unwrap().neighbours();
    let bottom = farm.bed(TilePos::new(2, 3)).unwrap().neighbours();

    // Bottom corners of the upper bed face (2,3).
    assert_eq!(top[2], Axis::VERTICAL);
    assert_eq!(top[3], Axis::VERTICAL);
    assert!(top[0].is_empty() && top[1].is_empty());
    // Top corners of the lower bed face (2,2).
    assert_eq!(bottom[0], Axis::VERTICAL);
    assert_eq!(bottom[1], Axis::VERTICAL);
    assert!(bottom[2].is_empty() && bottom[3].is_empty());
}

#[test]
fn breaking_clears_the_neighbour_link() {
    let services = Services::new();
    let mut farm = farm_with(
        &services,
        &[("wood", TilePos::new(2, 2)), ("wood", TilePos::new(2, 3))],
    );
    assert_eq!(
        farm.bed(TilePos::new(2, 3)).unwrap().neighbours()[0],
        Axis::VERTICAL
    );

    farm.bed_mut(TilePos::new(2, 2)).unwrap().break_bed();
    adjust_with_neighbours(&mut farm, TilePos::new(2, 2), 1, &services.config);

    assert_eq!(farm.bed(TilePos::new(2, 3)).unwrap().neighbours(), NO_NEIGHBOURS);
}

#[test]
fn diagonal_with_horizontal_collapses() {
    let services = Services::new();
    // (2,1) is a different variant, so only the horizontal edge and the diagonal match.
    let mut farm = farm_with(
        &services,
        &[
            ("wood", TilePos::new(2, 2)),
            ("wood", TilePos::new(3, 2)),
            ("wood", TilePos::new(3, 1)),
            ("stone", TilePos::new(2, 1)),
        ],
    );
    adjust_all(&mut farm, &services.config);
    assert_eq!(
        farm.bed(TilePos::new(2, 2)).unwrap().neighbours()[1],
        Axis::HORIZONTAL
    );
}

#[test]
fn diagonal_with_vertical_is_kept() {
    let services = Services::new();
    let mut farm = farm_with(
        &services,
        &[
            ("wood", TilePos::new(2, 2)),
            ("wood", TilePos::new(2, 1)),
            ("wood", TilePos::new(3, 1)),
            ("stone", TilePos::new(3, 2)),
        ],
    );
    adjust_all(&mut farm, &services.config);
    assert_eq!(
        farm.bed(TilePos::new(2, 2)).unwrap().neighbours()[1],
        Axis::VERTICAL | Axis::DIAGONAL
    );
}

#[test]
fn full_square_sets_every_bit_inside() {
    let services = Services::new();
    let mut beds = Vec::new();
    for y in 1..4 {
        for x in 1..4 {
            beds.push(("wood", TilePos::new(x, y)));
        }
    }
    let farm = farm_with(&services, &beds);
    let all = Axis::VERTICAL | Axis::HORIZONTAL | Axis::DIAGONAL;
    assert_eq!(farm.bed(TilePos::new(2, 2)).unwrap().neighbours(), [all; 4]);
}

#[test]
fn deferred_requests_collapse_to_the_last() {
    let services = Services::new();
    let mut world = World::new();
    world.add_location(farm_with(
        &services,
        &[("wood", TilePos::new(2, 2)), ("wood", TilePos::new(3, 2))],
    ));
    let mut greenhouse = Location::new(GREENHOUSE, LocationKind::Greenhouse, 8, 8);
    greenhouse
        .place_bed(&services.ctx(), "wood", TilePos::new(1, 1))
        .unwrap();
    greenhouse
        .place_bed(&services.ctx(), "wood", TilePos::new(1, 2))
        .unwrap();
    world.add_location(greenhouse);

    // Break one bed in each location without reconnecting.
    world
        .location_mut(FARM)
        .unwrap()
        .bed_mut(TilePos::new(3, 2))
        .unwrap()
        .break_bed();
    world
        .location_mut(GREENHOUSE)
        .unwrap()
        .bed_mut(TilePos::new(1, 2))
        .unwrap()
        .break_bed();

    world.request_adjust(AdjustTarget::Location(FARM.into()));
    world.request_adjust(AdjustTarget::All);
    assert_eq!(world.tick(&services.config, 16), Some(AdjustTarget::All));
    assert!(!world.deferred().is_pending());

    let farm_bed = world.location(FARM).unwrap().bed(TilePos::new(2, 2)).unwrap();
    assert_eq!(farm_bed.neighbours(), NO_NEIGHBOURS);
    let greenhouse_bed = world
        .location(GREENHOUSE)
        .unwrap()
        .bed(TilePos::new(1, 1))
        .unwrap();
    assert_eq!(greenhouse_bed.neighbours(), NO_NEIGHBOURS);

    assert_eq!(world.tick(&services.config, 16), None);
}
