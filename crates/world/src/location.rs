//! A map holding placed objects, terrain and obstructions, keyed by tile.

use std::collections::{BTreeMap, BTreeSet};

use raised_beds_core::{GardenConfig, Item, TilePos};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adjacency;
use crate::bed::GardenBed;
use crate::soil::Soil;

/// Broad classes of location, as far as bed placement cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    /// The outdoor farm.
    Farm,
    /// The player's farmhouse.
    FarmHouse,
    /// The island farmhouse.
    IslandFarmHouse,
    /// The greenhouse.
    Greenhouse,
    /// Interior of a farm building (barn, shed...).
    BuildingInterior,
    /// Any other outdoor map.
    Outdoors,
    /// Any other indoor map.
    Indoors,
}

impl LocationKind {
    /// Whether weather reaches the location.
    pub fn is_outdoors(self) -> bool {
        matches!(self, LocationKind::Farm | LocationKind::Outdoors)
    }
}

/// Something occupying a tile's object layer.
#[derive(Debug, Clone, PartialEq)]
pub enum TileObject {
    /// A garden bed.
    Bed(GardenBed),
    /// Any other placed object (chest, scarecrow...).
    Other {
        /// Object name.
        name: String,
    },
}

/// Ground-level features under the object layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainFeature {
    /// Paths and floors; beds may be placed on top.
    Flooring,
    /// Tilled ground.
    Soil(Soil),
    /// Long grass.
    Grass,
}

/// A stump or boulder covering a rectangle of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceClump {
    /// Top-left tile.
    pub origin: TilePos,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
}

impl ResourceClump {
    /// Whether the clump covers `tile`.
    pub fn occupies_tile(&self, tile: TilePos) -> bool {
        tile.x >= self.origin.x
            && tile.x < self.origin.x + self.width
            && tile.y >= self.origin.y
            && tile.y < self.origin.y + self.height
    }
}

/// An item lying on the ground, waiting to be collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debris {
    /// What dropped.
    pub item: Item,
    /// Where it dropped.
    pub tile: TilePos,
}

/// One map.
#[derive(Debug, Clone)]
pub struct Location {
    name: String,
    kind: LocationKind,
    width: i32,
    height: i32,
    temporary: bool,
    raining: bool,
    objects: BTreeMap<TilePos, TileObject>,
    terrain: BTreeMap<TilePos, TerrainFeature>,
    large_foliage: BTreeSet<TilePos>,
    resource_clumps: Vec<ResourceClump>,
    blocked: BTreeSet<TilePos>,
    debris: Vec<Debris>,
}

impl Location {
    /// Empty map of `width` x `height` tiles.
    pub fn new(name: impl Into<String>, kind: LocationKind, width: i32, height: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            width,
            height,
            temporary: false,
            raining: false,
            objects: BTreeMap::new(),
            terrain: BTreeMap::new(),
            large_foliage: BTreeSet::new(),
            resource_clumps: Vec::new(),
            blocked: BTreeSet::new(),
            debris: Vec::new(),
        }
    }

    /// Mark the map as a temporary instance (festival maps, cutscenes).
    pub fn into_temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Map class.
    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    /// Whether weather reaches the map.
    pub fn is_outdoors(&self) -> bool {
        self.kind.is_outdoors()
    }

    /// Whether this is a temporary instance.
    pub fn is_temp(&self) -> bool {
        self.temporary
    }

    /// Map size in tiles.
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Whether `tile` lies on the map.
    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    /// Set today's weather.
    pub fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
    }

    /// Whether it is raining on this map.
    pub fn is_raining_here(&self) -> bool {
        self.raining && self.is_outdoors()
    }

    /// Object on `tile`.
    pub fn object_at(&self, tile: TilePos) -> Option<&TileObject> {
        self.objects.get(&tile)
    }

    /// Bed on `tile`.
    pub fn bed(&self, tile: TilePos) -> Option<&GardenBed> {
        match self.objects.get(&tile) {
            Some(TileObject::Bed(bed)) => Some(bed),
            _ => None,
        }
    }

    /// Mutable bed on `tile`.
    pub fn bed_mut(&mut self, tile: TilePos) -> Option<&mut GardenBed> {
        match self.objects.get_mut(&tile) {
            Some(TileObject::Bed(bed)) => Some(bed),
            _ => None,
        }
    }

    /// Tiles holding beds, top to bottom.
    pub fn bed_tiles(&self) -> Vec<TilePos> {
        self.beds().map(GardenBed::tile).collect()
    }

    /// Beds on the map, top to bottom.
    pub fn beds(&self) -> impl Iterator<Item = &GardenBed> {
        self.objects.values().filter_map(|object| match object {
            TileObject::Bed(bed) => Some(bed),
            TileObject::Other { .. } => None,
        })
    }

    /// Mutable beds on the map, top to bottom.
    pub fn beds_mut(&mut self) -> impl Iterator<Item = &mut GardenBed> {
        self.objects.values_mut().filter_map(|object| match object {
            TileObject::Bed(bed) => Some(bed),
            TileObject::Other { .. } => None,
        })
    }

    /// Put `object` on `tile`, returning what was there.
    pub fn insert_object(&mut self, tile: TilePos, object: TileObject) -> Option<TileObject> {
        self.objects.insert(tile, object)
    }

    /// Take the object off `tile` with no further bookkeeping.
    pub fn take_object(&mut self, tile: TilePos) -> Option<TileObject> {
        self.objects.remove(&tile)
    }

    /// Ground feature on `tile`.
    pub fn terrain_at(&self, tile: TilePos) -> Option<&TerrainFeature> {
        self.terrain.get(&tile)
    }

    /// Replace the ground feature on `tile`.
    pub fn set_terrain(&mut self, tile: TilePos, feature: TerrainFeature) {
        self.terrain.insert(tile, feature);
    }

    /// Add a bush or tree that covers `tile`.
    pub fn add_large_foliage(&mut self, tile: TilePos) {
        self.large_foliage.insert(tile);
    }

    /// Whether large foliage covers `tile`.
    pub fn has_large_foliage(&self, tile: TilePos) -> bool {
        self.large_foliage.contains(&tile)
    }

    /// Add a stump or boulder.
    pub fn add_resource_clump(&mut self, clump: ResourceClump) {
        self.resource_clumps.push(clump);
    }

    /// Whether a stump or boulder covers `tile`.
    pub fn has_resource_clump(&self, tile: TilePos) -> bool {
        self.resource_clumps.iter().any(|c| c.occupies_tile(tile))
    }

    /// Mark `tile` impassable in the map itself (walls, water, cliffs).
    pub fn block_tile(&mut self, tile: TilePos) {
        self.blocked.insert(tile);
    }

    /// Whether the map tile is free of collision, ignoring floors.
    pub fn is_tile_clear(&self, tile: TilePos) -> bool {
        self.contains(tile) && !self.blocked.contains(&tile)
    }

    /// Drop `item` on the ground at `tile`.
    pub fn drop_debris(&mut self, item: Item, tile: TilePos) {
        self.debris.push(Debris { item, tile });
    }

    /// Items lying on the ground.
    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    /// Collect every item lying on the ground.
    pub fn take_debris(&mut self) -> Vec<Debris> {
        std::mem::take(&mut self.debris)
    }

    /// Water a bed or tilled soil on `tile`. Returns whether anything was watered.
    pub fn water_tile(&mut self, tile: TilePos) -> bool {
        if let Some(bed) = self.bed_mut(tile) {
            bed.water();
            return true;
        }
        if let Some(TerrainFeature::Soil(soil)) = self.terrain.get_mut(&tile) {
            soil.watered = true;
            return true;
        }
        false
    }

    /// Advance every bed by `elapsed_ms`.
    pub fn update(&mut self, elapsed_ms: u32) {
        for bed in self.beds_mut() {
            bed.update(elapsed_ms);
        }
    }

    /// Overnight update for the map.
    ///
    /// Beds age and their soil grows and dries, then held sprinklers water
    /// their tiles, then rain waters everything outdoors.
    pub fn day_update(&mut self, config: &GardenConfig) {
        let outdoors = self.is_outdoors();
        let raining = self.is_raining_here();
        let mut repaired = Vec::new();
        let mut sprinkled = Vec::new();
        for bed in self.beds_mut() {
            let outcome = bed.day_update(config, outdoors, raining);
            if outcome.repaired {
                repaired.push(bed.tile());
            }
            sprinkled.extend(outcome.sprinkler_tiles);
        }
        for feature in self.terrain.values_mut() {
            if let TerrainFeature::Soil(soil) = feature {
                soil.day_update(false);
            }
        }
        for tile in repaired {
            adjacency::adjust_with_neighbours(self, tile, 1, config);
        }
        let watered = sprinkled
            .into_iter()
            .filter(|&tile| self.water_tile(tile))
            .count();
        if watered > 0 {
            debug!(location = %self.name, tiles = watered, "Sprinklers watered overnight");
        }
        if raining {
            for bed in self.beds_mut() {
                bed.water();
            }
            for feature in self.terrain.values_mut() {
                if let TerrainFeature::Soil(soil) = feature {
                    soil.watered = true;
                }
            }
        }
    }
}
