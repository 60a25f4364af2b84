use raised_beds_assets::{TranslationTable, VariantRegistry};
use raised_beds_core::{GardenConfig, TilePos};
use raised_beds_testkit::{sample_registry, sample_translations};

use crate::bed::{BedContext, GardenBed};
use crate::location::{Location, TileObject};

pub struct Fixture {
    pub registry: VariantRegistry,
    pub translations: TranslationTable,
    pub config: GardenConfig,
}

impl Fixture {
    pub fn ctx(&self) -> BedContext<'_> {
        BedContext::new(&self.registry, &self.config, &self.translations)
    }
}

pub fn context() -> Fixture {
    Fixture {
        registry: sample_registry().expect("sample registry"),
        translations: sample_translations(),
        config: GardenConfig::default(),
    }
}

/// Insert a bed without placement checks or adjacency passes.
pub fn place(location: &mut Location, fx: &Fixture, variant: &str, tile: TilePos) {
    let bed = GardenBed::new(&fx.ctx(), Some(variant), tile, false).expect("known variant");
    location.insert_object(tile, TileObject::Bed(bed));
}
