//! Tilled soil inside a bed, and the crop growing in it.

use raised_beds_core::Item;
use serde::{Deserialize, Serialize};

/// A planted crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    /// Seed the crop grew from.
    pub seed_id: i32,
    /// Produce released on harvest.
    pub harvest_id: i32,
    /// Days spent in each growth phase before the harvestable phase.
    pub phase_days: Vec<u32>,
    /// Index into `phase_days`; equal to its length once ripe.
    pub current_phase: usize,
    /// Days grown within the current phase.
    pub day_of_current_phase: u32,
}

impl Crop {
    /// Sprout a crop from a seed item.
    pub fn from_seed(item: &Item) -> Option<Self> {
        match item {
            Item::Seed {
                id,
                phase_days,
                harvest_id,
            } => Some(Self {
                seed_id: *id,
                harvest_id: *harvest_id,
                phase_days: phase_days.clone(),
                current_phase: 0,
                day_of_current_phase: 0,
            }),
            _ => None,
        }
    }

    /// Whether the crop can be harvested.
    pub fn is_ready(&self) -> bool {
        self.current_phase >= self.phase_days.len()
    }

    /// Advance one day of growth.
    pub fn grow(&mut self) {
        if self.is_ready() {
            return;
        }
        self.day_of_current_phase += 1;
        while let Some(&needed) = self.phase_days.get(self.current_phase) {
            if self.day_of_current_phase < needed {
                break;
            }
            self.day_of_current_phase -= needed;
            self.current_phase += 1;
        }
    }
}

/// A tea bush or similar sapling growing in a bed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bush {
    /// Sapling the bush grew from.
    pub sapling_id: i32,
    /// Days since planting.
    pub age_days: u32,
}

/// Soil state of one bed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Soil {
    /// Watered today.
    pub watered: bool,
    /// Applied fertilizer, at most one per bed.
    pub fertilizer: Option<i32>,
    /// Planted crop, if any.
    pub crop: Option<Crop>,
}

impl Soil {
    /// Whether `item` could go into this soil now.
    pub fn can_accept(&self, item: &Item) -> bool {
        match item {
            Item::Seed { .. } => self.crop.is_none(),
            Item::Fertilizer { .. } => self.fertilizer.is_none(),
            _ => false,
        }
    }

    /// Plant seeds or apply fertilizer; returns whether the item was used.
    pub fn apply(&mut self, item: &Item) -> bool {
        if !self.can_accept(item) {
            return false;
        }
        match item {
            Item::Fertilizer { id } => self.fertilizer = Some(*id),
            other => self.crop = Crop::from_seed(other),
        }
        true
    }

    /// Harvest a ripe crop, clearing it.
    pub fn harvest(&mut self) -> Option<Item> {
        if !self.crop.as_ref().is_some_and(Crop::is_ready) {
            return None;
        }
        let crop = self.crop.take()?;
        Some(Item::Object {
            id: crop.harvest_id,
            quantity: 1,
        })
    }

    /// Overnight update: a watered crop grows unless `hold_crop`; the soil dries.
    pub fn day_update(&mut self, hold_crop: bool) {
        if self.watered && !hold_crop {
            if let Some(crop) = self.crop.as_mut() {
                crop.grow();
            }
        }
        self.watered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsnip() -> Item {
        Item::Seed {
            id: 472,
            phase_days: vec![1, 1, 1, 1],
            harvest_id: 24,
        }
    }

    #[test]
    fn crop_grows_through_phases() {
        let mut crop = Crop::from_seed(&Item::Seed {
            id: 1,
            phase_days: vec![2, 1],
            harvest_id: 2,
        })
        .unwrap();
        crop.grow();
        assert_eq!((crop.current_phase, crop.day_of_current_phase), (0, 1));
        crop.grow();
        assert_eq!(crop.current_phase, 1);
        crop.grow();
        assert!(crop.is_ready());
        crop.grow();
        assert_eq!(crop.current_phase, 2);
    }

    #[test]
    fn only_watered_soil_grows() {
        let mut soil = Soil::default();
        assert!(soil.apply(&parsnip()));
        soil.day_update(false);
        assert_eq!(soil.crop.as_ref().unwrap().day_of_current_phase, 0);

        soil.watered = true;
        soil.day_update(false);
        assert!(!soil.watered);
        assert_eq!(soil.crop.as_ref().unwrap().current_phase, 1);

        soil.watered = true;
        soil.day_update(true);
        assert_eq!(soil.crop.as_ref().unwrap().current_phase, 1);
    }

    #[test]
    fn one_crop_and_one_fertilizer() {
        let mut soil = Soil::default();
        assert!(soil.apply(&Item::Fertilizer { id: 368 }));
        assert!(!soil.apply(&Item::Fertilizer { id: 369 }));
        assert!(soil.apply(&parsnip()));
        assert!(!soil.apply(&parsnip()));
        assert!(!soil.apply(&Item::Sprinkler { id: 599, radius: 0 }));
        assert_eq!(soil.fertilizer, Some(368));
    }

    #[test]
    fn harvest_requires_ripe_crop() {
        let mut soil = Soil::default();
        soil.apply(&parsnip());
        assert_eq!(soil.harvest(), None);
        for _ in 0..4 {
            soil.watered = true;
            soil.day_update(false);
        }
        assert_eq!(soil.harvest(), Some(Item::Object { id: 24, quantity: 1 }));
        assert!(soil.crop.is_none());
    }
}
