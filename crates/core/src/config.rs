//! Player-facing toggles for garden bed behaviour.

use serde::{Deserialize, Serialize};

/// Boolean toggles read by the core; loaded and saved by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Beds age and eventually break at the end of a season.
    pub raised_beds_may_break_with_age: bool,
    /// Sprinklers may be placed into beds and water around them.
    pub sprinklers_enabled: bool,
    /// Every bed recipe is known from the start.
    pub recipes_always_available: bool,
    /// Beds may be placed inside the farmhouse.
    pub can_be_placed_in_farm_house: bool,
    /// Beds may be placed inside farm buildings.
    pub can_be_placed_in_buildings: bool,
    /// Beds may be placed inside the greenhouse.
    pub can_be_placed_in_green_house: bool,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            raised_beds_may_break_with_age: true,
            sprinklers_enabled: false,
            recipes_always_available: false,
            can_be_placed_in_farm_house: false,
            can_be_placed_in_buildings: false,
            can_be_placed_in_green_house: true,
        }
    }
}
