//! Item system - garden beds, seeds, sprinklers, and tools

use serde::{Deserialize, Serialize};

/// Host object category for seeds and saplings.
pub const CATEGORY_SEEDS: i32 = -74;

/// Host object category for fertilizers.
pub const CATEGORY_FERTILIZER: i32 = -19;

/// An item a farmer can hold, drop into a bed, or receive as debris.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Item {
    /// A placeable garden bed of the given variant.
    GardenBed {
        /// Variant key in the registry.
        variant: String,
    },
    /// Crop seeds
    Seed {
        /// Host object id.
        id: i32,
        /// Days per growth phase, last phase is harvestable.
        phase_days: Vec<u32>,
        /// Host object id of the harvested produce.
        harvest_id: i32,
    },
    /// Soil fertilizer
    Fertilizer {
        /// Host object id.
        id: i32,
    },
    /// Bush sapling (tea and similar)
    Sapling {
        /// Host object id.
        id: i32,
    },
    /// Wild tree seed (acorn, maple seed...), never plantable in beds
    WildTreeSeed {
        /// Host object id.
        id: i32,
    },
    /// Sprinkler with its modified watering radius
    Sprinkler {
        /// Host object id.
        id: i32,
        /// Watering radius; 0 waters the four orthogonal tiles.
        radius: i32,
    },
    /// Generic host object (refund resources, harvested produce...)
    Object {
        /// Host object id.
        id: i32,
        /// Stack size.
        quantity: u32,
    },
    /// A tool
    Tool(Tool),
}

impl Item {
    /// Host object id, if this item has one.
    pub fn parent_sheet_index(&self) -> Option<i32> {
        match self {
            Item::Seed { id, .. }
            | Item::Fertilizer { id }
            | Item::Sapling { id }
            | Item::WildTreeSeed { id }
            | Item::Sprinkler { id, .. }
            | Item::Object { id, .. } => Some(*id),
            Item::GardenBed { .. } | Item::Tool(_) => None,
        }
    }

    /// Host category of the item, if categorised.
    pub fn category(&self) -> Option<i32> {
        match self {
            Item::Seed { .. } | Item::Sapling { .. } | Item::WildTreeSeed { .. } => {
                Some(CATEGORY_SEEDS)
            }
            Item::Fertilizer { .. } => Some(CATEGORY_FERTILIZER),
            _ => None,
        }
    }

    /// Whether the item would go into the soil rather than sit on top of it.
    pub fn is_plantable(&self) -> bool {
        if matches!(self, Item::Tool(_) | Item::WildTreeSeed { .. }) {
            return false;
        }
        matches!(self, Item::Sapling { .. })
            || matches!(self.category(), Some(CATEGORY_SEEDS | CATEGORY_FERTILIZER))
    }

    /// Whether the item is a sprinkler.
    pub fn is_sprinkler(&self) -> bool {
        matches!(self, Item::Sprinkler { .. })
    }

    /// Sprinkler radius, or -1 for anything that isn't a sprinkler.
    pub fn sprinkler_radius(&self) -> i32 {
        match self {
            Item::Sprinkler { radius, .. } => *radius,
            _ => -1,
        }
    }
}

/// Tool kinds that can hit placed objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    /// Axe - chops wood, pops objects
    Axe,
    /// Pickaxe - breaks stone, pops objects
    Pickaxe,
    /// Hoe - tills soil
    Hoe,
    /// Watering can - waters soil
    WateringCan,
    /// Any sword, dagger or club
    MeleeWeapon,
}

/// A tool swing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tool {
    /// What kind of tool hit.
    pub kind: ToolKind,
    /// Upgrade level (0 = basic).
    pub upgrade_level: u8,
}

impl Tool {
    /// Basic tool of the given kind.
    pub fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            upgrade_level: 0,
        }
    }

    /// Whether the tool is a melee weapon (never breaks or destroys beds).
    pub fn is_melee_weapon(&self) -> bool {
        self.kind == ToolKind::MeleeWeapon
    }

    /// Whether the generic "tool hits object" handling knocks a placed object loose.
    pub fn dislodges_objects(&self) -> bool {
        matches!(self.kind, ToolKind::Axe | ToolKind::Pickaxe)
    }
}
