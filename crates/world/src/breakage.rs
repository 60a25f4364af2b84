//! Bed ageing: a pure state function over the breakage timer.

/// Timer value at or below which a bed is ready to break.
pub const BREAKAGE_TARGET: i32 = 0;

/// Timer value assigned when a bed breaks.
pub const BREAKAGE_DEFINITE: i32 = -300;

/// How far a bed has aged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakageState {
    /// Functions normally and keeps ageing.
    Healthy,
    /// Still functional; the next season-end sweep breaks it.
    ReadyToBreak,
    /// Grows nothing and no longer joins its neighbours.
    Broken,
}

impl BreakageState {
    /// State for a timer value. With breakage disabled every bed is healthy.
    pub fn from_timer(timer: i32, breakage_enabled: bool) -> Self {
        if !breakage_enabled {
            BreakageState::Healthy
        } else if timer <= BREAKAGE_DEFINITE {
            BreakageState::Broken
        } else if timer <= BREAKAGE_TARGET {
            BreakageState::ReadyToBreak
        } else {
            BreakageState::Healthy
        }
    }

    /// Whether the bed is broken.
    pub fn is_broken(self) -> bool {
        self == BreakageState::Broken
    }
}
