//! Unit power levels, wages, and purchase costs
//!
//! Wages follow 2 * 3^(power-1): 2, 6, 18, 54. Two units combine by adding
//! power levels; any combination past level 4 is rejected outright, never
//! clamped.

use serde::{Deserialize, Serialize};

/// Gold cost of a fresh level-1 unit.
pub const UNIT_COST: i32 = 10;

/// Gold cost of a castle.
pub const CASTLE_COST: i32 = 15;

/// Defense value of a capital.
pub const CAPITAL_DEFENSE: u8 = 1;

/// Defense value of a castle.
pub const CASTLE_DEFENSE: u8 = 2;

/// Unit strength on a hex. Zero means the hex carries no unit; occupied
/// hexes hold level 1 through 4.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Power(u8);

impl Power {
    /// The empty hex.
    pub const NONE: Power = Power(0);

    /// A freshly bought unit.
    pub const ONE: Power = Power(1);

    /// Strongest unit level.
    pub const MAX_LEVEL: u8 = 4;

    /// A unit of the given level; `None` outside 1..=4.
    pub fn new(level: u8) -> Option<Power> {
        (1..=Self::MAX_LEVEL).contains(&level).then_some(Power(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn is_unit(self) -> bool {
        self.0 > 0
    }

    /// Combine two units into one. Total over all inputs: `None` when
    /// either side is empty or the sum would exceed level 4. Callers must
    /// leave both units untouched on `None`.
    pub fn combine(self, other: Power) -> Option<Power> {
        if !self.is_unit() || !other.is_unit() {
            return None;
        }
        let sum = self.0 + other.0;
        (sum <= Self::MAX_LEVEL).then_some(Power(sum))
    }

    /// Per-turn upkeep: 2 * 3^(level-1). Empty hexes cost nothing.
    pub fn wage(self) -> i32 {
        if self.0 == 0 {
            0
        } else {
            2 * 3i32.pow(u32::from(self.0) - 1)
        }
    }
}
