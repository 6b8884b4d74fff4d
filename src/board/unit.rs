//! Armies, fleets, and their per-phase state.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::Order;
use super::player::PlayerId;
use super::province::{CoastId, Location, ProvinceId};

/// Stable index of a unit in its board's arena. Never reused within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the uppercase abbreviation used in order notation.
    pub const fn abbreviation(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitType::Army => f.write_str("army"),
            UnitType::Fleet => f.write_str("fleet"),
        }
    }
}

/// A military unit on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub unit_type: UnitType,
    pub player: PlayerId,
    pub province: ProvinceId,
    /// Set for fleets standing on a land or island province.
    pub coast: Option<CoastId>,
    /// The order for the current phase.
    pub order: Option<Order>,
    /// `None` unless dislodged; then the (possibly empty) set of retreat targets.
    pub retreat_options: Option<BTreeSet<ProvinceId>>,
}

impl Unit {
    /// Returns the exact location of the unit, coast included.
    pub fn location(&self) -> Location {
        match self.coast {
            Some(c) => Location::Coast(c),
            None => Location::Province(self.province),
        }
    }

    #[inline]
    pub fn is_fleet(&self) -> bool {
        self.unit_type == UnitType::Fleet
    }

    #[inline]
    pub fn is_dislodged(&self) -> bool {
        self.retreat_options.is_some()
    }
}
