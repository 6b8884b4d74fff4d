//! Order types for the movement and retreat phases.
//!
//! Orders name other units by [`UnitId`] and targets by [`Location`], so an
//! order is only meaningful against the board that issued the ids.

use serde::{Deserialize, Serialize};

use super::province::Location;
use super::unit::UnitId;

/// An order given to a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Stay in place.
    Hold,

    /// Claim the supply center the unit stands on.
    Core,

    /// Move to an adjacent province: `A bud - rum` or `F nrg - stp/nc`.
    Move { destination: Location },

    /// Army move carried by a chain of convoying fleets.
    ConvoyMove { destination: Location },

    /// Support `source` into `destination`. Supporting a unit into the
    /// province it already occupies is a support to hold.
    Support { source: UnitId, destination: Location },

    /// Fleet ferries the army `source` towards `destination`.
    ConvoyTransport { source: UnitId, destination: Location },

    /// Retreat phase: move a dislodged unit.
    RetreatMove { destination: Location },

    /// Retreat phase: remove a dislodged unit.
    RetreatDisband,
}

impl Order {
    /// Returns true for the orders that try to change the unit's province.
    pub const fn is_move(&self) -> bool {
        matches!(self, Order::Move { .. } | Order::ConvoyMove { .. })
    }

    /// Returns true for orders that only exist in the retreat sub-phase.
    pub const fn is_retreat(&self) -> bool {
        matches!(self, Order::RetreatMove { .. } | Order::RetreatDisband)
    }

    /// Returns the ordered destination of a move or retreat.
    pub const fn move_destination(&self) -> Option<Location> {
        match self {
            Order::Move { destination }
            | Order::ConvoyMove { destination }
            | Order::RetreatMove { destination } => Some(*destination),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ProvinceId;

    #[test]
    fn classification() {
        let dest = Location::Province(ProvinceId(1));
        assert!(Order::Move { destination: dest }.is_move());
        assert!(Order::ConvoyMove { destination: dest }.is_move());
        assert!(!Order::RetreatMove { destination: dest }.is_move());
        assert!(Order::RetreatDisband.is_retreat());
        assert!(!Order::Hold.is_retreat());
    }

    #[test]
    fn move_destination() {
        let dest = Location::Province(ProvinceId(9));
        assert_eq!(Order::ConvoyMove { destination: dest }.move_destination(), Some(dest));
        assert_eq!(Order::RetreatMove { destination: dest }.move_destination(), Some(dest));
        assert_eq!(
            Order::Support { source: UnitId(0), destination: dest }.move_destination(),
            None
        );
    }
}
