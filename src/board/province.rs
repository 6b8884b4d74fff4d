//! Provinces, coasts, and locations.
//!
//! Provinces form the adjacency graph every reachability question is asked
//! against. Coastal land provinces carry one or more coasts; a coast borders
//! the seas a fleet standing on it can enter.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::unit::UnitId;

/// Stable index of a province in its board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProvinceId(pub u16);

impl ProvinceId {
    /// Returns the arena index as a `usize`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable index of a coast in its board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoastId(pub u16);

impl CoastId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Terrain of a province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProvinceType {
    Land,
    Island,
    Sea,
}

impl ProvinceType {
    /// Returns true for open water.
    pub const fn is_sea(self) -> bool {
        matches!(self, ProvinceType::Sea)
    }
}

/// A node of the adjacency graph together with its mutable game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub name: String,
    pub province_type: ProvinceType,
    pub has_supply_center: bool,
    /// Symmetric: `b` is in `a.adjacent` iff `a` is in `b.adjacent`.
    pub adjacent: BTreeSet<ProvinceId>,
    pub coasts: Vec<CoastId>,
    pub core: Option<PlayerId>,
    pub half_core: Option<PlayerId>,
    pub owner: Option<PlayerId>,
    /// The standing occupant.
    pub unit: Option<UnitId>,
    /// A unit forced out by a successful attack, awaiting its retreat.
    pub dislodged_unit: Option<UnitId>,
}

impl Province {
    /// Creates an unoccupied, unconnected province.
    pub fn new(name: impl Into<String>, province_type: ProvinceType, has_supply_center: bool) -> Self {
        Province {
            name: name.into(),
            province_type,
            has_supply_center,
            adjacent: BTreeSet::new(),
            coasts: Vec::new(),
            core: None,
            half_core: None,
            owner: None,
            unit: None,
            dislodged_unit: None,
        }
    }

    #[inline]
    pub fn is_sea(&self) -> bool {
        self.province_type.is_sea()
    }
}

/// A coastal sub-location of a land or island province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coast {
    pub name: String,
    pub province: ProvinceId,
    pub adjacent_seas: BTreeSet<ProvinceId>,
    /// Coasts a fleet can sail to directly, along a shared sea.
    pub adjacent_coasts: BTreeSet<CoastId>,
}

/// Where a unit stands or an order points: a whole province or one of its coasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    Province(ProvinceId),
    Coast(CoastId),
}

impl Location {
    /// Returns the coast, if this location names one.
    pub const fn coast(self) -> Option<CoastId> {
        match self {
            Location::Coast(c) => Some(c),
            Location::Province(_) => None,
        }
    }
}

impl From<ProvinceId> for Location {
    fn from(p: ProvinceId) -> Self {
        Location::Province(p)
    }
}

impl From<CoastId> for Location {
    fn from(c: CoastId) -> Self {
        Location::Coast(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_province_is_empty() {
        let p = Province::new("nth", ProvinceType::Sea, false);
        assert!(p.is_sea());
        assert!(p.adjacent.is_empty());
        assert!(p.unit.is_none());
        assert!(p.dislodged_unit.is_none());
    }

    #[test]
    fn location_coast() {
        assert_eq!(Location::Coast(CoastId(3)).coast(), Some(CoastId(3)));
        assert_eq!(Location::Province(ProvinceId(3)).coast(), None);
        assert_eq!(Location::from(ProvinceId(7)), Location::Province(ProvinceId(7)));
    }
}
