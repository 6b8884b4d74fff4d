//! The board: the arena of provinces, coasts, players, and units.
//!
//! Everything on the board refers to everything else by id. Geometry queries
//! (adjacency, fleet coasts, reachability) live here so the legality checker
//! and the resolver share one definition of "can get there".

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::builder::BoardError;
use super::order::Order;
use super::player::{Player, PlayerId};
use super::province::{Coast, CoastId, Location, Province, ProvinceId};
use super::unit::{Unit, UnitId, UnitType};

/// Complete game position for one phase.
///
/// Built with [`BoardBuilder`](super::BoardBuilder). The adjudicator borrows it
/// mutably for the duration of a run and is its only writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) provinces: Vec<Province>,
    pub(crate) coasts: Vec<Coast>,
    pub(crate) players: Vec<Player>,
    /// Vacated slots stay `None` so ids are never reused.
    pub(crate) units: Vec<Option<Unit>>,
    pub(crate) province_index: HashMap<String, ProvinceId>,
    pub(crate) coast_index: HashMap<String, CoastId>,
    pub(crate) player_index: HashMap<String, PlayerId>,
}

impl Board {
    // --- Lookups ---

    pub fn province_id(&self, name: &str) -> Option<ProvinceId> {
        self.province_index.get(name).copied()
    }

    pub fn coast_id(&self, name: &str) -> Option<CoastId> {
        self.coast_index.get(name).copied()
    }

    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.player_index.get(name).copied()
    }

    /// Resolves a coast name, falling back to a province name.
    pub fn location(&self, name: &str) -> Option<Location> {
        self.coast_id(name)
            .map(Location::Coast)
            .or_else(|| self.province_id(name).map(Location::Province))
    }

    pub fn province(&self, id: ProvinceId) -> &Province {
        &self.provinces[id.index()]
    }

    pub fn province_mut(&mut self, id: ProvinceId) -> &mut Province {
        &mut self.provinces[id.index()]
    }

    pub fn coast(&self, id: CoastId) -> &Coast {
        &self.coasts[id.index()]
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn province_ids(&self) -> impl Iterator<Item = ProvinceId> + '_ {
        (0..self.provinces.len()).map(|i| ProvinceId(i as u16))
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    /// Returns the unit with the given id, unless it has been removed.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index()).and_then(Option::as_ref)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Iterates over every unit on the board, dislodged ones included.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter_map(|(i, u)| u.as_ref().map(|u| (UnitId(i as u32), u)))
    }

    /// Returns the standing occupants, in province order.
    pub fn standing_units(&self) -> Vec<UnitId> {
        self.provinces.iter().filter_map(|p| p.unit).collect()
    }

    /// Returns the units awaiting a retreat, in province order.
    pub fn dislodged_units(&self) -> Vec<UnitId> {
        self.provinces.iter().filter_map(|p| p.dislodged_unit).collect()
    }

    /// Returns the name of a location as written in orders.
    pub fn location_name(&self, location: Location) -> &str {
        match location {
            Location::Province(p) => &self.province(p).name,
            Location::Coast(c) => &self.coast(c).name,
        }
    }

    // --- Geometry ---

    /// Strips the coast from a location.
    pub fn base_province(&self, location: Location) -> ProvinceId {
        match location {
            Location::Province(p) => p,
            Location::Coast(c) => self.coast(c).province,
        }
    }

    /// Provinces directly reachable from `location`.
    ///
    /// A province location uses the province adjacency; a coast reaches its
    /// seas and the provinces of the coasts it is linked to.
    pub fn adjacent_provinces(&self, location: Location) -> BTreeSet<ProvinceId> {
        match location {
            Location::Province(p) => self.province(p).adjacent.clone(),
            Location::Coast(c) => {
                let coast = self.coast(c);
                let mut out = coast.adjacent_seas.clone();
                out.extend(coast.adjacent_coasts.iter().map(|&a| self.coast(a).province));
                out
            }
        }
    }

    /// Coasts of `to` a fleet at `from` could sail to.
    pub fn reachable_coasts(&self, from: Location, to: ProvinceId) -> Vec<CoastId> {
        let target = self.province(to);
        match from {
            Location::Province(p) if self.province(p).is_sea() => target
                .coasts
                .iter()
                .copied()
                .filter(|&c| self.coast(c).adjacent_seas.contains(&p))
                .collect(),
            Location::Province(_) => Vec::new(),
            Location::Coast(fc) => {
                let linked = &self.coast(fc).adjacent_coasts;
                target.coasts.iter().copied().filter(|c| linked.contains(c)).collect()
            }
        }
    }

    /// Whether a unit of `unit_type` at `from` could move into `to`, ignoring
    /// which coast it would arrive on.
    pub fn can_reach(&self, unit_type: UnitType, from: Location, to: ProvinceId) -> bool {
        match unit_type {
            UnitType::Army => {
                let origin = self.base_province(from);
                !self.province(to).is_sea() && self.province(origin).adjacent.contains(&to)
            }
            UnitType::Fleet => {
                if self.province(to).is_sea() {
                    self.adjacent_provinces(from).contains(&to)
                } else {
                    !self.reachable_coasts(from, to).is_empty()
                }
            }
        }
    }

    // --- Units and orders ---

    /// Places a new unit as the standing occupant of `location`.
    ///
    /// A fleet placed on a bare land province is put on its coast when the
    /// province has exactly one.
    pub fn add_unit(
        &mut self,
        player: PlayerId,
        unit_type: UnitType,
        location: Location,
    ) -> Result<UnitId, BoardError> {
        let province = self.base_province(location);
        let p = self.province(province);
        if p.unit.is_some() {
            return Err(BoardError::Occupied(p.name.clone()));
        }
        let illegal = || BoardError::IllegalPlacement {
            unit_type,
            province: p.name.clone(),
        };
        let coast = match (unit_type, location) {
            (UnitType::Army, _) if p.is_sea() => return Err(illegal()),
            (UnitType::Army, _) => None,
            (UnitType::Fleet, _) if p.is_sea() => None,
            (UnitType::Fleet, Location::Coast(c)) => Some(c),
            (UnitType::Fleet, Location::Province(_)) => match p.coasts.as_slice() {
                [] => return Err(illegal()),
                [only] => Some(*only),
                _ => return Err(BoardError::AmbiguousCoast(p.name.clone())),
            },
        };
        let id = UnitId(self.units.len() as u32);
        self.units.push(Some(Unit {
            unit_type,
            player,
            province,
            coast,
            order: None,
            retreat_options: None,
        }));
        self.province_mut(province).unit = Some(id);
        Ok(id)
    }

    /// Removes a unit from the board, vacating whichever slot it held.
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.get_mut(id.index())?.take()?;
        let p = self.province_mut(unit.province);
        if p.unit == Some(id) {
            p.unit = None;
        }
        if p.dislodged_unit == Some(id) {
            p.dislodged_unit = None;
        }
        Some(unit)
    }

    pub fn set_order(&mut self, id: UnitId, order: Order) -> Result<(), BoardError> {
        let unit = self.unit_mut(id).ok_or(BoardError::UnknownUnit(id))?;
        unit.order = Some(order);
        Ok(())
    }

    pub fn clear_orders(&mut self) {
        for unit in self.units.iter_mut().flatten() {
            unit.order = None;
        }
    }

    // --- Integrity ---

    /// Checks that every id stored on the board points into its arenas.
    ///
    /// Boards built through [`BoardBuilder`](super::BoardBuilder) always pass;
    /// deserialized ones may not, and the indexing lookups above would panic
    /// on them.
    pub fn check_references(&self) -> Result<(), BoardError> {
        let province_ok = |p: &ProvinceId| p.index() < self.provinces.len();
        let coast_ok = |c: &CoastId| c.index() < self.coasts.len();
        let player_ok = |p: &PlayerId| p.index() < self.players.len();
        let unit_ok = |u: &UnitId| self.unit(*u).is_some();
        let location_ok = |l: &Location| match l {
            Location::Province(p) => province_ok(p),
            Location::Coast(c) => coast_ok(c),
        };
        let dangling = |owner: &str| Err(BoardError::DanglingReference(owner.to_string()));

        for p in &self.provinces {
            let ok = p.adjacent.iter().all(province_ok)
                && p.coasts.iter().all(coast_ok)
                && [p.core, p.half_core, p.owner].iter().flatten().all(player_ok)
                && [p.unit, p.dislodged_unit].iter().flatten().all(unit_ok);
            if !ok {
                return dangling(&p.name);
            }
        }
        for c in &self.coasts {
            let ok = province_ok(&c.province)
                && c.adjacent_seas.iter().all(province_ok)
                && c.adjacent_coasts.iter().all(coast_ok);
            if !ok {
                return dangling(&c.name);
            }
        }
        for (id, u) in self.units() {
            let order_ok = match u.order {
                Some(
                    Order::Support { source, destination } | Order::ConvoyTransport { source, destination },
                ) => unit_ok(&source) && location_ok(&destination),
                Some(order) => order.move_destination().iter().all(location_ok),
                None => true,
            };
            let ok = player_ok(&u.player)
                && province_ok(&u.province)
                && u.coast.iter().all(coast_ok)
                && u.retreat_options.iter().flatten().all(province_ok)
                && order_ok;
            if !ok {
                return dangling(&format!("unit {id}"));
            }
        }
        Ok(())
    }
}
