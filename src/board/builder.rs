//! Construction of boards from named provinces and adjacencies.
//!
//! Hosts describe a map by province name; the builder assigns ids, checks the
//! description for consistency, and derives the coasts fleets travel along.

use std::collections::{BTreeSet, HashMap};

use super::player::{Player, PlayerId};
use super::province::{Coast, CoastId, Province, ProvinceId, ProvinceType};
use super::state::Board;
use super::unit::{UnitId, UnitType};

/// Errors raised while describing a map or placing units on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("unknown province: '{0}'")]
    UnknownProvince(String),

    #[error("duplicate province: '{0}'")]
    DuplicateProvince(String),

    #[error("unknown player: '{0}'")]
    UnknownPlayer(String),

    #[error("duplicate player: '{0}'")]
    DuplicatePlayer(String),

    #[error("unknown coast: '{0}'")]
    UnknownCoast(String),

    #[error("duplicate coast: '{0}'")]
    DuplicateCoast(String),

    #[error("province '{0}' cannot be adjacent to itself")]
    SelfAdjacent(String),

    #[error("coast '{coast}' borders '{sea}', which is not an adjacent sea")]
    CoastNotOnSea { coast: String, sea: String },

    #[error("sea province '{0}' cannot have coasts")]
    CoastOnSea(String),

    #[error("province '{0}' is already occupied")]
    Occupied(String),

    #[error("{unit_type} cannot stand in '{province}'")]
    IllegalPlacement { unit_type: UnitType, province: String },

    #[error("coast of '{0}' must be specified")]
    AmbiguousCoast(String),

    #[error("no unit with id {0}")]
    UnknownUnit(UnitId),

    #[error("{0} refers to an id outside the board")]
    DanglingReference(String),
}

struct ExplicitCoast {
    name: String,
    province: ProvinceId,
    seas: BTreeSet<ProvinceId>,
}

/// Incrementally describes a map, then produces an empty [`Board`].
///
/// Land and island provinces that border a sea and have no explicitly added
/// coast receive a single coast named `"<province> coast"`.
#[derive(Default)]
pub struct BoardBuilder {
    provinces: Vec<Province>,
    province_index: HashMap<String, ProvinceId>,
    players: Vec<Player>,
    player_index: HashMap<String, PlayerId>,
    coasts: Vec<ExplicitCoast>,
    severed: Vec<(String, String)>,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, BoardError> {
        if self.player_index.contains_key(name) {
            return Err(BoardError::DuplicatePlayer(name.to_string()));
        }
        let id = PlayerId(self.players.len() as u16);
        self.players.push(Player { name: name.to_string() });
        self.player_index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Registers a province.
    pub fn add_province(
        &mut self,
        name: &str,
        province_type: ProvinceType,
        has_supply_center: bool,
    ) -> Result<ProvinceId, BoardError> {
        if self.province_index.contains_key(name) {
            return Err(BoardError::DuplicateProvince(name.to_string()));
        }
        let id = ProvinceId(self.provinces.len() as u16);
        self.provinces.push(Province::new(name, province_type, has_supply_center));
        self.province_index.insert(name.to_string(), id);
        Ok(id)
    }

    /// Makes two provinces adjacent. Symmetric and idempotent.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<(), BoardError> {
        let pa = self.lookup(a)?;
        let pb = self.lookup(b)?;
        if pa == pb {
            return Err(BoardError::SelfAdjacent(a.to_string()));
        }
        self.provinces[pa.index()].adjacent.insert(pb);
        self.provinces[pb.index()].adjacent.insert(pa);
        Ok(())
    }

    /// Adds a named coast to a province, bordering the given seas.
    ///
    /// Used for provinces with more than one coast; every sea must already be
    /// connected to the province.
    pub fn add_coast(&mut self, province: &str, name: &str, seas: &[&str]) -> Result<(), BoardError> {
        let pid = self.lookup(province)?;
        if self.provinces[pid.index()].is_sea() {
            return Err(BoardError::CoastOnSea(province.to_string()));
        }
        if self.coasts.iter().any(|c| c.name == name) {
            return Err(BoardError::DuplicateCoast(name.to_string()));
        }
        let mut sea_ids = BTreeSet::new();
        for sea in seas {
            let sid = self.lookup(sea)?;
            let s = &self.provinces[sid.index()];
            if !s.is_sea() || !s.adjacent.contains(&pid) {
                return Err(BoardError::CoastNotOnSea {
                    coast: name.to_string(),
                    sea: sea.to_string(),
                });
            }
            sea_ids.insert(sid);
        }
        self.coasts.push(ExplicitCoast {
            name: name.to_string(),
            province: pid,
            seas: sea_ids,
        });
        Ok(())
    }

    /// Removes the fleet passage between two coasts that would otherwise be
    /// linked because they border a common sea. Applied during [`build`](Self::build).
    pub fn sever_coasts(&mut self, a: &str, b: &str) {
        self.severed.push((a.to_string(), b.to_string()));
    }

    /// Finishes the map.
    pub fn build(self) -> Result<Board, BoardError> {
        let BoardBuilder {
            mut provinces,
            province_index,
            players,
            player_index,
            coasts: explicit,
            severed,
        } = self;

        let mut coasts: Vec<Coast> = Vec::new();
        for c in explicit {
            let id = CoastId(coasts.len() as u16);
            provinces[c.province.index()].coasts.push(id);
            coasts.push(Coast {
                name: c.name,
                province: c.province,
                adjacent_seas: c.seas,
                adjacent_coasts: BTreeSet::new(),
            });
        }

        for index in 0..provinces.len() {
            let p = &provinces[index];
            if p.is_sea() || !p.coasts.is_empty() {
                continue;
            }
            let seas: BTreeSet<ProvinceId> = p
                .adjacent
                .iter()
                .copied()
                .filter(|s| provinces[s.index()].is_sea())
                .collect();
            if seas.is_empty() {
                continue;
            }
            let id = CoastId(coasts.len() as u16);
            coasts.push(Coast {
                name: format!("{} coast", p.name),
                province: ProvinceId(index as u16),
                adjacent_seas: seas,
                adjacent_coasts: BTreeSet::new(),
            });
            provinces[index].coasts.push(id);
        }

        let coast_index: HashMap<String, CoastId> = coasts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), CoastId(i as u16)))
            .collect();

        let mut severed_pairs = Vec::with_capacity(severed.len());
        for (a, b) in &severed {
            let ca = *coast_index.get(a).ok_or_else(|| BoardError::UnknownCoast(a.clone()))?;
            let cb = *coast_index.get(b).ok_or_else(|| BoardError::UnknownCoast(b.clone()))?;
            severed_pairs.push((ca, cb));
        }

        for i in 0..coasts.len() {
            for j in (i + 1)..coasts.len() {
                let (a, b) = (&coasts[i], &coasts[j]);
                if a.province == b.province
                    || !provinces[a.province.index()].adjacent.contains(&b.province)
                    || a.adjacent_seas.is_disjoint(&b.adjacent_seas)
                {
                    continue;
                }
                let (ci, cj) = (CoastId(i as u16), CoastId(j as u16));
                if severed_pairs
                    .iter()
                    .any(|&(x, y)| (x, y) == (ci, cj) || (y, x) == (ci, cj))
                {
                    continue;
                }
                coasts[i].adjacent_coasts.insert(cj);
                coasts[j].adjacent_coasts.insert(ci);
            }
        }

        Ok(Board {
            provinces,
            coasts,
            players,
            units: Vec::new(),
            province_index,
            coast_index,
            player_index,
        })
    }

    fn lookup(&self, name: &str) -> Result<ProvinceId, BoardError> {
        self.province_index
            .get(name)
            .copied()
            .ok_or_else(|| BoardError::UnknownProvince(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two coastal provinces around a sea, plus an inland one.
    fn small() -> BoardBuilder {
        let mut b = BoardBuilder::new();
        b.add_player("red").unwrap();
        b.add_province("sea", ProvinceType::Sea, false).unwrap();
        b.add_province("west", ProvinceType::Land, true).unwrap();
        b.add_province("east", ProvinceType::Land, false).unwrap();
        b.add_province("hill", ProvinceType::Land, false).unwrap();
        b.connect("sea", "west").unwrap();
        b.connect("sea", "east").unwrap();
        b.connect("west", "east").unwrap();
        b.connect("west", "hill").unwrap();
        b.connect("east", "hill").unwrap();
        b
    }

    #[test]
    fn derives_single_coasts() {
        let board = small().build().unwrap();
        let west = board.province_id("west").unwrap();
        let hill = board.province_id("hill").unwrap();
        assert_eq!(board.province(west).coasts.len(), 1);
        assert!(board.province(hill).coasts.is_empty());
        let coast = board.coast_id("west coast").unwrap();
        assert_eq!(board.coast(coast).province, west);
        assert_eq!(board.coast(coast).adjacent_coasts.len(), 1);
    }

    #[test]
    fn connect_is_symmetric_and_idempotent() {
        let mut b = small();
        b.connect("west", "east").unwrap();
        let board = b.build().unwrap();
        let west = board.province_id("west").unwrap();
        let east = board.province_id("east").unwrap();
        assert!(board.province(west).adjacent.contains(&east));
        assert!(board.province(east).adjacent.contains(&west));
        assert_eq!(board.province(west).adjacent.len(), 3);
    }

    #[test]
    fn rejects_bad_descriptions() {
        let mut b = small();
        assert_eq!(
            b.add_province("west", ProvinceType::Land, false),
            Err(BoardError::DuplicateProvince("west".into()))
        );
        assert_eq!(b.connect("west", "west"), Err(BoardError::SelfAdjacent("west".into())));
        assert_eq!(b.connect("west", "nowhere"), Err(BoardError::UnknownProvince("nowhere".into())));
        assert!(matches!(
            b.add_coast("hill", "hill/nc", &["sea"]),
            Err(BoardError::CoastNotOnSea { .. })
        ));
        assert_eq!(b.add_player("red"), Err(BoardError::DuplicatePlayer("red".into())));
    }

    #[test]
    fn severed_coasts_are_not_linked() {
        let mut b = small();
        b.sever_coasts("west coast", "east coast");
        let board = b.build().unwrap();
        let west = board.coast_id("west coast").unwrap();
        assert!(board.coast(west).adjacent_coasts.is_empty());
    }

    #[test]
    fn unknown_severed_coast_is_an_error() {
        let mut b = small();
        b.sever_coasts("west coast", "moon coast");
        assert_eq!(b.build().err(), Some(BoardError::UnknownCoast("moon coast".into())));
    }
}
