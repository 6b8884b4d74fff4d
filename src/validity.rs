//! Order legality.
//!
//! Decides whether an order is admissible before adjudication starts. The
//! checks are pure: nothing here mutates the board. Under strict checking,
//! supports and convoys must also agree with the orders of the units they
//! name, so the order graph is cross-validated and not just the geography.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::board::{Board, Location, Order, ProvinceId, Unit, UnitId, UnitType};

/// Why an order was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum OrderViolation {
    #[error("no unit at '{0}'")]
    NoUnit(String),

    #[error("no unit with id {0}")]
    UnknownUnit(UnitId),

    #[error("unit has no order")]
    MissingOrder,

    #[error("'{0}' has no supply center to core")]
    NoSupplyCenter(String),

    #[error("cannot reach '{0}'")]
    Unreachable(String),

    #[error("armies cannot enter sea province '{0}'")]
    ArmyAtSea(String),

    #[error("coast of '{0}' must be specified")]
    AmbiguousCoast(String),

    #[error("only armies can be convoyed")]
    FleetConvoyed,

    #[error("no convoy route to '{0}'")]
    NoConvoyPath(String),

    #[error("only fleets can convoy")]
    ArmyConvoying,

    #[error("fleets can only convoy at sea, not from '{0}'")]
    ConvoyFromLand(String),

    #[error("'{0}' is not on a convoy route for this army")]
    NotInConvoyChain(String),

    #[error("convoyed army was not ordered to '{0}'")]
    ConvoyOrderMismatch(String),

    #[error("a unit cannot support itself")]
    SelfSupport,

    #[error("supporting unit cannot reach '{0}'")]
    SupportUnreachable(String),

    #[error("supported unit cannot reach '{0}'")]
    SupportedMoveUnreachable(String),

    #[error("supported unit was not ordered to do that")]
    SupportOrderMismatch,

    #[error("only dislodged units can retreat")]
    NotDislodged,

    #[error("'{0}' is not a retreat option")]
    NotARetreatOption(String),
}

/// Checks the order for the unit standing at `location`.
pub fn order_is_valid(
    board: &Board,
    location: Location,
    order: Option<&Order>,
    strict: bool,
) -> Result<(), OrderViolation> {
    let province = board.base_province(location);
    let unit = board
        .province(province)
        .unit
        .ok_or_else(|| OrderViolation::NoUnit(board.location_name(location).to_string()))?;
    unit_order_is_valid(board, unit, order, strict)
}

/// Checks an order for a specific unit, standing or dislodged.
pub fn unit_order_is_valid(
    board: &Board,
    unit_id: UnitId,
    order: Option<&Order>,
    strict: bool,
) -> Result<(), OrderViolation> {
    let unit = board.unit(unit_id).ok_or(OrderViolation::UnknownUnit(unit_id))?;
    let order = order.ok_or(OrderViolation::MissingOrder)?;
    match *order {
        Order::Hold | Order::RetreatDisband => Ok(()),
        Order::Core => {
            let p = board.province(unit.province);
            if p.has_supply_center {
                Ok(())
            } else {
                Err(OrderViolation::NoSupplyCenter(p.name.clone()))
            }
        }
        Order::Move { destination } | Order::RetreatMove { destination } => {
            check_move(board, unit, destination)
        }
        Order::ConvoyMove { destination } => check_convoy_move(board, unit, destination, strict),
        Order::Support { source, destination } => {
            check_support(board, unit_id, unit, source, destination, strict)
        }
        Order::ConvoyTransport { source, destination } => {
            check_transport(board, unit, source, destination, strict)
        }
    }
}

/// Whether an army at `start` could be carried to `end` by a chain of fleets
/// at sea.
///
/// With `check_fleet_orders`, only fleets ordered to convoy exactly this
/// `start -> end` pair count as links of the chain.
pub fn convoy_is_possible(board: &Board, start: ProvinceId, end: ProvinceId, check_fleet_orders: bool) -> bool {
    convoy_path_exists(board, start, end, check_fleet_orders.then_some((start, end)))
}

/// Breadth-first search over fleet-occupied seas from `from`, succeeding as
/// soon as a reached fleet borders `to`.
///
/// `carrying` restricts the fleets to those convoying the army moving between
/// that pair of provinces, which need not be `from` and `to` themselves.
pub fn convoy_path_exists(
    board: &Board,
    from: ProvinceId,
    to: ProvinceId,
    carrying: Option<(ProvinceId, ProvinceId)>,
) -> bool {
    let mut visited = BTreeSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(p) = queue.pop_front() {
        for &next in &board.province(p).adjacent {
            if visited.contains(&next) || !is_carrier(board, next, carrying) {
                continue;
            }
            if board.province(next).adjacent.contains(&to) {
                return true;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }
    false
}

fn is_carrier(board: &Board, province: ProvinceId, carrying: Option<(ProvinceId, ProvinceId)>) -> bool {
    let p = board.province(province);
    if !p.is_sea() {
        return false;
    }
    let Some(fleet) = p.unit.and_then(|u| board.unit(u)) else {
        return false;
    };
    if !fleet.is_fleet() {
        return false;
    }
    let Some((from, to)) = carrying else {
        return true;
    };
    match fleet.order {
        Some(Order::ConvoyTransport { source, destination }) => {
            board.base_province(destination) == to
                && board.unit(source).is_some_and(|army| army.province == from)
        }
        _ => false,
    }
}

fn name_of(board: &Board, location: Location) -> String {
    board.location_name(location).to_string()
}

fn check_move(board: &Board, unit: &Unit, destination: Location) -> Result<(), OrderViolation> {
    let to = board.base_province(destination);
    let unreachable = || OrderViolation::Unreachable(name_of(board, destination));
    if to == unit.province {
        return Err(unreachable());
    }
    let target = board.province(to);
    match unit.unit_type {
        UnitType::Army if target.is_sea() => Err(OrderViolation::ArmyAtSea(target.name.clone())),
        UnitType::Army => {
            if board.can_reach(UnitType::Army, unit.location(), to) {
                Ok(())
            } else {
                Err(unreachable())
            }
        }
        UnitType::Fleet if target.is_sea() => {
            if board.adjacent_provinces(unit.location()).contains(&to) {
                Ok(())
            } else {
                Err(unreachable())
            }
        }
        UnitType::Fleet => {
            let coasts = board.reachable_coasts(unit.location(), to);
            match destination {
                Location::Coast(c) if coasts.contains(&c) => Ok(()),
                Location::Coast(_) => Err(unreachable()),
                Location::Province(_) => match coasts.len() {
                    0 => Err(unreachable()),
                    1 => Ok(()),
                    _ => Err(OrderViolation::AmbiguousCoast(target.name.clone())),
                },
            }
        }
    }
}

fn check_convoy_move(
    board: &Board,
    unit: &Unit,
    destination: Location,
    strict: bool,
) -> Result<(), OrderViolation> {
    if unit.is_fleet() {
        return Err(OrderViolation::FleetConvoyed);
    }
    let to = board.base_province(destination);
    let target = board.province(to);
    if target.is_sea() {
        return Err(OrderViolation::ArmyAtSea(target.name.clone()));
    }
    if to == unit.province || !convoy_is_possible(board, unit.province, to, strict) {
        return Err(OrderViolation::NoConvoyPath(target.name.clone()));
    }
    Ok(())
}

/// One step of a convoy route: direct adjacency or a fleet chain.
fn linked(board: &Board, a: ProvinceId, b: ProvinceId, carrying: Option<(ProvinceId, ProvinceId)>) -> bool {
    board.province(a).adjacent.contains(&b) || convoy_path_exists(board, a, b, carrying)
}

fn check_transport(
    board: &Board,
    fleet: &Unit,
    source: UnitId,
    destination: Location,
    strict: bool,
) -> Result<(), OrderViolation> {
    if !fleet.is_fleet() {
        return Err(OrderViolation::ArmyConvoying);
    }
    let here = fleet.province;
    if !board.province(here).is_sea() {
        return Err(OrderViolation::ConvoyFromLand(board.province(here).name.clone()));
    }
    let army = board.unit(source).ok_or(OrderViolation::UnknownUnit(source))?;
    if army.is_fleet() {
        return Err(OrderViolation::FleetConvoyed);
    }
    let from = army.province;
    let to = board.base_province(destination);
    let target = board.province(to);
    if target.is_sea() {
        return Err(OrderViolation::ArmyAtSea(target.name.clone()));
    }

    let carrying = if strict {
        let ordered_to = army
            .order
            .filter(Order::is_move)
            .and_then(|o| o.move_destination())
            .map(|d| board.base_province(d));
        if ordered_to != Some(to) {
            return Err(OrderViolation::ConvoyOrderMismatch(target.name.clone()));
        }
        Some((from, to))
    } else {
        None
    };

    if linked(board, from, here, carrying) && linked(board, here, to, carrying) {
        Ok(())
    } else {
        Err(OrderViolation::NotInConvoyChain(board.province(here).name.clone()))
    }
}

fn check_support(
    board: &Board,
    supporter_id: UnitId,
    supporter: &Unit,
    source: UnitId,
    destination: Location,
    strict: bool,
) -> Result<(), OrderViolation> {
    if source == supporter_id {
        return Err(OrderViolation::SelfSupport);
    }
    let supported = board.unit(source).ok_or(OrderViolation::UnknownUnit(source))?;
    let to = board.base_province(destination);
    let to_name = || board.province(to).name.clone();

    if !board.can_reach(supporter.unit_type, supporter.location(), to) {
        return Err(OrderViolation::SupportUnreachable(to_name()));
    }

    if to == supported.province {
        if strict && supported.order.is_some_and(|o| o.is_move()) {
            return Err(OrderViolation::SupportOrderMismatch);
        }
        return Ok(());
    }

    let path = board.can_reach(supported.unit_type, supported.location(), to)
        || (supported.unit_type == UnitType::Army
            && !board.province(to).is_sea()
            && convoy_is_possible(board, supported.province, to, false));
    if !path {
        return Err(OrderViolation::SupportedMoveUnreachable(to_name()));
    }

    if strict {
        let ordered_to = supported
            .order
            .filter(Order::is_move)
            .and_then(|o| o.move_destination())
            .map(|d| board.base_province(d));
        if ordered_to != Some(to) {
            return Err(OrderViolation::SupportOrderMismatch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::classic_board;

    struct Fixture {
        board: Board,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                board: classic_board().unwrap(),
            }
        }

        fn place(&mut self, player: &str, unit_type: UnitType, at: &str) -> UnitId {
            let pid = self.board.player_id(player).unwrap();
            let loc = self.board.location(at).unwrap();
            self.board.add_unit(pid, unit_type, loc).unwrap()
        }

        fn loc(&self, name: &str) -> Location {
            self.board.location(name).unwrap()
        }

        fn prov(&self, name: &str) -> ProvinceId {
            self.board.province_id(name).unwrap()
        }

        fn check(&self, unit: UnitId, order: Order, strict: bool) -> Result<(), OrderViolation> {
            unit_order_is_valid(&self.board, unit, Some(&order), strict)
        }
    }

    #[test]
    fn missing_order_and_missing_unit() {
        let mut f = Fixture::new();
        let a = f.place("France", UnitType::Army, "par");
        assert_eq!(unit_order_is_valid(&f.board, a, None, true), Err(OrderViolation::MissingOrder));
        assert_eq!(
            order_is_valid(&f.board, f.loc("bur"), Some(&Order::Hold), true),
            Err(OrderViolation::NoUnit("bur".into()))
        );
        assert_eq!(order_is_valid(&f.board, f.loc("par"), Some(&Order::Hold), true), Ok(()));
    }

    #[test]
    fn core_needs_supply_center() {
        let mut f = Fixture::new();
        let a = f.place("France", UnitType::Army, "par");
        let b = f.place("France", UnitType::Army, "bur");
        assert_eq!(f.check(a, Order::Core, true), Ok(()));
        assert_eq!(f.check(b, Order::Core, true), Err(OrderViolation::NoSupplyCenter("bur".into())));
    }

    #[test]
    fn army_moves() {
        let mut f = Fixture::new();
        let a = f.place("France", UnitType::Army, "bre");
        let ok = Order::Move { destination: f.loc("par") };
        let sea = Order::Move { destination: f.loc("eng") };
        let far = Order::Move { destination: f.loc("mun") };
        assert_eq!(f.check(a, ok, true), Ok(()));
        assert_eq!(f.check(a, sea, true), Err(OrderViolation::ArmyAtSea("eng".into())));
        assert_eq!(f.check(a, far, true), Err(OrderViolation::Unreachable("mun".into())));
    }

    #[test]
    fn fleet_moves_are_coast_aware() {
        let mut f = Fixture::new();
        let g = f.place("France", UnitType::Fleet, "gas");
        let p = f.place("France", UnitType::Fleet, "por");
        let m = f.place("France", UnitType::Fleet, "mar");
        assert_eq!(f.check(g, Order::Move { destination: f.loc("spa") }, true), Ok(()));
        assert_eq!(
            f.check(g, Order::Move { destination: f.loc("spa/sc") }, true),
            Err(OrderViolation::Unreachable("spa/sc".into()))
        );
        assert_eq!(
            f.check(p, Order::Move { destination: f.loc("spa") }, true),
            Err(OrderViolation::AmbiguousCoast("spa".into()))
        );
        assert_eq!(f.check(p, Order::Move { destination: f.loc("spa/nc") }, true), Ok(()));
        assert_eq!(
            f.check(m, Order::Move { destination: f.loc("bur") }, true),
            Err(OrderViolation::Unreachable("bur".into()))
        );
    }

    #[test]
    fn convoy_search_follows_fleet_orders() {
        let mut f = Fixture::new();
        let army = f.place("England", UnitType::Army, "lon");
        let nth = f.place("England", UnitType::Fleet, "nth");
        let (lon, nwy) = (f.prov("lon"), f.prov("nwy"));
        assert!(convoy_is_possible(&f.board, lon, nwy, false));
        assert!(!convoy_is_possible(&f.board, lon, nwy, true));

        let dest = f.loc("nwy");
        f.board.set_order(nth, Order::ConvoyTransport { source: army, destination: dest }).unwrap();
        assert!(convoy_is_possible(&f.board, lon, nwy, true));
        assert!(!convoy_is_possible(&f.board, lon, f.prov("bel"), true));
    }

    #[test]
    fn convoy_chain_of_two_fleets() {
        let mut f = Fixture::new();
        let army = f.place("England", UnitType::Army, "lon");
        let eng = f.place("England", UnitType::Fleet, "eng");
        let mao = f.place("England", UnitType::Fleet, "mao");
        let dest = f.loc("por");
        for fleet in [eng, mao] {
            f.board.set_order(fleet, Order::ConvoyTransport { source: army, destination: dest }).unwrap();
        }
        f.board.set_order(army, Order::ConvoyMove { destination: dest }).unwrap();
        assert_eq!(f.check(army, Order::ConvoyMove { destination: dest }, true), Ok(()));
        assert_eq!(f.check(eng, Order::ConvoyTransport { source: army, destination: dest }, true), Ok(()));
        assert_eq!(f.check(mao, Order::ConvoyTransport { source: army, destination: dest }, true), Ok(()));
    }

    #[test]
    fn transport_must_match_army_order() {
        let mut f = Fixture::new();
        let army = f.place("England", UnitType::Army, "lon");
        let nth = f.place("England", UnitType::Fleet, "nth");
        let order = Order::ConvoyTransport { source: army, destination: f.loc("nwy") };
        assert_eq!(f.check(nth, order, true), Err(OrderViolation::ConvoyOrderMismatch("nwy".into())));
        assert_eq!(f.check(nth, order, false), Ok(()));
        let coastal = f.place("England", UnitType::Fleet, "edi");
        assert_eq!(f.check(coastal, order, false), Err(OrderViolation::ConvoyFromLand("edi".into())));
        assert_eq!(f.check(army, order, false), Err(OrderViolation::ArmyConvoying));
    }

    #[test]
    fn supports() {
        let mut f = Fixture::new();
        let mover = f.place("Germany", UnitType::Army, "mun");
        let helper = f.place("Germany", UnitType::Army, "ruh");
        let fleet = f.place("Germany", UnitType::Fleet, "kie");
        let bur = f.loc("bur");
        f.board.set_order(mover, Order::Move { destination: bur }).unwrap();

        let support = Order::Support { source: mover, destination: bur };
        assert_eq!(f.check(helper, support, true), Ok(()));
        assert_eq!(f.check(fleet, support, false), Err(OrderViolation::SupportUnreachable("bur".into())));
        assert_eq!(f.check(helper, Order::Support { source: helper, destination: bur }, false), Err(OrderViolation::SelfSupport));

        let hold = Order::Support { source: mover, destination: f.loc("mun") };
        assert_eq!(f.check(helper, hold, true), Err(OrderViolation::SupportOrderMismatch));
        assert_eq!(f.check(helper, hold, false), Ok(()));

        let elsewhere = Order::Support { source: mover, destination: f.loc("kie") };
        assert_eq!(f.check(helper, elsewhere, true), Err(OrderViolation::SupportOrderMismatch));
    }

    #[test]
    fn fleet_support_ignores_coasts() {
        let mut f = Fixture::new();
        let mao = f.place("France", UnitType::Fleet, "mao");
        let gol = f.place("France", UnitType::Fleet, "gol");
        let dest = f.loc("spa/nc");
        f.board.set_order(mao, Order::Move { destination: dest }).unwrap();
        assert_eq!(f.check(gol, Order::Support { source: mao, destination: dest }, true), Ok(()));
    }
}
