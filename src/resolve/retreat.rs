//! Retreat-phase resolution.
//!
//! Every dislodged unit either retreats to one of its retreat options or is
//! disbanded. Two or more retreats into the same province all bounce and the
//! units are disbanded; a unit with no order, or an invalid one, is disbanded
//! too (civil disorder). Retreats never depend on one another, so there is no
//! guessing here.

use std::collections::BTreeMap;

use tracing::debug;

use crate::board::{Board, CoastId, Location, Order, ProvinceId, UnitId, UnitType};
use crate::validity::{unit_order_is_valid, OrderViolation};

use super::kruijswijk::AdjudicationError;
use super::outcome::{Adjudication, InvalidOrder, OrderResult, ResolvedOrder};

/// A retreat that passed validation.
struct Retreat {
    unit: UnitId,
    to: ProvinceId,
    coast: Option<CoastId>,
}

/// Adjudicates the retreat sub-phase and applies it to the board.
///
/// Afterwards no province holds a dislodged unit, every surviving unit has
/// `retreat_options == None`, and all orders are cleared.
pub fn adjudicate_retreats(board: &mut Board) -> Result<Adjudication, AdjudicationError> {
    board.check_references()?;
    for (id, unit) in board.units() {
        if let Some(order) = unit.order.filter(|o| unit.is_dislodged() && !o.is_retreat()) {
            return Err(AdjudicationError::UnexpectedOrder { unit: id, order });
        }
    }

    let dislodged = board.dislodged_units();
    let mut outcomes = Vec::with_capacity(dislodged.len());
    let mut invalid = Vec::new();
    let mut retreats = Vec::new();

    for &unit in &dislodged {
        let Some(u) = board.unit(unit) else {
            continue;
        };
        let order = u.order;
        match order {
            Some(Order::RetreatMove { destination }) => match check_retreat(board, unit, destination) {
                Ok(retreat) => retreats.push(retreat),
                Err(reason) => {
                    debug!(unit = %unit, %reason, "invalid retreat, disbanding");
                    invalid.push(InvalidOrder { unit, order, reason });
                }
            },
            Some(_) => {}
            None => invalid.push(InvalidOrder {
                unit,
                order: None,
                reason: OrderViolation::MissingOrder,
            }),
        }
    }

    let mut contested: BTreeMap<ProvinceId, usize> = BTreeMap::new();
    for r in &retreats {
        *contested.entry(r.to).or_default() += 1;
    }

    let mut moved = Vec::new();
    for &unit in &dislodged {
        let Some(u) = board.unit(unit) else {
            continue;
        };
        let (player, order) = (u.player, u.order.unwrap_or(Order::RetreatDisband));
        let retreat = retreats.iter().find(|r| r.unit == unit);
        let result = match retreat {
            Some(r) if contested.get(&r.to).copied().unwrap_or(0) > 1 => OrderResult::Bounced,
            Some(r) => {
                moved.push((r.unit, r.to, r.coast));
                OrderResult::Succeeded
            }
            None => OrderResult::Disbanded,
        };
        outcomes.push(ResolvedOrder {
            unit,
            player,
            order,
            result,
        });
    }

    for p in board.province_ids().collect::<Vec<_>>() {
        board.province_mut(p).dislodged_unit = None;
    }
    for &(unit, to, coast) in &moved {
        board.province_mut(to).unit = Some(unit);
        if let Some(u) = board.unit_mut(unit) {
            u.province = to;
            u.coast = coast;
            u.retreat_options = None;
        }
        debug!(unit = %unit, to = %board.province(to).name, "unit retreated");
    }
    for outcome in &outcomes {
        if outcome.result != OrderResult::Succeeded {
            board.remove_unit(outcome.unit);
            debug!(unit = %outcome.unit, "unit disbanded");
        }
    }
    board.clear_orders();

    Ok(Adjudication {
        outcomes,
        invalid_orders: invalid,
        dislodged: Vec::new(),
    })
}

fn check_retreat(board: &Board, unit: UnitId, destination: Location) -> Result<Retreat, OrderViolation> {
    let u = board.unit(unit).ok_or(OrderViolation::UnknownUnit(unit))?;
    let options = u.retreat_options.as_ref().ok_or(OrderViolation::NotDislodged)?;
    let to = board.base_province(destination);
    let target = board.province(to);
    if !options.contains(&to) || target.unit.is_some() {
        return Err(OrderViolation::NotARetreatOption(target.name.clone()));
    }
    unit_order_is_valid(board, unit, Some(&Order::RetreatMove { destination }), false)?;

    let coast = match u.unit_type {
        UnitType::Fleet if !target.is_sea() => destination
            .coast()
            .or_else(|| board.reachable_coasts(u.location(), to).first().copied()),
        _ => None,
    };
    Ok(Retreat { unit, to, coast })
}
