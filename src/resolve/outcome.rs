//! Per-unit results of an adjudication run.
//!
//! The resolver discards its internal order set once the board is updated;
//! this report is what a hosting layer keeps to tell players what happened.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{Order, PlayerId, ProvinceId, UnitId};
use crate::validity::OrderViolation;

/// The outcome of a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderResult {
    Succeeded,
    Failed,
    /// A move or retreat that did not reach its destination.
    Bounced,
    /// A support that was cut.
    Cut,
    /// The unit was forced out of its province.
    Dislodged,
    /// The unit was removed in the retreat sub-phase.
    Disbanded,
}

/// An order paired with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOrder {
    pub unit: UnitId,
    pub player: PlayerId,
    /// The order as adjudicated, after any downgrade to hold.
    pub order: Order,
    pub result: OrderResult,
}

/// An order rejected before adjudication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidOrder {
    pub unit: UnitId,
    /// `None` when the unit was given no order at all.
    pub order: Option<Order>,
    pub reason: OrderViolation,
}

/// A unit dislodged by a movement phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislodgedUnit {
    pub unit: UnitId,
    pub province: ProvinceId,
    pub attacker_from: ProvinceId,
    pub retreat_options: BTreeSet<ProvinceId>,
}

/// Everything a caller needs to report one phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjudication {
    pub outcomes: Vec<ResolvedOrder>,
    pub invalid_orders: Vec<InvalidOrder>,
    pub dislodged: Vec<DislodgedUnit>,
}

impl Adjudication {
    /// Returns the result recorded for a unit.
    pub fn result_for(&self, unit: UnitId) -> Option<OrderResult> {
        self.outcomes.iter().find(|o| o.unit == unit).map(|o| o.result)
    }

    pub fn is_dislodged(&self, unit: UnitId) -> bool {
        self.dislodged.iter().any(|d| d.unit == unit)
    }

    pub fn invalid_reason(&self, unit: UnitId) -> Option<&OrderViolation> {
        self.invalid_orders.iter().find(|o| o.unit == unit).map(|o| &o.reason)
    }
}
