//! The normalized order shape the resolver works on.
//!
//! One [`AdjudicableOrder`] is built per standing unit at the start of a run
//! and discarded once the board has been updated.

use crate::board::{Board, Location, Order, PlayerId, ProvinceId, UnitId};

/// Per-order progress through a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionState {
    Unresolved,
    /// A resolution has been assumed while its dependencies are explored.
    Guessing,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Succeeds,
    Fails,
}

impl Resolution {
    #[inline]
    pub const fn succeeded(self) -> bool {
        matches!(self, Resolution::Succeeds)
    }
}

/// The five shapes movement orders collapse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Hold,
    Core,
    Move,
    Support,
    Convoy,
}

/// A unit's order, flattened to provinces, plus its resolution bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjudicableOrder {
    pub unit: UnitId,
    pub country: PlayerId,
    pub kind: OrderKind,
    pub current_province: ProvinceId,
    /// Province of the supported or convoyed unit.
    pub source_province: Option<ProvinceId>,
    /// Target province with any coast stripped.
    pub destination_province: Option<ProvinceId>,
    /// Target exactly as ordered.
    pub raw_destination: Option<Location>,
    pub requires_convoy: bool,
    /// Indices of the supports given to this order.
    pub supports: Vec<usize>,
    /// Indices of the convoys carrying this move.
    pub convoys: Vec<usize>,
    pub state: ResolutionState,
    pub resolution: Resolution,
}

impl AdjudicableOrder {
    /// Flattens a unit's movement-phase order. Returns `None` for retreat
    /// orders and for units no longer on the board.
    pub fn new(board: &Board, unit: UnitId, order: &Order) -> Option<Self> {
        let u = board.unit(unit)?;
        let mut out = AdjudicableOrder {
            unit,
            country: u.player,
            kind: OrderKind::Hold,
            current_province: u.province,
            source_province: None,
            destination_province: None,
            raw_destination: None,
            requires_convoy: false,
            supports: Vec::new(),
            convoys: Vec::new(),
            state: ResolutionState::Unresolved,
            resolution: Resolution::Fails,
        };
        match *order {
            Order::Hold => {}
            Order::Core => out.kind = OrderKind::Core,
            Order::Move { destination } | Order::ConvoyMove { destination } => {
                out.kind = OrderKind::Move;
                out.destination_province = Some(board.base_province(destination));
                out.raw_destination = Some(destination);
                out.requires_convoy = matches!(order, Order::ConvoyMove { .. });
            }
            Order::Support { source, destination } | Order::ConvoyTransport { source, destination } => {
                out.kind = if matches!(order, Order::Support { .. }) {
                    OrderKind::Support
                } else {
                    OrderKind::Convoy
                };
                out.source_province = Some(board.unit(source)?.province);
                out.destination_province = Some(board.base_province(destination));
                out.raw_destination = Some(destination);
            }
            Order::RetreatMove { .. } | Order::RetreatDisband => return None,
        }
        Some(out)
    }

    #[inline]
    pub fn is_move(&self) -> bool {
        self.kind == OrderKind::Move
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.state == ResolutionState::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{classic_board, UnitType};

    #[test]
    fn flattens_orders() {
        let mut board = classic_board().unwrap();
        let it = board.player_id("Italy").unwrap();
        let nap = board.location("nap").unwrap();
        let ion = board.location("ion").unwrap();
        let army = board.add_unit(it, UnitType::Army, nap).unwrap();
        let fleet = board.add_unit(it, UnitType::Fleet, ion).unwrap();
        let tun = board.location("tun").unwrap();

        let mv = AdjudicableOrder::new(&board, army, &Order::ConvoyMove { destination: tun }).unwrap();
        assert_eq!(mv.kind, OrderKind::Move);
        assert!(mv.requires_convoy);
        assert_eq!(mv.destination_province, board.province_id("tun"));
        assert_eq!(mv.state, ResolutionState::Unresolved);

        let cv = AdjudicableOrder::new(&board, fleet, &Order::ConvoyTransport { source: army, destination: tun })
            .unwrap();
        assert_eq!(cv.kind, OrderKind::Convoy);
        assert_eq!(cv.source_province, board.province_id("nap"));
        assert_eq!(cv.current_province, board.province_id("ion").unwrap());

        assert!(AdjudicableOrder::new(&board, army, &Order::RetreatDisband).is_none());
    }

    #[test]
    fn destination_strips_coast() {
        let mut board = classic_board().unwrap();
        let fr = board.player_id("France").unwrap();
        let mao = board.location("mao").unwrap();
        let fleet = board.add_unit(fr, UnitType::Fleet, mao).unwrap();
        let nc = board.location("spa/nc").unwrap();
        let mv = AdjudicableOrder::new(&board, fleet, &Order::Move { destination: nc }).unwrap();
        assert_eq!(mv.destination_province, board.province_id("spa"));
        assert_eq!(mv.raw_destination, Some(nc));
        assert!(!mv.requires_convoy);
    }
}
