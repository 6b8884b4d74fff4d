//! Garrison: order adjudication for Diplomacy-style games.
//!
//! Exposes the board representation, the order legality checker, and the
//! resolver that turns one phase of simultaneous orders into a new position.

pub mod board;
pub mod options;
pub mod resolve;
pub mod validity;

pub use board::{Board, BoardBuilder, BoardError, Location, Order, UnitId, UnitType};
pub use options::AdjudicationOptions;
pub use resolve::{adjudicate, adjudicate_retreats, Adjudication, AdjudicationError, Adjudicator, OrderResult};
pub use validity::{convoy_is_possible, order_is_valid, OrderViolation};
