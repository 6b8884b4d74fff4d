//! Order resolution.
//!
//! Resolves a set of simultaneous orders into outcomes (succeeds, fails,
//! dislodged) using the Kruijswijk algorithm, then the retreats that follow.

pub mod adjudicable;
pub mod batch;
pub mod kruijswijk;
pub mod outcome;
pub mod retreat;

pub use adjudicable::{AdjudicableOrder, OrderKind, Resolution, ResolutionState};
pub use batch::{adjudicate_boards, adjudicate_boards_with_threads};
pub use kruijswijk::{adjudicate, adjudicate_with, AdjudicationError, Adjudicator};
pub use outcome::{Adjudication, DislodgedUnit, InvalidOrder, OrderResult, ResolvedOrder};
pub use retreat::adjudicate_retreats;
