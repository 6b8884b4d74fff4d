//! Board representation.
//!
//! Provinces, coasts, players, and units live in index-addressed arenas owned
//! by [`Board`]; everything else refers to them by id.

pub mod builder;
pub mod classic;
pub mod order;
pub mod player;
pub mod province;
pub mod state;
pub mod unit;

pub use builder::{BoardBuilder, BoardError};
pub use classic::{classic_board, classic_starting_board};
pub use order::Order;
pub use player::{Player, PlayerId};
pub use province::{Coast, CoastId, Location, Province, ProvinceId, ProvinceType};
pub use state::Board;
pub use unit::{Unit, UnitId, UnitType};
