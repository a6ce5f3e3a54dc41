//! Rules engine for Quantum Go Fish.
//!
//! Players start with four hidden cards and ask each other for suits. Every
//! public statement narrows the set of deals consistent with the game so far.
//! [`Hand`] tracks what is known about one player, [`solve()`] decides whether
//! any deal is still possible and what every deal has in common, and [`Game`]
//! runs the turn protocol on top of both.
pub use counts::*;
pub use errors::*;
pub use game::*;
pub use hand::*;
pub use protocol_types::*;
pub use solver::*;
pub use suit_set::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod counts;
mod errors;
mod game;
mod hand;
mod protocol_types;
mod solver;
mod suit_set;
mod visualization;
