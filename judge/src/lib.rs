mod bot;
mod error;
mod game;
mod recording;
mod table;
pub use bot::*;
pub use error::*;
pub use game::*;
pub use recording::*;
pub use table::*;

use quantum::HintLevel;

pub struct Config {
    pub rng: rand::rngs::StdRng,
    pub recorder: Option<recording::Recorder>,
    /// The most detailed hint level a seat may choose.
    pub max_hint_level: HintLevel,
    /// Games still running after this many rounds are abandoned.
    pub max_moves: u32,
    /// How often a bot may propose a rejected action in a row. Targeting
    /// always allows at least one attempt per (player, suit) pair.
    pub max_attempts: usize,
}
