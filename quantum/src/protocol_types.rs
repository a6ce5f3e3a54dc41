use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CardCounts, SuitSet};

/// How much of a hand is revealed to a viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintLevel {
    /// Only the number of cards.
    None,
    /// What the owner's own actions forced.
    Track,
    /// Everything that follows from all public statements.
    Full,
}

impl HintLevel {
    pub const ALL: [HintLevel; 3] = [HintLevel::None, HintLevel::Track, HintLevel::Full];
}

impl std::fmt::Display for HintLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HintLevel::None => write!(f, "none"),
            HintLevel::Track => write!(f, "track"),
            HintLevel::Full => write!(f, "full"),
        }
    }
}

/// The error type for the [`FromStr`] instance of [`HintLevel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseHintLevelError(String);

impl std::error::Error for ParseHintLevelError {}

impl std::fmt::Display for ParseHintLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown hint level '{}', expected one of none, track, full",
            self.0
        )
    }
}

impl FromStr for HintLevel {
    type Err = ParseHintLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(HintLevel::None),
            "track" => Ok(HintLevel::Track),
            "full" => Ok(HintLevel::Full),
            _ => Err(ParseHintLevelError(String::from(s))),
        }
    }
}

/// Where a game is in its turn protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The current player asks another player for a suit.
    TargetPlayer,
    /// The targeted player answers.
    Response,
    /// The current player may claim a win.
    ClaimWin,
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::TargetPlayer => write!(f, "target player"),
            Phase::Response => write!(f, "response"),
            Phase::ClaimWin => write!(f, "claim win"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// The pending question of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub player: usize,
    pub suit: usize,
}

/// A hand as seen at some [`HintLevel`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandState {
    pub total_cards: u32,
    pub suits: CardCounts,
    pub does_not_have_suit: SuitSet,
}

impl HandState {
    /// Whether, as far as the viewer can tell, the player may hold `suit`.
    pub fn can_have_suit(&self, suit: usize) -> bool {
        !self.does_not_have_suit.contains(suit)
            && (self.suits.suit(suit) > 0 || self.suits.unknown() > 0)
    }
}

/// For each player, the number of cards per suit.
///
/// Missing players and suits count as zero cards.
pub type SuitAllocation = BTreeMap<usize, BTreeMap<usize, u8>>;

/// The moves a client may offer in the current phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "moves", rename_all = "snake_case")]
pub enum AvailableMoves {
    Suits(Vec<usize>),
    Responses(Vec<bool>),
    Nothing,
}

/// Everything a viewer may know about a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    pub hint_level: HintLevel,
    pub viewer: Option<usize>,
    /// Whether the viewer is the player expected to act next.
    pub viewer_to_act: bool,
    /// Snapshots of all hands: the initial deal and the end of every round.
    pub history: Vec<Vec<HandState>>,
    pub winner: Option<usize>,
    pub phase: Phase,
    pub current_player: usize,
    pub move_number: u32,
    pub current_target_player: Option<usize>,
    pub current_target_suit: Option<usize>,
    pub current_hands: Vec<HandState>,
    pub available_moves: AvailableMoves,
    pub players_are_out: Vec<usize>,
}
