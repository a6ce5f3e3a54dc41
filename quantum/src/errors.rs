use crate::{Phase, MAX_PLAYERS};

/// The error type for every operation on a [`Hand`](crate::Hand) or a [`Game`](crate::Game).
///
/// Only [`Contradiction`](QuantumError::Contradiction) carries information
/// about the game: it proves that the attempted statement cannot be true.
/// Every other variant is a plain rejection of the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuantumError {
    InvalidPlayerCount { number_of_players: usize },
    InvalidPlayer { player: usize, number_of_players: usize },
    InvalidSuit { suit: usize, number_of_suits: usize },
    IllegalState(IllegalState),
    Contradiction(Contradiction),
    InvalidInference(InvalidInference),
}

impl QuantumError {
    pub fn is_contradiction(&self) -> bool {
        matches!(self, QuantumError::Contradiction(_))
    }

    /// Attributes a contradiction raised by a hand to the player holding it.
    pub(crate) fn for_player(self, player: usize) -> Self {
        match self {
            QuantumError::Contradiction(contradiction) if contradiction.player.is_none() => {
                QuantumError::Contradiction(Contradiction {
                    player: Some(player),
                    ..contradiction
                })
            }
            err => err,
        }
    }

    pub(crate) fn for_suit(self, suit: usize) -> Self {
        match self {
            QuantumError::Contradiction(contradiction) if contradiction.suit.is_none() => {
                QuantumError::Contradiction(contradiction.with_suit(suit))
            }
            err => err,
        }
    }
}

impl std::error::Error for QuantumError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantumError::IllegalState(err) => Some(err),
            QuantumError::Contradiction(err) => Some(err),
            QuantumError::InvalidInference(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuantumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantumError::InvalidPlayerCount { number_of_players } => write!(
                f,
                "Invalid number of players {}. Must be between 1 and {}",
                number_of_players, MAX_PLAYERS
            ),
            QuantumError::InvalidPlayer {
                player,
                number_of_players,
            } => write!(
                f,
                "Invalid player {}. Must be between 0 and {}",
                player,
                number_of_players.saturating_sub(1)
            ),
            QuantumError::InvalidSuit {
                suit,
                number_of_suits,
            } => write!(
                f,
                "Invalid suit {}. Must be between 0 and {}",
                suit,
                number_of_suits.saturating_sub(1)
            ),
            QuantumError::IllegalState(_) => write!(f, "Illegal action in the current game state"),
            QuantumError::Contradiction(_) => write!(f, "The statement leads to a contradiction"),
            QuantumError::InvalidInference(_) => write!(f, "Rejected update of the inferred cards"),
        }
    }
}

impl From<IllegalState> for QuantumError {
    fn from(err: IllegalState) -> Self {
        QuantumError::IllegalState(err)
    }
}

impl From<Contradiction> for QuantumError {
    fn from(err: Contradiction) -> Self {
        QuantumError::Contradiction(err)
    }
}

impl From<InvalidInference> for QuantumError {
    fn from(err: InvalidInference) -> Self {
        QuantumError::InvalidInference(err)
    }
}

/// The action does not fit the current phase, or it is not the caller's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalState {
    WrongPhase { action: &'static str, phase: Phase },
    NotYourTurn { player: usize, current_player: usize },
    NotTargeted { player: usize },
    TargetedSelf { player: usize },
    PlayerIsOut { player: usize },
    GameFinished,
}

impl std::error::Error for IllegalState {}

impl std::fmt::Display for IllegalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalState::WrongPhase { action, phase } => {
                write!(f, "Cannot {} in the {} phase", action, phase)
            }
            IllegalState::NotYourTurn {
                player,
                current_player,
            } => write!(
                f,
                "Player {} cannot act as it is the turn of player {}",
                player, current_player
            ),
            IllegalState::NotTargeted { player } => {
                write!(f, "Player {} cannot respond as they have not been targeted", player)
            }
            IllegalState::TargetedSelf { player } => {
                write!(f, "Player {} cannot target themselves", player)
            }
            IllegalState::PlayerIsOut { player } => {
                write!(f, "Player {} is out of cards and cannot take turns", player)
            }
            IllegalState::GameFinished => write!(f, "The game is already finished"),
        }
    }
}

/// Why a statement cannot be true.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContradictionReason {
    /// The player is known to hold none of the suit.
    SuitKnownAbsent,
    /// The player has neither a card of the suit nor an unidentified card.
    NoCardOfSuit,
    /// The player denies a suit they are known to hold.
    HoldsSuit,
    /// No deal of the cards satisfies everything said so far.
    NoConsistentDeal,
    /// The targeted player has no cards left.
    TargetIsOut,
    /// The claimed suit is not complete in the player's hand.
    NoWinningSuit,
    /// The claimed allocation does not match the deduced hands.
    WrongAllocation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contradiction {
    pub reason: ContradictionReason,
    pub player: Option<usize>,
    pub suit: Option<usize>,
}

impl Contradiction {
    pub fn new(reason: ContradictionReason) -> Self {
        Self {
            reason,
            player: None,
            suit: None,
        }
    }

    pub fn with_player(self, player: usize) -> Self {
        Self {
            player: Some(player),
            ..self
        }
    }

    pub fn with_suit(self, suit: usize) -> Self {
        Self {
            suit: Some(suit),
            ..self
        }
    }
}

impl std::error::Error for Contradiction {}

impl std::fmt::Display for Contradiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let who = match self.player {
            Some(player) => format!("Player {}", player),
            None => String::from("The player"),
        };
        let suit = match self.suit {
            Some(suit) => format!("suit {}", suit),
            None => String::from("the suit"),
        };
        match self.reason {
            ContradictionReason::SuitKnownAbsent => {
                write!(f, "{} is known to have no cards of {}", who, suit)
            }
            ContradictionReason::NoCardOfSuit => {
                write!(f, "{} has no card that could be of {}", who, suit)
            }
            ContradictionReason::HoldsSuit => {
                write!(f, "{} is known to hold cards of {}", who, suit)
            }
            ContradictionReason::NoConsistentDeal => {
                write!(f, "No deal of the cards is consistent with the game so far")
            }
            ContradictionReason::TargetIsOut => {
                write!(f, "{} is out of cards and cannot be targeted", who)
            }
            ContradictionReason::NoWinningSuit => {
                write!(f, "{} does not have a winning hand for {}", who, suit)
            }
            ContradictionReason::WrongAllocation => {
                write!(f, "Claimed hands do not match the inferred state of the hands")
            }
        }
    }
}

/// A proposed inferred state would lose information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidInference {
    WrongNumberOfSuits { expected: usize, actual: usize },
    TotalChanged { expected: u32, actual: u32 },
    UnknownIncreased { previous: u8, proposed: u8 },
    KnownDecreased { suit: usize, previous: u8, proposed: u8 },
}

impl std::error::Error for InvalidInference {}

impl std::fmt::Display for InvalidInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInference::WrongNumberOfSuits { expected, actual } => write!(
                f,
                "Expected counts for {} suits, got {}",
                expected, actual
            ),
            InvalidInference::TotalChanged { expected, actual } => write!(
                f,
                "Total number of inferred cards {} does not match the total number of cards {}",
                actual, expected
            ),
            InvalidInference::UnknownIncreased { previous, proposed } => write!(
                f,
                "Cannot increase the number of unknown cards from {} to {}",
                previous, proposed
            ),
            InvalidInference::KnownDecreased {
                suit,
                previous,
                proposed,
            } => write!(
                f,
                "Cannot decrease the number of cards for suit {} from {} to {}",
                suit, previous, proposed
            ),
        }
    }
}
