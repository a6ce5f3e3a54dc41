use quantum::{HintLevel, QuantumError};

use crate::MAX_SUIT_NAME_LENGTH;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Error type for an action rejected by the table.
///
/// Contradictions are not errors at this level: the table logs them as an
/// outcome of the action.
pub enum TableError {
    InvalidSeat {
        seat: usize,
        number_of_players: usize,
    },
    SuitNameNotSet {
        seat: usize,
    },
    SuitNameAlreadySet {
        seat: usize,
    },
    SuitNameTaken {
        suit_name: String,
    },
    InvalidSuitName {
        suit_name: String,
    },
    HintLevelAboveMaximum {
        requested: HintLevel,
        maximum: HintLevel,
    },
    HintLevelLowered {
        requested: HintLevel,
        current: HintLevel,
    },
    Game(QuantumError),
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Game(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::InvalidSeat {
                seat,
                number_of_players,
            } => write!(
                f,
                "Seat {} does not exist at a table for {} players",
                seat, number_of_players
            ),
            TableError::SuitNameNotSet { seat } => {
                write!(f, "Seat {} must set a suit name before making moves", seat)
            }
            TableError::SuitNameAlreadySet { seat } => {
                write!(f, "Seat {} has already set a suit name", seat)
            }
            TableError::SuitNameTaken { suit_name } => {
                write!(f, "Suit name '{}' is already taken", suit_name)
            }
            TableError::InvalidSuitName { suit_name } => write!(
                f,
                "Suit name '{}' must have between 1 and {} characters",
                suit_name, MAX_SUIT_NAME_LENGTH
            ),
            TableError::HintLevelAboveMaximum { requested, maximum } => write!(
                f,
                "Hint level {} exceeds the maximum hint level {} of the table",
                requested, maximum
            ),
            TableError::HintLevelLowered { requested, current } => write!(
                f,
                "Cannot lower the hint level from {} to {}",
                current, requested
            ),
            TableError::Game(_) => write!(f, "The game rejected the move"),
        }
    }
}

impl From<QuantumError> for TableError {
    fn from(err: QuantumError) -> Self {
        TableError::Game(err)
    }
}
