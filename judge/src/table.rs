use quantum::{Game, GameStateView, HintLevel, Phase, QuantumError, SuitAllocation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::TableError;

pub const MAX_SUIT_NAME_LENGTH: usize = 20;

/// Everything a seat can ask the table to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SetSuitName { suit_name: String },
    SetHintLevel { hint_level: HintLevel },
    TargetPlayer { targeted_player: usize, suit: usize },
    RespondToTarget { response: bool },
    ClaimNoWin,
    ClaimOwnSuit { suit: usize },
    ClaimAllSuitsDetermined { suit_allocation: SuitAllocation },
}

impl Action {
    fn is_claim(&self) -> bool {
        matches!(
            self,
            Action::ClaimOwnSuit { .. } | Action::ClaimAllSuitsDetermined { .. }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Success,
    Won,
    /// A wrong claim. The game went on.
    ContradictionContinue,
    /// A contradictory statement. The game is as before.
    ContradictionReverted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub player: usize,
    pub action: Action,
    pub outcome: ActionOutcome,
    /// The move number once the action took effect. Zero for actions
    /// before the game.
    pub move_number: u32,
}

/// What a seat (or a spectator) sees of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub game: GameStateView,
    pub suit_names: Vec<Option<String>>,
    pub hint_levels: Vec<HintLevel>,
    pub contradiction_count: Vec<u32>,
    pub log: Vec<LogEntry>,
}

/// A game together with the players' settings and a log of their actions.
pub struct Table {
    game: Game,
    max_hint_level: HintLevel,
    hint_levels: Vec<HintLevel>,
    suit_names: Vec<Option<String>>,
    contradiction_count: Vec<u32>,
    log: Vec<LogEntry>,
}

impl Table {
    pub fn new(number_of_players: usize, max_hint_level: HintLevel) -> Result<Self, TableError> {
        Ok(Self {
            game: Game::new(number_of_players)?,
            max_hint_level,
            hint_levels: vec![HintLevel::None; number_of_players],
            suit_names: vec![None; number_of_players],
            contradiction_count: vec![0; number_of_players],
            log: Vec::new(),
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn number_of_players(&self) -> usize {
        self.game.number_of_players()
    }

    pub fn max_hint_level(&self) -> HintLevel {
        self.max_hint_level
    }

    pub fn suit_names(&self) -> &[Option<String>] {
        &self.suit_names
    }

    pub fn hint_levels(&self) -> &[HintLevel] {
        &self.hint_levels
    }

    pub fn contradiction_count(&self) -> &[u32] {
        &self.contradiction_count
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    fn validate_seat(&self, seat: usize) -> Result<(), TableError> {
        if seat >= self.number_of_players() {
            Err(TableError::InvalidSeat {
                seat,
                number_of_players: self.number_of_players(),
            })
        } else {
            Ok(())
        }
    }

    /// Performs an action for `seat`.
    ///
    /// Statements that contradict the game so far are not errors: they are
    /// counted, logged and reported as the outcome.
    pub fn apply(&mut self, seat: usize, action: Action) -> Result<ActionOutcome, TableError> {
        self.validate_seat(seat)?;
        if self.suit_names[seat].is_none() && !matches!(action, Action::SetSuitName { .. }) {
            return Err(TableError::SuitNameNotSet { seat });
        }

        let result = match &action {
            Action::SetSuitName { suit_name } => {
                let suit_name = self.set_suit_name(seat, suit_name)?;
                self.log.push(LogEntry {
                    player: seat,
                    action: Action::SetSuitName { suit_name },
                    outcome: ActionOutcome::Success,
                    move_number: 0,
                });
                return Ok(ActionOutcome::Success);
            }
            Action::SetHintLevel { hint_level } => {
                self.set_hint_level(seat, *hint_level)?;
                return Ok(ActionOutcome::Success);
            }
            Action::TargetPlayer {
                targeted_player,
                suit,
            } => self.game.target_player(seat, *targeted_player, *suit),
            Action::RespondToTarget { response } => self.game.respond_to_target(seat, *response),
            Action::ClaimNoWin => self.game.claim_no_win(seat),
            Action::ClaimOwnSuit { suit } => self.game.claim_own_a_suit(seat, *suit),
            Action::ClaimAllSuitsDetermined { suit_allocation } => {
                self.game.claim_all_suits_determined(seat, suit_allocation)
            }
        };

        let move_number = self.game.move_number();
        let outcome = match result {
            Ok(()) if self.game.phase() == Phase::Finished && self.game.winner() == Some(seat) => {
                info!(seat, move_number, "Won the game");
                ActionOutcome::Won
            }
            Ok(()) => ActionOutcome::Success,
            Err(QuantumError::Contradiction(contradiction)) => {
                debug!(seat, %contradiction, "Contradiction");
                self.contradiction_count[seat] += 1;
                if action.is_claim() {
                    ActionOutcome::ContradictionContinue
                } else {
                    ActionOutcome::ContradictionReverted
                }
            }
            Err(err) => {
                debug!(seat, ?action, %err, "Rejected action");
                return Err(err.into());
            }
        };

        debug!(seat, ?action, ?outcome, move_number);
        self.log.push(LogEntry {
            player: seat,
            action,
            outcome,
            move_number,
        });
        Ok(outcome)
    }

    /// Returns the name as stored.
    fn set_suit_name(&mut self, seat: usize, suit_name: &str) -> Result<String, TableError> {
        if self.suit_names[seat].is_some() {
            return Err(TableError::SuitNameAlreadySet { seat });
        }
        let suit_name = suit_name.trim();
        let length = suit_name.chars().count();
        if length == 0 || length > MAX_SUIT_NAME_LENGTH {
            return Err(TableError::InvalidSuitName {
                suit_name: String::from(suit_name),
            });
        }
        if self.suit_names.iter().flatten().any(|taken| taken == suit_name) {
            return Err(TableError::SuitNameTaken {
                suit_name: String::from(suit_name),
            });
        }
        self.suit_names[seat] = Some(String::from(suit_name));
        Ok(String::from(suit_name))
    }

    fn set_hint_level(&mut self, seat: usize, hint_level: HintLevel) -> Result<(), TableError> {
        if hint_level > self.max_hint_level {
            return Err(TableError::HintLevelAboveMaximum {
                requested: hint_level,
                maximum: self.max_hint_level,
            });
        }
        if hint_level < self.hint_levels[seat] {
            return Err(TableError::HintLevelLowered {
                requested: hint_level,
                current: self.hint_levels[seat],
            });
        }
        self.hint_levels[seat] = hint_level;
        Ok(())
    }

    /// The table as seen from `viewer`, at the hint level that seat chose.
    /// Spectators see no hints.
    pub fn export_state(&self, viewer: Option<usize>) -> Result<TableView, TableError> {
        let hint_level = match viewer {
            Some(seat) => {
                self.validate_seat(seat)?;
                self.hint_levels[seat]
            }
            None => HintLevel::None,
        };
        Ok(TableView {
            game: self.game.export_state(hint_level, viewer)?,
            suit_names: self.suit_names.clone(),
            hint_levels: self.hint_levels.clone(),
            contradiction_count: self.contradiction_count.clone(),
            log: self.log.clone(),
        })
    }
}
