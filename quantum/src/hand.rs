use std::collections::BTreeMap;

use crate::{
    CardCounts, Contradiction, ContradictionReason, HandState, HintLevel, InvalidInference,
    QuantumError, SuitSet,
};

/// Number of cards of each suit in the game.
pub const CARDS_PER_SUIT: u8 = 4;
/// Number of cards every player starts with.
pub const DEFAULT_HAND_SIZE: u8 = 4;
/// The largest supported number of players (and therefore suits).
pub const MAX_PLAYERS: usize = 16;

/// What is publicly known about one player's hand.
///
/// Knowledge is kept at two levels:
/// - declared cards are forced by the player's own actions (asking for a suit,
///   receiving a card),
/// - inferred cards follow from the actions of all players.
///
/// Therefore `declared[suit] <= inferred[suit]` for every real suit, and
/// `declared.unknown() >= inferred.unknown()`. Both levels always account for
/// the same number of cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hand {
    declared: CardCounts,
    inferred: CardCounts,
    // Suits the player is known to hold no cards of.
    absent: SuitSet,
}

impl Hand {
    pub fn new(number_of_players: usize) -> Result<Self, QuantumError> {
        if number_of_players == 0 || number_of_players > MAX_PLAYERS {
            return Err(QuantumError::InvalidPlayerCount { number_of_players });
        }
        let declared = CardCounts::hidden(number_of_players, DEFAULT_HAND_SIZE);
        Ok(Self {
            inferred: declared.clone(),
            declared,
            absent: SuitSet::new(),
        })
    }

    fn validate_suit(&self, suit: usize) -> Result<(), QuantumError> {
        if suit >= self.number_of_suits() {
            Err(QuantumError::InvalidSuit {
                suit,
                number_of_suits: self.number_of_suits(),
            })
        } else {
            Ok(())
        }
    }

    /// Receives a card of `suit` from another player.
    pub fn add_card(&mut self, suit: usize) -> Result<(), QuantumError> {
        self.validate_suit(suit)?;
        *self.declared.suit_mut(suit) += 1;
        *self.inferred.suit_mut(suit) += 1;
        self.absent = self.absent.remove(suit);
        Ok(())
    }

    /// Gives a card of `suit` to another player.
    pub fn remove_card(&mut self, suit: usize) -> Result<(), QuantumError> {
        self.validate_suit(suit)?;
        if self.absent.contains(suit) {
            return Err(contradiction(ContradictionReason::SuitKnownAbsent, suit));
        }

        // Being able to remove an inferred card guarantees that a declared one can be removed too.
        if self.inferred[suit] > 0 {
            *self.inferred.suit_mut(suit) -= 1;
        } else if self.inferred.unknown() > 0 {
            *self.inferred.unknown_mut() -= 1;
        } else {
            return Err(contradiction(ContradictionReason::NoCardOfSuit, suit));
        }

        if self.declared[suit] > 0 {
            *self.declared.suit_mut(suit) -= 1;
        } else {
            *self.declared.unknown_mut() -= 1;
        }

        self.fold_declared_zeros_into_absent();
        Ok(())
    }

    /// Asks another player for `suit`, which proves holding at least one card of it.
    pub fn request_suit(&mut self, suit: usize) -> Result<(), QuantumError> {
        self.validate_suit(suit)?;
        if self.absent.contains(suit) {
            return Err(contradiction(ContradictionReason::SuitKnownAbsent, suit));
        }

        if self.inferred[suit] == 0 {
            if self.inferred.unknown() == 0 {
                return Err(contradiction(ContradictionReason::NoCardOfSuit, suit));
            }
            *self.inferred.suit_mut(suit) = 1;
            *self.inferred.unknown_mut() -= 1;
        }

        if self.declared[suit] == 0 {
            *self.declared.suit_mut(suit) = 1;
            *self.declared.unknown_mut() -= 1;
        }

        self.fold_declared_zeros_into_absent();
        Ok(())
    }

    /// Records that the player holds no cards of `suit`. Idempotent.
    pub fn does_not_have_suit(&mut self, suit: usize) -> Result<(), QuantumError> {
        self.validate_suit(suit)?;
        if self.absent.contains(suit) {
            return Ok(());
        }
        if self.inferred[suit] > 0 {
            return Err(contradiction(ContradictionReason::HoldsSuit, suit));
        }
        self.absent = self.absent.insert(suit);
        Ok(())
    }

    /// Replaces the inferred cards with a state at least as certain as the current one.
    pub fn update_inferred_cards(&mut self, inferred: CardCounts) -> Result<(), QuantumError> {
        if inferred.number_of_suits() != self.number_of_suits() {
            return Err(QuantumError::InvalidInference(InvalidInference::WrongNumberOfSuits {
                expected: self.number_of_suits(),
                actual: inferred.number_of_suits(),
            }));
        }
        if inferred.total() != self.total_cards() {
            return Err(QuantumError::InvalidInference(InvalidInference::TotalChanged {
                expected: self.total_cards(),
                actual: inferred.total(),
            }));
        }
        if inferred.unknown() > self.inferred.unknown() {
            return Err(QuantumError::InvalidInference(InvalidInference::UnknownIncreased {
                previous: self.inferred.unknown(),
                proposed: inferred.unknown(),
            }));
        }
        for (suit, previous) in self.inferred.iter() {
            if inferred[suit] < previous {
                return Err(QuantumError::InvalidInference(InvalidInference::KnownDecreased {
                    suit,
                    previous,
                    proposed: inferred[suit],
                }));
            }
        }

        self.inferred = inferred;
        Ok(())
    }

    /// Once every declared card is identified, the player has nowhere left to hide a suit.
    fn fold_declared_zeros_into_absent(&mut self) {
        if self.declared.unknown() == 0 {
            self.absent = self
                .declared
                .iter()
                .filter(|&(_, count)| count == 0)
                .map(|(suit, _)| suit)
                .collect();
        }
    }

    /// Whether `claimed` matches the inferred cards exactly. Only a fully
    /// determined hand can be claimed.
    pub fn is_correct_claim(&self, claimed: &BTreeMap<usize, u8>) -> bool {
        if !self.is_fully_determined() {
            return false;
        }
        let claimed_count = |suit: usize| claimed.get(&suit).copied().unwrap_or(0);
        self.inferred
            .iter()
            .all(|(suit, count)| claimed_count(suit) == count)
            && claimed
                .iter()
                .all(|(&suit, &count)| suit < self.number_of_suits() || count == 0)
    }

    /// The hand as a viewer at `hint_level` may see it.
    pub fn export(&self, hint_level: HintLevel) -> HandState {
        match hint_level {
            HintLevel::None => HandState {
                total_cards: self.total_cards(),
                suits: CardCounts::hidden(
                    self.number_of_suits(),
                    u8::try_from(self.total_cards()).unwrap_or(u8::MAX),
                ),
                does_not_have_suit: SuitSet::new(),
            },
            HintLevel::Track => HandState {
                total_cards: self.total_cards(),
                suits: self.declared.clone(),
                does_not_have_suit: self.absent,
            },
            HintLevel::Full => HandState {
                total_cards: self.total_cards(),
                suits: self.inferred.clone(),
                does_not_have_suit: self.absent,
            },
        }
    }

    /// Number of players in the game, which equals the number of suits.
    pub fn number_of_suits(&self) -> usize {
        self.declared.number_of_suits()
    }

    pub fn declared_cards(&self) -> &CardCounts {
        &self.declared
    }

    pub fn inferred_cards(&self) -> &CardCounts {
        &self.inferred
    }

    pub fn total_cards(&self) -> u32 {
        self.declared.total()
    }

    pub fn suits_not_available(&self) -> SuitSet {
        self.absent
    }

    /// Suits of which the player provably holds every card.
    pub fn winning_suits(&self) -> SuitSet {
        self.inferred
            .iter()
            .filter(|&(_, count)| count >= CARDS_PER_SUIT)
            .map(|(suit, _)| suit)
            .collect()
    }

    pub fn is_fully_determined(&self) -> bool {
        self.inferred.unknown() == 0
    }
}

fn contradiction(reason: ContradictionReason, suit: usize) -> QuantumError {
    Contradiction::new(reason).with_suit(suit).into()
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hand(declared={}, inferred={}, does_not_have_suit={:?})",
            self.declared,
            self.inferred,
            Vec::from(self.absent)
        )
    }
}
