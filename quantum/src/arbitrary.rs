use quickcheck::{Arbitrary, Gen};

use crate::{Game, Hand, QuantumError};

/// A single statement about one hand, with suits for a four player game.
#[derive(Clone, Copy, Debug)]
pub enum HandOperation {
    Add(usize),
    Remove(usize),
    Request(usize),
    Deny(usize),
    /// Identifies one unknown card as the suit.
    Reveal(usize),
}

impl HandOperation {
    pub fn apply(self, hand: &mut Hand) -> Result<(), QuantumError> {
        match self {
            HandOperation::Add(suit) => hand.add_card(suit),
            HandOperation::Remove(suit) => hand.remove_card(suit),
            HandOperation::Request(suit) => hand.request_suit(suit),
            HandOperation::Deny(suit) => hand.does_not_have_suit(suit),
            HandOperation::Reveal(suit) => {
                let inferred = hand.inferred_cards();
                if inferred.unknown() == 0 || hand.suits_not_available().contains(suit) {
                    return Ok(());
                }
                let mut suits = inferred.suits().to_vec();
                suits[suit] += 1;
                let revealed = crate::CardCounts::from_parts(suits, inferred.unknown() - 1);
                hand.update_inferred_cards(revealed)
            }
        }
    }
}

impl Arbitrary for HandOperation {
    fn arbitrary(g: &mut Gen) -> Self {
        let suit = usize::from(u8::arbitrary(g) % 4);
        match u8::arbitrary(g) % 5 {
            0 => HandOperation::Add(suit),
            1 => HandOperation::Remove(suit),
            2 => HandOperation::Request(suit),
            3 => HandOperation::Deny(suit),
            _ => HandOperation::Reveal(suit),
        }
    }
}

/// Hands of a game with 2 to 4 players, each changed on its own.
///
/// The hands need not be consistent with each other.
#[derive(Clone, Debug)]
pub struct HandsInput {
    pub hands: Vec<Hand>,
}

impl Arbitrary for HandsInput {
    fn arbitrary(g: &mut Gen) -> Self {
        let number_of_players = 2 + usize::from(u8::arbitrary(g) % 3);
        let mut hands = Vec::with_capacity(number_of_players);
        for _ in 0..number_of_players {
            let mut hand = Hand::new(number_of_players).unwrap();
            for _ in 0..u8::arbitrary(g) % 6 {
                let op = match HandOperation::arbitrary(g) {
                    HandOperation::Add(suit) => HandOperation::Add(suit % number_of_players),
                    HandOperation::Remove(suit) => HandOperation::Remove(suit % number_of_players),
                    HandOperation::Request(suit) => {
                        HandOperation::Request(suit % number_of_players)
                    }
                    HandOperation::Deny(suit) => HandOperation::Deny(suit % number_of_players),
                    HandOperation::Reveal(suit) => HandOperation::Reveal(suit % number_of_players),
                };
                let _ = op.apply(&mut hand);
            }
            hands.push(hand);
        }
        HandsInput { hands }
    }
}

/// A move made by whoever is expected to act. Players and suits are
/// reduced modulo the number of players.
#[derive(Clone, Copy, Debug)]
pub enum Step {
    Target { target: u8, suit: u8 },
    Respond(bool),
    ClaimNoWin,
    ClaimOwnSuit(u8),
}

impl Step {
    pub fn apply(self, game: &mut Game) -> Result<(), QuantumError> {
        let n = game.number_of_players();
        let current_player = game.current_player();
        match self {
            Step::Target { target, suit } => game.target_player(
                current_player,
                usize::from(target) % n,
                usize::from(suit) % n,
            ),
            Step::Respond(response) => {
                let responder = game.current_target_player().unwrap_or(current_player);
                game.respond_to_target(responder, response)
            }
            Step::ClaimNoWin => game.claim_no_win(current_player),
            Step::ClaimOwnSuit(suit) => {
                game.claim_own_a_suit(current_player, usize::from(suit) % n)
            }
        }
    }
}

impl Arbitrary for Step {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 4 {
            0 => Step::Target {
                target: u8::arbitrary(g),
                suit: u8::arbitrary(g),
            },
            1 => Step::Respond(bool::arbitrary(g)),
            2 => Step::ClaimNoWin,
            _ => Step::ClaimOwnSuit(u8::arbitrary(g)),
        }
    }
}

/// A sequence of moves for a fresh game of 2 to 4 players.
#[derive(Clone, Debug)]
pub struct Script {
    pub number_of_players: usize,
    pub steps: Vec<Step>,
}

impl Arbitrary for Script {
    fn arbitrary(g: &mut Gen) -> Self {
        Script {
            number_of_players: 2 + usize::from(u8::arbitrary(g) % 3),
            steps: Vec::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let number_of_players = self.number_of_players;
        Box::new(self.steps.shrink().map(move |steps| Script {
            number_of_players,
            steps,
        }))
    }
}
