use std::collections::BTreeMap;

use itertools::Itertools;
use quantum::{AvailableMoves, HintLevel, SuitAllocation, CARDS_PER_SUIT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::TableView;

pub const SUIT_NAMES: [&str; 12] = [
    "Scruples", "Ducks", "Squids", "Unicorns", "Loaves", "Holes", "Balloons", "Pizzas", "Kittens",
    "Robots", "Dragons", "Pimples",
];

/// What the current player does at the end of a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Claim {
    NoWin,
    OwnSuit(usize),
    AllSuitsDetermined(SuitAllocation),
}

/// A player at the table.
///
/// Every choice gets the candidates the table already rejected in this
/// attempt, so that a bot does not repeat itself. Returning `None` gives up.
pub trait Bot {
    fn name(&self) -> &str;
    fn choose_suit_name(&mut self, rejected: &[String]) -> String;
    /// Must not exceed `max_hint_level`.
    fn hint_level(&mut self, max_hint_level: HintLevel) -> HintLevel;
    /// Returns the targeted player and the suit to ask for.
    fn choose_target(
        &mut self,
        view: &TableView,
        rejected: &[(usize, usize)],
    ) -> Option<(usize, usize)>;
    fn respond(&mut self, view: &TableView, rejected: &[bool]) -> Option<bool>;
    fn claim(&mut self, view: &TableView) -> Claim;
}

/// Picks uniformly among the moves that look legal from its hint level, and
/// claims a win as soon as it can see one.
pub struct RandomBot {
    name: String,
    rng: StdRng,
    hint_level: HintLevel,
}

impl RandomBot {
    pub fn new(name: &str, rng: StdRng, hint_level: HintLevel) -> Self {
        Self {
            name: String::from(name),
            rng,
            hint_level,
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_suit_name(&mut self, rejected: &[String]) -> String {
        let candidates: Vec<&str> = SUIT_NAMES
            .into_iter()
            .filter(|name| !rejected.iter().any(|taken| taken == name))
            .collect();
        match candidates.choose(&mut self.rng) {
            Some(name) => String::from(*name),
            None => format!("{} {}", SUIT_NAMES[0], rejected.len()),
        }
    }

    fn hint_level(&mut self, max_hint_level: HintLevel) -> HintLevel {
        self.hint_level.min(max_hint_level)
    }

    fn choose_target(
        &mut self,
        view: &TableView,
        rejected: &[(usize, usize)],
    ) -> Option<(usize, usize)> {
        let AvailableMoves::Suits(suits) = &view.game.available_moves else {
            return None;
        };
        let me = view.game.current_player;
        let targets = (0..view.game.current_hands.len())
            .filter(|player| *player != me && !view.game.players_are_out.contains(player));
        let candidates: Vec<(usize, usize)> = targets
            .cartesian_product(suits.iter().copied())
            .filter(|candidate| !rejected.contains(candidate))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    fn respond(&mut self, view: &TableView, rejected: &[bool]) -> Option<bool> {
        let AvailableMoves::Responses(responses) = &view.game.available_moves else {
            return None;
        };
        let candidates: Vec<bool> = responses
            .iter()
            .copied()
            .filter(|response| !rejected.contains(response))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    fn claim(&mut self, view: &TableView) -> Claim {
        let hands = &view.game.current_hands;
        let Some(own_hand) = hands.get(view.game.current_player) else {
            return Claim::NoWin;
        };
        let complete_suit = own_hand
            .suits
            .iter()
            .find(|&(_, count)| count >= CARDS_PER_SUIT);
        if let Some((suit, _)) = complete_suit {
            return Claim::OwnSuit(suit);
        }

        // Without hints every hand looks undetermined.
        let all_determined = view.game.hint_level > HintLevel::None
            && hands.iter().all(|hand| hand.suits.unknown() == 0);
        if all_determined {
            let allocation = hands
                .iter()
                .enumerate()
                .map(|(player, hand)| (player, hand.suits.iter().collect::<BTreeMap<_, _>>()))
                .collect();
            return Claim::AllSuitsDetermined(allocation);
        }
        Claim::NoWin
    }
}
