use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::{
    solve, AvailableMoves, Contradiction, ContradictionReason, GameStateView, Hand, HandState,
    HintLevel, IllegalState, Phase, QuantumError, SuitAllocation, Target,
};

/// The state of one game of Quantum Go Fish.
///
/// A round consists of the current player targeting another player with a
/// suit, the targeted player responding, and the current player claiming a win
/// or passing. Every action either commits completely or leaves the game
/// untouched, except for a wrong [`claim_own_a_suit`](Game::claim_own_a_suit),
/// which still costs the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    number_of_players: usize,
    hands: Vec<Hand>,
    winner: Option<usize>,
    current_target: Option<Target>,
    phase: Phase,
    move_number: u32,
    current_player: usize,
    /// Players without cards. They are skipped and cannot be targeted.
    players_out: BTreeSet<usize>,
    history: BTreeMap<HintLevel, Vec<Vec<HandState>>>,
}

impl Game {
    pub fn new(number_of_players: usize) -> Result<Self, QuantumError> {
        let hands = (0..number_of_players)
            .map(|_| Hand::new(number_of_players))
            .collect::<Result<Vec<_>, _>>()?;
        // Hand::new rejects zero players, but not if no hand was created at all.
        if hands.is_empty() {
            return Err(QuantumError::InvalidPlayerCount { number_of_players });
        }
        let history = HintLevel::ALL
            .into_iter()
            .map(|level| (level, vec![export_hands(&hands, level)]))
            .collect();
        Ok(Self {
            number_of_players,
            hands,
            winner: None,
            current_target: None,
            phase: Phase::TargetPlayer,
            move_number: 1,
            current_player: 0,
            players_out: BTreeSet::new(),
            history,
        })
    }

    pub fn number_of_players(&self) -> usize {
        self.number_of_players
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hand(&self, player: usize) -> Option<&Hand> {
        self.hands.get(player)
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn current_target_player(&self) -> Option<usize> {
        self.current_target.map(|target| target.player)
    }

    pub fn current_target_suit(&self) -> Option<usize> {
        self.current_target.map(|target| target.suit)
    }

    pub fn players_out(&self) -> &BTreeSet<usize> {
        &self.players_out
    }

    /// The player whose action the game waits for, if any.
    pub fn player_to_act(&self) -> Option<usize> {
        match self.phase {
            Phase::TargetPlayer | Phase::ClaimWin => Some(self.current_player),
            Phase::Response => self.current_target_player(),
            Phase::Finished => None,
        }
    }

    /// The snapshots of all hands at `hint_level`: the initial deal, then one
    /// per completed round.
    pub fn history(&self, hint_level: HintLevel) -> &[Vec<HandState>] {
        self.history
            .get(&hint_level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn current_hands(&self, hint_level: HintLevel) -> Vec<HandState> {
        export_hands(&self.hands, hint_level)
    }

    fn validate_player(&self, player: usize) -> Result<(), QuantumError> {
        if player >= self.number_of_players {
            Err(QuantumError::InvalidPlayer {
                player,
                number_of_players: self.number_of_players,
            })
        } else {
            Ok(())
        }
    }

    fn validate_suit(&self, suit: usize) -> Result<(), QuantumError> {
        if suit >= self.number_of_players {
            Err(QuantumError::InvalidSuit {
                suit,
                number_of_suits: self.number_of_players,
            })
        } else {
            Ok(())
        }
    }

    fn ensure_phase(&self, action: &'static str, expected: Phase) -> Result<(), QuantumError> {
        if self.phase == Phase::Finished {
            Err(IllegalState::GameFinished.into())
        } else if self.phase != expected {
            Err(IllegalState::WrongPhase {
                action,
                phase: self.phase,
            }
            .into())
        } else {
            Ok(())
        }
    }

    fn ensure_turn(&self, player: usize) -> Result<(), QuantumError> {
        if player != self.current_player {
            Err(IllegalState::NotYourTurn {
                player,
                current_player: self.current_player,
            }
            .into())
        } else {
            Ok(())
        }
    }

    /// Applies a statement to a copy of the hands and checks that some deal
    /// still fits. On success, returns the copy with every hand tightened to
    /// what all consistent deals have in common.
    fn speculate(
        &self,
        statement: impl FnOnce(&mut [Hand]) -> Result<(), QuantumError>,
    ) -> Result<Vec<Hand>, QuantumError> {
        let mut hands = self.hands.clone();
        statement(&mut hands)?;

        let solution = solve(&hands);
        if !solution.has_solution {
            return Err(Contradiction::new(ContradictionReason::NoConsistentDeal).into());
        }
        for (player, hand) in hands.iter_mut().enumerate() {
            let inferred = solution
                .inferred_cards(player, hand.total_cards())
                .ok_or(Contradiction::new(ContradictionReason::NoConsistentDeal))?;
            hand.update_inferred_cards(inferred)?;
        }
        Ok(hands)
    }

    /// The current player asks `targeted_player` for cards of `suit`, which
    /// proves that they hold at least one card of it.
    pub fn target_player(
        &mut self,
        acting_player: usize,
        targeted_player: usize,
        suit: usize,
    ) -> Result<(), QuantumError> {
        self.validate_player(acting_player)?;
        self.validate_player(targeted_player)?;
        self.validate_suit(suit)?;
        self.ensure_phase("target a player", Phase::TargetPlayer)?;
        self.ensure_turn(acting_player)?;
        if targeted_player == acting_player {
            return Err(IllegalState::TargetedSelf {
                player: acting_player,
            }
            .into());
        }
        if self.players_out.contains(&acting_player) {
            return Err(IllegalState::PlayerIsOut {
                player: acting_player,
            }
            .into());
        }
        if self.players_out.contains(&targeted_player) {
            return Err(Contradiction::new(ContradictionReason::TargetIsOut)
                .with_player(targeted_player)
                .with_suit(suit)
                .into());
        }

        let hands = self
            .speculate(|hands| hands[acting_player].request_suit(suit))
            .map_err(|err| {
                trace!(acting_player, suit, %err, "Rolled back request");
                err.for_player(acting_player).for_suit(suit)
            })?;

        self.hands = hands;
        self.current_target = Some(Target {
            player: targeted_player,
            suit,
        });
        self.phase = Phase::Response;
        debug!(acting_player, targeted_player, suit, "Targeted player");
        Ok(())
    }

    /// The targeted player hands over a card of the requested suit, or states
    /// that they hold none.
    pub fn respond_to_target(
        &mut self,
        acting_player: usize,
        response: bool,
    ) -> Result<(), QuantumError> {
        self.validate_player(acting_player)?;
        self.ensure_phase("respond to a target", Phase::Response)?;
        let Some(Target { player, suit }) = self.current_target else {
            return Err(IllegalState::NotTargeted {
                player: acting_player,
            }
            .into());
        };
        if player != acting_player {
            return Err(IllegalState::NotTargeted {
                player: acting_player,
            }
            .into());
        }

        let asking_player = self.current_player;
        let hands = self
            .speculate(|hands| {
                if response {
                    hands[acting_player].remove_card(suit)?;
                    hands[asking_player].add_card(suit)
                } else {
                    hands[acting_player].does_not_have_suit(suit)
                }
            })
            .map_err(|err| {
                trace!(acting_player, suit, response, %err, "Rolled back response");
                err.for_player(acting_player).for_suit(suit)
            })?;

        self.hands = hands;
        self.current_target = None;
        self.phase = Phase::ClaimWin;
        debug!(acting_player, suit, response, "Responded to target");
        Ok(())
    }

    pub fn claim_no_win(&mut self, acting_player: usize) -> Result<(), QuantumError> {
        self.validate_player(acting_player)?;
        self.ensure_phase("claim a win", Phase::ClaimWin)?;
        self.ensure_turn(acting_player)?;
        self.complete_round();
        Ok(())
    }

    /// Claims to provably hold all cards of `suit`. A wrong claim ends the
    /// turn and is reported as a contradiction.
    pub fn claim_own_a_suit(&mut self, acting_player: usize, suit: usize) -> Result<(), QuantumError> {
        self.validate_player(acting_player)?;
        self.validate_suit(suit)?;
        self.ensure_phase("claim a suit", Phase::ClaimWin)?;
        self.ensure_turn(acting_player)?;

        if self.hands[acting_player].winning_suits().contains(suit) {
            self.winner = Some(acting_player);
            self.complete_round();
            Ok(())
        } else {
            self.complete_round();
            Err(Contradiction::new(ContradictionReason::NoWinningSuit)
                .with_player(acting_player)
                .with_suit(suit)
                .into())
        }
    }

    /// Claims that every hand is fully determined, naming all of them. A
    /// wrong claim changes nothing.
    pub fn claim_all_suits_determined(
        &mut self,
        acting_player: usize,
        suit_allocation: &SuitAllocation,
    ) -> Result<(), QuantumError> {
        self.validate_player(acting_player)?;
        for (&player, suits) in suit_allocation {
            self.validate_player(player)?;
            for &suit in suits.keys() {
                self.validate_suit(suit)?;
            }
        }
        self.ensure_phase("claim all suits", Phase::ClaimWin)?;
        self.ensure_turn(acting_player)?;

        let nothing_claimed = BTreeMap::new();
        let all_claims_correct = self.hands.iter().enumerate().all(|(player, hand)| {
            hand.is_correct_claim(suit_allocation.get(&player).unwrap_or(&nothing_claimed))
        });
        if !all_claims_correct {
            return Err(Contradiction::new(ContradictionReason::WrongAllocation)
                .with_player(acting_player)
                .into());
        }

        self.winner = Some(acting_player);
        self.complete_round();
        Ok(())
    }

    fn complete_round(&mut self) {
        for (&level, snapshots) in self.history.iter_mut() {
            snapshots.push(export_hands(&self.hands, level));
        }
        if let Some(winner) = self.winner {
            self.phase = Phase::Finished;
            debug!(winner, move_number = self.move_number, "Game won");
            return;
        }

        self.move_number += 1;
        self.phase = Phase::TargetPlayer;
        self.players_out = (0..self.number_of_players)
            .filter(|&player| self.hands[player].total_cards() == 0)
            .collect();

        let mut remaining =
            (0..self.number_of_players).filter(|player| !self.players_out.contains(player));
        match (remaining.next(), remaining.next()) {
            (Some(last_player), None) => {
                self.winner = Some(last_player);
                self.phase = Phase::Finished;
                debug!(winner = last_player, "Only one player has cards left");
            }
            _ => {
                self.current_player =
                    next_player(self.current_player, &self.players_out, self.number_of_players);
                trace!(
                    move_number = self.move_number,
                    current_player = self.current_player,
                    "Completed round"
                );
            }
        }
    }

    /// The moves a client may offer the player to act, judged from what is
    /// visible at `hint_level`.
    pub fn available_moves(&self, hint_level: HintLevel) -> AvailableMoves {
        match self.phase {
            Phase::TargetPlayer | Phase::ClaimWin => {
                let hand = self.hands[self.current_player].export(hint_level);
                AvailableMoves::Suits(
                    (0..self.number_of_players)
                        .filter(|&suit| !hand.does_not_have_suit.contains(suit))
                        .collect(),
                )
            }
            Phase::Response => match self.current_target {
                Some(Target { player, suit }) => {
                    let hand = self.hands[player].export(hint_level);
                    if hand.suits.suit(suit) > 0 {
                        AvailableMoves::Responses(vec![true])
                    } else if hand.can_have_suit(suit) {
                        AvailableMoves::Responses(vec![true, false])
                    } else {
                        AvailableMoves::Responses(vec![false])
                    }
                }
                None => AvailableMoves::Nothing,
            },
            Phase::Finished => AvailableMoves::Nothing,
        }
    }

    /// Everything `viewer` may see at `hint_level`. Spectators pass `None`.
    pub fn export_state(
        &self,
        hint_level: HintLevel,
        viewer: Option<usize>,
    ) -> Result<GameStateView, QuantumError> {
        if let Some(viewer) = viewer {
            self.validate_player(viewer)?;
        }
        Ok(GameStateView {
            hint_level,
            viewer,
            viewer_to_act: viewer.is_some() && viewer == self.player_to_act(),
            history: self.history(hint_level).to_vec(),
            winner: self.winner,
            phase: self.phase,
            current_player: self.current_player,
            move_number: self.move_number,
            current_target_player: self.current_target_player(),
            current_target_suit: self.current_target_suit(),
            current_hands: self.current_hands(hint_level),
            available_moves: self.available_moves(hint_level),
            players_are_out: self.players_out.iter().copied().collect(),
        })
    }
}

fn export_hands(hands: &[Hand], hint_level: HintLevel) -> Vec<HandState> {
    hands.iter().map(|hand| hand.export(hint_level)).collect()
}

/// The first player after `current` in seating order who is not eliminated.
/// Returns `current` if everybody else is.
pub fn next_player(current: usize, eliminated: &BTreeSet<usize>, number_of_players: usize) -> usize {
    (1..=number_of_players)
        .map(|offset| (current + offset) % number_of_players)
        .find(|player| !eliminated.contains(player))
        .unwrap_or(current)
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::{Script, Step};
    use crate::CARDS_PER_SUIT;

    fn assert_reason(result: Result<(), QuantumError>, reason: ContradictionReason) {
        match result {
            Err(QuantumError::Contradiction(contradiction)) => {
                assert_eq!(contradiction.reason, reason)
            }
            other => panic!("expected {:?}, got {:?}", reason, other),
        }
    }

    fn assert_contradiction_rolls_back(
        game: &mut Game,
        action: impl FnOnce(&mut Game) -> Result<(), QuantumError>,
    ) {
        let before = game.clone();
        let result = action(game);
        assert!(
            matches!(result, Err(QuantumError::Contradiction(_))),
            "expected a contradiction, got {:?}",
            result
        );
        assert_eq!(*game, before);
    }

    fn levels_balance(hand: &Hand) -> bool {
        let declared = hand.declared_cards();
        let inferred = hand.inferred_cards();
        declared.total() == hand.total_cards()
            && inferred.total() == hand.total_cards()
            && inferred.unknown() <= declared.unknown()
            && declared.iter().all(|(suit, count)| count <= inferred[suit])
    }

    fn suits_fit_the_deck(game: &Game) -> bool {
        (0..game.number_of_players()).all(|suit| {
            let inferred: u32 = game
                .hands()
                .iter()
                .map(|hand| u32::from(hand.inferred_cards().suit(suit)))
                .sum();
            let all_determined = game.hands().iter().all(Hand::is_fully_determined);
            inferred <= u32::from(CARDS_PER_SUIT)
                && (!all_determined || inferred == u32::from(CARDS_PER_SUIT))
        })
    }

    fn only_gained_certainty(before: &Game, after: &Game) -> bool {
        before.hands().iter().zip(after.hands()).all(|(old, new)| {
            let (old, new) = (old.inferred_cards(), new.inferred_cards());
            new.unknown() <= old.unknown() && old.iter().all(|(suit, count)| new[suit] >= count)
        })
    }

    quickcheck! {
        fn scripts_keep_the_game_consistent(script: Script) -> bool {
            let mut game = Game::new(script.number_of_players).unwrap();
            for step in script.steps {
                let before = game.clone();
                match step.apply(&mut game) {
                    Ok(()) => {
                        if !matches!(step, Step::Respond(true)) && !only_gained_certainty(&before, &game) {
                            return false;
                        }
                    }
                    // A wrong claim of a suit still ends the turn.
                    Err(err) if err.is_contradiction() && matches!(step, Step::ClaimOwnSuit(_)) => {}
                    Err(_) => {
                        if game != before {
                            return false;
                        }
                    }
                }
                if !game.hands().iter().all(levels_balance) || !suits_fit_the_deck(&game) {
                    return false;
                }
            }
            true
        }

        fn history_grows_once_per_round(script: Script) -> bool {
            let mut game = Game::new(script.number_of_players).unwrap();
            for step in script.steps {
                let _ = step.apply(&mut game);
            }
            let rounds = game.move_number() as usize - 1;
            let finished = usize::from(game.phase() == Phase::Finished);
            HintLevel::ALL.into_iter().all(|level| {
                let snapshots = game.history(level).len();
                snapshots == 1 + rounds || snapshots == 1 + rounds + finished
            })
        }
    }

    /// The sample game from the published walkthrough, with Xia, Yael and Zoe
    /// as players 0 to 2 and Narwhals, Scruples and Qualms as suits 0 to 2.
    fn play_walkthrough_opening() -> Game {
        let mut game = Game::new(3).unwrap();
        game.target_player(0, 1, 0).unwrap(); // Yael, do you have any Narwhals?
        game.respond_to_target(1, false).unwrap();
        game.claim_no_win(0).unwrap();
        game.target_player(1, 2, 1).unwrap(); // Zoe, do you have any Scruples?
        game.respond_to_target(2, true).unwrap();
        game.claim_no_win(1).unwrap();
        game.target_player(2, 1, 2).unwrap(); // Yael, do you have any Qualms?
        // Saying no would leave Yael with five Scruples.
        assert_contradiction_rolls_back(&mut game, |game| game.respond_to_target(1, false));
        game.respond_to_target(1, true).unwrap();
        game.claim_no_win(2).unwrap();
        game
    }

    #[test]
    fn walkthrough_early_exit() {
        let mut game = play_walkthrough_opening();
        game.target_player(0, 2, 0).unwrap(); // Zoe, do you have any Narwhals?
        game.respond_to_target(2, false).unwrap();
        // Neither Yael nor Zoe has Narwhals, so Xia holds all of them.
        assert_eq!(game.hand(0).unwrap().inferred_cards().suits(), &[4, 0, 0]);
        game.claim_own_a_suit(0, 0).unwrap();
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.phase(), Phase::Finished);
        assert_eq!(game.player_to_act(), None);
        assert_eq!(game.available_moves(HintLevel::Full), AvailableMoves::Nothing);
    }

    #[test]
    fn walkthrough_full_game() {
        let mut game = play_walkthrough_opening();
        game.target_player(0, 2, 0).unwrap(); // Zoe, do you have any Narwhals?
        game.respond_to_target(2, true).unwrap();
        game.claim_no_win(0).unwrap();
        game.target_player(1, 0, 2).unwrap(); // Xia, do you have any Qualms?
        game.respond_to_target(0, true).unwrap();
        game.claim_no_win(1).unwrap();
        game.target_player(2, 0, 1).unwrap(); // Xia, do you have any Scruples?
        // Yael already holds three Scruples.
        assert_contradiction_rolls_back(&mut game, |game| game.respond_to_target(0, true));
        game.respond_to_target(0, false).unwrap();

        let allocation = SuitAllocation::from([
            (0, BTreeMap::from([(0, 4), (1, 0), (2, 0)])),
            (1, BTreeMap::from([(0, 0), (1, 3), (2, 2)])),
            (2, BTreeMap::from([(0, 0), (1, 1), (2, 2)])),
        ]);
        game.claim_all_suits_determined(2, &allocation).unwrap();
        assert_eq!(game.winner(), Some(2));
        assert_eq!(game.phase(), Phase::Finished);
    }

    #[test]
    fn walkthrough_alternate_end() {
        let mut game = play_walkthrough_opening();
        game.target_player(0, 2, 0).unwrap();
        game.respond_to_target(2, true).unwrap();
        game.claim_no_win(0).unwrap();
        game.target_player(1, 0, 2).unwrap();
        game.respond_to_target(0, true).unwrap();
        game.claim_no_win(1).unwrap();
        game.target_player(2, 1, 1).unwrap(); // Yael, do you have any Scruples?
        let before = game.clone();
        assert_reason(game.respond_to_target(1, false), ContradictionReason::HoldsSuit);
        assert_eq!(game, before);
        game.respond_to_target(1, true).unwrap();

        let allocation = SuitAllocation::from([
            (0, BTreeMap::from([(0, 4)])),
            (1, BTreeMap::from([(1, 2), (2, 2)])),
            (2, BTreeMap::from([(1, 2), (2, 2)])),
        ]);
        game.claim_all_suits_determined(2, &allocation).unwrap();
        assert_eq!(game.winner(), Some(2));
        assert_eq!(game.phase(), Phase::Finished);
    }

    #[test]
    fn rejects_invalid_players_and_suits() {
        let mut game = Game::new(3).unwrap();
        assert_eq!(
            game.target_player(3, 1, 0),
            Err(QuantumError::InvalidPlayer {
                player: 3,
                number_of_players: 3
            })
        );
        assert_eq!(
            game.target_player(0, 1, 3),
            Err(QuantumError::InvalidSuit {
                suit: 3,
                number_of_suits: 3
            })
        );
        assert!(Game::new(0).is_err());
        assert!(Game::new(17).is_err());
        assert!(game.export_state(HintLevel::None, Some(3)).is_err());
    }

    #[test]
    fn rejects_actions_in_the_wrong_phase() {
        let mut game = Game::new(3).unwrap();
        assert_eq!(
            game.respond_to_target(1, true),
            Err(QuantumError::IllegalState(IllegalState::WrongPhase {
                action: "respond to a target",
                phase: Phase::TargetPlayer
            }))
        );
        assert!(matches!(
            game.claim_no_win(0),
            Err(QuantumError::IllegalState(IllegalState::WrongPhase { .. }))
        ));
        assert!(matches!(
            game.claim_own_a_suit(0, 0),
            Err(QuantumError::IllegalState(IllegalState::WrongPhase { .. }))
        ));
    }

    #[test]
    fn rejects_actions_out_of_turn() {
        let mut game = Game::new(3).unwrap();
        assert_eq!(
            game.target_player(1, 2, 0),
            Err(QuantumError::IllegalState(IllegalState::NotYourTurn {
                player: 1,
                current_player: 0
            }))
        );
        game.target_player(0, 1, 0).unwrap();
        assert_eq!(
            game.respond_to_target(2, true),
            Err(QuantumError::IllegalState(IllegalState::NotTargeted { player: 2 }))
        );
        game.respond_to_target(1, false).unwrap();
        assert_eq!(
            game.claim_no_win(1),
            Err(QuantumError::IllegalState(IllegalState::NotYourTurn {
                player: 1,
                current_player: 0
            }))
        );
        assert!(game.claim_own_a_suit(1, 0).is_err());
    }

    #[test]
    fn cannot_target_yourself() {
        let mut game = Game::new(3).unwrap();
        assert_eq!(
            game.target_player(0, 0, 0),
            Err(QuantumError::IllegalState(IllegalState::TargetedSelf { player: 0 }))
        );
    }

    #[test]
    fn requesting_a_denied_suit_is_a_contradiction() {
        let mut game = Game::new(2).unwrap();
        game.target_player(0, 1, 0).unwrap();
        game.respond_to_target(1, false).unwrap();
        game.claim_no_win(0).unwrap();
        game.target_player(1, 0, 1).unwrap();
        game.respond_to_target(0, false).unwrap();
        game.claim_no_win(1).unwrap();

        let before = game.clone();
        match game.target_player(0, 1, 1) {
            Err(QuantumError::Contradiction(contradiction)) => {
                assert_eq!(contradiction.reason, ContradictionReason::SuitKnownAbsent);
                assert_eq!(contradiction.player, Some(0));
                assert_eq!(contradiction.suit, Some(1));
            }
            other => panic!("expected a contradiction, got {:?}", other),
        }
        assert_eq!(game, before);
    }

    #[test]
    fn wrong_suit_claim_costs_the_turn() {
        let mut game = Game::new(3).unwrap();
        game.target_player(0, 1, 0).unwrap();
        game.respond_to_target(1, false).unwrap();
        assert_reason(game.claim_own_a_suit(0, 1), ContradictionReason::NoWinningSuit);
        assert_eq!(game.phase(), Phase::TargetPlayer);
        assert_eq!(game.current_player(), 1);
        assert_eq!(game.move_number(), 2);
        assert_eq!(game.winner(), None);
        assert_eq!(game.history(HintLevel::Full).len(), 2);
    }

    #[test]
    fn wrong_allocation_changes_nothing() {
        let mut game = Game::new(2).unwrap();
        game.target_player(0, 1, 0).unwrap();
        game.respond_to_target(1, false).unwrap();

        let wrong = SuitAllocation::from([
            (0, BTreeMap::from([(0, 3), (1, 1)])),
            (1, BTreeMap::from([(0, 1), (1, 3)])),
        ]);
        assert_contradiction_rolls_back(&mut game, |game| {
            game.claim_all_suits_determined(0, &wrong)
        });
        assert_eq!(game.phase(), Phase::ClaimWin);

        let out_of_range = SuitAllocation::from([(5, BTreeMap::new())]);
        assert!(matches!(
            game.claim_all_suits_determined(0, &out_of_range),
            Err(QuantumError::InvalidPlayer { player: 5, .. })
        ));

        let right = SuitAllocation::from([
            (0, BTreeMap::from([(0, 4)])),
            (1, BTreeMap::from([(1, 4)])),
        ]);
        game.claim_all_suits_determined(0, &right).unwrap();
        assert_eq!(game.winner(), Some(0));
    }

    #[test]
    fn finished_game_rejects_actions() {
        let mut game = Game::new(2).unwrap();
        game.target_player(0, 1, 0).unwrap();
        game.respond_to_target(1, false).unwrap();
        game.claim_own_a_suit(0, 0).unwrap();
        assert_eq!(game.phase(), Phase::Finished);

        assert_eq!(
            game.target_player(1, 0, 1),
            Err(QuantumError::IllegalState(IllegalState::GameFinished))
        );
        assert_eq!(game.claim_no_win(0), Err(QuantumError::IllegalState(IllegalState::GameFinished)));
        assert_eq!(
            game.respond_to_target(1, true),
            Err(QuantumError::IllegalState(IllegalState::GameFinished))
        );
    }

    #[test]
    fn skips_players_without_cards() {
        let mut game = Game::new(5).unwrap();
        for player in 0..4 {
            game.target_player(player, 4, player).unwrap();
            game.respond_to_target(4, true).unwrap();
            game.claim_no_win(player).unwrap();
        }
        assert_eq!(game.hand(4).unwrap().total_cards(), 0);
        assert_eq!(game.players_out(), &BTreeSet::from([4]));
        assert_eq!(game.current_player(), 0);
        assert_eq!(game.move_number(), 5);
        assert_reason(game.target_player(0, 4, 0), ContradictionReason::TargetIsOut);
        assert_eq!(game.phase(), Phase::TargetPlayer);
    }

    #[test]
    fn next_player_wraps_and_skips() {
        assert_eq!(next_player(3, &BTreeSet::new(), 4), 0);
        assert_eq!(next_player(1, &BTreeSet::from([2, 3]), 4), 0);
        assert_eq!(next_player(0, &BTreeSet::from([1, 2, 3]), 4), 0);
        assert_eq!(next_player(2, &BTreeSet::from([0]), 3), 1);
    }

    #[test]
    fn available_moves_follow_the_phase() {
        let mut game = Game::new(2).unwrap();
        assert_eq!(
            game.available_moves(HintLevel::Full),
            AvailableMoves::Suits(vec![0, 1])
        );
        game.target_player(0, 1, 0).unwrap();
        assert_eq!(
            game.available_moves(HintLevel::Full),
            AvailableMoves::Responses(vec![true, false])
        );
        game.respond_to_target(1, false).unwrap();
        game.claim_no_win(0).unwrap();

        // Player 1 denied suit 0.
        assert_eq!(
            game.available_moves(HintLevel::Track),
            AvailableMoves::Suits(vec![1])
        );
        assert_eq!(
            game.available_moves(HintLevel::None),
            AvailableMoves::Suits(vec![0, 1])
        );

        // Player 0 provably holds all of suit 0 and nothing else.
        game.target_player(1, 0, 1).unwrap();
        assert_eq!(
            game.available_moves(HintLevel::Full),
            AvailableMoves::Responses(vec![false])
        );
        assert_eq!(
            game.available_moves(HintLevel::None),
            AvailableMoves::Responses(vec![true, false])
        );
    }

    #[test]
    fn export_state_for_viewers() {
        let mut game = Game::new(3).unwrap();
        game.target_player(0, 1, 2).unwrap();

        let view = game.export_state(HintLevel::Track, Some(1)).unwrap();
        assert!(view.viewer_to_act);
        assert_eq!(view.phase, Phase::Response);
        assert_eq!(view.current_player, 0);
        assert_eq!(view.current_target_player, Some(1));
        assert_eq!(view.current_target_suit, Some(2));
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.current_hands[0].suits.suits(), &[0, 0, 1]);
        assert!(view.players_are_out.is_empty());

        let spectator = game.export_state(HintLevel::None, None).unwrap();
        assert!(!spectator.viewer_to_act);
        assert_eq!(spectator.current_hands[0].suits.suits(), &[0, 0, 0]);
        assert_eq!(spectator.current_hands[0].suits.unknown(), 4);

        let asker = game.export_state(HintLevel::Full, Some(0)).unwrap();
        assert!(!asker.viewer_to_act);
    }

    #[test]
    fn history_records_completed_rounds() {
        let mut game = Game::new(3).unwrap();
        game.target_player(0, 1, 0).unwrap();
        game.respond_to_target(1, false).unwrap();
        assert_eq!(game.history(HintLevel::Track).len(), 1);
        game.claim_no_win(0).unwrap();

        let history = game.history(HintLevel::Track);
        assert_eq!(history.len(), 2);
        assert!(history[0].iter().all(|hand| hand.suits.unknown() == 4));
        assert_eq!(history[1][0].suits.suits(), &[1, 0, 0]);
        assert_eq!(Vec::from(history[1][1].does_not_have_suit), vec![0]);
        assert!(game.history(HintLevel::None)[1][1].does_not_have_suit.is_empty());
    }
}
