//! Consistency checking for a whole table of hands.
//!
//! A deal assigns every player a number of cards per suit. It is consistent if
//! every player holds exactly their number of cards, every suit has exactly
//! [`CARDS_PER_SUIT`] cards in total, and every count lies between what is
//! already inferred and what the player's unknown cards could add to it.
//!
//! This is a bounded transportation problem between players and suits. After
//! subtracting the lower bounds, it is feasible exactly when a maximum flow
//! from the players' remaining cards to the suits' remaining cards saturates
//! every edge out of the source. Flows are integral, so there is no gap between
//! the integer problem and its relaxation, and the values a single cell takes
//! across all consistent deals form an interval.
use std::collections::VecDeque;

use tracing::trace;

use crate::{CardCounts, Hand, CARDS_PER_SUIT};

/// Whether any deal is consistent with the hands, and what every such deal has in common.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolutionResult {
    pub has_solution: bool,
    /// Indexed by player, then suit: the fewest cards of the suit the player
    /// holds in any consistent deal. Empty if there is no solution.
    pub minimum_requirements: Vec<Vec<u8>>,
}

impl SolutionResult {
    fn no_solution() -> Self {
        Self {
            has_solution: false,
            minimum_requirements: Vec::new(),
        }
    }

    pub fn minimum(&self, player: usize, suit: usize) -> Option<u8> {
        self.minimum_requirements.get(player)?.get(suit).copied()
    }

    /// The inferred cards of a player holding `total_cards`, with everything
    /// that is not required counted as unknown.
    pub fn inferred_cards(&self, player: usize, total_cards: u32) -> Option<CardCounts> {
        let requirements = self.minimum_requirements.get(player)?;
        let required: u32 = requirements.iter().map(|&count| u32::from(count)).sum();
        let unknown = u8::try_from(total_cards.checked_sub(required)?).ok()?;
        Some(CardCounts::from_parts(requirements.clone(), unknown))
    }
}

/// Decides whether the hands admit a consistent deal and computes the minimum
/// requirement of every (player, suit) pair over all consistent deals.
pub fn solve(hands: &[Hand]) -> SolutionResult {
    let Some(problem) = Problem::from_hands(hands) else {
        return SolutionResult::no_solution();
    };
    if !problem.is_feasible() {
        trace!(players = hands.len(), "No consistent deal");
        return SolutionResult::no_solution();
    }

    let mut minimum_requirements = problem.lower.clone();
    for (player, row) in minimum_requirements.iter_mut().enumerate() {
        for (suit, minimum) in row.iter_mut().enumerate() {
            let upper = problem.upper[player][suit];
            // The cell is feasible at its upper bound, so the search always ends.
            *minimum = (*minimum..upper)
                .find(|&cap| problem.with_cap(player, suit, cap).is_feasible())
                .unwrap_or(upper);
        }
    }

    SolutionResult {
        has_solution: true,
        minimum_requirements,
    }
}

/// Bounds of the per-(player, suit) card counts.
#[derive(Clone, Debug)]
struct Problem {
    lower: Vec<Vec<u8>>,
    upper: Vec<Vec<u8>>,
    totals: Vec<u32>,
}

impl Problem {
    /// `None` if there are no hands, the hands disagree on the number of
    /// suits, or some suit has no player left that could hold it.
    fn from_hands(hands: &[Hand]) -> Option<Self> {
        let number_of_suits = hands.first()?.number_of_suits();
        if hands.iter().any(|hand| hand.number_of_suits() != number_of_suits) {
            return None;
        }

        let mut lower = Vec::with_capacity(hands.len());
        let mut upper = Vec::with_capacity(hands.len());
        for hand in hands {
            let inferred = hand.inferred_cards();
            let absent = hand.suits_not_available();
            let (row_lower, row_upper): (Vec<u8>, Vec<u8>) = (0..number_of_suits)
                .map(|suit| {
                    if absent.contains(suit) {
                        (inferred[suit], 0)
                    } else {
                        let current = inferred[suit];
                        let max = current.saturating_add(inferred.unknown()).min(CARDS_PER_SUIT);
                        (current, max)
                    }
                })
                .unzip();
            lower.push(row_lower);
            upper.push(row_upper);
        }

        for suit in 0..number_of_suits {
            if upper.iter().all(|row| row[suit] == 0) {
                trace!(suit, "No player can hold the suit");
                return None;
            }
        }

        Some(Self {
            lower,
            upper,
            totals: hands.iter().map(Hand::total_cards).collect(),
        })
    }

    fn with_cap(&self, player: usize, suit: usize, cap: u8) -> Self {
        let mut capped = self.clone();
        capped.upper[player][suit] = cap;
        capped
    }

    fn is_feasible(&self) -> bool {
        let players = self.totals.len();
        let suits = self.lower.first().map_or(0, Vec::len);

        let mut row_demand = Vec::with_capacity(players);
        for player in 0..players {
            let lower = &self.lower[player];
            let upper = &self.upper[player];
            if lower.iter().zip(upper).any(|(low, up)| low > up) {
                return false;
            }
            let fixed: u32 = lower.iter().map(|&count| u32::from(count)).sum();
            match self.totals[player].checked_sub(fixed) {
                Some(demand) => row_demand.push(demand),
                None => return false,
            }
        }

        let mut column_demand = Vec::with_capacity(suits);
        for suit in 0..suits {
            let fixed: u32 = self.lower.iter().map(|row| u32::from(row[suit])).sum();
            match u32::from(CARDS_PER_SUIT).checked_sub(fixed) {
                Some(demand) => column_demand.push(demand),
                None => return false,
            }
        }

        let required: u32 = row_demand.iter().sum();
        if required != column_demand.iter().sum::<u32>() {
            return false;
        }

        // Nodes: source, one per player, one per suit, sink.
        let source = 0;
        let sink = players + suits + 1;
        let mut network = FlowNetwork::new(players + suits + 2);
        for player in 0..players {
            network.add_edge(source, 1 + player, row_demand[player]);
            for suit in 0..suits {
                let slack = self.upper[player][suit] - self.lower[player][suit];
                network.add_edge(1 + player, 1 + players + suit, u32::from(slack));
            }
        }
        for suit in 0..suits {
            network.add_edge(1 + players + suit, sink, column_demand[suit]);
        }

        network.max_flow(source, sink) == required
    }
}

/// Residual capacities of a small dense graph.
struct FlowNetwork {
    capacity: Vec<Vec<u32>>,
}

impl FlowNetwork {
    fn new(nodes: usize) -> Self {
        Self {
            capacity: vec![vec![0; nodes]; nodes],
        }
    }

    fn add_edge(&mut self, from: usize, to: usize, capacity: u32) {
        self.capacity[from][to] += capacity;
    }

    /// Edmonds-Karp: augment along shortest paths until none is left.
    fn max_flow(mut self, source: usize, sink: usize) -> u32 {
        let nodes = self.capacity.len();
        let mut flow = 0;
        loop {
            let mut parent: Vec<Option<usize>> = vec![None; nodes];
            parent[source] = Some(source);
            let mut queue = VecDeque::from([source]);
            while let Some(node) = queue.pop_front() {
                if node == sink {
                    break;
                }
                for next in 0..nodes {
                    if parent[next].is_none() && self.capacity[node][next] > 0 {
                        parent[next] = Some(node);
                        queue.push_back(next);
                    }
                }
            }
            if parent[sink].is_none() {
                return flow;
            }

            let mut bottleneck = u32::MAX;
            let mut node = sink;
            while let Some(prev) = parent[node].filter(|_| node != source) {
                bottleneck = bottleneck.min(self.capacity[prev][node]);
                node = prev;
            }

            let mut node = sink;
            while let Some(prev) = parent[node].filter(|_| node != source) {
                self.capacity[prev][node] -= bottleneck;
                self.capacity[node][prev] += bottleneck;
                node = prev;
            }
            flow += bottleneck;
        }
    }
}
