use serde::{Deserialize, Serialize};

/// Number of cards per suit, plus the cards whose suit is not yet identified.
///
/// The unknown bucket plays the role of a reserved "unknown suit": it is
/// counted in [`total()`](CardCounts::total) like any other suit, but it is
/// never a valid argument for the suit accessors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardCounts {
    suits: Vec<u8>,
    unknown: u8,
}

impl CardCounts {
    /// `unknown` cards of which nothing is known, across `number_of_suits` suits.
    pub fn hidden(number_of_suits: usize, unknown: u8) -> Self {
        Self {
            suits: vec![0; number_of_suits],
            unknown,
        }
    }

    pub fn from_parts(suits: Vec<u8>, unknown: u8) -> Self {
        Self { suits, unknown }
    }

    pub fn number_of_suits(&self) -> usize {
        self.suits.len()
    }

    /// The count for a real suit. Suits out of range hold zero cards.
    pub fn suit(&self, suit: usize) -> u8 {
        self.suits.get(suit).copied().unwrap_or(0)
    }

    pub fn unknown(&self) -> u8 {
        self.unknown
    }

    pub fn suits(&self) -> &[u8] {
        &self.suits
    }

    /// Iterates over `(suit, count)` for the real suits.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.suits.iter().copied().enumerate()
    }

    /// All cards, including the unknown ones.
    pub fn total(&self) -> u32 {
        self.suits.iter().map(|&count| u32::from(count)).sum::<u32>() + u32::from(self.unknown)
    }

    /// Panics if `suit` is out of range. Callers validate first.
    pub(crate) fn suit_mut(&mut self, suit: usize) -> &mut u8 {
        &mut self.suits[suit]
    }

    pub(crate) fn unknown_mut(&mut self) -> &mut u8 {
        &mut self.unknown
    }
}

impl std::ops::Index<usize> for CardCounts {
    type Output = u8;

    fn index(&self, suit: usize) -> &Self::Output {
        &self.suits[suit]
    }
}

impl std::fmt::Display for CardCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (suit, count) in self.iter() {
            write!(f, "{}: {}, ", suit, count)?;
        }
        write!(f, "?: {}}}", self.unknown)
    }
}
