use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::MAX_PLAYERS;

/// A compact set of suits, identified by their index.
///
/// Since there are as many suits as players, this is also used for sets of
/// players.
///
/// ```
/// use quantum::SuitSet;
/// let mut set = SuitSet::new();
/// // This is an immutable data type, so functions like `insert` return a new `SuitSet`.
/// set = set.insert(2);
/// set = set.insert(2);  // Inserting a second time has no effect
/// set = set.insert(0);
/// assert_eq!(Vec::from_iter(set), vec![0, 2]);
/// ```
///
/// # Note on immutability
///
/// The "mutating" methods return a new value instead of mutating in-place.
/// The type is [`Copy`], so a value is not consumed by methods with `self`
/// receiver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<usize>", try_from = "Vec<usize>")]
pub struct SuitSet {
    // Only the low MAX_PLAYERS bits are used.
    pub(crate) bits: u16,
}

impl SuitSet {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    pub fn contains(self, suit: usize) -> bool {
        suit < MAX_PLAYERS && (self.bits & (1u16 << suit)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn insert(self, suit: usize) -> Self {
        debug_assert!(suit < MAX_PLAYERS, "suit {} does not fit a SuitSet", suit);
        Self {
            bits: self.bits | (1u16 << suit),
        }
    }

    #[must_use] // Because users might expect this to be a mutating method
    pub fn remove(self, suit: usize) -> Self {
        if suit >= MAX_PLAYERS {
            return self;
        }
        Self {
            bits: self.bits & !(1u16 << suit),
        }
    }
}

impl FromIterator<usize> for SuitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = SuitSet::new();
        for suit in iter {
            set = set.insert(suit);
        }
        set
    }
}

impl IntoIterator for SuitSet {
    type Item = usize;

    type IntoIter = SuitSetIter;

    fn into_iter(self) -> Self::IntoIter {
        SuitSetIter { bits: self.bits }
    }
}

/// Iterator for a [`SuitSet`] that returns suits in ascending order.
#[derive(Clone, Copy, Debug)]
pub struct SuitSetIter {
    bits: u16,
}

impl Iterator for SuitSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            None
        } else {
            // The number of trailing zeros is the suit index
            let suit = self.bits.trailing_zeros() as usize;
            self.bits ^= 1u16 << suit;
            Some(suit)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bits.count_ones() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for SuitSetIter {
    fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }
}

impl FusedIterator for SuitSetIter {}

impl From<SuitSet> for Vec<usize> {
    fn from(set: SuitSet) -> Vec<usize> {
        set.into_iter().collect()
    }
}

/// The error type for building a [`SuitSet`] from a list of indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SuitOutOfRange(pub usize);

impl std::error::Error for SuitOutOfRange {}

impl std::fmt::Display for SuitOutOfRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Suit {} does not fit a set of at most {} suits",
            self.0, MAX_PLAYERS
        )
    }
}

impl TryFrom<Vec<usize>> for SuitSet {
    type Error = SuitOutOfRange;

    fn try_from(suits: Vec<usize>) -> Result<Self, Self::Error> {
        match suits.iter().find(|&&suit| suit >= MAX_PLAYERS) {
            Some(&suit) => Err(SuitOutOfRange(suit)),
            None => Ok(suits.into_iter().collect()),
        }
    }
}
