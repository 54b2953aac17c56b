//! # Scoring Module - Live Correctness Tracking
//!
//! [`Scorer`] keeps the correct-character count and the set of wrong target indices
//! up to date one keystroke at a time. Only the index a keystroke touched is
//! re-evaluated, so scoring stays O(log n) per keystroke however long the text is.
//!
//! An index enters the error set when a wrong character is typed at it, and leaves it only
//! when a later keystroke types that position correctly. Deleting a wrong character does
//! not clear it: the mistake stays on the heatmap until it is fixed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input_handler::{Keystroke, KeystrokeKind};
use crate::math;

/// The outcome of a keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterResult {
    /// Typed the expected character
    Correct,
    /// Typed the expected character at a position that was previously wrong
    Corrected,
    /// Typed something else than the expected character
    Wrong,
    /// Deleted a character; `was_correct` tells whether it matched the target
    Deleted { was_correct: bool },
}

/// Incremental correctness state of a session
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    correct: usize,
    error_indices: BTreeSet<usize>,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a keystroke, re-evaluating only the index it changed
    pub fn apply(&mut self, keystroke: &Keystroke) -> CharacterResult {
        match keystroke.kind {
            KeystrokeKind::Added { matches: true } => {
                self.correct += 1;
                if self.error_indices.remove(&keystroke.index) {
                    CharacterResult::Corrected
                } else {
                    CharacterResult::Correct
                }
            }
            KeystrokeKind::Added { matches: false } => {
                self.error_indices.insert(keystroke.index);
                CharacterResult::Wrong
            }
            KeystrokeKind::Deleted { matched } => {
                if matched {
                    self.correct = self.correct.saturating_sub(1);
                }
                CharacterResult::Deleted {
                    was_correct: matched,
                }
            }
        }
    }

    /// Typed positions matching the target
    pub const fn correct_characters(&self) -> usize {
        self.correct
    }

    /// Target indices currently marked wrong
    pub const fn error_indices(&self) -> &BTreeSet<usize> {
        &self.error_indices
    }

    /// Accuracy of `typed_len` characters in percent
    pub fn accuracy(&self, typed_len: usize) -> u8 {
        math::accuracy(self.correct, typed_len)
    }

    /// Error counts per equal-width segment of the target
    pub fn error_heatmap(&self, target_len: usize, buckets: usize) -> Vec<usize> {
        error_heatmap(&self.error_indices, target_len, buckets)
    }
}

/// Count positions where `typed` matches `target`, without realignment
pub fn count_correct(target: &[char], typed: &[char]) -> usize {
    target
        .iter()
        .zip(typed)
        .filter(|(expected, actual)| expected == actual)
        .count()
}

/// Position-locked accuracy of `typed` against `target` in percent
///
/// ```rust
/// use pacer::scoring::accuracy_of;
///
/// assert_eq!(accuracy_of("abc", ""), 100);
/// assert_eq!(accuracy_of("abc", "abx"), 67);
/// ```
pub fn accuracy_of(target: &str, typed: &str) -> u8 {
    let target: Vec<char> = target.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    math::accuracy(count_correct(&target, &typed), typed.len())
}

/// Count the indices in `error_indices` per segment of the target
///
/// The target is split into `buckets` equal-width segments. An index `i` falls into
/// segment `i * buckets / target_len`. Indices outside the target are ignored.
pub fn error_heatmap(error_indices: &BTreeSet<usize>, target_len: usize, buckets: usize) -> Vec<usize> {
    let mut counts = vec![0; buckets];
    if target_len == 0 || buckets == 0 {
        return counts;
    }

    for &index in error_indices.range(..target_len) {
        let bucket = (index * buckets / target_len).min(buckets - 1);
        counts[bucket] += 1;
    }

    counts
}
