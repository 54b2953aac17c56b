use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::Consistency;
use crate::pacing::Status;
use crate::scoring::CharacterResult;

/// Keystroke counters of a session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CounterData {
    /// Target characters the typist got wrong, by expected character
    pub char_misses: HashMap<char, usize>,
    pub adds: usize,
    pub deletes: usize,
    pub errors: usize,
    pub corrects: usize,
    pub corrections: usize,
    /// Deletions of characters that were already correct
    pub correct_deletes: usize,
}

/// A metrics sample taken on the fixed sampling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub accuracy: u8,
    pub wpm: u32,
}

/// Collects counters and periodic samples while a session runs
#[derive(Debug, Default, Clone)]
pub struct StatisticsTracker {
    counters: CounterData,
    samples: Vec<Sample>,
}

impl StatisticsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn counters(&self) -> &CounterData {
        &self.counters
    }

    /// Accuracy of every sample, oldest first
    pub fn accuracy_history(&self) -> Vec<u8> {
        self.samples.iter().map(|sample| sample.accuracy).collect()
    }

    /// WPM of every sample, oldest first
    pub fn wpm_history(&self) -> Vec<u32> {
        self.samples.iter().map(|sample| sample.wpm).collect()
    }

    /// Update counters from a keystroke result
    ///
    /// * `expected` - the target character at the keystroke's index
    pub fn record(&mut self, result: CharacterResult, expected: char) {
        match result {
            CharacterResult::Deleted { was_correct } => {
                self.counters.deletes += 1;
                if was_correct {
                    self.counters.correct_deletes += 1;
                }
            }
            CharacterResult::Wrong => {
                self.counters.errors += 1;
                self.counters.adds += 1;
                *self.counters.char_misses.entry(expected).or_insert(0) += 1;
            }
            CharacterResult::Corrected => {
                self.counters.corrections += 1;
                self.counters.adds += 1;
            }
            CharacterResult::Correct => {
                self.counters.corrects += 1;
                self.counters.adds += 1;
            }
        }
    }

    /// Append a sample
    pub fn sample(&mut self, accuracy: u8, wpm: u32) {
        self.samples.push(Sample { accuracy, wpm });
    }

    /// Target characters missed most often, most missed first
    pub fn most_missed(&self) -> Vec<(char, usize)> {
        let mut misses: Vec<(char, usize)> = self
            .counters
            .char_misses
            .iter()
            .map(|(&char, &count)| (char, count))
            .collect();
        misses.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        misses
    }

    /// Consistency of the sampled WPM
    pub fn consistency(&self) -> Consistency {
        let wpm: Vec<f64> = self
            .samples
            .iter()
            .map(|sample| f64::from(sample.wpm))
            .collect();
        Consistency::calculate(&wpm)
    }
}

/// Keystroke totals of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystrokeTotals {
    pub adds: usize,
    pub deletes: usize,
    pub errors: usize,
    pub corrects: usize,
    pub corrections: usize,
    /// Correct characters that were deleted anyway
    pub correct_deletes: usize,
}

impl From<&CounterData> for KeystrokeTotals {
    fn from(counters: &CounterData) -> Self {
        Self {
            adds: counters.adds,
            deletes: counters.deletes,
            errors: counters.errors,
            corrects: counters.corrects,
            corrections: counters.corrections,
            correct_deletes: counters.correct_deletes,
        }
    }
}

/// Aggregated results of a typing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub status: Status,
    pub accuracy: u8,
    pub wpm: u32,
    pub raw_wpm: u32,
    pub elapsed_seconds: f64,
    pub target_characters: usize,
    pub typed_characters: usize,
    pub correct_characters: usize,
    /// Final pace-setter position
    pub cursor_position: f64,
    pub keystrokes: KeystrokeTotals,
    pub most_missed: Vec<(char, usize)>,
    pub accuracy_history: Vec<u8>,
    pub wpm_history: Vec<u32>,
    pub consistency: Consistency,
    pub error_heatmap: Vec<usize>,
}
