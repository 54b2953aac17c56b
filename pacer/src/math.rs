use serde::{Deserialize, Serialize};

use crate::{AVERAGE_WORD_LENGTH, Minutes};

/// Words Per Minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Wpm {
    /// The raw WPM counts every typed character, right or wrong. Just raw speed.
    pub raw: f64,
    /// The net WPM only counts characters matching the target.
    pub net_exact: f64,
}

impl Wpm {
    /// Calculate Words Per Minute
    ///
    /// * `typed` - How many characters are in the input
    /// * `correct` - How many of those match the target
    /// * `minutes` - How many minutes have gone by
    ///
    /// Both values are zero while no time has passed.
    pub fn calculate(typed: usize, correct: usize, minutes: Minutes) -> Self {
        if !minutes.is_finite() || minutes <= 0.0 {
            return Self::default();
        }

        let words = |characters: usize| characters as f64 / AVERAGE_WORD_LENGTH as f64;

        Self {
            raw: words(typed) / minutes,
            net_exact: words(correct) / minutes,
        }
    }

    /// Net WPM, rounded to a whole number
    pub fn net(&self) -> u32 {
        self.net_exact.round() as u32
    }

    /// Raw WPM, rounded to a whole number
    pub fn raw_rounded(&self) -> u32 {
        self.raw.round() as u32
    }
}

/// Typing accuracy in whole percent
///
/// `correct / typed`, rounded. Nothing typed counts as 100% accurate.
pub fn accuracy(correct: usize, typed: usize) -> u8 {
    if typed == 0 {
        return 100;
    }

    let percent = (100.0 * correct as f64 / typed as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Typing consistency (coefficient of variation of WPM samples)
///
/// Consistency describes the stability of typing speed over time.
/// `percent` is between 0.0 - 100.0, higher is steadier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Consistency {
    /// Population standard deviation of the samples
    pub deviation: f64,
    /// Consistency as percentage (0.0 - 100.0)
    pub percent: f64,
}

impl Consistency {
    /// Calculate typing consistency from a series of samples
    pub fn calculate(samples: &[f64]) -> Self {
        let deviation = calculate_std_dev(samples);
        Self {
            deviation,
            percent: cv_to_percentage(deviation, calculate_mean(samples)),
        }
    }
}

fn calculate_std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    // Welford's online algorithm for numerically stable variance calculation
    let mut mean = 0.0;
    let mut m2 = 0.0; // Sum of squares of deviations from mean

    for (i, &value) in values.iter().enumerate() {
        let delta = value - mean;
        mean += delta / (i + 1) as f64;
        let delta2 = value - mean;
        m2 += delta * delta2;
    }

    // Population standard deviation
    let variance = m2 / values.len() as f64;
    variance.sqrt()
}

fn calculate_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn cv_to_percentage(std_dev: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        return 100.0; // Perfect consistency if no typing occurred
    }
    let cv = std_dev / mean; // Coefficient of variation
    let consistency_percent = (1.0 - cv.min(1.0)) * 100.0;
    consistency_percent.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_calculations() {
        // 50 chars in 1 minute = 10 WPM
        let wpm = Wpm::calculate(50, 50, 1.0);
        assert_eq!(wpm.raw, 10.0);
        assert_eq!(wpm.net_exact, 10.0);

        // Wrong characters only count towards raw speed
        let wpm = Wpm::calculate(50, 40, 1.0);
        assert_eq!(wpm.raw, 10.0);
        assert_eq!(wpm.net(), 8);

        // 30 seconds
        let wpm = Wpm::calculate(25, 25, 0.5);
        assert_eq!(wpm.net(), 10);
        assert_eq!(wpm.raw_rounded(), 10);
    }

    #[test]
    fn test_wpm_without_time() {
        assert_eq!(Wpm::calculate(10, 10, 0.0), Wpm::default());
        assert_eq!(Wpm::calculate(10, 10, -1.0).net(), 0);
        assert_eq!(Wpm::calculate(10, 10, f64::NAN).net(), 0);
    }

    #[test]
    fn test_accuracy_calculations() {
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(2, 3), 67);
        assert_eq!(accuracy(1, 3), 33);
        assert_eq!(accuracy(1, 2), 50);
        assert_eq!(accuracy(0, 5), 0);
        assert_eq!(accuracy(95, 100), 95);
    }

    #[test]
    fn test_consistency_calculations() {
        // Consistent typing (low standard deviation)
        let consistency = Consistency::calculate(&[50.0, 51.0, 49.0, 50.5, 49.5]);
        assert!(consistency.deviation < 1.0);
        assert!(consistency.percent > 90.0);

        // Inconsistent typing (high standard deviation)
        let consistency = Consistency::calculate(&[30.0, 60.0, 40.0, 70.0, 20.0]);
        assert!(consistency.deviation > 15.0);
        assert!(consistency.percent < 70.0);

        // Single measurement: no deviation, perfect consistency
        let consistency = Consistency::calculate(&[50.0]);
        assert_eq!(consistency.deviation, 0.0);
        assert_eq!(consistency.percent, 100.0);

        // No measurements
        let consistency = Consistency::calculate(&[]);
        assert_eq!(consistency.deviation, 0.0);
        assert_eq!(consistency.percent, 100.0);
    }

    #[test]
    fn test_consistency_edge_cases() {
        // Zero WPM values
        let consistency = Consistency::calculate(&[0.0, 0.0]);
        assert_eq!(consistency.deviation, 0.0);
        assert_eq!(consistency.percent, 100.0);

        // Mixed zero/non-zero values
        let consistency = Consistency::calculate(&[0.0, 50.0, 0.0]);
        assert!(consistency.deviation > 20.0);
        assert!(consistency.percent < 50.0);

        // Identical measurements
        let consistency = Consistency::calculate(&[42.0, 42.0, 42.0, 42.0]);
        assert_eq!(consistency.deviation, 0.0);
        assert_eq!(consistency.percent, 100.0);
    }
}
