//! # Configuration Module - Runtime Behavior Settings
//!
//! This module provides configuration options for customizing how a typing session
//! paces, samples and scores the typist.
//!
//! ## Usage
//!
//! ```rust
//! use pacer::config::Configuration;
//! use pacer::pacing::{Difficulty, PacingMode, TimeLimit};
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert!(config.validate().is_ok());
//!
//! // Custom configuration
//! let config = Configuration {
//!     pacing: PacingMode::paced(Difficulty::Hard),
//!     time_limit: TimeLimit::ThreeMinutes,
//!     ..Configuration::default()
//! };
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Tuning
//!
//! - **Pacing**: the speed of the pace-setter and the divergence thresholds decide how
//!   strict a session is. A lower lead threshold punishes rushing ahead, a lower lag
//!   threshold punishes falling behind.
//! - **Sample interval**: how often accuracy and WPM are appended to the history.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pacing::{PacingMode, TimeLimit};

/// Default number of equal-width segments in the error heatmap
pub const DEFAULT_HEATMAP_BUCKETS: usize = 20;

/// Errors raised when a [`Configuration`] can't drive a session
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Pacing speed must be a positive number of characters per second, got {0}")]
    InvalidSpeed(f64),

    #[error("The {name} threshold must be a non-negative number of characters, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Sample interval must be a positive number of seconds, got {0}")]
    InvalidSampleInterval(f64),

    #[error("The error heatmap needs at least one bucket")]
    NoHeatmapBuckets,
}

/// Runtime configuration for a typing session
///
/// All settings have defaults matching a medium-difficulty, one minute challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// How the pace-setter cursor moves, and when the typist diverges from it
    ///
    /// **Default**: [`PacingMode::default`] (medium speed, lag 12, lead 8)
    pub pacing: PacingMode,

    /// The time budget of the session, measured from the first keystroke
    ///
    /// **Default**: one minute
    pub time_limit: TimeLimit,

    /// Interval between accuracy/WPM samples in seconds
    ///
    /// Sampling runs on its own fixed cadence, independent of the frame loop.
    ///
    /// **Default**: 1.0 seconds
    pub sample_interval_seconds: f64,

    /// Number of equal-width segments of the target text in the error heatmap
    ///
    /// **Default**: 20
    pub heatmap_buckets: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            pacing: PacingMode::default(),
            time_limit: TimeLimit::default(),
            sample_interval_seconds: 1.0,
            heatmap_buckets: DEFAULT_HEATMAP_BUCKETS,
        }
    }
}

impl Configuration {
    /// Check that the configuration can drive a session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let PacingMode::Paced {
            speed,
            lag_threshold,
            lead_threshold,
        } = self.pacing
        {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(ConfigError::InvalidSpeed(speed));
            }
            check_threshold("lag", lag_threshold)?;
            check_threshold("lead", lead_threshold)?;
        }

        let interval = self.sample_interval_seconds;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::InvalidSampleInterval(interval));
        }

        if self.heatmap_buckets == 0 {
            return Err(ConfigError::NoHeatmapBuckets);
        }

        Ok(())
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        Err(ConfigError::InvalidThreshold { name, value })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::Difficulty;

    #[test]
    fn test_default_is_valid() {
        let config = Configuration::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.heatmap_buckets, 20);
        assert_eq!(config.sample_interval_seconds, 1.0);
    }

    #[test]
    fn test_invalid_speed() {
        let config = Configuration {
            pacing: PacingMode::Paced {
                speed: 0.0,
                lag_threshold: 12.0,
                lead_threshold: 8.0,
            },
            ..Configuration::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeed(0.0)));

        let config = Configuration {
            pacing: PacingMode::Paced {
                speed: f64::NAN,
                lag_threshold: 12.0,
                lead_threshold: 8.0,
            },
            ..Configuration::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn test_invalid_thresholds() {
        let config = Configuration {
            pacing: PacingMode::Paced {
                speed: 2.0,
                lag_threshold: -1.0,
                lead_threshold: 8.0,
            },
            ..Configuration::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "lag",
                value: -1.0
            })
        );

        let config = Configuration {
            pacing: PacingMode::Paced {
                speed: 2.0,
                lag_threshold: 12.0,
                lead_threshold: -0.5,
            },
            ..Configuration::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "lead",
                value: -0.5
            })
        );
    }

    #[test]
    fn test_free_mode_skips_pacing_checks() {
        let config = Configuration {
            pacing: PacingMode::Free,
            ..Configuration::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_sampling_and_buckets() {
        let config = Configuration {
            sample_interval_seconds: 0.0,
            ..Configuration::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSampleInterval(0.0))
        );

        let config = Configuration {
            pacing: PacingMode::paced(Difficulty::Easy),
            heatmap_buckets: 0,
            ..Configuration::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoHeatmapBuckets));
    }
}
