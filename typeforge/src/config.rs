use std::path::{Path, PathBuf};

use derive_more::From;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use pacer::pacing::{DEFAULT_LAG_THRESHOLD, DEFAULT_LEAD_THRESHOLD};
use pacer::{Configuration, Difficulty, Language, PacingMode, TimeLimit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use source::{SourceError, TextSource};

pub mod source;

/// Prefix of environment variables overriding settings, e.g. `TYPEFORGE_DIFFICULTY=hard`
pub const ENV_PREFIX: &str = "TYPEFORGE_";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Run without a pace-setter
    pub free: bool,
    pub lag_threshold: f64,
    pub lead_threshold: f64,
    pub time_limit: TimeLimit,
    pub sample_interval_seconds: f64,
    pub heatmap_buckets: usize,
    /// Language of the snippet picked when none is named
    pub language: Option<Language>,
}

impl Default for Settings {
    fn default() -> Self {
        let defaults = Configuration::default();
        Self {
            difficulty: Difficulty::default(),
            free: false,
            lag_threshold: DEFAULT_LAG_THRESHOLD,
            lead_threshold: DEFAULT_LEAD_THRESHOLD,
            time_limit: defaults.time_limit,
            sample_interval_seconds: defaults.sample_interval_seconds,
            heatmap_buckets: defaults.heatmap_buckets,
            language: None,
        }
    }
}

impl Settings {
    /// The engine configuration described by these settings
    pub fn configuration(&self) -> Result<Configuration, pacer::ConfigError> {
        let pacing = if self.free {
            PacingMode::Free
        } else {
            PacingMode::Paced {
                speed: self.difficulty.speed(),
                lag_threshold: self.lag_threshold,
                lead_threshold: self.lead_threshold,
            }
        };

        let configuration = Configuration {
            pacing,
            time_limit: self.time_limit,
            sample_interval_seconds: self.sample_interval_seconds,
            heatmap_buckets: self.heatmap_buckets,
        };
        configuration.validate()?;
        Ok(configuration)
    }

    /// Layer defaults, `settings.toml` in `config_dir` and the environment
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let settings_toml = config_dir.join("settings.toml");
        if settings_toml.exists() {
            figment = figment.merge(Toml::file(settings_toml));
        }

        let settings = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(Box::new)?;
        Ok(settings)
    }
}

#[derive(Debug, From, Error)]
pub enum ConfigError {
    #[error(
        "Failed to get configuration directory. Please specify the location using the `--config <path>` flag"
    )]
    NoDirectory,

    #[error("Failed to create config directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(Box<figment::Error>),

    #[error("Invalid settings: {0}")]
    Invalid(pacer::ConfigError),
}

#[derive(Debug)]
pub struct Config {
    pub settings: Settings,
    pub directory: PathBuf,
}

impl Config {
    pub fn get(override_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Check for toml file location
        let directory = override_path
            .or_else(|| {
                ProjectDirs::from("com", "TypeForge", "TypeForge")
                    .map(|dirs| dirs.config_dir().to_path_buf())
            })
            .ok_or(ConfigError::NoDirectory)?;

        // Ensure path exists
        if !directory.exists() {
            std::fs::create_dir_all(&directory)?;
        }

        let settings = Settings::load(&directory)?;
        tracing::debug!(directory = %directory.display(), ?settings, "configuration loaded");

        Ok(Self {
            settings,
            directory,
        })
    }

    /// The engine configuration, rejecting settings it can't run with
    pub fn configuration(&self) -> Result<Configuration, ConfigError> {
        Ok(self.settings.configuration()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("typeforge-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_match_the_engine() {
        let configuration = Settings::default().configuration().unwrap();
        assert_eq!(configuration, Configuration::default());
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let dir = scratch_dir("settings");
        std::fs::write(
            dir.join("settings.toml"),
            "difficulty = \"hard\"\ntime_limit = \"5m\"\nlead_threshold = 4.0\nlanguage = \"python\"\n",
        )
        .unwrap();

        let settings = Settings::load(&dir).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.time_limit, TimeLimit::FiveMinutes);
        assert_eq!(settings.language, Some(Language::Python));
        assert_eq!(settings.lag_threshold, DEFAULT_LAG_THRESHOLD);

        let configuration = settings.configuration().unwrap();
        assert_eq!(
            configuration.pacing,
            PacingMode::Paced {
                speed: 5.0,
                lag_threshold: 12.0,
                lead_threshold: 4.0,
            }
        );

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_settings_file_uses_defaults() {
        let dir = scratch_dir("empty");
        assert_eq!(Settings::load(&dir).unwrap(), Settings::default());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_free_mode_and_invalid_values() {
        let settings = Settings {
            free: true,
            ..Settings::default()
        };
        assert_eq!(settings.configuration().unwrap().pacing, PacingMode::Free);

        let settings = Settings {
            heatmap_buckets: 0,
            ..Settings::default()
        };
        assert!(settings.configuration().is_err());
    }
}
