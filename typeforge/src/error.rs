use derive_more::From;
use thiserror::Error;

use crate::config::{ConfigError, SourceError};
use crate::replay::ScriptError;

#[derive(Debug, From, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(ConfigError),

    #[error("{0}")]
    Source(SourceError),

    #[error("{0}")]
    Script(ScriptError),

    #[error("Invalid configuration: {0}")]
    Engine(pacer::ConfigError),

    #[error("Failed to serialize the report: {0}")]
    Serialize(toml::ser::Error),

    #[error("Terminal error: {0}")]
    Io(std::io::Error),
}
