//! Deterministic replays of keystroke scripts
//!
//! A script names a text and lists timed events:
//!
//! ```toml
//! snippet = "Debounce"          # or: text = "..." with an optional language
//!
//! [[event]]
//! at = 0.0
//! kind = "type"
//! text = "function"
//!
//! [[event]]
//! at = 2.5
//! kind = "backspace"
//! ```
//!
//! Time is simulated with a [`ManualClock`]. Between events the session is pumped at
//! 60 frames per second, so the pace-setter and the sampler see the same frames on
//! every run.

use std::path::Path;

use derive_more::From;
use pacer::{
    Configuration, Language, LanguageFamily, ManualClock, SessionReport, TypingSession,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use web_time::Duration;

use crate::config::{SourceError, TextSource};

const FRAMES_PER_SECOND: u64 = 60;

/// Latest time an event may happen at
const MAX_EVENT_TIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, From, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Read(std::io::Error),

    #[error("Failed to parse script: {0}")]
    Parse(toml::de::Error),

    #[error("Failed to load the script's text: {0}")]
    Source(SourceError),

    #[error("Invalid configuration: {0}")]
    Config(pacer::ConfigError),

    #[error("A script needs either `text` or `snippet`")]
    MissingText,

    #[error("Event {index} happens at {at}s, before the previous event at {previous}s")]
    #[from(skip)]
    OutOfOrder { index: usize, at: f64, previous: f64 },

    #[error("Event {index} has an invalid time {at}, expected 0 to 86400 seconds")]
    #[from(skip)]
    InvalidTime { index: usize, at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Start the pace-setter without typing
    Start,
    /// Type the event's text
    Type,
    /// Delete `count` characters
    Backspace,
    /// Only let time pass
    Wait,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    /// Seconds since the replay started
    pub at: f64,
    pub kind: EventKind,
    #[serde(default)]
    pub text: String,
    #[serde(default = "one")]
    pub count: usize,
}

const fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub text: Option<String>,
    pub snippet: Option<String>,
    pub language: Option<Language>,
    /// Overrides the configuration from settings
    pub configuration: Option<Configuration>,
    #[serde(default, rename = "event")]
    pub events: Vec<Event>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    fn passage(&self) -> Result<(String, LanguageFamily), ScriptError> {
        if let Some(text) = &self.text {
            let family = self.language.map(Language::family).unwrap_or_default();
            return Ok((text.clone(), family));
        }

        let title = self.snippet.as_ref().ok_or(ScriptError::MissingText)?;
        let passage = TextSource::Snippet(title.clone()).fetch()?;
        Ok((passage.text, passage.family))
    }

    /// The time of every event, checked to be in range and in order
    fn timeline(&self) -> Result<Vec<Duration>, ScriptError> {
        let mut previous = 0.0;
        let mut timeline = Vec::with_capacity(self.events.len());

        for (index, event) in self.events.iter().enumerate() {
            let at = Duration::try_from_secs_f64(event.at)
                .ok()
                .filter(|at| *at <= MAX_EVENT_TIME)
                .ok_or(ScriptError::InvalidTime { index, at: event.at })?;

            if event.at < previous {
                return Err(ScriptError::OutOfOrder {
                    index,
                    at: event.at,
                    previous,
                });
            }
            previous = event.at;
            timeline.push(at);
        }

        Ok(timeline)
    }

    /// Replay the script and report on the session
    ///
    /// `fallback` is used unless the script carries its own configuration.
    pub fn run(&self, fallback: &Configuration) -> Result<SessionReport, ScriptError> {
        let timeline = self.timeline()?;

        let (text, family) = self.passage()?;
        let configuration = self.configuration.clone().unwrap_or_else(|| fallback.clone());
        let clock = ManualClock::new();
        let mut session = TypingSession::with_clock(&text, family, configuration, clock.clone())?;

        for (event, at) in self.events.iter().zip(timeline) {
            advance_to(&mut session, &clock, at);
            apply(&mut session, event);
            debug!(at = event.at, kind = ?event.kind, status = %session.status(), "replayed event");
        }

        Ok(session.report())
    }
}

impl std::str::FromStr for Script {
    type Err = ScriptError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

/// Pump frames until the clock reads `target`
///
/// Only a running session sees frames. Otherwise the clock jumps straight to `target`.
fn advance_to(session: &mut TypingSession<ManualClock>, clock: &ManualClock, target: Duration) {
    let frame = Duration::from_nanos(1_000_000_000 / FRAMES_PER_SECOND);

    loop {
        let remaining = target.saturating_sub(clock.elapsed());
        if remaining.is_zero() {
            break;
        }
        if !session.status().is_running() {
            clock.advance(remaining);
            break;
        }
        clock.advance(remaining.min(frame));
        session.pump();
    }
}

fn apply(session: &mut TypingSession<ManualClock>, event: &Event) {
    match event.kind {
        EventKind::Start => {
            session.start();
        }
        EventKind::Type => {
            session.type_str(&event.text);
        }
        EventKind::Backspace => {
            for _ in 0..event.count {
                session.backspace();
            }
        }
        EventKind::Wait => {}
    }
}
