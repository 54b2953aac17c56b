//! # Pacing Module - The Pace-Setter State Machine
//!
//! A paced session simulates an instructor typing at a fixed rhythm. A virtual cursor
//! advances through the target text at `speed` characters per second, and the typist has
//! to track it: falling more than `lag_threshold` characters behind **or** racing more than
//! `lead_threshold` characters ahead fails the session. Raw speed alone does not win.
//!
//! ```text
//!  Idle ──first keystroke / start()──▶ Running ──divergence──▶ Failed
//!                                         │
//!                                         └──full text / time budget──▶ Completed
//! ```
//!
//! The divergence check runs after keystrokes only. The cursor itself moves on every frame
//! through [`PacingController::advance`], integrating the elapsed time since the last frame.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use web_time::Duration;

/// Default distance the cursor may run ahead of the typist
pub const DEFAULT_LAG_THRESHOLD: f64 = 12.0;

/// Default distance the typist may run ahead of the cursor
pub const DEFAULT_LEAD_THRESHOLD: f64 = 8.0;

/// State of a typing session
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Loaded, waiting for the first keystroke
    #[default]
    Idle,
    /// The pace-setter is moving
    Running,
    /// The typist diverged too far from the pace-setter
    Failed,
    /// The text was typed out, or the time budget ran out
    Completed,
}

impl Status {
    /// `Failed` and `Completed` are final for a session
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Completed)
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Preset pace-setter speeds
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Pace-setter speed in characters per second
    pub const fn speed(self) -> f64 {
        match self {
            Self::Easy => 2.0,
            Self::Medium => 3.5,
            Self::Hard => 5.0,
        }
    }
}

/// Selectable time budgets
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum TimeLimit {
    #[default]
    #[strum(to_string = "1m", serialize = "1")]
    #[serde(rename = "1m")]
    OneMinute,
    #[strum(to_string = "3m", serialize = "3")]
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[strum(to_string = "5m", serialize = "5")]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[strum(to_string = "10m", serialize = "10")]
    #[serde(rename = "10m")]
    TenMinutes,
    #[strum(to_string = "unlimited", serialize = "none")]
    #[serde(rename = "unlimited")]
    Unlimited,
}

impl TimeLimit {
    /// The budget, or `None` when the session has no time limit
    pub const fn duration(self) -> Option<Duration> {
        let minutes = match self {
            Self::OneMinute => 1,
            Self::ThreeMinutes => 3,
            Self::FiveMinutes => 5,
            Self::TenMinutes => 10,
            Self::Unlimited => return None,
        };
        Some(Duration::from_secs(minutes * 60))
    }
}

/// How the pace-setter behaves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PacingMode {
    /// A cursor moving at `speed` characters per second that the typist must track
    Paced {
        speed: f64,
        lag_threshold: f64,
        lead_threshold: f64,
    },
    /// No pace-setter: the session only ends on a full text or the time budget
    Free,
}

impl PacingMode {
    /// A paced mode with the preset speed and default thresholds
    pub const fn paced(difficulty: Difficulty) -> Self {
        Self::Paced {
            speed: difficulty.speed(),
            lag_threshold: DEFAULT_LAG_THRESHOLD,
            lead_threshold: DEFAULT_LEAD_THRESHOLD,
        }
    }

    pub const fn is_paced(&self) -> bool {
        matches!(self, Self::Paced { .. })
    }
}

impl Default for PacingMode {
    fn default() -> Self {
        Self::paced(Difficulty::default())
    }
}

/// Which way the typist diverged from the pace-setter, and by how many characters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Divergence {
    /// The cursor outran the typist
    Lag(f64),
    /// The typist outran the cursor
    Lead(f64),
}

/// Owns the session status and the virtual cursor
#[derive(Debug, Clone)]
pub struct PacingController {
    mode: PacingMode,
    target_len: usize,
    cursor: f64,
    status: Status,
}

impl PacingController {
    pub const fn new(mode: PacingMode, target_len: usize) -> Self {
        Self {
            mode,
            target_len,
            cursor: 0.0,
            status: Status::Idle,
        }
    }

    pub const fn mode(&self) -> PacingMode {
        self.mode
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    /// Position of the pace-setter, in characters
    pub const fn cursor_position(&self) -> f64 {
        self.cursor
    }

    /// Move from `Idle` to `Running`
    ///
    /// Returns `false` if the session was already started.
    pub const fn start(&mut self) -> bool {
        if matches!(self.status, Status::Idle) {
            self.status = Status::Running;
            true
        } else {
            false
        }
    }

    /// Integrate `delta_seconds` of pace-setter movement
    ///
    /// Does nothing unless the session is running and paced. Negative or NaN deltas
    /// are treated as no time passing.
    pub fn advance(&mut self, delta_seconds: f64) {
        if !self.status.is_running() {
            return;
        }

        if let PacingMode::Paced { speed, .. } = self.mode {
            let delta = delta_seconds.max(0.0);
            self.cursor = (self.cursor + speed * delta).clamp(0.0, self.target_len as f64);
        }
    }

    /// How far `typed_len` is from the cursor, if beyond a threshold
    pub fn divergence(&self, typed_len: usize) -> Option<Divergence> {
        let PacingMode::Paced {
            lag_threshold,
            lead_threshold,
            ..
        } = self.mode
        else {
            return None;
        };

        if typed_len == 0 {
            return None;
        }

        let typed = typed_len as f64;
        let lag = self.cursor - typed;
        let lead = typed - self.cursor;

        if lag > lag_threshold {
            Some(Divergence::Lag(lag))
        } else if lead > lead_threshold {
            Some(Divergence::Lead(lead))
        } else {
            None
        }
    }

    /// Run the divergence check after a keystroke, failing the session on divergence
    pub fn check(&mut self, typed_len: usize) -> Option<Divergence> {
        if !self.status.is_running() {
            return None;
        }

        let divergence = self.divergence(typed_len);
        if divergence.is_some() {
            self.status = Status::Failed;
        }
        divergence
    }

    /// Move a running session to a terminal status
    ///
    /// Returns `false` if the session wasn't running or `status` isn't terminal.
    pub const fn finish(&mut self, status: Status) -> bool {
        if self.status.is_running() && status.is_terminal() {
            self.status = status;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paced(speed: f64) -> PacingMode {
        PacingMode::Paced {
            speed,
            lag_threshold: DEFAULT_LAG_THRESHOLD,
            lead_threshold: DEFAULT_LEAD_THRESHOLD,
        }
    }

    #[test]
    fn test_cursor_only_moves_while_running() {
        let mut pacing = PacingController::new(paced(2.0), 100);
        pacing.advance(5.0);
        assert_eq!(pacing.cursor_position(), 0.0);

        assert!(pacing.start());
        assert!(!pacing.start());
        pacing.advance(1.5);
        assert_eq!(pacing.cursor_position(), 3.0);

        pacing.finish(Status::Completed);
        pacing.advance(10.0);
        assert_eq!(pacing.cursor_position(), 3.0);
    }

    #[test]
    fn test_cursor_is_clamped_and_ignores_bad_deltas() {
        let mut pacing = PacingController::new(paced(10.0), 15);
        pacing.start();

        pacing.advance(-4.0);
        pacing.advance(f64::NAN);
        assert_eq!(pacing.cursor_position(), 0.0);

        pacing.advance(60.0);
        assert_eq!(pacing.cursor_position(), 15.0);
    }

    #[test]
    fn test_lag_divergence() {
        let mut pacing = PacingController::new(paced(2.0), 100);
        pacing.start();
        pacing.advance(7.0); // cursor at 14

        assert_eq!(pacing.divergence(2), None); // exactly 12 behind
        assert_eq!(pacing.check(1), Some(Divergence::Lag(13.0)));
        assert_eq!(pacing.status(), Status::Failed);
    }

    #[test]
    fn test_lead_divergence() {
        let mut pacing = PacingController::new(paced(2.0), 100);
        pacing.start();

        assert_eq!(pacing.check(8), None);
        assert_eq!(pacing.check(9), Some(Divergence::Lead(9.0)));
        assert_eq!(pacing.status(), Status::Failed);
    }

    #[test]
    fn test_no_divergence_without_input_or_pace() {
        let mut pacing = PacingController::new(paced(2.0), 100);
        pacing.start();
        pacing.advance(30.0);
        assert_eq!(pacing.divergence(0), None);

        let mut free = PacingController::new(PacingMode::Free, 100);
        free.start();
        free.advance(30.0);
        assert_eq!(free.cursor_position(), 0.0);
        assert_eq!(free.check(50), None);
        assert_eq!(free.status(), Status::Running);
    }

    #[test]
    fn test_finish_only_from_running() {
        let mut pacing = PacingController::new(PacingMode::default(), 10);
        assert!(!pacing.finish(Status::Completed));
        assert_eq!(pacing.status(), Status::Idle);

        pacing.start();
        assert!(!pacing.finish(Status::Idle));
        assert!(pacing.finish(Status::Failed));
        assert!(!pacing.finish(Status::Completed));
        assert_eq!(pacing.status(), Status::Failed);
    }

    #[test]
    fn test_presets() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(Difficulty::Easy.speed(), 2.0);
        assert_eq!("5".parse::<TimeLimit>(), Ok(TimeLimit::FiveMinutes));
        assert_eq!("10m".parse::<TimeLimit>(), Ok(TimeLimit::TenMinutes));
        assert_eq!(TimeLimit::ThreeMinutes.duration(), Some(Duration::from_secs(180)));
        assert_eq!(TimeLimit::Unlimited.duration(), None);
        assert_eq!(TimeLimit::default().to_string(), "1m");
    }
}
