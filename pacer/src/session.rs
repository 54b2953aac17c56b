//! # Session Module - Complete Typing Challenge Management
//!
//! This module provides the high-level interface for running a paced typing challenge.
//! It coordinates the tokenizer, input handling, pacing, scoring and statistics behind one
//! control surface for a hosting UI.
//!
//! ## Key Features
//!
//! - **Pace-setter**: a virtual cursor the typist has to track within a lag/lead window
//! - **Live metrics**: accuracy, WPM and error positions after every keystroke
//! - **Highlighting**: tokens of the target text, resolved once per loaded text
//! - **Owned timers**: the frame loop and the sampler are cancelled by [`TypingSession::dispose`]
//!
//! ## Session Lifecycle
//!
#![doc = simple_mermaid::mermaid!("../diagrams/session_lifecycle.mmd")]
//!
//! ## Driving a Session
//!
//! The host forwards keystrokes with [`TypingSession::type_char`] and
//! [`TypingSession::backspace`], and calls [`TypingSession::pump`] once per rendered frame.
//! `pump` reads the session's [`Clock`] once, advances the pace-setter by the time since the
//! previous frame, takes any due samples and enforces the time budget.
//!
//! ```rust
//! use pacer::{Configuration, LanguageFamily, ManualClock, Status, TypingSession};
//! use pacer::pacing::{Difficulty, PacingMode};
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let config = Configuration {
//!     pacing: PacingMode::paced(Difficulty::Easy), // 2 characters per second
//!     ..Configuration::default()
//! };
//! let mut session = TypingSession::with_clock(
//!     "print('hello world')",
//!     LanguageFamily::CLike,
//!     config,
//!     clock.clone(),
//! )
//! .unwrap();
//!
//! session.type_str("pr");
//! clock.advance(Duration::from_secs(1));
//! session.pump();
//!
//! let metrics = session.metrics();
//! assert_eq!(metrics.status, Status::Running);
//! assert_eq!(metrics.cursor_position, 2.0);
//! assert_eq!(metrics.accuracy, 100);
//! assert_eq!(metrics.wpm, 24); // 2 characters in one second
//! ```

use std::collections::BTreeSet;

use tracing::{debug, trace};
use web_time::{Duration, Instant};

use crate::clock::{Clock, MonotonicClock};
use crate::config::{ConfigError, Configuration};
use crate::input_handler::InputHandler;
use crate::language::LanguageFamily;
use crate::math::Wpm;
use crate::pacing::{PacingController, Status};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::scoring::{CharacterResult, Scorer};
use crate::statistics::{KeystrokeTotals, SessionReport, StatisticsTracker};
use crate::tokenizer::{Token, tokenize};

/// A snapshot of the live session metrics
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub accuracy: u8,
    pub wpm: u32,
    pub status: Status,
    pub cursor_position: f64,
    pub error_indices: BTreeSet<usize>,
}

/// One paced typing attempt over a target text
///
/// # Thread Safety
///
/// A session is driven from a single thread. The [`TaskHandle`] it hands out can be sent
/// elsewhere to cancel its tasks.
#[derive(Debug, Clone)]
pub struct TypingSession<C: Clock = MonotonicClock> {
    /// Lexical family, resolved once when the session is created
    family: LanguageFamily,
    /// Highlight spans of the target text
    tokens: Vec<Token>,
    input_handler: InputHandler,
    scorer: Scorer,
    pacing: PacingController,
    statistics: StatisticsTracker,
    scheduler: Scheduler,
    config: Configuration,
    clock: C,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    disposed: bool,
}

impl TypingSession {
    /// Create a session on the system clock with the default configuration
    ///
    /// Any text is accepted, including an empty one.
    pub fn new(target: &str, family: LanguageFamily) -> Self {
        Self::build(target, family, Configuration::default(), MonotonicClock)
    }

    /// Create a session on the system clock with a custom configuration
    pub fn with_configuration(
        target: &str,
        family: LanguageFamily,
        config: Configuration,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(target, family, config, MonotonicClock)
    }
}

impl<C: Clock> TypingSession<C> {
    /// Create a session reading time from `clock`
    pub fn with_clock(
        target: &str,
        family: LanguageFamily,
        config: Configuration,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(target, family, config, clock))
    }

    fn build(target: &str, family: LanguageFamily, config: Configuration, clock: C) -> Self {
        let input_handler = InputHandler::new(target);
        let target_len = input_handler.target_len();
        debug!(target_len, %family, "typing session loaded");

        Self {
            family,
            tokens: tokenize(target, family),
            input_handler,
            scorer: Scorer::new(),
            pacing: PacingController::new(config.pacing, target_len),
            statistics: StatisticsTracker::new(),
            scheduler: Scheduler::new(sample_period(&config)),
            config,
            clock,
            started_at: None,
            finished_at: None,
            disposed: false,
        }
    }

    /// Replace the target text and start over
    ///
    /// The previous session's tasks are cancelled before the new ones are created.
    pub fn load(&mut self, target: &str) {
        self.scheduler.cancel();

        let input_handler = InputHandler::new(target);
        let target_len = input_handler.target_len();
        debug!(target_len, family = %self.family, "typing session loaded");

        self.tokens = tokenize(target, self.family);
        self.input_handler = input_handler;
        self.scorer = Scorer::new();
        self.pacing = PacingController::new(self.config.pacing, target_len);
        self.statistics = StatisticsTracker::new();
        self.scheduler = Scheduler::new(sample_period(&self.config));
        self.started_at = None;
        self.finished_at = None;
        self.disposed = false;
    }

    /// Start over with the same target text
    pub fn reset(&mut self) {
        let target = self.input_handler.target_text();
        self.load(&target);
    }

    /// Stop the session for good
    ///
    /// Cancels the frame loop and the sampler. Afterwards no keystroke, tick or pump
    /// changes the session until a new text is loaded.
    pub fn dispose(&mut self) {
        if !self.disposed {
            debug!("typing session disposed");
        }
        self.scheduler.cancel();
        self.disposed = true;
    }

    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// A handle cancelling this session's scheduled tasks
    pub fn task_handle(&self) -> TaskHandle {
        self.scheduler.handle()
    }

    /// Start the pace-setter before the first keystroke
    ///
    /// Returns `false` if the session already started, ended or was disposed, or if
    /// there is nothing to type.
    pub fn start(&mut self) -> bool {
        if self.disposed || self.input_handler.target_len() == 0 {
            return false;
        }
        let now = self.clock.now();
        self.begin(now)
    }

    fn begin(&mut self, now: Instant) -> bool {
        if !self.pacing.start() {
            return false;
        }

        self.started_at = Some(now);
        self.scheduler.arm(now);
        debug!(pacing = ?self.pacing.mode(), "typing session started");
        true
    }

    /// Type a single character
    ///
    /// Starts the session on the first character. Returns `None` if the character was
    /// not accepted: the session ended, was disposed, or the text is fully typed.
    pub fn type_char(&mut self, char: char) -> Option<CharacterResult> {
        if self.disposed || self.status().is_terminal() || self.input_handler.is_fully_typed() {
            return None;
        }

        let now = self.clock.now();
        self.begin(now);

        if self.catch_up(now) {
            return None;
        }

        let keystroke = self.input_handler.add_input(char)?;
        let result = self.scorer.apply(&keystroke);
        self.statistics.record(result, keystroke.expected);
        self.after_keystroke(now);

        Some(result)
    }

    /// Type every character of `delta` in order
    ///
    /// Stops at the first character that is not accepted. Returns how many were.
    pub fn type_str(&mut self, delta: &str) -> usize {
        delta
            .chars()
            .take_while(|&char| self.type_char(char).is_some())
            .count()
    }

    /// Delete the last typed character
    ///
    /// Returns `None` if nothing was deleted.
    pub fn backspace(&mut self) -> Option<CharacterResult> {
        if self.disposed || !self.status().is_running() {
            return None;
        }

        let now = self.clock.now();
        if self.catch_up(now) {
            return None;
        }

        let keystroke = self.input_handler.delete_input()?;
        let result = self.scorer.apply(&keystroke);
        self.statistics.record(result, keystroke.expected);
        self.after_keystroke(now);

        Some(result)
    }

    /// Completion first, then the divergence check
    fn after_keystroke(&mut self, now: Instant) {
        let typed_len = self.input_handler.input_len();

        if self.input_handler.is_fully_typed() {
            self.finish(Status::Completed, now);
            return;
        }

        if let Some(divergence) = self.pacing.check(typed_len) {
            debug!(
                ?divergence,
                typed_len,
                cursor = self.pacing.cursor_position(),
                "typist diverged from the pace-setter"
            );
            self.seal(now);
        }
    }

    /// Advance the pace-setter by `delta_seconds`
    ///
    /// The delta is added on top of the time the frame loop has already measured. It
    /// never fails the session: divergence is only checked on keystrokes. The time
    /// budget is enforced.
    pub fn tick(&mut self, delta_seconds: f64) {
        if self.disposed || !self.status().is_running() {
            return;
        }

        if !self.catch_up(self.clock.now()) {
            self.pacing.advance(delta_seconds);
        }
    }

    /// Run the session's scheduled tasks once
    ///
    /// Call this once per rendered frame. Advances the pace-setter by the time since the
    /// previous frame, appends one sample per elapsed sample period, and completes the
    /// session once the time budget is spent.
    pub fn pump(&mut self) {
        if self.disposed || !self.status().is_running() {
            return;
        }

        self.catch_up(self.clock.now());
    }

    /// Drain the frame loop and the sampler up to `now`, then enforce the time budget
    ///
    /// Every entry point runs this first, so the outcome doesn't depend on whether a
    /// frame, a tick or a keystroke notices the passing time. Returns `true` if the
    /// session completed.
    fn catch_up(&mut self, now: Instant) -> bool {
        // Nothing past the time budget is integrated or sampled.
        let horizon = self.deadline().map_or(now, |deadline| now.min(deadline));
        let poll = self.scheduler.poll(horizon);

        if let Some(delta) = poll.delta_seconds {
            self.pacing.advance(delta);
        }

        for _ in 0..poll.samples {
            self.sample(horizon);
        }

        self.enforce_time_budget(now)
    }

    /// When the time budget of a started session runs out
    fn deadline(&self) -> Option<Instant> {
        let budget = self.config.time_limit.duration()?;
        self.started_at.map(|started_at| started_at + budget)
    }

    fn sample(&mut self, now: Instant) {
        let accuracy = self.accuracy();
        let wpm = self.wpm_at(now).net();
        trace!(accuracy, wpm, "sampled session metrics");
        self.statistics.sample(accuracy, wpm);
    }

    /// Complete a running session whose time budget is spent
    ///
    /// Returns `true` if the session completed.
    fn enforce_time_budget(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline() else {
            return false;
        };

        if self.status().is_running() && now >= deadline {
            // The session ends at the deadline, however late it is noticed.
            self.finish(Status::Completed, deadline);
            return true;
        }

        false
    }

    fn finish(&mut self, status: Status, now: Instant) {
        if self.pacing.finish(status) {
            self.seal(now);
        }
    }

    /// Freeze the session after it reached a terminal status
    fn seal(&mut self, now: Instant) {
        self.finished_at = Some(now);
        self.scheduler.cancel();
        debug!(
            status = %self.status(),
            elapsed = self.elapsed().as_secs_f64(),
            accuracy = self.accuracy(),
            "typing session finished"
        );
    }

    pub const fn status(&self) -> Status {
        self.pacing.status()
    }

    pub const fn family(&self) -> LanguageFamily {
        self.family
    }

    pub const fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Highlight spans of the target text
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn target_text(&self) -> String {
        self.input_handler.target_text()
    }

    pub fn typed_text(&self) -> String {
        self.input_handler.input_text()
    }

    pub const fn target_len(&self) -> usize {
        self.input_handler.target_len()
    }

    pub const fn typed_len(&self) -> usize {
        self.input_handler.input_len()
    }

    /// Position of the pace-setter, in characters
    pub const fn cursor_position(&self) -> f64 {
        self.pacing.cursor_position()
    }

    /// Typed characters matching the target at the same position
    pub const fn correct_characters(&self) -> usize {
        self.scorer.correct_characters()
    }

    /// Target indices currently typed wrong
    pub const fn error_indices(&self) -> &BTreeSet<usize> {
        self.scorer.error_indices()
    }

    pub fn accuracy(&self) -> u8 {
        self.scorer.accuracy(self.typed_len())
    }

    /// Time since the session started, frozen once it finished
    pub fn elapsed(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |started_at| {
            let end = self.finished_at.unwrap_or_else(|| self.clock.now());
            end.saturating_duration_since(started_at)
        })
    }

    fn wpm_at(&self, now: Instant) -> Wpm {
        let seconds = self.started_at.map_or(0.0, |started_at| {
            let end = self.finished_at.unwrap_or(now);
            end.saturating_duration_since(started_at).as_secs_f64()
        });

        Wpm::calculate(
            self.typed_len(),
            self.correct_characters(),
            crate::minutes(seconds),
        )
    }

    /// Net words per minute
    pub fn wpm(&self) -> u32 {
        self.wpm_at(self.clock.now()).net()
    }

    /// Typed percentage of the target text
    pub fn completion_percentage(&self) -> f64 {
        let target_len = self.target_len();
        if target_len == 0 {
            return 0.0;
        }
        (self.typed_len() as f64 / target_len as f64) * 100.0
    }

    /// Accuracy samples taken once per sample period while running
    pub fn accuracy_history(&self) -> Vec<u8> {
        self.statistics.accuracy_history()
    }

    pub const fn statistics(&self) -> &StatisticsTracker {
        &self.statistics
    }

    /// Current error counts per segment of the target text
    pub fn error_heatmap(&self) -> Vec<usize> {
        self.scorer
            .error_heatmap(self.target_len(), self.config.heatmap_buckets)
    }

    /// Snapshot of the live metrics
    pub fn metrics(&self) -> Metrics {
        Metrics {
            accuracy: self.accuracy(),
            wpm: self.wpm(),
            status: self.status(),
            cursor_position: self.cursor_position(),
            error_indices: self.error_indices().clone(),
        }
    }

    /// Aggregate the session's results
    ///
    /// Can be called at any time; the figures of a finished session don't change.
    pub fn report(&self) -> SessionReport {
        let wpm = self.wpm_at(self.clock.now());

        SessionReport {
            status: self.status(),
            accuracy: self.accuracy(),
            wpm: wpm.net(),
            raw_wpm: wpm.raw_rounded(),
            elapsed_seconds: self.elapsed().as_secs_f64(),
            target_characters: self.target_len(),
            typed_characters: self.typed_len(),
            correct_characters: self.correct_characters(),
            cursor_position: self.cursor_position(),
            keystrokes: KeystrokeTotals::from(self.statistics.counters()),
            most_missed: self.statistics.most_missed(),
            accuracy_history: self.statistics.accuracy_history(),
            wpm_history: self.statistics.wpm_history(),
            consistency: self.statistics.consistency(),
            error_heatmap: self.error_heatmap(),
        }
    }
}

fn sample_period(config: &Configuration) -> Duration {
    Duration::from_secs_f64(config.sample_interval_seconds)
}
