//! # pacer - A paced code-typing challenge engine
//!
//! `pacer` drives cursor-synchronized typing challenges over source code. A virtual
//! "pace-setter" cursor advances through the target text in real time, and the typist
//! has to keep up with it without falling behind or racing ahead.
//!
//! The crate is split into three cooperating parts:
//!
//! - [`tokenizer`]: splits source code into highlight spans for display
//! - [`pacing`]: the session state machine and the pace-setter cursor
//! - [`scoring`]: position-locked accuracy, WPM and the error heatmap
//!
//! [`session::TypingSession`] ties them together, and owns the cancelable
//! [`scheduler`] tasks that drive the frame loop and the once-per-second sampler.
//!
//! ## Quick start
//!
//! ```rust
//! use pacer::{LanguageFamily, Status, TypingSession};
//!
//! let mut session = TypingSession::new("let x = 1;", LanguageFamily::CLike);
//! assert_eq!(session.status(), Status::Idle);
//!
//! session.type_str("let");
//! assert_eq!(session.status(), Status::Running);
//! assert_eq!(session.metrics().accuracy, 100);
//! ```

pub mod clock;
pub mod config;
pub mod input_handler;
pub mod language;
pub mod math;
pub mod pacing;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod snippets;
pub mod statistics;
pub mod tokenizer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ConfigError, Configuration};
pub use language::{Language, LanguageFamily};
pub use pacing::{Difficulty, Divergence, PacingMode, Status, TimeLimit};
pub use scoring::CharacterResult;
pub use session::{Metrics, TypingSession};
pub use statistics::SessionReport;
pub use tokenizer::{Token, TokenKind, Tokens, tokenize};

/// The conventional amount of characters per word used for WPM.
pub const AVERAGE_WORD_LENGTH: usize = 5;

// Types for more general type-safety
type Seconds = f64;
type Minutes = f64;

// Get the minutes elapsed from an amount of seconds
pub(crate) fn minutes(seconds: Seconds) -> Minutes {
    seconds / 60.0
}
