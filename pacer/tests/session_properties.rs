//! End-to-end behaviour of a typing session, driven through the public API on a manual clock.

use pacer::pacing::{Difficulty, PacingMode, TimeLimit};
use pacer::scoring::accuracy_of;
use pacer::{
    Configuration, LanguageFamily, ManualClock, Status, TokenKind, TypingSession, tokenize,
};
use web_time::Duration;

const TARGET: &str = "const total = items.reduce((sum, item) => sum + item.price, 0);";

fn session(pacing: PacingMode) -> (TypingSession<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let config = Configuration {
        pacing,
        time_limit: TimeLimit::Unlimited,
        ..Configuration::default()
    };
    let session = TypingSession::with_clock(TARGET, LanguageFamily::CLike, config, clock.clone())
        .expect("default thresholds are valid");
    (session, clock)
}

/// Pump at roughly 60 Hz for exactly `seconds`
fn run_frames(session: &mut TypingSession<ManualClock>, clock: &ManualClock, seconds: f64) {
    let total = Duration::from_secs_f64(seconds).as_nanos() as u64;
    let frames = ((seconds * 60.0).round() as u64).max(1);
    for frame in 0..frames {
        // Uneven frame lengths that add up to the exact total
        let nanos = total * (frame + 1) / frames - total * frame / frames;
        clock.advance(Duration::from_nanos(nanos));
        session.pump();
    }
}

#[test]
fn accuracy_boundaries() {
    assert_eq!(accuracy_of("abc", ""), 100);
    assert_eq!(accuracy_of("abc", "abx"), 67);

    let (session, _clock) = session(PacingMode::default());
    assert_eq!(session.wpm(), 0);
    assert_eq!(session.accuracy(), 100);
}

#[test]
fn lag_fault_after_idling() {
    let (mut session, clock) = session(PacingMode::paced(Difficulty::Easy));
    assert!(session.start());

    run_frames(&mut session, &clock, 7.0);
    assert!((session.cursor_position() - 14.0).abs() < 1e-6);
    assert_eq!(session.status(), Status::Running);

    session.type_char('c');
    assert_eq!(session.status(), Status::Failed);
}

#[test]
fn lead_fault_with_only_correct_characters() {
    let (mut session, clock) = session(PacingMode::paced(Difficulty::Easy));

    // Ten characters a second against a two character per second pace-setter
    let mut accepted = 0;
    for char in TARGET.chars() {
        if session.type_char(char).is_none() {
            break;
        }
        accepted += 1;
        clock.advance(Duration::from_millis(100));
        session.pump();
    }

    assert_eq!(session.status(), Status::Failed);
    assert!(accepted < TARGET.chars().count());
    assert_eq!(session.accuracy(), 100);
    assert!(session.error_indices().is_empty());
}

#[test]
fn completion_freezes_cursor_and_metrics() {
    let (mut session, clock) = session(PacingMode::Free);

    session.type_str(TARGET);
    assert_eq!(session.status(), Status::Completed);

    let metrics = session.metrics();
    let report = session.report();

    run_frames(&mut session, &clock, 3.0);
    session.tick(3.0);
    assert_eq!(session.type_char('x'), None);
    assert_eq!(session.backspace(), None);

    assert_eq!(session.metrics(), metrics);
    assert_eq!(session.report(), report);
}

#[test]
fn keeping_pace_completes() {
    let (mut session, clock) = session(PacingMode::paced(Difficulty::Medium));
    let target_len = TARGET.chars().count();

    // Type at the pace-setter's speed, with one typo fixed along the way
    for (i, char) in TARGET.chars().enumerate() {
        if i == 10 {
            session.type_char('#');
            session.backspace();
        }
        session.type_char(char);
        run_frames(&mut session, &clock, 1.0 / 3.5);
    }

    assert_eq!(session.status(), Status::Completed);
    assert_eq!(session.typed_len(), target_len);
    assert_eq!(session.accuracy(), 100);

    let report = session.report();
    assert_eq!(report.keystrokes.errors, 1);
    assert_eq!(report.keystrokes.corrections, 1);
    assert!(!report.accuracy_history.is_empty());
    assert!(report.accuracy_history.iter().all(|&accuracy| accuracy <= 100));
}

#[test]
fn sampler_is_independent_of_frame_rate() {
    let (mut slow, slow_clock) = session(PacingMode::Free);
    let (mut fast, fast_clock) = session(PacingMode::Free);
    slow.type_str("const");
    fast.type_str("const");

    // 4 Hz against 60 Hz for five seconds
    for _ in 0..20 {
        slow_clock.advance(Duration::from_millis(250));
        slow.pump();
    }
    run_frames(&mut fast, &fast_clock, 5.0);

    assert_eq!(slow.accuracy_history().len(), 5);
    assert_eq!(slow.accuracy_history(), fast.accuracy_history());
}

#[test]
fn dispose_stops_every_task() {
    let (mut session, clock) = session(PacingMode::paced(Difficulty::Hard));
    session.type_str("const");
    run_frames(&mut session, &clock, 1.0);

    let cursor = session.cursor_position();
    let history = session.accuracy_history();

    session.dispose();
    run_frames(&mut session, &clock, 2.0);

    assert_eq!(session.cursor_position(), cursor);
    assert_eq!(session.accuracy_history(), history);
    assert_eq!(session.type_char(' '), None);
}

#[test]
fn session_tokens_match_the_tokenizer() {
    let (session, _clock) = session(PacingMode::default());
    assert_eq!(session.tokens(), tokenize(TARGET, LanguageFamily::CLike).as_slice());

    let tokens = tokenize("const x = 1;", LanguageFamily::CLike);
    let significant: Vec<(TokenKind, &str)> = tokens
        .iter()
        .filter(|token| !token.value.trim().is_empty())
        .map(|token| (token.kind, token.value.as_str()))
        .collect();

    assert_eq!(
        significant,
        vec![
            (TokenKind::Keyword, "const"),
            (TokenKind::Default, "x"),
            (TokenKind::Operator, "="),
            (TokenKind::Number, "1"),
            (TokenKind::Operator, ";"),
        ]
    );
}

#[test]
fn time_budget_ends_the_session() {
    let clock = ManualClock::new();
    let config = Configuration {
        pacing: PacingMode::Free,
        time_limit: TimeLimit::OneMinute,
        ..Configuration::default()
    };
    let mut session =
        TypingSession::with_clock(TARGET, LanguageFamily::CLike, config, clock.clone()).unwrap();

    session.type_str("const total");
    run_frames(&mut session, &clock, 61.0);

    assert_eq!(session.status(), Status::Completed);
    assert_eq!(session.elapsed(), Duration::from_secs(60));
    assert_eq!(session.accuracy_history().len(), 60);
}
