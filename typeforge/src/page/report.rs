use crossterm::event::{KeyCode, KeyEvent};
use pacer::{SessionReport, Status, TypingSession};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
};

use crate::app::Message;
use crate::page::bars;

/// Page: Results of a finished session
#[derive(Debug)]
pub struct Report {
    session: TypingSession,
    report: SessionReport,
}

impl Report {
    pub fn new(session: TypingSession) -> Self {
        Self {
            report: session.report(),
            session,
        }
    }

    pub const fn report(&self) -> &SessionReport {
        &self.report
    }

    /// A fresh session over the same text
    pub fn restart(&mut self) -> TypingSession {
        let mut session = self.session.clone();
        session.reset();
        session
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Enter => Some(Message::Restart),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let report = &self.report;

        let headline = match report.status {
            Status::Failed => Span::from("Lost the pace-setter").bold().fg(Color::Red),
            _ => Span::from("Completed").bold().fg(Color::Green),
        };

        let label = |text: &'static str| Span::styled(text, Style::new().bold());

        let heatmap_max = report.error_heatmap.iter().copied().max().unwrap_or(0) as u64;
        let missed = report
            .most_missed
            .iter()
            .take(5)
            .map(|(character, count)| format!("{character:?} x{count}"))
            .collect::<Vec<_>>()
            .join("  ");

        let lines = vec![
            Line::from(headline),
            Line::raw(""),
            Line::from(vec![label("WPM          "), Span::raw(report.wpm.to_string())]),
            Line::from(vec![label("Raw WPM      "), Span::raw(report.raw_wpm.to_string())]),
            Line::from(vec![label("Accuracy     "), Span::raw(format!("{}%", report.accuracy))]),
            Line::from(vec![
                label("Consistency  "),
                Span::raw(format!("{:.1}%", report.consistency.percent)),
            ]),
            Line::from(vec![
                label("Time         "),
                Span::raw(format!("{:.1}s", report.elapsed_seconds)),
            ]),
            Line::from(vec![
                label("Typed        "),
                Span::raw(format!(
                    "{} / {} ({} correct)",
                    report.typed_characters, report.target_characters, report.correct_characters
                )),
            ]),
            Line::from(vec![
                label("Keystrokes   "),
                Span::raw(format!(
                    "{} typed, {} deleted ({} correct), {} errors, {} corrected",
                    report.keystrokes.adds,
                    report.keystrokes.deletes,
                    report.keystrokes.correct_deletes,
                    report.keystrokes.errors,
                    report.keystrokes.corrections
                )),
            ]),
            Line::from(vec![label("Most missed  "), Span::raw(missed)]),
            Line::raw(""),
            Line::from(vec![
                label("Accuracy     "),
                Span::raw(bars(
                    report.accuracy_history.iter().map(|&accuracy| u64::from(accuracy)),
                    100,
                ))
                .fg(Color::Cyan),
            ]),
            Line::from(vec![
                label("Errors       "),
                Span::raw(bars(
                    report.error_heatmap.iter().map(|&count| count as u64),
                    heatmap_max,
                ))
                .fg(Color::Red),
            ]),
            Line::raw(""),
            Line::raw("<ENTER> to retry").italic(),
        ];

        let paragraph = Paragraph::new(lines).block(Block::new().padding(Padding::uniform(1)));

        frame.render_widget(paragraph, area);
    }
}
