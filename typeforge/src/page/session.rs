use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pacer::{SessionReport, Status, TokenKind, TypingSession};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph, Wrap},
};

use crate::app::Message;

/// Page: TypingSession
#[derive(Debug)]
pub struct Session {
    session: TypingSession,
}

impl Session {
    pub const fn new(session: TypingSession) -> Self {
        Self { session }
    }

    pub const fn session(&self) -> &TypingSession {
        &self.session
    }

    pub fn restart(&mut self) {
        self.session.reset();
    }

    /// Dispose the session and report on it
    pub fn finish(&mut self) -> SessionReport {
        self.session.dispose();
        self.session.report()
    }

    /// Pump the session; returns `true` once it has ended
    pub fn poll(&mut self) -> bool {
        self.session.pump();
        self.session.status().is_terminal()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match key.code {
            KeyCode::Char(character) => {
                self.session.type_char(character);
            }
            KeyCode::Enter => {
                self.session.type_char('\n');
            }
            KeyCode::Tab => {
                self.session.type_char('\t');
            }
            KeyCode::Backspace => {
                self.session.backspace();
            }
            _ => (),
        }

        None
    }
}

// Rendering logic
impl Session {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let target: Vec<char> = self.session.target_text().chars().collect();
        let typed: Vec<char> = self.session.typed_text().chars().collect();
        let pace_index = self
            .session
            .configuration()
            .pacing
            .is_paced()
            .then(|| self.session.cursor_position().floor() as usize);

        let mut lines = vec![];
        let mut spans = vec![];

        for token in self.session.tokens() {
            for index in token.start..token.end {
                let expected = target[index];
                let mut style = match typed.get(index) {
                    Some(&actual) if actual == expected => {
                        Style::new().fg(kind_color(token.kind)).add_modifier(Modifier::BOLD)
                    }
                    Some(_) if expected.is_whitespace() => Style::new().bg(Color::Red),
                    Some(_) => Style::new().fg(Color::Red).add_modifier(Modifier::BOLD),
                    None => Style::new()
                        .fg(kind_color(token.kind))
                        .add_modifier(Modifier::DIM),
                };

                if index == typed.len() {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                if pace_index == Some(index) {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::UNDERLINED);
                }

                match expected {
                    '\n' => {
                        spans.push(Span::styled(" ", style));
                        lines.push(Line::from(std::mem::take(&mut spans)));
                    }
                    '\t' => spans.push(Span::styled("    ", style)),
                    character => spans.push(Span::styled(character.to_string(), style)),
                }
            }
        }
        lines.push(Line::from(spans));

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::new().padding(Padding::uniform(1)));

        frame.render_widget(paragraph, area);
    }

    pub fn render_top(&self) -> Option<Line<'_>> {
        let time = self.session.elapsed().as_secs();
        let seconds = time % 60;
        let minutes = time / 60;

        let status = match self.session.status() {
            Status::Idle => "start typing".to_string(),
            status => status.to_string(),
        };

        Some(Line::raw(format!(
            "{minutes}:{seconds:0>2} {status} | W: {} | A: {}% | {:.0}%",
            self.session.wpm(),
            self.session.accuracy(),
            self.session.completion_percentage(),
        )))
    }
}

const fn kind_color(kind: TokenKind) -> Color {
    match kind {
        TokenKind::Keyword => Color::Magenta,
        TokenKind::String => Color::Green,
        TokenKind::Comment => Color::DarkGray,
        TokenKind::Number => Color::Yellow,
        TokenKind::Operator => Color::Cyan,
        TokenKind::Default => Color::Reset,
    }
}
