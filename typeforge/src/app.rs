use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use pacer::{Configuration, SessionReport, TypingSession};
use ratatui::{Frame, style::Stylize, text::ToLine, widgets::Block};

use crate::config::source::Passage;
use crate::page::{self, Page};

/// Time between two frames; the session is pumped once per frame
const FRAME_TIME: Duration = Duration::from_millis(16);

/// An app message
pub enum Message {
    /// Start over with the same text
    Restart,
    /// Quit the application
    Quit,
}

/// The practice app
pub struct App {
    page: Page,
    title: String,
}

impl App {
    pub fn new(passage: Passage, configuration: Configuration) -> Result<Self, pacer::ConfigError> {
        let session =
            TypingSession::with_configuration(&passage.text, passage.family, configuration)?;
        Ok(Self {
            page: page::Session::new(session).into(),
            title: passage.title,
        })
    }

    /// Runs the app until the typist quits, returning the report of the last session
    pub fn run(&mut self) -> std::io::Result<SessionReport> {
        let mut terminal = ratatui::init();

        let result = self.event_loop(&mut terminal);

        ratatui::restore();

        result
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> std::io::Result<SessionReport> {
        execute!(stdout(), SetCursorStyle::SteadyBar)?;

        loop {
            let event = event::poll(FRAME_TIME)?.then(event::read).transpose()?;
            if let Some(message) = self.handle_events(event) {
                match message {
                    Message::Restart => self.page.restart(),
                    Message::Quit => break,
                }
            }

            self.page.poll();
            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(self.page.finish())
    }

    /// Draws the next frame
    fn draw(&mut self, frame: &mut Frame) {
        let mut block = Block::bordered()
            .title_top("TYPEFORGE".to_line().bold().centered())
            .title_top("<ESC> to exit".to_line().right_aligned())
            .title_bottom(self.title.to_line().centered());

        if let Some(top_msg) = self.page.render_top() {
            block = block.title_top(top_msg);
        }

        let area = frame.area();
        let content = block.inner(area);

        frame.render_widget(block, area);

        self.page.render(frame, content);
    }

    /// Global event handler
    fn handle_events(&mut self, event_opt: Option<Event>) -> Option<Message> {
        let event = event_opt?;
        match event {
            Event::Key(key) if key.is_press() => self
                .handle_key_event(key)
                .or_else(|| self.page.handle_key(key)),
            _ => None,
        }
    }

    /// Global key events
    const fn handle_key_event(&self, key: KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q' | 'c'), KeyModifiers::CONTROL) => {
                Some(Message::Quit)
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Some(Message::Restart),
            _ => None,
        }
    }
}
