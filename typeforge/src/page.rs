use crossterm::event::KeyEvent;
use pacer::SessionReport;
use ratatui::{Frame, layout::Rect, text::Line};

pub mod report;
pub mod session;

pub use report::Report;
pub use session::Session;

use crate::app::Message;

macro_rules! make_page_enum {
    ($($t:tt),*) => {
        pub enum Page {
            $(
                $t(Box<$t>),
            )*
        }

        $(
            impl From<$t> for Page {
                fn from(value: $t) -> Page {
                    Page::$t(Box::new(value))
                }
            }
        )*
    };
}

make_page_enum!(Session, Report);

impl Page {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Self::Session(page) => page.render(frame, area),
            Self::Report(page) => page.render(frame, area),
        }
    }

    pub fn render_top(&self) -> Option<Line<'_>> {
        match self {
            Self::Session(page) => page.render_top(),
            Self::Report(_) => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match self {
            Self::Session(page) => page.handle_key(key),
            Self::Report(page) => page.handle_key(key),
        }
    }

    /// Run one frame, switching to the report once the session has ended
    pub fn poll(&mut self) {
        if let Self::Session(page) = self
            && page.poll()
        {
            *self = Report::new(page.session().clone()).into();
        }
    }

    /// Start over with the same text
    pub fn restart(&mut self) {
        match self {
            Self::Session(page) => page.restart(),
            Self::Report(page) => *self = Session::new(page.restart()).into(),
        }
    }

    /// Stop the running session and report on it
    pub fn finish(&mut self) -> SessionReport {
        match self {
            Self::Session(page) => page.finish(),
            Self::Report(page) => page.report().clone(),
        }
    }
}

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as a row of block characters scaled to `max`
///
/// Zero renders as a blank so empty segments stand out.
pub fn bars(values: impl IntoIterator<Item = u64>, max: u64) -> String {
    values
        .into_iter()
        .map(|value| {
            if value == 0 || max == 0 {
                ' '
            } else {
                let level = (value.min(max) * BARS.len() as u64).div_ceil(max) as usize;
                BARS[level.clamp(1, BARS.len()) - 1]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars() {
        assert_eq!(bars([0, 1, 4, 8], 8), " ▁▄█");
        assert_eq!(bars([100, 50, 0], 100), "█▄ ");
        assert_eq!(bars([3, 200], 8), "▃█");
        assert_eq!(bars([5], 0), " ");
        assert_eq!(bars([], 10), "");
    }
}
