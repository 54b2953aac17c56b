//! # Input Handler Module - Keystroke Processing
//!
//! Holds the target text and the typed input, and turns each keystroke into a
//! [`Keystroke`] describing which index changed and whether it matches the target.
//!
//! Comparison is position-locked: the typed character at index `i` is only ever compared
//! to the target character at index `i`. There is no realignment, so an inserted
//! character makes every following position wrong until it is deleted.
//!
//! ## Usage Example
//!
//! ```rust
//! use pacer::input_handler::{InputHandler, KeystrokeKind};
//!
//! let mut handler = InputHandler::new("let");
//!
//! let keystroke = handler.add_input('l').unwrap();
//! assert_eq!(keystroke.index, 0);
//! assert_eq!(keystroke.kind, KeystrokeKind::Added { matches: true });
//!
//! let keystroke = handler.delete_input().unwrap();
//! assert_eq!(keystroke.kind, KeystrokeKind::Deleted { matched: true });
//! assert!(handler.is_input_empty());
//! ```

/// What a keystroke did to the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeKind {
    /// A character was appended; `matches` compares it to the target at the same index
    Added { matches: bool },
    /// A character was removed; `matched` tells whether it was correct
    Deleted { matched: bool },
}

/// A processed keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    /// The index of the input that changed
    pub index: usize,
    /// The character that was typed or deleted
    pub char: char,
    /// The target character at `index`
    pub expected: char,
    pub kind: KeystrokeKind,
}

/// Target text and typed input of a session
#[derive(Debug, Clone)]
pub struct InputHandler {
    target: Vec<char>,
    input: Vec<char>,
}

impl InputHandler {
    pub fn new(target: &str) -> Self {
        let target: Vec<char> = target.chars().collect();
        Self {
            input: Vec::with_capacity(target.len()),
            target,
        }
    }

    /// Amount of characters in the target text
    pub const fn target_len(&self) -> usize {
        self.target.len()
    }

    /// Amount of characters typed so far, including wrong ones
    pub const fn input_len(&self) -> usize {
        self.input.len()
    }

    pub const fn is_input_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// True once the input is as long as the target; no more input is accepted
    pub const fn is_fully_typed(&self) -> bool {
        self.input.len() >= self.target.len()
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn target_text(&self) -> String {
        self.target.iter().collect()
    }

    pub fn input_text(&self) -> String {
        self.input.iter().collect()
    }

    /// Append a character to the input
    ///
    /// Returns `None` if the target has been fully typed.
    pub fn add_input(&mut self, char: char) -> Option<Keystroke> {
        let index = self.input.len();
        let expected = *self.target.get(index)?;

        self.input.push(char);

        Some(Keystroke {
            index,
            char,
            expected,
            kind: KeystrokeKind::Added {
                matches: char == expected,
            },
        })
    }

    /// Remove the last typed character
    ///
    /// Returns `None` if nothing has been typed.
    pub fn delete_input(&mut self) -> Option<Keystroke> {
        let char = self.input.pop()?;
        let index = self.input.len();
        // The input never grows past the target, so the index is always valid.
        let expected = self.target[index];

        Some(Keystroke {
            index,
            char,
            expected,
            kind: KeystrokeKind::Deleted {
                matched: char == expected,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_delete() {
        let mut handler = InputHandler::new("abc");
        assert_eq!(handler.target_len(), 3);

        let keystroke = handler.add_input('a').unwrap();
        assert_eq!(keystroke.kind, KeystrokeKind::Added { matches: true });

        let keystroke = handler.add_input('x').unwrap();
        assert_eq!(keystroke.index, 1);
        assert_eq!(keystroke.expected, 'b');
        assert_eq!(keystroke.kind, KeystrokeKind::Added { matches: false });
        assert_eq!(handler.input_text(), "ax");

        let keystroke = handler.delete_input().unwrap();
        assert_eq!(keystroke.char, 'x');
        assert_eq!(keystroke.kind, KeystrokeKind::Deleted { matched: false });
        assert_eq!(handler.input_len(), 1);
    }

    #[test]
    fn test_input_is_bounded_by_target() {
        let mut handler = InputHandler::new("hi");
        assert!(handler.add_input('h').is_some());
        assert!(handler.add_input('i').is_some());
        assert!(handler.is_fully_typed());
        assert!(handler.add_input('!').is_none());
        assert_eq!(handler.input_len(), 2);
    }

    #[test]
    fn test_empty_target_and_input() {
        let mut handler = InputHandler::new("");
        assert!(handler.is_fully_typed());
        assert!(handler.add_input('a').is_none());
        assert!(handler.delete_input().is_none());
    }

    #[test]
    fn test_position_locked_comparison() {
        let mut handler = InputHandler::new("abcd");
        // An extra 'x' shifts everything after it
        let results: Vec<KeystrokeKind> = "axbc"
            .chars()
            .filter_map(|char| handler.add_input(char))
            .map(|keystroke| keystroke.kind)
            .collect();

        assert_eq!(
            results,
            vec![
                KeystrokeKind::Added { matches: true },
                KeystrokeKind::Added { matches: false },
                KeystrokeKind::Added { matches: false },
                KeystrokeKind::Added { matches: false },
            ]
        );
    }

    #[test]
    fn test_unicode_is_counted_in_characters() {
        let mut handler = InputHandler::new("café 🚀");
        assert_eq!(handler.target_len(), 6);
        for char in "café".chars() {
            assert_eq!(
                handler.add_input(char).unwrap().kind,
                KeystrokeKind::Added { matches: true }
            );
        }
    }
}
