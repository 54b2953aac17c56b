//! # Tokenizer Module - Highlight Spans for Source Code
//!
//! A permissive, single-pass character classifier. It is a highlighting aid, not a lexer
//! for any real grammar: it never fails, never looks at nesting, and any character no rule
//! claims becomes a one-character [`TokenKind::Default`] token.
//!
//! Offsets are **character** offsets (not bytes), half-open. The returned tokens always
//! partition the input: they are sorted, contiguous, non-overlapping and concatenating
//! their values reproduces the input exactly.
//!
//! Each family has an index-based scanner of the shape
//! `fn(&[char], usize) -> (Token, usize)` which classifies one token and returns the index
//! to continue from. [`Tokens`] drives the scanner lazily.
//!
//! ```rust
//! use pacer::{LanguageFamily, TokenKind, tokenize};
//!
//! let tokens = tokenize("const x = 1;", LanguageFamily::CLike);
//! let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind).collect();
//!
//! assert_eq!(kinds[0], TokenKind::Keyword); // const
//! assert_eq!(tokens[2].value, "x");
//! assert_eq!(tokens[2].kind, TokenKind::Default);
//! assert_eq!(tokens[6].kind, TokenKind::Number); // 1
//! ```

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::LanguageFamily;

/// Classification of a token
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
    Number,
    Operator,
    Default,
}

/// A classified, contiguous span of source text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// First character offset (inclusive)
    pub start: usize,
    /// Last character offset (exclusive)
    pub end: usize,
    pub value: String,
}

impl Token {
    fn from_span(chars: &[char], kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            start,
            end,
            value: chars[start..end].iter().collect(),
        }
    }

    /// Amount of characters covered by the token
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Reserved words highlighted as keywords in the c-like family.
///
/// Covers control-flow and declaration keywords of JavaScript/TypeScript, Python and SQL.
const KEYWORDS: &[&str] = &[
    // JavaScript / TypeScript
    "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
    "continue", "debugger", "default", "delete", "do", "else", "enum", "export", "extends",
    "false", "finally", "for", "from", "function", "if", "implements", "import", "in",
    "instanceof", "interface", "let", "new", "null", "of", "private", "protected", "public",
    "readonly", "return", "static", "super", "switch", "this", "throw", "true", "try", "type",
    "typeof", "undefined", "var", "void", "while", "with", "yield",
    // Python
    "and", "def", "del", "elif", "except", "global", "is", "lambda", "nonlocal", "not", "or",
    "pass", "raise", "None", "True", "False",
    // SQL
    "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "JOIN",
    "LEFT", "RIGHT", "INNER", "OUTER", "ON", "GROUP", "BY", "ORDER", "HAVING", "LIMIT", "AS",
    "AND", "OR", "NOT", "NULL", "CREATE", "TABLE", "DISTINCT",
];

/// Single-character operators and punctuation of the c-like family
const OPERATORS: &[char] = &[
    '+', '-', '*', '/', '%', '=', '&', '|', '^', '!', '~', '<', '>', '?', ':', ';', ',', '.',
    '(', ')', '{', '}', '[', ']', '@', '#',
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

const fn is_identifier_start(char: char) -> bool {
    char.is_ascii_alphabetic() || char == '_' || char == '$'
}

const fn is_identifier_continue(char: char) -> bool {
    char.is_ascii_alphanumeric() || char == '_' || char == '$'
}

const fn is_tag_name(char: char) -> bool {
    char.is_ascii_alphanumeric() || char == '-'
}

/// Advance from `start` while `predicate` holds
fn run_while(chars: &[char], start: usize, predicate: impl Fn(char) -> bool) -> usize {
    chars[start..]
        .iter()
        .position(|&char| !predicate(char))
        .map_or(chars.len(), |offset| start + offset)
}

/// End of a quoted string opened at `start`
///
/// A backslash consumes itself and the following character, so an escaped delimiter
/// never closes the string. Unterminated strings run to the end of the input.
fn quoted_end(chars: &[char], start: usize) -> usize {
    let delimiter = chars[start];
    let mut index = start + 1;

    while index < chars.len() {
        match chars[index] {
            '\\' => index += 2,
            char if char == delimiter => return index + 1,
            _ => index += 1,
        }
    }

    chars.len()
}

/// End of a `/* ... */` comment opened at `start`, or the end of input if unterminated
fn block_comment_end(chars: &[char], start: usize) -> usize {
    let body = start + 2;
    chars[body.min(chars.len())..]
        .windows(2)
        .position(|pair| pair == ['*', '/'])
        .map_or(chars.len(), |offset| body + offset + 2)
}

/// Classify the c-like token beginning at `start`
///
/// Returns the token and the index of the next unclassified character.
///
/// # Panics
///
/// Panics if `start` is not a valid index into `chars`.
pub fn scan_c_like(chars: &[char], start: usize) -> (Token, usize) {
    let current = chars[start];
    let next = chars.get(start + 1).copied();

    let (kind, end) = match (current, next) {
        ('/', Some('/')) => {
            let end = run_while(chars, start, |char| char != '\n');
            (TokenKind::Comment, end)
        }
        ('/', Some('*')) => (TokenKind::Comment, block_comment_end(chars, start)),
        ('"' | '\'' | '`', _) => (TokenKind::String, quoted_end(chars, start)),
        (char, _) if char.is_ascii_digit() => {
            let end = run_while(chars, start, |char| char.is_ascii_digit() || char == '.');
            (TokenKind::Number, end)
        }
        (char, _) if is_identifier_start(char) => {
            let end = run_while(chars, start, is_identifier_continue);
            let word: String = chars[start..end].iter().collect();
            let kind = if is_keyword(&word) {
                TokenKind::Keyword
            } else {
                TokenKind::Default
            };
            (kind, end)
        }
        (char, _) if OPERATORS.contains(&char) => (TokenKind::Operator, start + 1),
        _ => (TokenKind::Default, start + 1),
    };

    (Token::from_span(chars, kind, start, end), end)
}

/// Classify the markup token beginning at `start`
///
/// Only tag names (`<div`, `</span`) and quoted values are distinguished. Attribute
/// names, `=`, `>` and text content stay [`TokenKind::Default`].
///
/// # Panics
///
/// Panics if `start` is not a valid index into `chars`.
pub fn scan_markup(chars: &[char], start: usize) -> (Token, usize) {
    let (kind, end) = match chars[start] {
        '<' => {
            let mut name_start = start + 1;
            if chars.get(name_start) == Some(&'/') {
                name_start += 1;
            }
            let end = run_while(chars, name_start.min(chars.len()), is_tag_name);
            (TokenKind::Keyword, end)
        }
        '"' | '\'' => (TokenKind::String, quoted_end(chars, start)),
        _ => (TokenKind::Default, start + 1),
    };

    (Token::from_span(chars, kind, start, end), end)
}

type Scanner = fn(&[char], usize) -> (Token, usize);

impl LanguageFamily {
    const fn scanner(self) -> Scanner {
        match self {
            Self::CLike => scan_c_like,
            Self::Markup => scan_markup,
        }
    }
}

/// Lazy token stream over a piece of source text
///
/// The stream is finite and can't be restarted; create a new one to tokenize again.
#[derive(Debug, Clone)]
pub struct Tokens {
    chars: Vec<char>,
    index: usize,
    scanner: Scanner,
}

impl Tokens {
    pub fn new(text: &str, family: LanguageFamily) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
            scanner: family.scanner(),
        }
    }
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.chars.len() {
            return None;
        }

        let (token, next) = (self.scanner)(&self.chars, self.index);
        debug_assert!(next > self.index, "scanner must always make progress");
        self.index = next;

        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chars.len().saturating_sub(self.index);
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for Tokens {}

/// Tokenize `text` with the rules of `family`
pub fn tokenize(text: &str, family: LanguageFamily) -> Vec<Token> {
    Tokens::new(text, family).collect()
}
