//! Languages of practice snippets and the lexical family each one is highlighted with.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lexical rule set used by the tokenizer
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum LanguageFamily {
    /// Brace-and-semicolon languages: JavaScript, TypeScript, Python, SQL and friends
    #[default]
    #[strum(to_string = "c-like", serialize = "clike")]
    #[serde(rename = "c-like", alias = "clike")]
    CLike,
    /// Angle-bracket tag languages
    #[strum(to_string = "markup")]
    #[serde(rename = "markup")]
    Markup,
}

impl LanguageFamily {
    /// Resolve the family of a language by name
    ///
    /// Unknown languages fall back to [`LanguageFamily::CLike`].
    ///
    /// ```rust
    /// use pacer::LanguageFamily;
    ///
    /// assert_eq!(LanguageFamily::from_language_name("HTML"), LanguageFamily::Markup);
    /// assert_eq!(LanguageFamily::from_language_name("python"), LanguageFamily::CLike);
    /// assert_eq!(LanguageFamily::from_language_name("cobol"), LanguageFamily::CLike);
    /// ```
    pub fn from_language_name(name: &str) -> Self {
        name.trim()
            .parse::<Language>()
            .map(Language::family)
            .unwrap_or_default()
    }
}

/// A language practice snippets can be written in
#[derive(
    Debug,
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
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[strum(to_string = "javascript", serialize = "js")]
    JavaScript,
    #[strum(to_string = "typescript", serialize = "ts")]
    TypeScript,
    #[strum(to_string = "python", serialize = "py")]
    Python,
    #[strum(to_string = "sql")]
    Sql,
    #[strum(to_string = "java")]
    Java,
    #[strum(to_string = "c")]
    C,
    #[strum(to_string = "cpp", serialize = "c++")]
    Cpp,
    #[strum(to_string = "rust", serialize = "rs")]
    Rust,
    #[strum(to_string = "go", serialize = "golang")]
    Go,
    #[strum(to_string = "html", serialize = "htm")]
    Html,
    #[strum(to_string = "xml")]
    Xml,
    #[strum(to_string = "svg")]
    Svg,
}

impl Language {
    pub const fn family(self) -> LanguageFamily {
        match self {
            Self::Html | Self::Xml | Self::Svg => LanguageFamily::Markup,
            _ => LanguageFamily::CLike,
        }
    }
}
