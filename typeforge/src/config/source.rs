use std::path::{Path, PathBuf};

use pacer::snippets::{self, Snippet};
use pacer::{Language, LanguageFamily};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read '{path}': {error}")]
    ReadFile { path: PathBuf, error: std::io::Error },

    #[error("No snippet titled '{0}'. Run `typeforge snippets` to list them")]
    UnknownSnippet(String),

    #[error("No snippets written in {0}")]
    NoSnippets(Language),

    #[error("'{0}' is empty, there is nothing to type")]
    Empty(String),
}

/// Where the text of a session comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// A built-in snippet, by title
    Snippet(String),
    /// The first built-in snippet in a language, or the first of all
    Library(Option<Language>),
    /// A file on disk; the language defaults to the one its extension names
    File {
        path: PathBuf,
        language: Option<Language>,
    },
}

/// Text and lexical family of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub title: String,
    pub text: String,
    pub family: LanguageFamily,
}

impl From<&Snippet> for Passage {
    fn from(snippet: &Snippet) -> Self {
        Self {
            title: format!("{} ({})", snippet.title, snippet.language),
            text: snippet.code.to_string(),
            family: snippet.family(),
        }
    }
}

impl TextSource {
    pub fn fetch(&self) -> Result<Passage, SourceError> {
        match self {
            Self::Snippet(title) => snippets::find(title)
                .map(Passage::from)
                .ok_or_else(|| SourceError::UnknownSnippet(title.clone())),
            Self::Library(Some(language)) => snippets::by_language(*language)
                .next()
                .map(Passage::from)
                .ok_or(SourceError::NoSnippets(*language)),
            Self::Library(None) => snippets::all()
                .first()
                .map(Passage::from)
                .ok_or(SourceError::Empty("the snippet library".to_string())),
            Self::File { path, language } => {
                let text = std::fs::read_to_string(path).map_err(|error| SourceError::ReadFile {
                    path: path.clone(),
                    error,
                })?;
                if text.trim().is_empty() {
                    return Err(SourceError::Empty(path.display().to_string()));
                }

                let family = (*language)
                    .or_else(|| language_of(path))
                    .map(Language::family)
                    .unwrap_or_default();

                Ok(Passage {
                    title: path.display().to_string(),
                    // Editors leave a trailing newline nobody wants to type
                    text: text.trim_end().to_string(),
                    family,
                })
            }
        }
    }
}

/// Guess a file's language from its extension
pub fn language_of(path: &Path) -> Option<Language> {
    path.extension()?.to_str()?.parse().ok()
}
