//! Wiki entries and the rules for their titles

use std::fmt;

/// Longest title accepted, in characters
pub const MAX_TITLE_LEN: usize = 128;

/// Longest title accepted, in UTF-8 bytes; `<title>.md` must fit a 255-byte file name
pub const MAX_TITLE_BYTES: usize = 255 - ".md".len();

/// A titled markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Title as stored on disk
    pub title: String,
    /// Markdown body
    pub content: String,
}

impl Entry {
    /// Create a new entry
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Whether this entry answers to the given title, ignoring case
    pub fn matches(&self, title: &str) -> bool {
        same_title(&self.title, title)
    }
}

/// Reasons a title cannot name an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleError {
    Empty,
    TooLong,
    Separator,
    Control,
    LeadingDot,
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleError::Empty => write!(f, "Title cannot be empty."),
            TitleError::TooLong => {
                write!(
                    f,
                    "Title must be at most {} characters ({} bytes).",
                    MAX_TITLE_LEN, MAX_TITLE_BYTES
                )
            }
            TitleError::Separator => write!(f, "Title cannot contain '/' or '\\'."),
            TitleError::Control => write!(f, "Title cannot contain control characters."),
            TitleError::LeadingDot => write!(f, "Title cannot start with '.'."),
        }
    }
}

impl std::error::Error for TitleError {}

/// Check that a title can be used as an entry file name.
///
/// Returns the trimmed title on success.
pub fn validate_title(title: &str) -> Result<&str, TitleError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    if title.chars().count() > MAX_TITLE_LEN || title.len() > MAX_TITLE_BYTES {
        return Err(TitleError::TooLong);
    }
    if title.contains(['/', '\\']) {
        return Err(TitleError::Separator);
    }
    if title.chars().any(char::is_control) {
        return Err(TitleError::Control);
    }
    if title.starts_with('.') {
        return Err(TitleError::LeadingDot);
    }

    Ok(title)
}

/// Case-insensitive title comparison
pub fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
