//! File-backed entry storage
//!
//! Each entry lives in `<dir>/<title>.md`. Titles are matched without regard
//! to case; the spelling of the file on disk is the canonical title.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::entry::{same_title, validate_title, Entry, TitleError};
use super::related::{related_titles, RelatedOptions};

const ENTRY_EXTENSION: &str = "md";

/// Errors raised by an entry store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid title {title:?}: {reason}")]
    InvalidTitle { title: String, reason: TitleError },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Title-keyed storage for markdown entries
pub trait EntryStore: Send + Sync {
    /// All known titles
    fn list(&self) -> Result<Vec<String>>;

    /// Look up an entry, ignoring case
    fn get(&self, title: &str) -> Result<Option<Entry>>;

    /// Create or overwrite an entry
    fn save(&self, title: &str, content: &str) -> Result<()>;

    /// Existing titles that resemble `title`
    fn related(&self, title: &str) -> Result<Vec<String>>;
}

/// Entry store over a directory of markdown files
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    related: RelatedOptions,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>, related: RelatedOptions) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StoreError::io(&root, e))?;
        tracing::debug!("Opened entry store at {}", root.display());
        Ok(Self { root, related })
    }

    /// Directory holding the entry files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, title: &str) -> PathBuf {
        self.root.join(format!("{}.{}", title, ENTRY_EXTENSION))
    }

    fn find_title(&self, title: &str) -> Result<Option<String>> {
        Ok(self.list()?.into_iter().find(|t| same_title(t, title)))
    }
}

/// Title for a directory entry, if it is a visible markdown file
fn entry_title(path: &Path) -> Option<String> {
    let is_markdown = path
        .extension()
        .map(|ext| ext == ENTRY_EXTENSION)
        .unwrap_or(false);
    if !is_markdown {
        return None;
    }

    let stem = path.file_stem()?.to_str()?;
    if stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

impl EntryStore for FileStore {
    fn list(&self) -> Result<Vec<String>> {
        let mut titles = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                StoreError::Io {
                    path,
                    source: e.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(title) = entry_title(entry.path()) {
                titles.push(title);
            }
        }

        titles.sort_by_key(|t| t.to_lowercase());
        Ok(titles)
    }

    fn get(&self, title: &str) -> Result<Option<Entry>> {
        let Some(stored) = self.find_title(title)? else {
            tracing::debug!("No entry titled {:?}", title);
            return Ok(None);
        };

        let path = self.entry_path(&stored);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(Entry::new(stored, content))),
            // Removed between listing and reading
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn save(&self, title: &str, content: &str) -> Result<()> {
        // Existing entries keep their file even when the name predates the title rules
        let stored = match self.find_title(title)? {
            Some(stored) => stored,
            None => {
                let title = validate_title(title).map_err(|reason| StoreError::InvalidTitle {
                    title: title.to_string(),
                    reason,
                })?;
                self.find_title(title)?.unwrap_or_else(|| title.to_string())
            }
        };
        let path = self.entry_path(&stored);
        std::fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;

        tracing::info!("Saved entry {:?} to {}", stored, path.display());
        Ok(())
    }

    fn related(&self, title: &str) -> Result<Vec<String>> {
        Ok(related_titles(title, &self.list()?, &self.related))
    }
}
