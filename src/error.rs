//! Error type shared by every stage of the renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to callers of the renderer.
///
/// Font and network problems are recovered inside [`crate::fonts`]. The last font tier is compiled
/// in, so [`Error::FontUnavailable`] only appears when that data is unusable.
#[derive(Debug, Error)]
pub enum Error {
    /// The letter content failed validation.
    #[error("invalid letter content: {message}")]
    Content {
        /// Human-readable description of the problem.
        message: String,
    },

    /// The TOML content override could not be parsed.
    #[error("failed to parse letter content from {}", path.display())]
    ContentParse {
        /// File the content was read from.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Every font tier failed, including the compiled-in metrics font.
    #[error("no usable font found; tried: {attempts}")]
    FontUnavailable {
        /// Summary of every tier that was attempted.
        attempts: String,
    },

    /// Layout or PDF generation failed inside `genpdf`.
    #[error("PDF rendering failed")]
    Render(#[from] genpdf::error::Error),

    /// The output file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure (reading content files and the like).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Outline entries could not be added to the rendered document.
    #[cfg(feature = "bookmarks")]
    #[error("failed to add the document outline")]
    Bookmarks(#[from] crate::bookmarks::BookmarkError),
}

impl Error {
    pub(crate) fn content(message: impl Into<String>) -> Self {
        Self::Content {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
