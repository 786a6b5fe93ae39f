//! Renders a bilingual petition letter, with a passport-data table, illustrations and a
//! legal-argument appendix, to PDF.
//!
//! The pipeline is: [`content`] records → [`compose`] into a block plan ([`model`]) →
//! [`render`] with `genpdf`, using the font picked by the [`fonts`] cascade → atomic file write.

pub mod builder;
pub mod compose;
pub mod content;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod illustration;
pub mod model;
pub mod options;
pub mod render;
pub mod richtext;
pub mod timestamp;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use content::Letter;
pub use error::{Error, Result};
pub use options::{RenderOptions, DEFAULT_OUTPUT_FILE};
pub use render::{generate, render_letter, RenderedPdf};
pub use timestamp::Timestamp;
