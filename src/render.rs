//! Rendering entry points: block plan to PDF bytes to file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use genpdf::elements::{Break, FrameCellDecorator, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins};
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::builder::DocumentBuilder;
use crate::compose::compose;
use crate::content::Letter;
use crate::elements::{mm_from_f64, FlowText, MarkerHandle, PageMarker, PageTracker};
use crate::error::{Error, Result};
use crate::fonts::{self, Coverage, FontSource};
use crate::illustration::Sketch;
use crate::model::{Block, FactRow, Part};
use crate::options::RenderOptions;
use crate::timestamp::Timestamp;

const BODY_FONT_SIZE: u8 = 10;
const HEADING_FONT_SIZE: u8 = 12;
const TITLE_FONT_SIZE: u8 = 14;
const TIMESTAMP_FONT_SIZE: u8 = 9;
const FOOTER_FONT_SIZE: u8 = 8;
const LINE_SPACING: f64 = 1.25;
const FOOTER_HEIGHT_MM: f64 = 8.0;
const TABLE_COLUMN_WEIGHTS: [usize; 2] = [9, 10];
const TIMESTAMP_COLOR: Color = Color::Greyscale(96);
// A part marker carries over to the next page when less than this is left.
const PART_KEEP_WITH_NEXT_MM: f64 = 20.0;

/// A rendered document held in memory.
#[derive(Debug)]
pub struct RenderedPdf {
    /// The PDF file contents.
    pub bytes: Vec<u8>,
    /// Every part in document order, with the 1-based page it starts on.
    pub parts: Vec<(Part, Option<usize>)>,
    /// Font tier that was used.
    pub source: FontSource,
    /// Glyph coverage of that font.
    pub coverage: Coverage,
}

impl RenderedPdf {
    /// Returns the outline entries: titled parts with a known start page.
    pub fn outline(&self) -> Vec<(String, usize)> {
        self.parts
            .iter()
            .filter_map(|(part, page)| Some((part.title()?.to_owned(), (*page)?)))
            .collect()
    }
}

/// Renders the letter to PDF bytes without touching the output path.
pub fn render_letter(
    letter: &Letter,
    options: &RenderOptions,
    timestamp: &Timestamp,
) -> Result<RenderedPdf> {
    letter.validate()?;

    let resolved = fonts::resolve(options.fonts())?;
    let coverage = resolved.coverage();
    if !coverage.supports_cjk() {
        info!(
            "Resolved font has no CJK glyphs ({:?}); some characters will be substituted",
            coverage
        );
    }

    let blocks = compose(letter, options, timestamp);

    let tracker = PageTracker::new();
    let mut document = DocumentBuilder::new()
        .with_title(letter.primary.content.subject.clone())
        .with_font_size(BODY_FONT_SIZE)
        .with_line_spacing(LINE_SPACING)
        .with_page_tracker(tracker.clone())
        .with_footer(mm_from_f64(FOOTER_HEIGHT_MM), move |page| {
            FlowText::plain(
                &page.to_string(),
                Style::new().with_font_size(FOOTER_FONT_SIZE),
                coverage,
            )
            .with_alignment(Alignment::Center)
        })
        .build(resolved.family().clone())?;

    let mut markers: Vec<(Part, MarkerHandle)> = Vec::new();
    for block in blocks {
        match block {
            Block::PartStart(part) => {
                let (marker, handle) =
                    PageMarker::new(tracker.clone(), mm_from_f64(PART_KEEP_WITH_NEXT_MM));
                document.push(marker);
                markers.push((part, handle));
            }
            Block::Timestamp(line) => document.push(FlowText::plain(
                &line,
                Style::new()
                    .with_font_size(TIMESTAMP_FONT_SIZE)
                    .with_color(TIMESTAMP_COLOR),
                coverage,
            )),
            Block::Illustration(illustration) => document.push(Sketch::of(illustration)),
            Block::Title(text) => document.push(
                FlowText::plain(
                    &text,
                    Style::new().bold().with_font_size(TITLE_FONT_SIZE),
                    coverage,
                )
                .with_alignment(Alignment::Center),
            ),
            Block::Heading(text) => document.push(FlowText::plain(
                &text,
                Style::new().bold().with_font_size(HEADING_FONT_SIZE),
                coverage,
            )),
            Block::Paragraph(paragraph) => {
                document.push(FlowText::from_spans(paragraph.spans(), coverage))
            }
            Block::FactTable(rows) => document.push(fact_table(&rows, coverage)?),
            Block::Space(lines) => document.push(Break::new(lines)),
        }
    }

    let mut bytes = Vec::new();
    document.render(&mut bytes)?;
    debug!(
        "Rendered {} bytes over {} pages",
        bytes.len(),
        tracker.current()
    );

    let rendered = RenderedPdf {
        bytes,
        parts: markers
            .into_iter()
            .map(|(part, handle)| (part, handle.page()))
            .collect(),
        source: resolved.source().clone(),
        coverage,
    };

    add_outline(rendered)
}

#[cfg(feature = "bookmarks")]
fn add_outline(mut rendered: RenderedPdf) -> Result<RenderedPdf> {
    let outline = rendered.outline();
    rendered.bytes = crate::bookmarks::apply_part_bookmarks(&rendered.bytes, &outline)?;
    Ok(rendered)
}

#[cfg(not(feature = "bookmarks"))]
fn add_outline(rendered: RenderedPdf) -> Result<RenderedPdf> {
    Ok(rendered)
}

fn fact_table(rows: &[FactRow], coverage: Coverage) -> Result<TableLayout> {
    let mut table = TableLayout::new(TABLE_COLUMN_WEIGHTS.to_vec());
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    for row in rows {
        table
            .row()
            .element(
                FlowText::plain(&row.label, Style::new().bold(), coverage)
                    .padded(Margins::trbl(1, 2, 1, 2)),
            )
            .element(
                FlowText::plain(&row.value, Style::new(), coverage)
                    .padded(Margins::trbl(1, 2, 1, 2)),
            )
            .push()?;
    }

    Ok(table)
}

/// Renders the letter and writes it to `path` in one step.
///
/// The timestamp is taken when the call starts. Nothing is written when rendering fails, and the
/// file only appears at `path` once it is complete.
pub fn generate(
    letter: &Letter,
    options: &RenderOptions,
    path: impl AsRef<Path>,
) -> Result<RenderedPdf> {
    let path = path.as_ref();
    let rendered = render_letter(letter, options, &Timestamp::now())?;
    write_atomically(path, &rendered.bytes)?;
    info!(
        "Wrote {} ({} bytes, font {:?})",
        path.display(),
        rendered.bytes.len(),
        rendered.source
    );
    Ok(rendered)
}

/// Writes `bytes` to a temporary file next to `path` and renames it over `path`.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !directory.is_dir() {
        return Err(write_error(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("directory {} does not exist", directory.display()),
        )));
    }

    let mut file = NamedTempFile::new_in(&directory).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;

    if let Ok(metadata) = fs::metadata(path) {
        debug!("{} is {} bytes on disk", path.display(), metadata.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.pdf");
        fs::write(&path, b"old").expect("seed");

        write_atomically(&path, b"%PDF-1.3 new").expect("write");
        assert_eq!(fs::read(&path).expect("read"), b"%PDF-1.3 new");
        assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("out.pdf");

        let err = write_atomically(&path, b"%PDF").unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn outline_skips_untitled_and_unplaced_parts() {
        let rendered = RenderedPdf {
            bytes: Vec::new(),
            parts: vec![
                (Part::Preamble, Some(1)),
                (
                    Part::Variant {
                        language: "en".into(),
                        title: "Request".into(),
                    },
                    Some(1),
                ),
                (
                    Part::Appendix {
                        title: "Legal Arguments".into(),
                    },
                    None,
                ),
            ],
            source: FontSource::Downloaded(PathBuf::from("font.ttf")),
            coverage: Coverage::NoCjk,
        };
        assert_eq!(rendered.outline(), vec![("Request".to_owned(), 1)]);
    }
}
