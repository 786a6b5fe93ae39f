//! Document construction: paper, margins, metadata and the page footer.

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style;
use genpdf::{self, Element, Margins, Mm, PageDecorator, Position, Size};

use crate::elements::{mm_from_f64, PageTracker};

/// US Letter, in millimetres.
pub const LETTER_PAPER_MM: (f64, f64) = (215.9, 279.4);

/// One inch.
pub const DEFAULT_MARGIN_MM: f64 = 25.4;

/// Builder for `genpdf::Document` instances pre-configured for the letter.
pub struct DocumentBuilder {
    paper_size: Size,
    margins: Margins,
    title: Option<String>,
    font_size: Option<u8>,
    line_spacing: Option<f64>,
    footer: Option<FooterSpec>,
    tracker: PageTracker,
}

type ElementFactory = dyn Fn(usize) -> Box<dyn Element>;

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: Size::new(
                mm_from_f64(LETTER_PAPER_MM.0),
                mm_from_f64(LETTER_PAPER_MM.1),
            ),
            margins: Margins::all(mm_from_f64(DEFAULT_MARGIN_MM)),
            title: None,
            font_size: None,
            line_spacing: None,
            footer: None,
            tracker: PageTracker::new(),
        }
    }
}

impl DocumentBuilder {
    /// Creates a builder for US Letter pages with one-inch margins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the default font size, in points.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the line spacing factor.
    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = Some(line_spacing);
        self
    }

    /// Configures a footer callback with a fixed height that is invoked for every page.
    pub fn with_footer<F, E>(mut self, height: impl Into<Mm>, footer: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        self.footer = Some(FooterSpec::new(height, footer));
        self
    }

    /// Shares a page counter with the decorator; it advances once per rendered page.
    pub fn with_page_tracker(mut self, tracker: PageTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Builds a fully configured `genpdf::Document` using the given font family.
    pub fn build(self, font_family: FontFamily<FontData>) -> Result<genpdf::Document, Error> {
        let mut document = genpdf::Document::new(font_family);
        document.set_paper_size(self.paper_size);

        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }
        if let Some(line_spacing) = self.line_spacing {
            document.set_line_spacing(line_spacing);
        }

        let decorator = ConfiguredPageDecorator::new(self.margins, self.footer, self.tracker);
        document.set_page_decorator(decorator);

        Ok(document)
    }
}

/// Definition of a footer rendered through the page decorator.
pub struct FooterSpec {
    height: Mm,
    factory: Box<ElementFactory>,
}

impl FooterSpec {
    /// Creates a new footer specification.
    pub fn new<F, E>(height: impl Into<Mm>, factory: F) -> Self
    where
        F: Fn(usize) -> E + 'static,
        E: Element + 'static,
    {
        Self {
            height: height.into(),
            factory: Box::new(move |page| Box::new(factory(page)) as Box<dyn Element>),
        }
    }
}

struct ConfiguredPageDecorator {
    margins: Margins,
    footer: Option<FooterSpec>,
    tracker: PageTracker,
}

impl ConfiguredPageDecorator {
    fn new(margins: Margins, footer: Option<FooterSpec>, tracker: PageTracker) -> Self {
        Self {
            margins,
            footer,
            tracker,
        }
    }
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.tracker.advance();
        area.add_margins(self.margins);

        if let Some(footer) = &self.footer {
            let available = area.size().height;
            if footer.height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer.height));
            let mut element = (footer.factory)(page);
            let result = element.render(context, footer_area, style)?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer.height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::mm_to_f64;

    #[test]
    fn defaults_to_letter_paper_with_inch_margins() {
        let builder = DocumentBuilder::new();
        assert!((mm_to_f64(builder.paper_size.width) - 215.9).abs() < 1e-6);
        assert!((mm_to_f64(builder.paper_size.height) - 279.4).abs() < 1e-6);
        assert_eq!(builder.margins, Margins::all(mm_from_f64(25.4)));
    }

    #[test]
    fn title_is_recorded() {
        let builder = DocumentBuilder::new().with_title("Request");
        assert_eq!(builder.title.as_deref(), Some("Request"));
    }
}
