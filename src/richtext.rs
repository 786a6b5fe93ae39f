//! Styled text fragments used by the block plan.
//!
//! A [`Span`] carries the inline decorations the letter needs (bold and italic) without
//! referencing a concrete font. Conversion into `genpdf`'s
//! [`StyledString`] happens in the layout stage, after the text has been fitted to the glyph
//! coverage of the resolved font.

use genpdf::style::{Style, StyledString};

use crate::fonts::Coverage;

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span to a [`StyledString`], replacing characters the font cannot encode.
    pub fn to_styled_string(&self, coverage: Coverage) -> StyledString {
        StyledString::new(coverage.fit(&self.text).into_owned(), self.to_style())
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Span::new(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Span::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_style_reflects_flags() {
        let styled = Span::new("Hello").bold().italic().to_styled_string(Coverage::Cjk);
        assert_eq!(styled.s, "Hello");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style, Style::new().bold().italic());
    }

    #[test]
    fn plain_span_keeps_the_surrounding_style() {
        let styled = Span::from("Sincerely").to_styled_string(Coverage::Cjk);
        assert_eq!(styled.style, Style::new());
    }

    #[test]
    fn styled_string_is_fitted_to_coverage() {
        let span = Span::new("主题: Asylum");
        let styled = span.to_styled_string(Coverage::WinAnsi);
        assert_eq!(styled.s, "??: Asylum");
    }
}
