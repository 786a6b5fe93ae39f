//! The block plan: a flat, font-independent description of the document.
//!
//! [`crate::compose`] produces a `Vec<Block>` from the letter content; [`crate::render`] turns
//! it into `genpdf` elements. Keeping the plan separate from the layout stage lets the order and
//! completeness of the document be checked without loading any font.

use crate::richtext::Span;

/// Left-aligned paragraph made of styled spans.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
}

impl RichParagraph {
    /// Creates a paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
        }
    }

    /// Creates a paragraph holding a single unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Span::new(text)])
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }
}

/// Line-art drawings that can be placed in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Illustration {
    /// Panda wearing a hard hat, shown under the timestamp.
    EngineerPanda,
    /// Panda holding a bamboo stalk, shown in the recovery-plan section.
    BambooPanda,
}

/// A labelled row of the passport table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactRow {
    pub label: String,
    pub value: String,
}

/// Top-level division of the document, used for outlines and ordering checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Part {
    /// Timestamp and opening illustration.
    Preamble,
    /// One language variant of the letter.
    Variant {
        /// Language tag of the variant.
        language: String,
        /// Outline title.
        title: String,
    },
    /// Legal-argument appendix.
    Appendix {
        /// Outline title.
        title: String,
    },
}

impl Part {
    /// Returns the outline title, or `None` for parts that get no outline entry.
    pub fn title(&self) -> Option<&str> {
        match self {
            Part::Preamble => None,
            Part::Variant { title, .. } | Part::Appendix { title } => Some(title),
        }
    }
}

/// Individual entries of the block plan, rendered top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Zero-height marker recording where a part starts.
    PartStart(Part),
    /// One line of the render timestamp.
    Timestamp(String),
    /// Decorative drawing.
    Illustration(Illustration),
    /// Large title introducing a language variant or the appendix.
    Title(String),
    /// Section heading.
    Heading(String),
    /// Body text.
    Paragraph(RichParagraph),
    /// Two-column label/value table.
    FactTable(Vec<FactRow>),
    /// Vertical space, in lines.
    Space(f64),
}

impl Block {
    /// Convenience helper for a plain paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(RichParagraph::plain(text))
    }

    /// Returns `true` for blocks that carry document text.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Block::Timestamp(_)
                | Block::Title(_)
                | Block::Heading(_)
                | Block::Paragraph(_)
                | Block::FactTable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_text_joins_spans() {
        let paragraph =
            RichParagraph::new(vec![Span::new("Subject: ").bold(), Span::new("Asylum")]);
        assert_eq!(paragraph.text(), "Subject: Asylum");
    }

    #[test]
    fn preamble_has_no_outline_title() {
        assert_eq!(Part::Preamble.title(), None);
        let appendix = Part::Appendix {
            title: "Legal Arguments".into(),
        };
        assert_eq!(appendix.title(), Some("Legal Arguments"));
    }
}
