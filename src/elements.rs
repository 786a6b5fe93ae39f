//! Custom `genpdf` elements used by the renderer.
//!
//! [`FlowText`] replaces `genpdf::elements::Paragraph` for all letter text: the upstream paragraph
//! only breaks lines at spaces and fails on long runs of CJK text, which has none. [`PageMarker`]
//! records the page a document part starts on so outline entries can point at it.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::style::{Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Size};

use crate::fonts::{is_cjk, is_closing_punctuation, Coverage};
use crate::richtext::Span;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// A paragraph that wraps Latin text at spaces and CJK text between characters.
///
/// Lines are laid out once, on the first call to [`Element::render`], using the width of the
/// area. Subsequent calls continue with the first line that did not fit, so a paragraph can span
/// several pages.
pub struct FlowText {
    spans: Vec<StyledString>,
    alignment: Alignment,
    lines: Option<Vec<Line>>,
    next_line: usize,
}

impl FlowText {
    /// Creates a left-aligned paragraph from styled strings.
    pub fn new(spans: Vec<StyledString>) -> Self {
        Self {
            spans,
            alignment: Alignment::Left,
            lines: None,
            next_line: 0,
        }
    }

    /// Creates a paragraph from spans, fitting their text to the font coverage.
    pub fn from_spans<'a, I>(spans: I, coverage: Coverage) -> Self
    where
        I: IntoIterator<Item = &'a Span>,
    {
        Self::new(
            spans
                .into_iter()
                .map(|span| span.to_styled_string(coverage))
                .collect(),
        )
    }

    /// Creates a paragraph holding a single string.
    pub fn plain(text: &str, style: Style, coverage: Coverage) -> Self {
        Self::new(vec![StyledString::new(
            coverage.fit(text).into_owned(),
            style,
        )])
    }

    /// Sets the alignment and returns the updated element.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Element for FlowText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let width = area.size().width;
        let lines = self.lines.get_or_insert_with(|| {
            let tokens = tokenize(&self.spans, style);
            layout(tokens, &context.font_cache, style, width)
        });

        let mut result = RenderResult::default();
        while let Some(line) = lines.get(self.next_line) {
            let line_height = line.line_height;
            if line_height > area.size().height {
                result.has_more = true;
                break;
            }

            if !line.fragments.is_empty() {
                let x_offset = match self.alignment {
                    Alignment::Left => Mm::default(),
                    Alignment::Center => (width - line.width) / 2.0,
                    Alignment::Right => width - line.width,
                };
                let Some(mut section) = area.text_section(
                    &context.font_cache,
                    Position::new(x_offset, 0),
                    line.style,
                ) else {
                    result.has_more = true;
                    break;
                };
                for fragment in &line.fragments {
                    section.print_str(&fragment.s, fragment.style)?;
                }
            }

            result.size = result
                .size
                .stack_vertical(Size::new(line.width, line_height));
            area.add_offset(Position::new(0, line_height));
            self.next_line += 1;
        }

        Ok(result)
    }
}

#[derive(Debug)]
enum Token {
    Word(StyledString),
    Space(StyledString),
    Newline,
}

fn is_opening_punctuation(c: char) -> bool {
    matches!(c, '（' | '「' | '『' | '《' | '〔' | '【' | '“' | '‘' | '(')
}

/// Splits styled text into break opportunities.
///
/// Each CJK character forms its own word. Closing punctuation is glued to the preceding word and
/// opening punctuation to the following one, so neither ends up alone at a line edge.
fn tokenize(spans: &[StyledString], base: Style) -> Vec<Token> {
    let mut tokens = Vec::new();

    for span in spans {
        let style = base.and(span.style);
        let mut word = String::new();

        for c in span.s.chars() {
            if c == '\n' {
                flush_word(&mut word, &mut tokens, style);
                tokens.push(Token::Newline);
            } else if c.is_whitespace() {
                flush_word(&mut word, &mut tokens, style);
                tokens.push(Token::Space(StyledString::new(" ", style)));
            } else if is_closing_punctuation(c) {
                if !word.is_empty() {
                    word.push(c);
                    continue;
                }
                match tokens.last_mut() {
                    Some(Token::Word(previous)) if previous.style == style => previous.s.push(c),
                    _ => word.push(c),
                }
            } else if is_cjk(c) && !is_opening_punctuation(c) {
                if !word.chars().all(is_opening_punctuation) {
                    flush_word(&mut word, &mut tokens, style);
                }
                word.push(c);
                flush_word(&mut word, &mut tokens, style);
            } else if is_opening_punctuation(c) {
                if !word.chars().all(is_opening_punctuation) {
                    flush_word(&mut word, &mut tokens, style);
                }
                word.push(c);
            } else {
                word.push(c);
            }
        }

        flush_word(&mut word, &mut tokens, style);
    }

    tokens
}

fn flush_word(word: &mut String, tokens: &mut Vec<Token>, style: Style) {
    if word.is_empty() {
        return;
    }
    tokens.push(Token::Word(StyledString::new(std::mem::take(word), style)));
}

/// A laid-out line. `style` is the style of its tallest fragment and positions the baseline.
#[derive(Debug)]
struct Line {
    fragments: Vec<StyledString>,
    width: Mm,
    line_height: Mm,
    style: Style,
}

struct LineBuilder<'f> {
    font_cache: &'f FontCache,
    base: Style,
    fragments: Vec<StyledString>,
    width: Mm,
    line_height: Mm,
    style: Style,
}

impl<'f> LineBuilder<'f> {
    fn new(font_cache: &'f FontCache, base: Style) -> Self {
        Self {
            font_cache,
            base,
            fragments: Vec::new(),
            width: Mm::default(),
            line_height: Mm::default(),
            style: base,
        }
    }

    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, fragment: StyledString, width: Mm) {
        self.width += width;
        let line_height = fragment.style.line_height(self.font_cache);
        if self.fragments.is_empty() || line_height > self.line_height {
            self.line_height = line_height;
            self.style = fragment.style;
        }
        match self.fragments.last_mut() {
            Some(last) if last.style == fragment.style => last.s.push_str(&fragment.s),
            _ => self.fragments.push(fragment),
        }
    }

    fn finish(&mut self) -> Line {
        let (line_height, style) = if self.fragments.is_empty() {
            (self.base.line_height(self.font_cache), self.base)
        } else {
            (self.line_height, self.style)
        };
        self.line_height = Mm::default();
        self.style = self.base;
        Line {
            fragments: std::mem::take(&mut self.fragments),
            width: std::mem::take(&mut self.width),
            line_height,
            style,
        }
    }
}

/// Greedy line breaking over the tokens. Words wider than `width` are split by character.
fn layout(tokens: Vec<Token>, font_cache: &FontCache, base: Style, width: Mm) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = LineBuilder::new(font_cache, base);
    let mut pending_space: Option<StyledString> = None;

    for token in tokens {
        match token {
            Token::Newline => {
                lines.push(line.finish());
                pending_space = None;
            }
            Token::Space(space) => {
                if !line.is_empty() {
                    pending_space = Some(space);
                }
            }
            Token::Word(word) => {
                let word_width = word.width(font_cache);
                let space = pending_space.take();
                let space_width = space
                    .as_ref()
                    .map(|space| space.width(font_cache))
                    .unwrap_or_default();

                if !line.is_empty() && line.width + space_width + word_width > width {
                    lines.push(line.finish());
                } else if let Some(space) = space.filter(|_| !line.is_empty()) {
                    line.push(space, space_width);
                }

                if line.is_empty() && word_width > width {
                    split_word(word, font_cache, width, &mut line, &mut lines);
                } else {
                    line.push(word, word_width);
                }
            }
        }
    }

    if !line.is_empty() {
        lines.push(line.finish());
    }

    lines
}

fn split_word(
    word: StyledString,
    font_cache: &FontCache,
    width: Mm,
    line: &mut LineBuilder<'_>,
    lines: &mut Vec<Line>,
) {
    let mut chunk = String::new();
    let mut chunk_width = Mm::default();

    for c in word.s.chars() {
        let char_width = StyledString::new(c.to_string(), word.style).width(font_cache);
        if !chunk.is_empty() && chunk_width + char_width > width {
            line.push(
                StyledString::new(std::mem::take(&mut chunk), word.style),
                chunk_width,
            );
            lines.push(line.finish());
            chunk_width = Mm::default();
        }
        chunk.push(c);
        chunk_width += char_width;
    }

    if !chunk.is_empty() {
        line.push(StyledString::new(chunk, word.style), chunk_width);
    }
}

/// Page counter shared between the page decorator and [`PageMarker`]s.
#[derive(Clone, Debug, Default)]
pub struct PageTracker(Rc<Cell<usize>>);

impl PageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to the next page and returns its 1-based number.
    pub fn advance(&self) -> usize {
        let page = self.0.get() + 1;
        self.0.set(page);
        page
    }

    /// Returns the 1-based number of the page being rendered, or 0 before the first page.
    pub fn current(&self) -> usize {
        self.0.get()
    }
}

/// Read side of a [`PageMarker`].
#[derive(Clone, Debug, Default)]
pub struct MarkerHandle(Rc<Cell<Option<usize>>>);

impl MarkerHandle {
    /// Returns the page the marker was placed on, once rendered.
    pub fn page(&self) -> Option<usize> {
        self.0.get()
    }
}

/// Zero-height element that records the page it lands on.
///
/// The marker only settles when at least `keep_with_next` of vertical space is left on the
/// page; otherwise it moves to the next page together with the content that follows it.
pub struct PageMarker {
    tracker: PageTracker,
    handle: MarkerHandle,
    keep_with_next: Mm,
}

impl PageMarker {
    /// Creates a marker and the handle used to read its page afterwards.
    pub fn new(tracker: PageTracker, keep_with_next: Mm) -> (Self, MarkerHandle) {
        let handle = MarkerHandle::default();
        let marker = Self {
            tracker,
            handle: handle.clone(),
            keep_with_next,
        };
        (marker, handle)
    }
}

impl Element for PageMarker {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if area.size().height < self.keep_with_next {
            result.has_more = true;
        } else if self.handle.page().is_none() {
            self.handle.0.set(Some(self.tracker.current()));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| match token {
                Token::Word(word) => word.s.clone(),
                Token::Space(_) => " ".to_owned(),
                Token::Newline => "\\n".to_owned(),
            })
            .collect()
    }

    fn tokens_of(text: &str) -> Vec<String> {
        let spans = vec![StyledString::new(text, Style::new())];
        words(&tokenize(&spans, Style::new()))
    }

    #[test]
    fn latin_text_breaks_at_spaces() {
        assert_eq!(tokens_of("To the officer"), ["To", " ", "the", " ", "officer"]);
    }

    #[test]
    fn cjk_text_breaks_between_characters() {
        assert_eq!(tokens_of("申请庇护"), ["申", "请", "庇", "护"]);
    }

    #[test]
    fn punctuation_sticks_to_neighbours() {
        assert_eq!(
            tokens_of("机场（PEK）移民。"),
            ["机", "场", "（PEK）", "移", "民。"]
        );
    }

    #[test]
    fn newlines_are_kept() {
        assert_eq!(tokens_of("此致\n\n敬上"), ["此", "致", "\\n", "\\n", "敬", "上"]);
    }

    fn offline_fonts() -> crate::fonts::ResolvedFonts {
        let options = crate::fonts::FontOptions::new()
            .with_cache_dir(std::env::temp_dir().join("petition_pdf_tests"))
            .with_offline(true);
        crate::fonts::resolve(&options).expect("offline fonts")
    }

    #[test]
    fn lines_fit_the_available_width() {
        let resolved = offline_fonts();
        let font_cache = FontCache::new(resolved.family().clone());
        let text = resolved.coverage().fit(
            "本人谨此申请庇护，并请求在审查期间获准入境。 The applicant asks to be admitted \
             while the application is reviewed, and to be informed of the procedure.",
        );
        let style = Style::new().with_font_size(10);
        let spans = vec![StyledString::new(text.into_owned(), Style::new())];
        let width = mm_from_f64(60.0);

        let lines = layout(tokenize(&spans, style), &font_cache, style, width);
        assert!(lines.len() > 1);
        for line in &lines {
            let glyphs: usize = line.fragments.iter().map(|f| f.s.chars().count()).sum();
            assert!(line.width <= width || glyphs == 1, "line too wide: {line:?}");
        }
    }

    #[test]
    fn tallest_fragment_sets_the_line_height() {
        let font_cache = FontCache::new(offline_fonts().family().clone());
        let base = Style::new().with_font_size(10);
        let large = Style::new().with_font_size(20);
        let spans = vec![
            StyledString::new("Request\n\nsmall ", Style::new()),
            StyledString::new("LARGE", large),
        ];

        let lines = layout(tokenize(&spans, base), &font_cache, base, mm_from_f64(150.0));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_height, base.line_height(&font_cache));
        assert!(lines[1].fragments.is_empty());
        assert_eq!(lines[1].line_height, base.line_height(&font_cache));
        assert_eq!(lines[2].line_height, base.and(large).line_height(&font_cache));
        assert_eq!(lines[2].style.font_size(), 20);
    }

    #[test]
    fn page_tracker_counts_pages() {
        let tracker = PageTracker::new();
        assert_eq!(tracker.current(), 0);
        assert_eq!(tracker.advance(), 1);
        assert_eq!(tracker.clone().advance(), 2);
        assert_eq!(tracker.current(), 2);
    }
}
