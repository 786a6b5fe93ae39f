//! Glyph coverage of the resolved font and the text substitutions it requires.

use std::borrow::Cow;

/// Character repertoire the resolved font can display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    /// Embedded font with CJK glyphs.
    Cjk,
    /// Embedded font without CJK glyphs; missing glyphs render as boxes.
    NoCjk,
    /// PDF built-in font limited to the Windows-1252 encoding.
    WinAnsi,
}

impl Coverage {
    /// Returns `true` when CJK text can be displayed as-is.
    pub fn supports_cjk(self) -> bool {
        matches!(self, Coverage::Cjk)
    }

    /// Maps `text` onto the repertoire of the font.
    ///
    /// Embedded fonts take any text. For built-in fonts, typographic punctuation is flattened to
    /// ASCII, full-width forms are folded to their ASCII counterparts and every remaining character
    /// outside Windows-1252 becomes `?`.
    pub fn fit(self, text: &str) -> Cow<'_, str> {
        match self {
            Coverage::Cjk | Coverage::NoCjk => Cow::Borrowed(text),
            Coverage::WinAnsi => {
                if text.chars().all(|c| c.is_ascii()) {
                    return Cow::Borrowed(text);
                }
                let mut fitted = String::with_capacity(text.len());
                for c in text.chars() {
                    match ascii_substitute(c) {
                        Some(replacement) => fitted.push_str(replacement),
                        None if is_win_ansi(c) => fitted.push(c),
                        None => fitted.push('?'),
                    }
                }
                Cow::Owned(fitted)
            }
        }
    }
}

fn ascii_substitute(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{3000}' => " ",
        '\u{3001}' | '\u{FF0C}' => ",",
        '\u{3002}' => ".",
        '\u{3014}' | '\u{3010}' => "[",
        '\u{3015}' | '\u{3011}' => "]",
        '\u{300A}' => "<<",
        '\u{300B}' => ">>",
        '\u{FF08}' => "(",
        '\u{FF09}' => ")",
        '\u{FF1A}' => ":",
        '\u{FF1B}' => ";",
        '\u{FF01}' => "!",
        '\u{FF1F}' => "?",
        _ => return None,
    };
    Some(replacement)
}

/// Characters encodable in Windows-1252, the encoding of the PDF built-in fonts.
fn is_win_ansi(c: char) -> bool {
    const EXTRA: &[char] = &[
        '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
        '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
        '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
        '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
    ];

    let code = c as u32;
    code < 0x80 || (0xA0..=0xFF).contains(&code) || EXTRA.contains(&c)
}

/// Returns `true` for characters that may be broken around without a space: CJK ideographs,
/// kana, hangul and CJK/full-width punctuation.
pub(crate) fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x2E80..=0x2FDF
        | 0x3000..=0x303F
        | 0x3040..=0x30FF
        | 0x3100..=0x312F
        | 0x3190..=0x31FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFFEF
        | 0x20000..=0x2FA1F)
}

/// Returns `true` for punctuation that must not start a line.
pub(crate) fn is_closing_punctuation(c: char) -> bool {
    matches!(
        c,
        '，' | '。' | '、' | '；' | '：' | '？' | '！' | '）' | '」' | '』' | '》' | '〕' | '】'
            | ',' | '.' | ';' | ':' | '?' | '!' | ')'
    )
}
