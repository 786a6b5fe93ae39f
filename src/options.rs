//! Render options shared by the library entry points and the CLI.

use crate::fonts::FontOptions;

/// Default file name of the rendered letter.
pub const DEFAULT_OUTPUT_FILE: &str = "asylum_request.pdf";

/// Controls which optional parts of the document are rendered and how fonts are resolved.
#[derive(Clone, Debug)]
pub struct RenderOptions {
    include_translation: bool,
    include_appendix: bool,
    include_illustrations: bool,
    fonts: FontOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_translation: true,
            include_appendix: true,
            include_illustrations: true,
            fonts: FontOptions::default(),
        }
    }
}

impl RenderOptions {
    /// Creates options that render every configured part.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options whose font settings honour the `PETITION_PDF_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            fonts: FontOptions::from_env(),
            ..Self::default()
        }
    }

    /// Renders the secondary language variant, when the letter has one.
    pub fn with_translation(mut self, include: bool) -> Self {
        self.include_translation = include;
        self
    }

    /// Renders the legal-argument appendix, when the letter has one.
    pub fn with_appendix(mut self, include: bool) -> Self {
        self.include_appendix = include;
        self
    }

    /// Draws the decorative illustrations.
    pub fn with_illustrations(mut self, include: bool) -> Self {
        self.include_illustrations = include;
        self
    }

    /// Replaces the font resolution settings.
    pub fn with_fonts(mut self, fonts: FontOptions) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn include_translation(&self) -> bool {
        self.include_translation
    }

    pub fn include_appendix(&self) -> bool {
        self.include_appendix
    }

    pub fn include_illustrations(&self) -> bool {
        self.include_illustrations
    }

    pub fn fonts(&self) -> &FontOptions {
        &self.fonts
    }
}
