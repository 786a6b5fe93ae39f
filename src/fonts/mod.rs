//! Font resolution for the petition renderer.
//!
//! Fonts are resolved through a cascade, most capable first:
//!
//! 1. the preferred `NotoSansSC` family from a font directory (`--fonts-dir`,
//!    `PETITION_PDF_FONTS_DIR`, `assets/fonts` next to the executable, `assets/fonts` in the
//!    crate), then well-known system fonts with CJK glyphs;
//! 2. `DejaVuSansCondensed.ttf` from the cache directory, downloaded on demand unless offline;
//! 3. the PDF built-in Helvetica family, with glyph metrics from an installed Liberation Sans
//!    family or, failing that, from the DejaVu Sans file compiled into the crate.
//!
//! Each failed tier is logged and the next one is tried. The last tier needs nothing from the
//! machine, so [`resolve`] only returns [`Error::FontUnavailable`] if the compiled-in metrics
//! font cannot be parsed.

mod coverage;
#[cfg(feature = "download")]
mod download;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, info, warn};
use printpdf::BuiltinFont;

use crate::error::{Error, Result};

pub use coverage::Coverage;
pub(crate) use coverage::{is_cjk, is_closing_punctuation};

/// Name of the preferred font family looked up in font directories.
pub const PREFERRED_FAMILY_NAME: &str = "NotoSansSC";

/// File name of the downloadable fallback font.
pub const FALLBACK_FONT_FILE: &str = "DejaVuSansCondensed.ttf";

/// Public mirrors of the fallback font, tried in order.
pub const FALLBACK_FONT_MIRRORS: &[&str] = &[
    "https://raw.githubusercontent.com/dejavu-fonts/dejavu-fonts/version_2_37/ttf/DejaVuSansCondensed.ttf",
    "https://raw.githubusercontent.com/dejavu-fonts/dejavu-fonts/master/ttf/DejaVuSansCondensed.ttf",
];

/// Environment variable pointing at a directory with the preferred family.
pub const FONTS_DIR_ENV: &str = "PETITION_PDF_FONTS_DIR";

/// Environment variable overriding the download cache directory.
pub const CACHE_DIR_ENV: &str = "PETITION_PDF_CACHE_DIR";

/// Environment variable disabling the font download when set to `1` or `true`.
pub const OFFLINE_ENV: &str = "PETITION_PDF_OFFLINE";

const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

const FAMILY_FILES: &[&str] = &[
    "NotoSansSC-Regular.ttf",
    "NotoSansSC-Bold.ttf",
    "NotoSansSC-Italic.ttf",
    "NotoSansSC-BoldItalic.ttf",
];

const SYSTEM_CJK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/google-droid/DroidSansFallbackFull.ttf",
    "/usr/share/fonts/google-droid-sans-fonts/DroidSansFallbackFull.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\simhei.ttf",
    "C:\\Windows\\Fonts\\simkai.ttf",
];

/// Helvetica metric-compatible families, loaded with [`fonts::from_files`].
const SYSTEM_LATIN_FAMILIES: &[(&str, &str)] = &[
    ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
    ("/usr/share/fonts/truetype/liberation2", "LiberationSans"),
    ("/usr/share/fonts/liberation-sans", "LiberationSans"),
];

/// Metrics for the built-in tier when no Liberation family is installed. DejaVu Sans runs wider
/// than Helvetica, so lines measured with it never overflow when drawn in Helvetica.
const BUNDLED_METRICS_FONT: &[u8] = include_bytes!("../../assets/metrics/DejaVuSans.ttf");

/// Where the resolved fonts came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Preferred family loaded from a font directory.
    Family(PathBuf),
    /// A single system font with CJK glyphs.
    System(PathBuf),
    /// The cached or freshly downloaded fallback font.
    Downloaded(PathBuf),
    /// PDF built-in Helvetica.
    Builtin {
        /// Family directory providing glyph metrics, `None` for the compiled-in metrics font.
        metrics: Option<PathBuf>,
    },
}

/// Options controlling the font cascade.
#[derive(Clone, Debug)]
pub struct FontOptions {
    fonts_dir: Option<PathBuf>,
    cache_dir: PathBuf,
    offline: bool,
    download_timeout: Duration,
    mirrors: Vec<String>,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            fonts_dir: None,
            cache_dir: env::temp_dir().join("petition_pdf"),
            offline: false,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            mirrors: FALLBACK_FONT_MIRRORS
                .iter()
                .map(|url| (*url).to_owned())
                .collect(),
        }
    }
}

impl FontOptions {
    /// Creates options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options from the defaults overridden by the `PETITION_PDF_*` environment variables.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(dir) = env_path(CACHE_DIR_ENV) {
            options.cache_dir = dir;
        }
        if let Ok(value) = env::var(OFFLINE_ENV) {
            options.offline = matches!(value.trim(), "1" | "true" | "TRUE" | "yes");
        }
        options
    }

    /// Sets an explicit directory holding the preferred family; it is searched first.
    pub fn with_fonts_dir(mut self, dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Sets the directory the downloaded fallback font is cached in.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Disables the network download.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Bounds each download attempt.
    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    /// Replaces the list of download mirrors.
    pub fn with_mirrors<I, S>(mut self, mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mirrors = mirrors.into_iter().map(Into::into).collect();
        self
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn offline(&self) -> bool {
        self.offline
    }

    pub fn download_timeout(&self) -> Duration {
        self.download_timeout
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    fn cached_fallback_path(&self) -> PathBuf {
        self.cache_dir.join(FALLBACK_FONT_FILE)
    }
}

/// A font family ready for `genpdf`, together with its glyph coverage.
#[derive(Clone, Debug)]
pub struct ResolvedFonts {
    family: FontFamily<FontData>,
    coverage: Coverage,
    source: FontSource,
}

impl ResolvedFonts {
    pub fn family(&self) -> &FontFamily<FontData> {
        &self.family
    }

    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }
}

/// Runs the font cascade and returns the first family that loads.
pub fn resolve(options: &FontOptions) -> Result<ResolvedFonts> {
    let mut attempts = Vec::new();

    let tiers: [(&str, fn(&FontOptions, &mut Vec<String>) -> Option<ResolvedFonts>); 2] = [
        ("preferred", load_preferred),
        ("downloaded", load_downloaded),
    ];

    for (tier, load) in tiers {
        let before = attempts.len();
        if let Some(resolved) = load(options, &mut attempts) {
            info!(
                "Using {} font tier ({:?}, coverage {:?})",
                tier, resolved.source, resolved.coverage
            );
            return Ok(resolved);
        }
        warn!(
            "No {} font available: {}",
            tier,
            attempts[before..].join("; ")
        );
    }

    let resolved = load_builtin(&mut attempts)?;
    info!(
        "Using built-in font tier ({:?}, coverage {:?})",
        resolved.source, resolved.coverage
    );
    Ok(resolved)
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates(options: &FontOptions) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let mut push = |candidate: PathBuf| {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(dir) = options.fonts_dir() {
        push(dir.to_path_buf());
    }

    if let Some(dir) = env_path(FONTS_DIR_ENV) {
        push(dir);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push(bin_dir.join("assets/fonts"));
        }
    }

    push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"));

    candidates
}

fn missing_family_files(directory: &Path) -> Vec<&'static str> {
    FAMILY_FILES
        .iter()
        .copied()
        .filter(|name| !directory.join(name).is_file())
        .collect()
}

fn single_face_family(data: FontData) -> FontFamily<FontData> {
    FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    }
}

fn load_preferred(options: &FontOptions, attempts: &mut Vec<String>) -> Option<ResolvedFonts> {
    for directory in font_directory_candidates(options) {
        if !directory.is_dir() {
            attempts.push(format!("{} (directory missing)", directory.display()));
            continue;
        }

        let missing = missing_family_files(&directory);
        if !missing.is_empty() {
            attempts.push(format!(
                "{} (missing files [{}])",
                directory.display(),
                missing.join(", ")
            ));
            continue;
        }

        match fonts::from_files(&directory, PREFERRED_FAMILY_NAME, None) {
            Ok(family) => {
                return Some(ResolvedFonts {
                    family,
                    coverage: Coverage::Cjk,
                    source: FontSource::Family(directory),
                })
            }
            Err(err) => attempts.push(format!("{} ({})", directory.display(), err)),
        }
    }

    for path in SYSTEM_CJK_FONTS.iter().map(PathBuf::from) {
        if !path.is_file() {
            continue;
        }
        match FontData::load(&path, None) {
            Ok(data) => {
                return Some(ResolvedFonts {
                    family: single_face_family(data),
                    coverage: Coverage::Cjk,
                    source: FontSource::System(path),
                })
            }
            Err(err) => attempts.push(format!("{} ({})", path.display(), err)),
        }
    }

    None
}

fn load_downloaded(options: &FontOptions, attempts: &mut Vec<String>) -> Option<ResolvedFonts> {
    let path = options.cached_fallback_path();

    if path.is_file() {
        match FontData::load(&path, None) {
            Ok(data) => return Some(downloaded(data, path)),
            Err(err) => {
                warn!(
                    "Discarding unreadable cached font {}: {}",
                    path.display(),
                    err
                );
                if let Err(err) = fs::remove_file(&path) {
                    debug!("Could not remove {}: {}", path.display(), err);
                }
            }
        }
    }

    if options.offline() {
        attempts.push(format!("{} (not cached, offline)", path.display()));
        return None;
    }

    if !fetch_fallback(options, &path) {
        attempts.push(format!("{} (download failed)", path.display()));
        return None;
    }

    match FontData::load(&path, None) {
        Ok(data) => Some(downloaded(data, path)),
        Err(err) => {
            attempts.push(format!("{} ({})", path.display(), err));
            None
        }
    }
}

fn downloaded(data: FontData, path: PathBuf) -> ResolvedFonts {
    ResolvedFonts {
        family: single_face_family(data),
        coverage: Coverage::NoCjk,
        source: FontSource::Downloaded(path),
    }
}

#[cfg(feature = "download")]
fn fetch_fallback(options: &FontOptions, destination: &Path) -> bool {
    download::fetch(options.mirrors(), destination, options.download_timeout())
}

#[cfg(not(feature = "download"))]
fn fetch_fallback(_options: &FontOptions, destination: &Path) -> bool {
    debug!(
        "Skipping download of {}: built without the `download` feature",
        destination.display()
    );
    false
}

fn load_builtin(attempts: &mut Vec<String>) -> Result<ResolvedFonts> {
    for (directory, name) in SYSTEM_LATIN_FAMILIES {
        let directory = Path::new(directory);
        if !directory.is_dir() {
            continue;
        }
        match fonts::from_files(directory, name, Some(fonts::Builtin::Helvetica)) {
            Ok(family) => return Ok(builtin(family, Some(directory.to_path_buf()))),
            Err(err) => attempts.push(format!("{} ({})", directory.display(), err)),
        }
    }

    match builtin_family_with_metrics(BUNDLED_METRICS_FONT) {
        Ok(family) => Ok(builtin(family, None)),
        Err(err) => {
            attempts.push(format!("compiled-in metrics font ({})", err));
            Err(Error::FontUnavailable {
                attempts: attempts.join("; "),
            })
        }
    }
}

fn builtin(family: FontFamily<FontData>, metrics: Option<PathBuf>) -> ResolvedFonts {
    ResolvedFonts {
        family,
        coverage: Coverage::WinAnsi,
        source: FontSource::Builtin { metrics },
    }
}

fn builtin_family_with_metrics(
    bytes: &[u8],
) -> std::result::Result<FontFamily<FontData>, genpdf::error::Error> {
    Ok(FontFamily {
        regular: FontData::new(bytes.to_vec(), Some(BuiltinFont::Helvetica))?,
        bold: FontData::new(bytes.to_vec(), Some(BuiltinFont::HelveticaBold))?,
        italic: FontData::new(bytes.to_vec(), Some(BuiltinFont::HelveticaOblique))?,
        bold_italic: FontData::new(bytes.to_vec(), Some(BuiltinFont::HelveticaBoldOblique))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_fonts_dir_is_searched_first() {
        let options = FontOptions::new().with_fonts_dir(PathBuf::from("/custom/fonts"));
        let candidates = font_directory_candidates(&options);
        assert_eq!(candidates.first(), Some(&PathBuf::from("/custom/fonts")));
    }

    #[test]
    fn candidates_are_deduplicated() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        let options = FontOptions::new().with_fonts_dir(manifest.clone());
        let candidates = font_directory_candidates(&options);
        assert_eq!(candidates.iter().filter(|c| **c == manifest).count(), 1);
    }

    #[test]
    fn reports_missing_family_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("NotoSansSC-Regular.ttf"), b"").expect("write");
        let missing = missing_family_files(dir.path());
        assert_eq!(missing.len(), 3);
        assert!(!missing.contains(&"NotoSansSC-Regular.ttf"));
    }

    #[test]
    fn offline_without_cache_skips_download_tier() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = FontOptions::new()
            .with_cache_dir(dir.path())
            .with_offline(true);
        let mut attempts = Vec::new();
        assert!(load_downloaded(&options, &mut attempts).is_none());
        assert!(attempts[0].contains("offline"));
    }

    #[test]
    fn corrupt_cache_file_is_discarded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cached = dir.path().join(FALLBACK_FONT_FILE);
        fs::write(&cached, b"not a font").expect("write");
        let options = FontOptions::new()
            .with_cache_dir(dir.path())
            .with_offline(true);
        let mut attempts = Vec::new();
        assert!(load_downloaded(&options, &mut attempts).is_none());
        assert!(!cached.exists());
    }

    #[test]
    fn compiled_in_metrics_font_loads() {
        let family = builtin_family_with_metrics(BUNDLED_METRICS_FONT).expect("bundled metrics");
        let cache = fonts::FontCache::new(family);
        let style = genpdf::style::Style::new();
        assert!(style.str_width(&cache, "Request") > genpdf::Mm::from(0));
        assert!(style.line_height(&cache) > genpdf::Mm::from(0));
    }

    #[test]
    fn builtin_tier_needs_nothing_from_the_machine() {
        let mut attempts = Vec::new();
        let resolved = load_builtin(&mut attempts).expect("built-in tier");
        assert_eq!(resolved.coverage(), Coverage::WinAnsi);
        assert!(matches!(resolved.source(), FontSource::Builtin { .. }));
    }

    #[test]
    fn offline_resolution_always_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = FontOptions::new()
            .with_fonts_dir(dir.path().join("no-fonts-here"))
            .with_cache_dir(dir.path().join("cache"))
            .with_offline(true);
        assert!(resolve(&options).is_ok());
    }

    #[cfg(feature = "download")]
    #[test]
    fn downloaded_font_is_cached_and_reused() {
        let body = BUNDLED_METRICS_FONT.to_vec();
        let (url, server) = download::serve_once(body.clone());
        let dir = tempfile::tempdir().expect("tempdir");
        let options = FontOptions::new()
            .with_cache_dir(dir.path())
            .with_download_timeout(Duration::from_secs(5))
            .with_mirrors([url]);

        let mut attempts = Vec::new();
        let resolved = load_downloaded(&options, &mut attempts).expect("downloaded tier");
        server.join().expect("server thread");

        let cached = dir.path().join(FALLBACK_FONT_FILE);
        assert_eq!(resolved.source(), &FontSource::Downloaded(cached.clone()));
        assert_eq!(resolved.coverage(), Coverage::NoCjk);
        assert_eq!(fs::read(&cached).expect("cached font"), body);

        let offline = options.with_offline(true);
        assert!(load_downloaded(&offline, &mut attempts).is_some());
    }
}
