use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use petition_pdf::fonts::{self, FontOptions, FontSource};
use petition_pdf::model::Part;
use petition_pdf::{render_letter, Letter, RenderOptions, Timestamp};
use sha2::{Digest, Sha256};

fn offline_options() -> RenderOptions {
    let cache = std::env::temp_dir().join("petition_pdf_tests");
    RenderOptions::new().with_fonts(
        FontOptions::new()
            .with_cache_dir(cache)
            .with_offline(true),
    )
}

fn fixed_timestamp() -> Timestamp {
    Timestamp::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
}

fn render_sample(options: &RenderOptions, timestamp: &Timestamp) -> Vec<u8> {
    render_letter(&Letter::builtin(), options, timestamp)
        .expect("render sample letter")
        .bytes
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    for tag in [
        "xmp:CreateDate",
        "xmp:ModifyDate",
        "xmp:MetadataDate",
        "xmpMM:DocumentID",
        "xmpMM:InstanceID",
        "xmpMM:VersionID",
    ] {
        let start = format!("<{tag}>");
        let end = format!("</{tag}>");
        scrub_xml(&mut normalized, start.as_bytes(), end.as_bytes());
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    Sha256::digest(&normalized).into()
}

#[test]
fn renders_non_empty_output() {
    let bytes = render_sample(&offline_options(), &fixed_timestamp());
    assert!(bytes.starts_with(b"%PDF"), "output should carry a PDF header");
}

#[test]
fn rendering_is_deterministic() {
    let options = offline_options();
    let timestamp = fixed_timestamp();
    let bytes_a = render_sample(&options, &timestamp);
    let bytes_b = render_sample(&options, &timestamp);

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn missing_preferred_fonts_offline_still_render() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = RenderOptions::new().with_fonts(
        FontOptions::new()
            .with_fonts_dir(dir.path().join("no-fonts-here"))
            .with_cache_dir(dir.path().join("cache"))
            .with_offline(true),
    );

    let pdf = render_letter(&Letter::builtin(), &options, &fixed_timestamp())
        .expect("fallback rendering succeeds");
    assert!(!pdf.bytes.is_empty());
}

#[test]
fn unreachable_download_mirror_still_renders() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fonts = FontOptions::new()
        .with_fonts_dir(dir.path().join("no-fonts-here"))
        .with_cache_dir(dir.path().join("cache"))
        .with_offline(false)
        .with_download_timeout(Duration::from_millis(500))
        .with_mirrors(["http://127.0.0.1:9/DejaVuSansCondensed.ttf"]);
    let options = RenderOptions::new().with_fonts(fonts);

    let pdf = render_letter(&Letter::builtin(), &options, &fixed_timestamp())
        .expect("rendering survives a failed download");

    assert!(pdf.bytes.starts_with(b"%PDF"));
    assert!(!matches!(pdf.source, FontSource::Downloaded(_)));
    assert!(!dir.path().join("cache").join(fonts::FALLBACK_FONT_FILE).exists());
}

#[test]
fn every_part_is_placed_in_order() {
    let options = offline_options();

    let pdf = render_letter(&Letter::builtin(), &options, &fixed_timestamp()).expect("render");
    let kinds: Vec<&str> = pdf
        .parts
        .iter()
        .map(|(part, _)| match part {
            Part::Preamble => "preamble",
            Part::Variant { .. } => "variant",
            Part::Appendix { .. } => "appendix",
        })
        .collect();
    assert_eq!(kinds, ["preamble", "variant", "variant", "appendix"]);

    let pages: Vec<usize> = pdf
        .parts
        .iter()
        .map(|(_, page)| page.expect("every part lands on a page"))
        .collect();
    assert_eq!(pages[0], 1);
    assert!(pages.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn unwritable_output_fails_without_leaving_a_file() {
    let options = offline_options();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("asylum_request.pdf");
    let err = petition_pdf::generate(&Letter::builtin(), &options, &path).unwrap_err();

    assert!(matches!(err, petition_pdf::Error::Write { .. }));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 0);
}

#[test]
fn generate_writes_the_file() {
    let options = offline_options();

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("asylum_request.pdf");
    let pdf = petition_pdf::generate(&Letter::builtin(), &options, &path).expect("generate");

    assert_eq!(fs::read(&path).expect("read output"), pdf.bytes);
}

#[test]
fn invalid_content_fails_before_rendering() {
    let mut letter = Letter::builtin();
    letter.primary.content.subject = "   ".into();
    let err = render_letter(&letter, &offline_options(), &fixed_timestamp()).unwrap_err();
    assert!(matches!(err, petition_pdf::Error::Content { .. }));
}

#[test]
fn demo_content_file_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/letter.toml");
    let letter = Letter::from_path(&path).expect("demo letter loads");
    assert_eq!(letter.primary.language, "en");
    assert!(letter.secondary.is_none());
    assert!(letter.legal_argument.is_some());
}
