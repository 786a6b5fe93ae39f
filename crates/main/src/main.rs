use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::debug;
use petition_pdf::fonts::FontOptions;
use petition_pdf::{Letter, RenderOptions, DEFAULT_OUTPUT_FILE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Renders the petition letter to a PDF file.
///
/// Fonts are looked up in `--fonts-dir`, `PETITION_PDF_FONTS_DIR`, `assets/fonts` next to the
/// binary and well-known system locations. When none provides CJK glyphs, a fallback font is
/// downloaded into `PETITION_PDF_CACHE_DIR` (unless `--offline`), and as a last resort the PDF
/// built-in Helvetica is used.
#[derive(Parser)]
#[command(author, version, about = "Render the petition letter to PDF")]
struct Cli {
    /// Output file.
    #[arg(default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// TOML file replacing the built-in letter content.
    #[arg(long, value_name = "FILE")]
    content: Option<PathBuf>,

    /// Directory holding the NotoSansSC family.
    #[arg(long, value_name = "DIR")]
    fonts_dir: Option<PathBuf>,

    /// Never download the fallback font.
    #[arg(long)]
    offline: bool,

    /// Timeout for each font download attempt, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    download_timeout: u64,

    /// Render only the primary language variant.
    #[arg(long)]
    no_translation: bool,

    /// Leave out the legal-argument appendix.
    #[arg(long)]
    no_appendix: bool,

    /// Leave out the illustrations.
    #[arg(long)]
    no_illustrations: bool,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), petition_pdf::Error> {
    let letter = match &cli.content {
        Some(path) => {
            debug!("Loading letter content from {}", path.display());
            Letter::from_path(path)?
        }
        None => Letter::builtin(),
    };

    let mut fonts = FontOptions::from_env()
        .with_fonts_dir(cli.fonts_dir.clone())
        .with_download_timeout(Duration::from_secs(cli.download_timeout));
    if cli.offline {
        fonts = fonts.with_offline(true);
    }

    let options = RenderOptions::new()
        .with_translation(!cli.no_translation)
        .with_appendix(!cli.no_appendix)
        .with_illustrations(!cli.no_illustrations)
        .with_fonts(fonts);

    let pdf = petition_pdf::generate(&letter, &options, &cli.output)?;
    println!(
        "Generated {} ({} bytes, {} parts)",
        cli.output.display(),
        pdf.bytes.len(),
        pdf.parts.len()
    );
    Ok(())
}

fn init_logger(verbose: bool) {
    let default_directives = if verbose {
        "petition_pdf=debug,main=debug,info"
    } else {
        "petition_pdf=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
