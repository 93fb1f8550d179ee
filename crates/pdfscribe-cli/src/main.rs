use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use pdfscribe_core::config_file::ConfigFile;
use pdfscribe_core::{Extractor, ImageSupport, InputSource, check_dependencies, read_input};
use pdfscribe_mupdf::MupdfBackend;
use pdfscribe_tesseract::TesseractEngine;

mod logging;
mod output;
mod settings;

use output::{StatusReport, emit, missing_dependencies_message};
use settings::{Overrides, process_env};

/// pdfscribe - Extract text from PDFs, falling back to OCR for scanned documents
///
/// Prints exactly one JSON object to stdout; diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the PDF file
    pdf_path: Option<PathBuf>,

    /// Read the PDF from stdin instead of a file
    #[arg(long)]
    stdin: bool,

    /// Minimum trimmed native characters before falling back to OCR [default: 50]
    #[arg(long)]
    min_chars: Option<usize>,

    /// Render resolution for OCR; lower is faster, higher is more accurate [default: 150]
    #[arg(long)]
    ocr_dpi: Option<u32>,

    /// Tesseract language code [default: eng]
    #[arg(long)]
    lang: Option<String>,

    /// Check dependencies, print a JSON status and exit
    #[arg(long)]
    check_deps: bool,

    /// Report real per-page OCR confidence instead of 0
    #[arg(long)]
    confidence: bool,

    /// Tesseract executable name or path [default: tesseract]
    #[arg(long)]
    tesseract_cmd: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write diagnostics to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            min_chars: self.min_chars,
            ocr_dpi: self.ocr_dpi,
            lang: self.lang.clone(),
            tesseract_cmd: self.tesseract_cmd.clone(),
            confidence: self.confidence,
            config: self.config.clone(),
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => return emit(&StatusReport::error(argument_error(&e)), false, false),
    };

    let _log_guard = match logging::init(cli.log_file.as_deref(), cli.quiet) {
        Ok(guard) => guard,
        Err(e) => {
            return emit(
                &StatusReport::error(format!("Failed to set up logging: {e:#}")),
                false,
                cli.pretty,
            );
        }
    };

    run(cli)
}

fn run(cli: Cli) -> ExitCode {
    let pretty = cli.pretty;
    let overrides = cli.overrides();

    // The probe needs only the OCR command, so a broken config must not
    // keep it from running.
    let file = settings::load_file(&overrides);
    let fallback = ConfigFile::default();
    let tesseract =
        settings::resolve_tesseract(&overrides, file.as_ref().unwrap_or(&fallback), process_env);

    let backend = MupdfBackend::new();
    let engine = TesseractEngine::with_config(tesseract);

    let missing = check_dependencies(&[&backend, &ImageSupport, &engine]);

    if cli.check_deps {
        let report = StatusReport::dependencies(&missing);
        return emit(&report, report.success, pretty);
    }

    if !missing.is_empty() {
        let message = missing_dependencies_message(&missing);
        tracing::error!("{message}");
        return emit(&StatusReport::error(message), false, pretty);
    }

    let resolved = file.and_then(|file| settings::resolve_with(&overrides, &file, process_env));
    let settings = match resolved {
        Ok(settings) => settings,
        Err(e) => {
            let message = format!("Invalid configuration: {e:#}");
            tracing::error!("{message}");
            return emit(&StatusReport::error(message), false, pretty);
        }
    };

    let bytes = match InputSource::select(cli.pdf_path, cli.stdin)
        .and_then(|source| read_input(&source))
    {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("{e}");
            return emit(&StatusReport::error(e.to_string()), false, pretty);
        }
    };

    let result = Extractor::new(&backend, &engine)
        .with_config(settings.extraction)
        .extract(&bytes);
    emit(&result, result.success, pretty)
}

/// First line of a clap error, without its `error: ` prefix.
fn argument_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    format!(
        "Invalid arguments: {}",
        first.strip_prefix("error: ").unwrap_or(first)
    )
}
