//! Resolution of run settings: CLI flags > env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::Context;
use pdfscribe_core::ExtractionConfig;
use pdfscribe_core::config_file::{self, ConfigFile};
use pdfscribe_tesseract::{DEFAULT_COMMAND, TesseractConfig};

/// Values given on the command line. `None`/`false` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub min_chars: Option<usize>,
    pub ocr_dpi: Option<u32>,
    pub lang: Option<String>,
    pub tesseract_cmd: Option<String>,
    pub confidence: bool,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub extraction: ExtractionConfig,
    pub tesseract: TesseractConfig,
}

/// Environment lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Load the config file named by `--config`, or the default cascade.
pub fn load_file(overrides: &Overrides) -> anyhow::Result<ConfigFile> {
    match &overrides.config {
        Some(path) => config_file::load_required(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(config_file::load_config()),
    }
}

/// Resolve the OCR engine settings. Never fails, so the dependency probe can
/// run even when the rest of the configuration is invalid.
pub fn resolve_tesseract(
    overrides: &Overrides,
    file: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> TesseractConfig {
    let ocr = file.ocr.clone().unwrap_or_default();
    let command = overrides
        .tesseract_cmd
        .clone()
        .or_else(|| env("PDFSCRIBE_TESSERACT_CMD"))
        .or(ocr.tesseract_cmd)
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
    TesseractConfig {
        command,
        confidence: overrides.confidence || ocr.confidence.unwrap_or(false),
    }
}

/// Resolve settings against an explicit config and environment lookup.
pub fn resolve_with(
    overrides: &Overrides,
    file: &ConfigFile,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let extraction = file.extraction.clone().unwrap_or_default();
    let defaults = ExtractionConfig::default();

    let min_chars = match overrides.min_chars {
        Some(v) => v,
        None => match env("PDFSCRIBE_MIN_CHARS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PDFSCRIBE_MIN_CHARS={raw:?} is not a number"))?,
            None => extraction.min_chars.unwrap_or(defaults.min_chars),
        },
    };

    let ocr_dpi = match overrides.ocr_dpi {
        Some(v) => v,
        None => match env("PDFSCRIBE_OCR_DPI") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PDFSCRIBE_OCR_DPI={raw:?} is not a number"))?,
            None => extraction.ocr_dpi.unwrap_or(defaults.ocr_dpi),
        },
    };

    let lang = overrides
        .lang
        .clone()
        .or_else(|| env("PDFSCRIBE_LANG"))
        .or(extraction.lang)
        .unwrap_or(defaults.lang);

    let extraction = ExtractionConfig {
        min_chars,
        ocr_dpi,
        lang,
    };
    extraction.validate().map_err(anyhow::Error::msg)?;

    Ok(Settings {
        extraction,
        tesseract: resolve_tesseract(overrides, file, &env),
    })
}
