//! Tesseract OCR engine.
//!
//! Drives the `tesseract` command-line binary. Each page image is written to
//! a temporary PNG that lives only for the duration of one recognize call.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

use image::{ImageFormat, RgbImage};
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::TempDir;

use pdfscribe_core::{Capability, OcrEngine, OcrError, OcrOutput, ProbeError};

pub mod tsv;

/// Default executable name, looked up on `PATH`.
pub const DEFAULT_COMMAND: &str = "tesseract";

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^tesseract\s+v?(\d+(?:\.\d+)*\S*)").unwrap());

/// Configuration for [`TesseractEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractConfig {
    /// Executable name or path.
    pub command: String,
    /// Also request TSV output and report the mean word confidence.
    pub confidence: bool,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMMAND.to_string(),
            confidence: false,
        }
    }
}

/// Tesseract OCR engine.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    config: TesseractConfig,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TesseractConfig) -> Self {
        Self { config }
    }

    /// Locate the configured executable.
    pub fn resolve_binary(&self) -> Result<PathBuf, OcrError> {
        which::which(&self.config.command).map_err(|e| {
            OcrError::EngineNotAvailable(format!(
                "{} not found ({e}); install tesseract-ocr",
                self.config.command
            ))
        })
    }

    /// Ask the binary for its version.
    pub fn version(&self) -> Result<String, OcrError> {
        let binary = self.resolve_binary()?;
        let output = run(Command::new(&binary).arg("--version"), &self.config.command)?;
        // Tesseract 3.x printed the banner on stderr
        let banner = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        parse_version(&banner).ok_or_else(|| {
            OcrError::RecognitionFailed(format!(
                "unrecognized version banner: {}",
                banner.lines().next().unwrap_or_default()
            ))
        })
    }

    /// Run tesseract on an image file, text only.
    fn run_text(&self, binary: &Path, image_path: &Path, lang: &str) -> Result<String, OcrError> {
        let output = run(
            Command::new(binary)
                .arg(image_path)
                .arg("stdout")
                .args(["-l", lang]),
            &self.config.command,
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run tesseract once producing both `txt` and `tsv` outputs.
    fn run_with_confidence(
        &self,
        binary: &Path,
        image_path: &Path,
        work_dir: &Path,
        lang: &str,
    ) -> Result<OcrOutput, OcrError> {
        let base = work_dir.join("page");
        run(
            Command::new(binary)
                .arg(image_path)
                .arg(&base)
                .args(["-l", lang, "txt", "tsv"]),
            &self.config.command,
        )?;
        let text = std::fs::read_to_string(base.with_extension("txt"))?;
        let tsv = std::fs::read_to_string(base.with_extension("tsv"))?;
        Ok(OcrOutput {
            text,
            confidence: tsv::mean_word_confidence(&tsv),
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &RgbImage, lang: &str) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();
        let binary = self.resolve_binary()?;

        let temp_dir = TempDir::new()?;
        let image_path = temp_dir.path().join("page.png");
        image.save_with_format(&image_path, ImageFormat::Png)?;

        let output = if self.config.confidence {
            self.run_with_confidence(&binary, &image_path, temp_dir.path(), lang)?
        } else {
            OcrOutput {
                text: self.run_text(&binary, &image_path, lang)?,
                confidence: None,
            }
        };

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            lang,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "tesseract finished"
        );
        Ok(output)
    }
}

impl Capability for TesseractEngine {
    fn name(&self) -> &str {
        "Tesseract (OCR binary)"
    }

    fn probe(&self) -> Result<String, ProbeError> {
        self.version()
            .map(|v| format!("Tesseract version: {v}"))
            .map_err(|e| {
                ProbeError::new(format!(
                    "Tesseract binary not installed or not in PATH ({e})"
                ))
            })
    }
}

/// Run a command, returning its output on success.
fn run(command: &mut Command, tool_name: &str) -> Result<Output, OcrError> {
    match command.output() {
        Ok(output) if output.status.success() => Ok(output),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(OcrError::RecognitionFailed(format!(
                "{tool_name} failed ({}): {}",
                output.status,
                stderr.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
            OcrError::EngineNotAvailable(format!("{tool_name} not found (install tesseract-ocr)")),
        ),
        Err(e) => Err(OcrError::Io(e)),
    }
}

/// Extract the version number from `tesseract --version` output.
pub fn parse_version(banner: &str) -> Option<String> {
    VERSION_RE
        .captures(banner)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
