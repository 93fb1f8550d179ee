use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod capability;
pub mod config;
pub mod config_file;
pub mod extractor;
pub mod fallback;
pub mod input;
pub mod native;
pub mod ocr;
pub mod raster;

#[cfg(test)]
pub(crate) mod mock;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend, PdfDocument, RawPixmap, ScopedDocument};
pub use capability::{Capability, ImageSupport, ProbeError, check_dependencies};
pub use config::ExtractionConfig;
pub use extractor::Extractor;
pub use fallback::{OcrExtraction, extract_ocr};
pub use input::{InputError, InputSource, read_input};
pub use native::{NativeExtraction, extract_native};
pub use ocr::{OcrEngine, OcrError, OcrOutput};
pub use raster::RasterError;

/// Literal marker placed between the text of consecutive pages.
pub const PAGE_BREAK: &str = "\n\n--- Page Break ---\n\n";

/// How the final text of a document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Native,
    Ocr,
}

/// Outcome of OCR for a single page.
///
/// Successful pages carry `chars` and `confidence`; failed pages carry only
/// `error`. Pages whose OCR text was blank produce no entry at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDetail {
    /// 1-based page number.
    pub page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageDetail {
    pub fn recognized(page: usize, chars: usize, confidence: f32) -> Self {
        Self {
            page,
            chars: Some(chars),
            confidence: Some(confidence),
            error: None,
        }
    }

    pub fn failed(page: usize, error: impl Into<String>) -> Self {
        Self {
            page,
            chars: None,
            confidence: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The single record emitted for one extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: usize,
    /// Number of characters (not bytes) in `text`.
    pub char_count: usize,
    pub ocr_used: bool,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_details: Option<Vec<PageDetail>>,
}

impl ExtractionResult {
    pub fn native(text: String, page_count: usize) -> Self {
        Self {
            success: true,
            char_count: text.chars().count(),
            text,
            method: ExtractionMethod::Native,
            page_count,
            ocr_used: false,
            error: None,
            ocr_details: None,
        }
    }

    pub fn ocr(text: String, page_count: usize, details: Vec<PageDetail>) -> Self {
        Self {
            success: true,
            char_count: text.chars().count(),
            text,
            method: ExtractionMethod::Ocr,
            page_count,
            ocr_used: true,
            error: None,
            ocr_details: Some(details),
        }
    }

    /// A failed run. Carries no partial text or page data.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            method: ExtractionMethod::Native,
            page_count: 0,
            char_count: 0,
            ocr_used: false,
            error: Some(error.into()),
            ocr_details: None,
        }
    }
}

/// Document-level failure of an extraction pass.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("empty PDF input")]
    EmptyInput,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Join non-empty page texts with [`PAGE_BREAK`], trimming each page.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .filter_map(|p| {
            let trimmed = p.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join(PAGE_BREAK)
}

/// Character count after trimming leading and trailing whitespace.
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}
