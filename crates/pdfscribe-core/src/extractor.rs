//! Native-first extraction with OCR fallback.

use crate::backend::PdfBackend;
use crate::config::ExtractionConfig;
use crate::fallback::extract_ocr;
use crate::native::extract_native;
use crate::ocr::OcrEngine;
use crate::{ExtractError, ExtractionResult, trimmed_len};

/// Runs the extraction policy against a PDF backend and an OCR engine.
///
/// 1. Extract the embedded text layer.
/// 2. Accept it when its trimmed length reaches `min_chars`.
/// 3. Otherwise OCR every page of a freshly opened copy of the document.
///
/// Document-level failures at either step become a failed
/// [`ExtractionResult`]; [`extract`](Extractor::extract) never returns an
/// error.
pub struct Extractor<'a> {
    backend: &'a dyn PdfBackend,
    engine: &'a dyn OcrEngine,
    config: ExtractionConfig,
}

impl<'a> Extractor<'a> {
    pub fn new(backend: &'a dyn PdfBackend, engine: &'a dyn OcrEngine) -> Self {
        Self {
            backend,
            engine,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn extract(&self, bytes: &[u8]) -> ExtractionResult {
        match self.try_extract(bytes) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Extraction error");
                ExtractionResult::failure(e.to_string())
            }
        }
    }

    fn try_extract(&self, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        if bytes.is_empty() {
            return Err(ExtractError::EmptyInput);
        }
        tracing::info!("Starting extraction, PDF size: {} bytes", bytes.len());

        let native = extract_native(self.backend, bytes)?;
        let native_chars = trimmed_len(&native.text);
        tracing::info!(
            "Native extraction: {native_chars} chars from {} pages",
            native.page_count
        );

        if native_chars >= self.config.min_chars {
            tracing::info!("Using native extraction result");
            return Ok(ExtractionResult::native(native.text, native.page_count));
        }

        tracing::info!(
            "Native extraction yielded only {native_chars} chars (< {}), falling back to OCR",
            self.config.min_chars
        );
        let ocr = extract_ocr(
            self.backend,
            self.engine,
            bytes,
            self.config.ocr_dpi,
            &self.config.lang,
        )?;
        let failed_pages = ocr.failed_pages();
        if failed_pages > 0 {
            tracing::warn!(failed_pages, "OCR skipped pages that could not be processed");
        }
        let result = ExtractionResult::ocr(ocr.text, ocr.page_count, ocr.details);
        tracing::info!("OCR extraction complete: {} chars", result.char_count);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockPage};
    use crate::{ExtractionMethod, PAGE_BREAK};

    #[test]
    fn born_digital_pdf_takes_native_path() {
        let backend = MockBackend::new(vec![
            MockPage::text("Hello World"),
            MockPage::text("Hello World"),
        ]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr)
            .with_config(ExtractionConfig::new().with_min_chars(10))
            .extract(b"%PDF");

        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::Native);
        assert!(!result.ocr_used);
        assert_eq!(result.page_count, 2);
        assert_eq!(result.char_count, 22 + PAGE_BREAK.chars().count());
        assert!(result.ocr_details.is_none());
        assert!(backend.renders().is_empty());
    }

    #[test]
    fn scanned_pdf_takes_ocr_path_with_fresh_open() {
        let backend = MockBackend::new(vec![MockPage::scanned("INVOICE")]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"%PDF");

        assert!(result.success);
        assert_eq!(result.method, ExtractionMethod::Ocr);
        assert!(result.ocr_used);
        assert_eq!(result.page_count, 1);
        assert_eq!(result.text, "INVOICE");
        assert_eq!(result.ocr_details.as_ref().unwrap().len(), 1);
        assert_eq!(backend.open_count(), 2);
        assert_eq!(backend.open_documents(), 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let text = "a".repeat(50);
        let backend = MockBackend::new(vec![MockPage::text(&text)]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"%PDF");
        assert_eq!(result.method, ExtractionMethod::Native);

        let text = "a".repeat(49);
        let backend = MockBackend::new(vec![MockPage::text(&text)]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"%PDF");
        assert_eq!(result.method, ExtractionMethod::Ocr);
        assert!(result.ocr_used);
    }

    #[test]
    fn surrounding_whitespace_does_not_count_toward_threshold() {
        let padded = format!("   {}   \n\n", "b".repeat(49));
        let backend = MockBackend::new(vec![MockPage::text(&padded)]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"%PDF");
        assert_eq!(result.method, ExtractionMethod::Ocr);
    }

    #[test]
    fn empty_input_fails_regardless_of_config() {
        let backend = MockBackend::new(vec![MockPage::text("irrelevant")]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr)
            .with_config(ExtractionConfig::new().with_min_chars(0))
            .extract(b"");
        assert!(!result.success);
        assert_eq!(result.text, "");
        assert!(result.error.is_some());
        assert_eq!(backend.open_count(), 0);
    }

    #[test]
    fn native_failure_becomes_failed_result() {
        let backend = MockBackend::unopenable("cannot find xref");
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"junk");
        assert!(!result.success);
        assert_eq!(result.text, "");
        assert_eq!(
            result.error.as_deref(),
            Some("failed to open PDF: cannot find xref")
        );
    }

    #[test]
    fn ocr_open_failure_fails_whole_result() {
        let backend = MockBackend::new(vec![MockPage::text("tiny")])
            .open_failures_after(1, "second open failed");
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"%PDF");

        assert!(!result.success);
        assert_eq!(result.text, "");
        assert_eq!(result.page_count, 0);
        assert_eq!(result.char_count, 0);
        assert!(!result.ocr_used);
        assert!(result.ocr_details.is_none());
        assert_eq!(
            result.error.as_deref(),
            Some("failed to open PDF: second open failed")
        );
        assert_eq!(backend.open_count(), 1);
        assert_eq!(backend.open_documents(), 0);
    }

    #[test]
    fn page_failure_during_ocr_still_succeeds() {
        let backend = MockBackend::new(vec![
            MockPage::scanned("alpha"),
            MockPage::scanned("beta").failing_render(),
        ]);
        let ocr = backend.ocr_engine();
        let result = Extractor::new(&backend, &ocr).extract(b"%PDF");

        assert!(result.success);
        assert_eq!(result.text, "alpha");
        let details = result.ocr_details.unwrap();
        assert_eq!(details.len(), 2);
        assert!(details[1].is_error());
    }

    #[test]
    fn repeated_runs_agree() {
        let backend = MockBackend::new(vec![MockPage::scanned("one"), MockPage::text("")]);
        let ocr = backend.ocr_engine();
        let extractor = Extractor::new(&backend, &ocr);
        let first = extractor.extract(b"%PDF");
        let second = extractor.extract(b"%PDF");
        assert_eq!(first.method, second.method);
        assert_eq!(first.ocr_used, second.ocr_used);
        assert_eq!(first.page_count, second.page_count);
    }
}
