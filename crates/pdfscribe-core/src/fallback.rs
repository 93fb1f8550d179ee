//! OCR fallback: render every page and recognize its text.

use thiserror::Error;

use crate::backend::{BackendError, PdfBackend, PdfDocument, ScopedDocument};
use crate::ocr::{OcrEngine, OcrError, OcrOutput};
use crate::raster::{RasterError, pixmap_to_image, scale_for_dpi};
use crate::{PageDetail, join_pages};

/// Failure confined to a single page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Render(#[from] BackendError),
    #[error(transparent)]
    Image(#[from] RasterError),
    #[error(transparent)]
    Ocr(#[from] OcrError),
}

/// Output of an OCR pass over a whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrExtraction {
    pub text: String,
    pub page_count: usize,
    /// One entry per page with recognized text and per failed page.
    pub details: Vec<PageDetail>,
}

impl OcrExtraction {
    pub fn failed_pages(&self) -> usize {
        self.details.iter().filter(|d| d.is_error()).count()
    }
}

/// Render each page at `dpi` and OCR it with `lang`.
///
/// Opens its own document. A page that fails to render or recognize is
/// recorded in the details and skipped; only a failure to open the document
/// or count its pages aborts the pass.
pub fn extract_ocr(
    backend: &dyn PdfBackend,
    engine: &dyn OcrEngine,
    bytes: &[u8],
    dpi: u32,
    lang: &str,
) -> Result<OcrExtraction, BackendError> {
    let document = ScopedDocument::open(backend, bytes, "ocr")?;
    let page_count = document.page_count()?;
    tracing::info!("OCR: Opened PDF with {page_count} pages");

    let scale = scale_for_dpi(dpi);
    let mut pages_text = Vec::new();
    let mut details = Vec::new();

    for index in 0..page_count {
        let page = index + 1;
        tracing::info!("OCR: Processing page {page}...");

        match ocr_page(&*document, engine, index, scale, lang) {
            Ok(output) => {
                let trimmed = output.text.trim();
                let chars = trimmed.chars().count();
                if chars > 0 {
                    details.push(PageDetail::recognized(
                        page,
                        chars,
                        output.confidence.unwrap_or(0.0),
                    ));
                    pages_text.push(trimmed.to_string());
                }
                tracing::info!("OCR: Page {page} done, extracted {chars} chars");
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "OCR: page failed");
                details.push(PageDetail::failed(page, e.to_string()));
            }
        }
    }

    Ok(OcrExtraction {
        text: join_pages(pages_text),
        page_count,
        details,
    })
}

/// Render and recognize one page.
///
/// The pixmap is consumed by the image conversion and the image is dropped
/// on return, so only one rendered page is alive at a time.
fn ocr_page(
    document: &dyn PdfDocument,
    engine: &dyn OcrEngine,
    index: usize,
    scale: f32,
    lang: &str,
) -> Result<OcrOutput, PageError> {
    let pixmap = document.render_page(index, scale)?;
    tracing::debug!(
        page = index + 1,
        width = pixmap.width,
        height = pixmap.height,
        "rendered page"
    );
    let image = pixmap_to_image(pixmap)?;
    Ok(engine.recognize(&image, lang)?)
}
