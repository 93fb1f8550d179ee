//! Mock PDF backend and OCR engine for testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::RgbImage;

use crate::backend::{BackendError, PdfBackend, PdfDocument, RawPixmap};
use crate::ocr::{OcrEngine, OcrError, OcrOutput};

/// One page of a [`MockBackend`] document.
#[derive(Clone, Debug)]
pub struct MockPage {
    /// Embedded text returned by native extraction.
    pub text: String,
    /// Text the mock OCR engine "sees" on the rendered page.
    pub ocr_text: String,
    pub fail_text: bool,
    pub fail_render: bool,
    /// Render a pixmap whose buffer is too short for its dimensions.
    pub truncated_pixmap: bool,
}

impl MockPage {
    /// A born-digital page.
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ocr_text: text.to_string(),
            fail_text: false,
            fail_render: false,
            truncated_pixmap: false,
        }
    }

    /// A scanned page with no text layer.
    pub fn scanned(ocr_text: &str) -> Self {
        Self {
            text: String::new(),
            ocr_text: ocr_text.to_string(),
            fail_text: false,
            fail_render: false,
            truncated_pixmap: false,
        }
    }

    pub fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }

    pub fn truncated_pixmap(mut self) -> Self {
        self.truncated_pixmap = true;
        self
    }

    pub fn failing_text(mut self) -> Self {
        self.fail_text = true;
        self
    }
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    live: AtomicUsize,
    renders: Mutex<Vec<(usize, f32)>>,
}

/// A hand-rolled mock implementing [`PdfBackend`].
///
/// Rendered pages encode their index in the first pixel so the mock OCR
/// engine can look up the page text. Opens and releases are counted.
pub struct MockBackend {
    pages: Arc<Vec<MockPage>>,
    open_error: Option<String>,
    /// Opens beyond this many fail with `open_error`.
    open_limit: Option<usize>,
    counters: Arc<Counters>,
}

impl MockBackend {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages: Arc::new(pages),
            open_error: None,
            open_limit: None,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn unopenable(message: &str) -> Self {
        Self {
            open_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Let the first `n` opens succeed and fail every later one.
    pub fn open_failures_after(mut self, n: usize, message: &str) -> Self {
        self.open_limit = Some(n);
        self.open_error = Some(message.to_string());
        self
    }

    /// Total successful opens.
    pub fn open_count(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Documents opened and not yet released.
    pub fn open_documents(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// `(page index, scale)` of every render call.
    pub fn renders(&self) -> Vec<(usize, f32)> {
        self.counters.renders.lock().unwrap().clone()
    }

    /// A mock OCR engine that reads back the pages of this backend.
    pub fn ocr_engine(&self) -> MockOcr {
        MockOcr {
            pages: Arc::clone(&self.pages),
            langs: Mutex::new(Vec::new()),
            fail_pages: Vec::new(),
        }
    }
}

impl PdfBackend for MockBackend {
    fn open(&self, _bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        let exhausted = self
            .open_limit
            .is_none_or(|limit| self.open_count() >= limit);
        if let Some(message) = self.open_error.as_ref().filter(|_| exhausted) {
            return Err(BackendError::OpenError(message.clone()));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDocument {
            pages: Arc::clone(&self.pages),
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct MockDocument {
    pages: Arc<Vec<MockPage>>,
    counters: Arc<Counters>,
}

impl MockDocument {
    fn page(&self, index: usize) -> Result<&MockPage, BackendError> {
        self.pages.get(index).ok_or_else(|| BackendError::PageError {
            page: index + 1,
            message: "page out of range".to_string(),
        })
    }
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        Ok(self.pages.len())
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page = self.page(index)?;
        if page.fail_text {
            return Err(BackendError::PageError {
                page: index + 1,
                message: "corrupt content stream".to_string(),
            });
        }
        Ok(page.text.clone())
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RawPixmap, BackendError> {
        let page = self.page(index)?;
        self.counters.renders.lock().unwrap().push((index, scale));
        if page.fail_render {
            return Err(BackendError::RenderError {
                page: index + 1,
                message: "simulated render failure".to_string(),
            });
        }
        let mut samples = vec![index as u8, 0, 0, 255, 255, 255];
        if page.truncated_pixmap {
            samples.truncate(4);
        }
        Ok(RawPixmap {
            width: 2,
            height: 1,
            stride: 6,
            samples,
        })
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A mock implementing [`OcrEngine`] for pages rendered by [`MockBackend`].
pub struct MockOcr {
    pages: Arc<Vec<MockPage>>,
    langs: Mutex<Vec<String>>,
    fail_pages: Vec<usize>,
}

impl MockOcr {
    /// Make recognition fail for the given 0-based page indices.
    pub fn failing_on(mut self, pages: &[usize]) -> Self {
        self.fail_pages = pages.to_vec();
        self
    }

    /// Language codes passed to every recognize call.
    pub fn langs(&self) -> Vec<String> {
        self.langs.lock().unwrap().clone()
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&self, image: &RgbImage, lang: &str) -> Result<OcrOutput, OcrError> {
        self.langs.lock().unwrap().push(lang.to_string());
        let index = image.get_pixel(0, 0).0[0] as usize;
        if self.fail_pages.contains(&index) {
            return Err(OcrError::RecognitionFailed(format!(
                "simulated OCR failure on page {}",
                index + 1
            )));
        }
        let text = self
            .pages
            .get(index)
            .map(|p| p.ocr_text.clone())
            .unwrap_or_default();
        Ok(OcrOutput {
            text,
            confidence: None,
        })
    }
}
