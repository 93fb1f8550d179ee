use std::ops::Deref;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to read page {page}: {message}")]
    PageError { page: usize, message: String },
    #[error("failed to render page {page}: {message}")]
    RenderError { page: usize, message: String },
}

/// Raw RGB samples of a rendered page.
///
/// Rows are `stride` bytes apart and may carry trailing padding beyond
/// `width * 3`.
#[derive(Debug, Clone)]
pub struct RawPixmap {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub samples: Vec<u8>,
}

/// Trait for PDF rendering backends.
///
/// Implementors open an in-memory PDF and hand back a document that can be
/// queried page by page. Each call to [`open`](PdfBackend::open) yields an
/// independent document; callers never share one across extraction passes.
pub trait PdfBackend: Send + Sync {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// An opened PDF. Dropping it releases the underlying native resources.
pub trait PdfDocument {
    fn page_count(&self) -> Result<usize, BackendError>;

    /// Plain text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;

    /// Render the page at 0-based `index` to opaque RGB, `scale` times the
    /// 72 DPI reference resolution.
    fn render_page(&self, index: usize, scale: f32) -> Result<RawPixmap, BackendError>;
}

/// Owns an opened document for the duration of one extraction pass.
///
/// The document is released when the guard goes out of scope, on the error
/// path as well as on success.
pub struct ScopedDocument {
    inner: Box<dyn PdfDocument>,
    label: &'static str,
}

impl ScopedDocument {
    pub fn open(
        backend: &dyn PdfBackend,
        bytes: &[u8],
        label: &'static str,
    ) -> Result<Self, BackendError> {
        let inner = backend.open(bytes)?;
        tracing::debug!(pass = label, bytes = bytes.len(), "opened document");
        Ok(Self { inner, label })
    }
}

impl Deref for ScopedDocument {
    type Target = dyn PdfDocument;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl Drop for ScopedDocument {
    fn drop(&mut self) {
        tracing::debug!(pass = self.label, "closed document");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockPage};

    #[test]
    fn scoped_document_releases_on_drop() {
        let backend = MockBackend::new(vec![MockPage::text("a")]);
        {
            let doc = ScopedDocument::open(&backend, b"%PDF", "test").unwrap();
            assert_eq!(doc.page_count().unwrap(), 1);
            assert_eq!(backend.open_documents(), 1);
        }
        assert_eq!(backend.open_documents(), 0);
        assert_eq!(backend.open_count(), 1);
    }

    #[test]
    fn failed_open_leaves_nothing_open() {
        let backend = MockBackend::unopenable("not a PDF");
        let err = ScopedDocument::open(&backend, b"junk", "test").err().unwrap();
        assert!(matches!(err, BackendError::OpenError(_)));
        assert_eq!(backend.open_documents(), 0);
    }
}
