use crate::backend::{BackendError, PdfBackend, ScopedDocument};
use crate::join_pages;

/// Text already embedded in the PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeExtraction {
    /// Non-blank page texts, trimmed and joined with [`crate::PAGE_BREAK`].
    pub text: String,
    /// All pages, blank ones included.
    pub page_count: usize,
}

/// Extract the embedded text layer of every page.
///
/// Any failure to open the document or read a page is returned as-is; the
/// document is released before the error reaches the caller.
pub fn extract_native(
    backend: &dyn PdfBackend,
    bytes: &[u8],
) -> Result<NativeExtraction, BackendError> {
    let document = ScopedDocument::open(backend, bytes, "native")?;
    let page_count = document.page_count()?;
    tracing::info!("Opened PDF with {page_count} pages");

    let mut pages_text = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let text = document.page_text(index)?;
        tracing::info!(
            page = index + 1,
            chars = text.chars().count(),
            "native text extracted"
        );
        pages_text.push(text);
    }

    Ok(NativeExtraction {
        text: join_pages(pages_text),
        page_count,
    })
}
