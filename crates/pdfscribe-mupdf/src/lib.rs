use mupdf::{Colorspace, Document, Matrix, TextPageFlags};

use pdfscribe_core::{BackendError, Capability, PdfBackend, PdfDocument, ProbeError, RawPixmap};

pub mod sample;

const PDF_MAGIC: &str = "application/pdf";

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the extraction policy does not transitively
/// depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Version of the linked MuPDF library, e.g. `1.24.2`.
pub fn mupdf_version() -> String {
    version_from_c_bytes(mupdf::sys::FZ_VERSION)
}

/// Decode a NUL-terminated C string constant.
fn version_from_c_bytes(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

impl PdfBackend for MupdfBackend {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        let document = Document::from_bytes(bytes, PDF_MAGIC)
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        Ok(Box::new(MupdfDocument { document }))
    }
}

impl Capability for MupdfBackend {
    fn name(&self) -> &str {
        "MuPDF (PDF rendering)"
    }

    fn probe(&self) -> Result<String, ProbeError> {
        let bytes = sample::sample_pdf(&[""]);
        let document = self
            .open(&bytes)
            .map_err(|e| ProbeError::new(e.to_string()))?;
        let pages = document
            .page_count()
            .map_err(|e| ProbeError::new(e.to_string()))?;
        if pages != 1 {
            return Err(ProbeError::new(format!(
                "probe document reported {pages} pages, expected 1"
            )));
        }
        Ok(format!("MuPDF version: {}", mupdf_version()))
    }
}

/// A document opened by MuPDF. Dropping it drops the `fz_document`.
struct MupdfDocument {
    document: Document,
}

impl MupdfDocument {
    fn load_page(&self, index: usize) -> Result<mupdf::Page, BackendError> {
        let page_no = i32::try_from(index).map_err(|_| BackendError::PageError {
            page: index + 1,
            message: "page index out of range".to_string(),
        })?;
        self.document
            .load_page(page_no)
            .map_err(|e| BackendError::PageError {
                page: index + 1,
                message: e.to_string(),
            })
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> Result<usize, BackendError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page_err = |e: mupdf::Error| BackendError::PageError {
            page: index + 1,
            message: e.to_string(),
        };
        let page = self.load_page(index)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(page_err)?;

        // One output line per text line, blocks in reading order
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        Ok(page_text)
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RawPixmap, BackendError> {
        let render_err = |e: mupdf::Error| BackendError::RenderError {
            page: index + 1,
            message: e.to_string(),
        };
        let page = self.load_page(index)?;
        let matrix = Matrix::new_scale(scale, scale);
        let pixmap = page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), false, true)
            .map_err(render_err)?;

        let components = pixmap.n() as usize;
        if components != 3 {
            return Err(BackendError::RenderError {
                page: index + 1,
                message: format!("expected 3 color components, got {components}"),
            });
        }

        Ok(RawPixmap {
            width: pixmap.width(),
            height: pixmap.height(),
            stride: pixmap.stride() as usize,
            samples: pixmap.samples().to_vec(),
        })
    }
}
