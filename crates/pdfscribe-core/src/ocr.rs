use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),
    #[error("OCR failed: {0}")]
    RecognitionFailed(String),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text recognized on one image.
#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    pub text: String,
    /// Mean word confidence on a 0-100 scale, when the engine computed one.
    pub confidence: Option<f32>,
}

/// Trait for OCR engines.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in `image` using the engine's `lang` model.
    fn recognize(&self, image: &RgbImage, lang: &str) -> Result<OcrOutput, OcrError>;
}
