//! Conversion of rendered page samples into images the OCR engine accepts.

use image::RgbImage;
use thiserror::Error;

use crate::backend::RawPixmap;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("stride {stride} shorter than row of {row_len} bytes")]
    StrideTooShort { stride: usize, row_len: usize },
    #[error("pixmap buffer holds {len} bytes, {width}x{height} RGB needs {needed}")]
    BufferTooSmall {
        len: usize,
        width: u32,
        height: u32,
        needed: usize,
    },
    #[error("pixmap does not fit a {width}x{height} RGB image")]
    SizeMismatch { width: u32, height: u32 },
}

/// Reference resolution of PDF user space.
pub const BASE_DPI: f32 = 72.0;

/// Scale factor that renders a page at `dpi`.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / BASE_DPI
}

/// Build an [`RgbImage`] from a rendered pixmap, consuming its buffer.
///
/// Tightly packed buffers are handed over without copying; padded rows are
/// repacked.
pub fn pixmap_to_image(pixmap: RawPixmap) -> Result<RgbImage, RasterError> {
    let RawPixmap {
        width,
        height,
        stride,
        samples,
    } = pixmap;
    let row_len = width as usize * 3;

    if stride < row_len {
        return Err(RasterError::StrideTooShort { stride, row_len });
    }
    let needed = stride * (height as usize).saturating_sub(1) + row_len;
    if height > 0 && samples.len() < needed {
        return Err(RasterError::BufferTooSmall {
            len: samples.len(),
            width,
            height,
            needed,
        });
    }

    let packed = if stride == row_len {
        let mut samples = samples;
        samples.truncate(row_len * height as usize);
        samples
    } else {
        samples
            .chunks(stride)
            .take(height as usize)
            .flat_map(|row| row[..row_len].iter().copied())
            .collect()
    };

    RgbImage::from_raw(width, height, packed)
        .ok_or(RasterError::SizeMismatch { width, height })
}
