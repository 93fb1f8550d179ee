//! Dependency probing.
//!
//! Each capability the pipeline relies on (PDF rendering, raster images, OCR)
//! is probed independently. Failures are collected, never short-circuited, so
//! a single run reports everything that is missing.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ProbeError(pub String);

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Something the pipeline needs at runtime.
pub trait Capability {
    /// Human-readable name used in missing-dependency reports.
    fn name(&self) -> &str;

    /// Check the capability. On success returns a short description, with a
    /// version where one is known.
    fn probe(&self) -> Result<String, ProbeError>;
}

/// The in-process raster image support used to hand rendered pages to OCR.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageSupport;

impl Capability for ImageSupport {
    fn name(&self) -> &str {
        "image (PNG codec)"
    }

    fn probe(&self) -> Result<String, ProbeError> {
        let pixel = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
        let mut encoded = Cursor::new(Vec::new());
        pixel
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|e| ProbeError::new(format!("PNG encoding unavailable: {e}")))?;
        Ok("image crate PNG encoder available".to_string())
    }
}

/// Probe every capability and return one description per missing one.
///
/// An empty list means everything is present.
pub fn check_dependencies(capabilities: &[&dyn Capability]) -> Vec<String> {
    let mut missing = Vec::new();
    for capability in capabilities {
        match capability.probe() {
            Ok(detail) => tracing::info!(capability = capability.name(), "{detail}"),
            Err(e) => {
                tracing::warn!(capability = capability.name(), error = %e, "dependency missing");
                missing.push(format!("{}: {}", capability.name(), e));
            }
        }
    }
    missing
}
