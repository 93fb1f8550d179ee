//! Acquisition of raw PDF bytes from a file or a byte stream.

use std::io::Read;
use std::path::PathBuf;

use thiserror::Error;

/// Where the PDF bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Path(PathBuf),
    Stdin,
}

impl InputSource {
    /// Pick the source from a positional path and a stdin flag.
    ///
    /// The stdin flag wins when both are given.
    pub fn select(path: Option<PathBuf>, stdin: bool) -> Result<Self, InputError> {
        match (path, stdin) {
            (_, true) => Ok(Self::Stdin),
            (Some(path), false) => Ok(Self::Path(path)),
            (None, false) => Err(InputError::NoInput),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => format!("file {}", path.display()),
            Self::Stdin => "stdin".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("No input provided. Use --stdin or provide path.")]
    NoInput,
    #[error("Failed to read PDF: {0}")]
    Read(#[from] std::io::Error),
    #[error("Empty PDF input")]
    Empty,
}

/// Read the whole PDF from `source`.
pub fn read_input(source: &InputSource) -> Result<Vec<u8>, InputError> {
    tracing::info!("Reading PDF from {}", source.describe());
    let bytes = match source {
        InputSource::Path(path) => std::fs::read(path)?,
        InputSource::Stdin => read_to_end(std::io::stdin().lock())?,
    };
    tracing::info!(bytes = bytes.len(), "read PDF input");
    if bytes.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(bytes)
}

/// Drain `reader` completely.
pub fn read_to_end(mut reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}
