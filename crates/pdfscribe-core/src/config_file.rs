use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionSection>,
    pub ocr: Option<OcrSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSection {
    pub min_chars: Option<usize>,
    pub ocr_dpi: Option<u32>,
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSection {
    pub tesseract_cmd: Option<String>,
    pub confidence: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Platform config directory path: `<config_dir>/pdfscribe/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfscribe").join("config.toml"))
}

/// Load config by cascading CWD `.pdfscribe.toml` over platform config.
/// CWD values override platform values. Missing or unparseable files are
/// ignored.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfscribe.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match load_required(path) {
        Ok(config) => Some(config),
        Err(ConfigFileError::Read { .. }) => None,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring config file");
            None
        }
    }
}

/// Load a config the user named explicitly; any failure is an error.
pub fn load_required(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_ex = base.extraction.unwrap_or_default();
    let over_ex = overlay.extraction.unwrap_or_default();
    let base_ocr = base.ocr.unwrap_or_default();
    let over_ocr = overlay.ocr.unwrap_or_default();

    ConfigFile {
        extraction: Some(ExtractionSection {
            min_chars: over_ex.min_chars.or(base_ex.min_chars),
            ocr_dpi: over_ex.ocr_dpi.or(base_ex.ocr_dpi),
            lang: over_ex.lang.or(base_ex.lang),
        }),
        ocr: Some(OcrSection {
            tesseract_cmd: over_ocr.tesseract_cmd.or(base_ocr.tesseract_cmd),
            confidence: over_ocr.confidence.or(base_ocr.confidence),
        }),
    }
}
