/// Default minimum trimmed native characters before OCR is attempted.
pub const DEFAULT_MIN_CHARS: usize = 50;
/// Default OCR render resolution.
pub const DEFAULT_OCR_DPI: u32 = 150;
/// Default OCR language code.
pub const DEFAULT_LANG: &str = "eng";

/// Knobs for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Native text shorter than this (after trimming) triggers OCR fallback.
    pub min_chars: usize,
    /// Resolution pages are rendered at before OCR.
    pub ocr_dpi: u32,
    /// Language code passed verbatim to the OCR engine.
    pub lang: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            ocr_dpi: DEFAULT_OCR_DPI,
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn with_ocr_dpi(mut self, dpi: u32) -> Self {
        self.ocr_dpi = dpi;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Reject values no extraction run can use.
    pub fn validate(&self) -> Result<(), String> {
        if self.ocr_dpi == 0 {
            return Err("OCR DPI must be greater than zero".to_string());
        }
        if self.lang.trim().is_empty() {
            return Err("OCR language code must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_chars, 50);
        assert_eq!(config.ocr_dpi, 150);
        assert_eq!(config.lang, "eng");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dpi_is_invalid() {
        let config = ExtractionConfig::new().with_ocr_dpi(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = ExtractionConfig::new()
            .with_min_chars(10)
            .with_ocr_dpi(300)
            .with_lang("deu");
        assert_eq!(config, ExtractionConfig { min_chars: 10, ocr_dpi: 300, lang: "deu".into() });
    }
}
