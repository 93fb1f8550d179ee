//! Parsing of Tesseract's TSV output.
//!
//! Columns: `level page_num block_num par_num line_num word_num left top
//! width height conf text`. Word rows have level 5; structural rows carry a
//! confidence of -1.

const WORD_LEVEL: &str = "5";
const CONF_COLUMN: usize = 10;
const TEXT_COLUMN: usize = 11;

/// Mean confidence (0-100) over recognized words, or `None` when the page
/// has no words.
pub fn mean_word_confidence(tsv: &str) -> Option<f32> {
    let (sum, count) = tsv
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.first() != Some(&WORD_LEVEL) {
                return None;
            }
            let text = columns.get(TEXT_COLUMN)?;
            if text.trim().is_empty() {
                return None;
            }
            let conf: f32 = columns.get(CONF_COLUMN)?.trim().parse().ok()?;
            (conf >= 0.0).then_some(conf)
        })
        .fold((0.0f32, 0usize), |(sum, count), conf| (sum + conf, count + 1));

    (count > 0).then(|| sum / count as f32)
}
