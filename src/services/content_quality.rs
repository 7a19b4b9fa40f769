//! Best-effort detection of garbled PDF extraction. Legacy font mappings
//! leave Kannada or Hindi chapters as Latin-extended noise; this heuristic
//! catches the common cases and tolerates rare misclassification.

use crate::models::language::Language;
use crate::utils::script::ScriptStats;

pub const SAMPLE_CHARS: usize = 2000;
pub const MOJIBAKE_RATIO_LIMIT: f64 = 0.10;
pub const MIN_SCRIPT_RATIO: f64 = 0.05;
pub const ASCII_LETTER_FLOOR: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    pub corrupted: bool,
    pub script_ratio: f64,
    pub mojibake_ratio: f64,
    pub ascii_letters: usize,
}

pub fn assess(text: &str, language: Language) -> QualityReport {
    match language {
        Language::English => QualityReport {
            corrupted: false,
            script_ratio: 1.0,
            mojibake_ratio: 0.0,
            ascii_letters: 0,
        },
        Language::Kannada | Language::Hindi => {
            let stats = ScriptStats::measure(text.chars().take(SAMPLE_CHARS), language);
            let mojibake_ratio = stats.mojibake_ratio();
            let script_ratio = stats.target_ratio();
            let corrupted = mojibake_ratio > MOJIBAKE_RATIO_LIMIT
                || (script_ratio < MIN_SCRIPT_RATIO && stats.ascii_letters > ASCII_LETTER_FLOOR);
            QualityReport {
                corrupted,
                script_ratio,
                mojibake_ratio,
                ascii_letters: stats.ascii_letters,
            }
        }
    }
}
