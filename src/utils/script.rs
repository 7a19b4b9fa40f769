//! Unicode script classification shared by the content classifier and the
//! output validator.

use crate::models::language::Language;

pub fn is_kannada(c: char) -> bool {
    ('\u{0C80}'..='\u{0CFF}').contains(&c)
}

pub fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Latin-1 Supplement through Latin Extended-B. Legacy Kannada fonts (Nudi,
/// Baraha) mapped to these code points come out of PDF extraction as runs
/// like "¸ÀÄ¨sÁ".
pub fn is_mojibake(c: char) -> bool {
    ('\u{0080}'..='\u{024F}').contains(&c)
}

/// Whether `c` belongs to the native script of `language`. Latin counts for
/// English.
pub fn is_target_script(c: char, language: Language) -> bool {
    match language {
        Language::Kannada => is_kannada(c),
        Language::Hindi => is_devanagari(c),
        Language::English => c.is_ascii_alphabetic(),
    }
}

/// Character counts over the non-whitespace characters of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScriptStats {
    pub total: usize,
    pub target: usize,
    pub mojibake: usize,
    pub ascii_letters: usize,
    pub non_ascii: usize,
}

impl ScriptStats {
    pub fn measure<I>(chars: I, language: Language) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut stats = ScriptStats::default();
        for c in chars.into_iter().filter(|c| !c.is_whitespace()) {
            stats.total += 1;
            if is_target_script(c, language) {
                stats.target += 1;
            }
            if is_mojibake(c) {
                stats.mojibake += 1;
            }
            if c.is_ascii_alphabetic() {
                stats.ascii_letters += 1;
            }
            if !c.is_ascii() {
                stats.non_ascii += 1;
            }
        }
        stats
    }

    pub fn of(text: &str, language: Language) -> Self {
        Self::measure(text.chars(), language)
    }

    pub fn target_ratio(&self) -> f64 {
        ratio(self.target, self.total)
    }

    pub fn mojibake_ratio(&self) -> f64 {
        ratio(self.mojibake, self.total)
    }

    pub fn ascii_letter_ratio(&self) -> f64 {
        ratio(self.ascii_letters, self.total)
    }

    pub fn non_ascii_ratio(&self) -> f64 {
        ratio(self.non_ascii, self.total)
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_ignore_whitespace() {
        let stats = ScriptStats::of("ಕನ್ನಡ  abc", Language::Kannada);
        assert_eq!(stats.total, 8);
        assert_eq!(stats.target, 5);
        assert_eq!(stats.ascii_letters, 3);
        assert_eq!(stats.non_ascii, 5);
    }

    #[test]
    fn devanagari_is_target_for_hindi_only() {
        assert!(is_target_script('क', Language::Hindi));
        assert!(!is_target_script('क', Language::Kannada));
        assert!(is_target_script('ಕ', Language::Kannada));
    }

    #[test]
    fn legacy_font_output_is_mojibake() {
        let stats = ScriptStats::of("¸ÀÄ¨sÁ", Language::Kannada);
        assert_eq!(stats.mojibake, 5);
        assert!(stats.mojibake_ratio() > 0.8);
    }

    #[test]
    fn empty_text_has_zero_ratios() {
        let stats = ScriptStats::of("   ", Language::Hindi);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.target_ratio(), 0.0);
    }
}
