use crate::models::language::{Language, Medium};

const KANNADA_MARKERS: &[&str] = &["kannada", "ಕನ್ನಡ"];
const HINDI_MARKERS: &[&str] = &["hindi", "ಹಿಂದಿ", "हिंदी", "हिन्दी"];
const ENGLISH_MARKERS: &[&str] = &["english", "ಇಂಗ್ಲಿಷ್", "ಆಂಗ್ಲ", "अंग्रेजी", "अंग्रेज़ी"];

const TECHNICAL_MARKERS: &[&str] = &[
    "math",
    "science",
    "physics",
    "chemistry",
    "biology",
    "ಗಣಿತ",
    "ವಿಜ್ಞಾನ",
    "गणित",
    "विज्ञान",
];

/// "Social science" contains a science marker but gets the strict limits.
const SOCIAL_MARKERS: &[&str] = &["social", "civics", "ಸಮಾಜ", "सामाजिक"];

/// Resolves the quiz language. A language named in the subject wins over
/// the medium, so a Kannada subject taught in English medium still yields
/// Kannada questions.
pub fn resolve_language(subject_name: &str, medium: Medium) -> Language {
    let name = subject_name.to_lowercase();
    if contains_any(&name, KANNADA_MARKERS) {
        Language::Kannada
    } else if contains_any(&name, HINDI_MARKERS) {
        Language::Hindi
    } else if contains_any(&name, ENGLISH_MARKERS) {
        Language::English
    } else {
        match medium {
            Medium::English => Language::English,
            Medium::Kannada => Language::Kannada,
        }
    }
}

/// Math and science subjects may embed Latin variable names and formulas.
pub fn is_technical_subject(subject_name: &str) -> bool {
    let name = subject_name.to_lowercase();
    !contains_any(&name, SOCIAL_MARKERS) && contains_any(&name, TECHNICAL_MARKERS)
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| haystack.contains(m))
}
