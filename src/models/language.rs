use serde::{Deserialize, Serialize};

/// Language the quiz text must be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Kannada,
    Hindi,
    English,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Kannada => "kannada",
            Language::Hindi => "hindi",
            Language::English => "english",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Kannada => "Kannada",
            Language::Hindi => "Hindi",
            Language::English => "English",
        }
    }

    pub fn script_name(&self) -> &'static str {
        match self {
            Language::Kannada => "Kannada script (ಕನ್ನಡ ಲಿಪಿ)",
            Language::Hindi => "Devanagari script (देवनागरी लिपि)",
            Language::English => "Latin script",
        }
    }
}

/// Language of classroom instruction for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    English,
    Kannada,
}

impl Medium {
    /// Parses a stored medium label such as "English medium". Anything that is
    /// not recognisably English is treated as Kannada medium.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("english") {
            Medium::English
        } else {
            Medium::Kannada
        }
    }
}
