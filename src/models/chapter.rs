use crate::models::language::Language;
use crate::utils::script::is_devanagari;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    pub id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub name_native: Option<String>,
    pub extracted_text: Option<String>,
}

impl Chapter {
    /// Name variant matching the script of `language`. Hindi uses the
    /// native name only when it is written in Devanagari.
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Kannada => self.name_native.as_deref().unwrap_or(&self.name),
            Language::Hindi => self
                .name_native
                .as_deref()
                .filter(|n| n.chars().any(is_devanagari))
                .unwrap_or(&self.name),
            Language::English => &self.name,
        }
    }
}
