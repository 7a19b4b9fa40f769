use crate::models::language::Medium;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub name_native: Option<String>,
    pub medium: String,
}

impl Subject {
    pub fn medium(&self) -> Medium {
        Medium::from_label(&self.medium)
    }

    /// Both script variants of the name, for marker matching.
    pub fn names(&self) -> String {
        match &self.name_native {
            Some(native) => format!("{} {}", self.name, native),
            None => self.name.clone(),
        }
    }
}
