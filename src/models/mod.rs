pub mod chapter;
pub mod language;
pub mod quiz;
pub mod subject;
