use crate::models::quiz::StrategyKind;

pub const MIN_CONTENT_CHARS: usize = 100;
pub const MAX_CONTENT_CHARS: usize = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Rely on the model's curriculum knowledge of the named chapter.
    TopicBased,
    /// Ground questions in a bounded prefix of the chapter text.
    ContentBased { excerpt: String },
}

impl GenerationStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            GenerationStrategy::TopicBased => StrategyKind::TopicBased,
            GenerationStrategy::ContentBased { .. } => StrategyKind::ContentBased,
        }
    }
}

pub fn select_strategy(extracted_text: Option<&str>, corrupted: bool) -> GenerationStrategy {
    let text = extracted_text.map(str::trim).unwrap_or("");
    if corrupted || text.chars().count() < MIN_CONTENT_CHARS {
        return GenerationStrategy::TopicBased;
    }
    GenerationStrategy::ContentBased {
        excerpt: text.chars().take(MAX_CONTENT_CHARS).collect(),
    }
}
