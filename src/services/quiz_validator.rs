use crate::error::GenerationDefect;
use crate::models::language::Language;
use crate::models::quiz::{QuizQuestion, MIN_QUESTIONS, OPTION_COUNT, TARGET_QUESTIONS};
use crate::utils::script::ScriptStats;
use serde_json::Value as JsonValue;

pub const KANNADA_LATIN_LIMIT: f64 = 0.05;
pub const KANNADA_TECHNICAL_LATIN_LIMIT: f64 = 0.30;
pub const ENGLISH_NON_ASCII_LIMIT: f64 = 0.30;

/// Structural and language checks for one parsed response. Malformed
/// questions are dropped; the rest are kept in order, capped at the target
/// length.
pub fn validate(
    document: &JsonValue,
    language: Language,
    technical: bool,
) -> Result<Vec<QuizQuestion>, GenerationDefect> {
    let items = document
        .get("questions")
        .and_then(|q| q.as_array())
        .filter(|arr| !arr.is_empty())
        .ok_or(GenerationDefect::MissingQuestions)?;

    let mut questions: Vec<QuizQuestion> = items.iter().filter_map(coerce_question).collect();
    let dropped = items.len() - questions.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = questions.len(), "dropped malformed questions");
    }

    if questions.len() < MIN_QUESTIONS {
        return Err(GenerationDefect::TooFewQuestions {
            kept: questions.len(),
            min: MIN_QUESTIONS,
        });
    }
    questions.truncate(TARGET_QUESTIONS);

    check_language(&questions, language, technical)?;
    Ok(questions)
}

fn coerce_question(v: &JsonValue) -> Option<QuizQuestion> {
    let question = v.get("question")?.as_str()?.trim();
    if question.is_empty() {
        return None;
    }

    let raw_options = v.get("options")?.as_array()?;
    if raw_options.len() != OPTION_COUNT {
        return None;
    }
    let options: Vec<String> = raw_options
        .iter()
        .map(|o| o.as_str().map(str::trim).filter(|s| !s.is_empty()).map(String::from))
        .collect::<Option<Vec<String>>>()?;
    let options: [String; OPTION_COUNT] = options.try_into().ok()?;

    let correct = v.get("correctAnswer")?.as_u64()?;
    if correct >= OPTION_COUNT as u64 {
        return None;
    }

    Some(QuizQuestion {
        question: question.to_string(),
        options,
        correct_answer: correct as u8,
    })
}

fn check_language(
    questions: &[QuizQuestion],
    language: Language,
    technical: bool,
) -> Result<(), GenerationDefect> {
    let text = questions
        .iter()
        .flat_map(|q| std::iter::once(&q.question).chain(q.options.iter()))
        .flat_map(|s| s.chars());
    let stats = ScriptStats::measure(text, language);

    match language {
        Language::Kannada => {
            if stats.target == 0 {
                return Err(GenerationDefect::MissingScript(language));
            }
            let limit = if technical {
                KANNADA_TECHNICAL_LATIN_LIMIT
            } else {
                KANNADA_LATIN_LIMIT
            };
            let ratio = stats.ascii_letter_ratio();
            if ratio >= limit {
                return Err(GenerationDefect::LatinRatio { ratio, limit });
            }
        }
        Language::Hindi => {
            if stats.target == 0 {
                return Err(GenerationDefect::MissingScript(language));
            }
            if stats.ascii_letters > 0 {
                return Err(GenerationDefect::LatinLetters {
                    count: stats.ascii_letters,
                });
            }
        }
        Language::English => {
            let ratio = stats.non_ascii_ratio();
            if ratio >= ENGLISH_NON_ASCII_LIMIT {
                return Err(GenerationDefect::NonAsciiRatio {
                    ratio,
                    limit: ENGLISH_NON_ASCII_LIMIT,
                });
            }
        }
    }
    Ok(())
}
