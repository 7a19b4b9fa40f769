use crate::models::language::Language;
use crate::models::quiz::{OPTION_COUNT, TARGET_QUESTIONS};
use crate::services::strategy::GenerationStrategy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionArchetype {
    Conceptual,
    Factual,
    Application,
    Analytical,
    Comparative,
    CauseAndEffect,
}

const ALL_ARCHETYPES: [QuestionArchetype; 6] = [
    QuestionArchetype::Conceptual,
    QuestionArchetype::Factual,
    QuestionArchetype::Application,
    QuestionArchetype::Analytical,
    QuestionArchetype::Comparative,
    QuestionArchetype::CauseAndEffect,
];

impl QuestionArchetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionArchetype::Conceptual => "conceptual",
            QuestionArchetype::Factual => "factual",
            QuestionArchetype::Application => "application",
            QuestionArchetype::Analytical => "analytical",
            QuestionArchetype::Comparative => "comparative",
            QuestionArchetype::CauseAndEffect => "cause_and_effect",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            QuestionArchetype::Conceptual => "tests understanding of a core idea, not recall of wording",
            QuestionArchetype::Factual => "asks for a specific fact, name, date or definition",
            QuestionArchetype::Application => "applies a rule or idea to a new everyday situation",
            QuestionArchetype::Analytical => "requires reasoning through two or more steps",
            QuestionArchetype::Comparative => "contrasts two related ideas, objects or events",
            QuestionArchetype::CauseAndEffect => "asks why something happens or what follows from it",
        }
    }
}

pub struct PromptContext<'a> {
    pub language: Language,
    pub technical: bool,
    pub subject_name: &'a str,
    pub chapter_name: &'a str,
    pub strategy: &'a GenerationStrategy,
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub seed: u32,
    pub question_types: Vec<QuestionArchetype>,
    /// Pre-shuffled correct-answer positions suggested to the model.
    pub answer_slots: Vec<u8>,
}

/// Builds a fresh prompt. Each call draws a new seed, archetype subset and
/// answer-slot order from `rng`.
pub fn build_prompt<R: Rng + ?Sized>(ctx: &PromptContext<'_>, rng: &mut R) -> Prompt {
    let seed: u32 = rng.gen();
    let type_count = rng.gen_range(3..=4);
    let question_types: Vec<QuestionArchetype> = ALL_ARCHETYPES
        .choose_multiple(rng, type_count)
        .copied()
        .collect();
    let mut answer_slots: Vec<u8> = (0..TARGET_QUESTIONS)
        .map(|i| (i % OPTION_COUNT) as u8)
        .collect();
    answer_slots.shuffle(rng);

    let system = system_prompt(ctx.language, ctx.technical, ctx.strategy);
    let user = user_prompt(ctx, seed, &question_types, &answer_slots);

    Prompt {
        system,
        user,
        seed,
        question_types,
        answer_slots,
    }
}

fn system_prompt(language: Language, technical: bool, strategy: &GenerationStrategy) -> String {
    let role = match strategy {
        GenerationStrategy::TopicBased => {
            "You are an experienced school teacher writing a chapter-end quiz from your own knowledge of the state school curriculum."
        }
        GenerationStrategy::ContentBased { .. } => {
            "You are an experienced school teacher writing a chapter-end quiz strictly from the chapter text you are given."
        }
    };

    format!(
        "{role}\n\nLANGUAGE RULES:\n{language_rules}\n\nOUTPUT CONTRACT:\n{contract}",
        role = role,
        language_rules = language_rules(language, technical),
        contract = output_contract(),
    )
}

fn language_rules(language: Language, technical: bool) -> String {
    let base = match language {
        Language::Kannada => {
            "1. Write every question and every option entirely in Kannada script (ಕನ್ನಡ ಲಿಪಿ).\n\
             2. Do NOT write English words or transliterate Kannada into Latin letters."
        }
        Language::Hindi => {
            "1. Write every question and every option entirely in Devanagari script (देवनागरी).\n\
             2. Do NOT use a single Latin/English letter anywhere, not even for names, units, variables or formulas. \
             Write them in Devanagari (for example क, ख, मीटर). Digits 0-9 are allowed."
        }
        Language::English => {
            "1. Write every question and every option in clear, simple English suitable for school students.\n\
             2. Do not use words from other scripts."
        }
    };

    let exception = match (language, technical) {
        (Language::Kannada, true) => {
            "\n3. Exception for mathematics and science: variable names (x, y), units and chemical formulas \
             (H2O, CO2) may stay in Latin letters when unavoidable. Every surrounding word must still be Kannada."
        }
        (Language::Hindi, true) => {
            "\n3. Mathematics and science are NOT an exception: write variables and formulas in Devanagari too."
        }
        (Language::English, true) => {
            "\n3. Use standard notation for formulas and units."
        }
        (_, false) => "",
    };

    format!("{}{}", base, exception)
}

fn output_contract() -> String {
    format!(
        "1. Generate EXACTLY {count} multiple-choice questions.\n\
         2. Each question has EXACTLY {options} distinct, non-empty options and exactly one correct option.\n\
         3. `correctAnswer` is the zero-based index (0-{max}) of the correct option.\n\
         4. CRITICAL: spread `correctAnswer` across 0, 1, 2 and 3. Do NOT default to 0. \
            Follow the suggested answer positions given in the request.\n\
         5. Avoid \"All of the above\" and \"None of the above\".\n\
         6. Return ONLY one JSON object of the form \
            {{\"questions\":[{{\"question\":\"...\",\"options\":[\"...\",\"...\",\"...\",\"...\"],\"correctAnswer\":2}}]}}. \
            No markdown fences, no commentary, no extra keys.",
        count = TARGET_QUESTIONS,
        options = OPTION_COUNT,
        max = OPTION_COUNT - 1,
    )
}

fn user_prompt(
    ctx: &PromptContext<'_>,
    seed: u32,
    question_types: &[QuestionArchetype],
    answer_slots: &[u8],
) -> String {
    let types: Vec<_> = question_types
        .iter()
        .map(|t| json!({ "type": t.as_str(), "meaning": t.description() }))
        .collect();

    let mut request = json!({
        "subject": ctx.subject_name,
        "chapter": ctx.chapter_name,
        "language": ctx.language.display_name(),
        "script": ctx.language.script_name(),
        "required_count": TARGET_QUESTIONS,
        "variation_seed": seed,
        "question_types_to_emphasise": types,
        "suggested_answer_positions": answer_slots,
    });

    match ctx.strategy {
        GenerationStrategy::TopicBased => {
            request["mode"] = json!("topic");
            request["instruction"] = json!(format!(
                "No chapter text is available. Use your knowledge of the chapter \"{}\" in the subject \"{}\" \
                 as taught in school. Cover the chapter's main ideas.",
                ctx.chapter_name, ctx.subject_name
            ));
        }
        GenerationStrategy::ContentBased { excerpt } => {
            request["mode"] = json!("content");
            request["instruction"] = json!(
                "Base every question on facts stated in `chapter_text`. Do not invent facts that are not in it."
            );
            request["chapter_text"] = json!(excerpt);
        }
    }

    request.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value as JsonValue;

    fn context<'a>(language: Language, technical: bool, strategy: &'a GenerationStrategy) -> PromptContext<'a> {
        PromptContext {
            language,
            technical,
            subject_name: "Science",
            chapter_name: "Light",
            strategy,
        }
    }

    #[test]
    fn answer_slots_cover_all_indices() {
        let strategy = GenerationStrategy::TopicBased;
        let prompt = build_prompt(&context(Language::English, false, &strategy), &mut StdRng::seed_from_u64(7));
        assert_eq!(prompt.answer_slots.len(), TARGET_QUESTIONS);
        for idx in 0..OPTION_COUNT as u8 {
            assert!(prompt.answer_slots.iter().filter(|&&s| s == idx).count() >= 3);
        }
    }

    #[test]
    fn archetype_subset_is_three_or_four_distinct() {
        let strategy = GenerationStrategy::TopicBased;
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let prompt = build_prompt(&context(Language::Kannada, false, &strategy), &mut rng);
            let n = prompt.question_types.len();
            assert!((3..=4).contains(&n));
            let mut dedup = prompt.question_types.clone();
            dedup.dedup();
            assert_eq!(dedup.len(), n);
        }
    }

    #[test]
    fn same_rng_state_gives_same_prompt() {
        let strategy = GenerationStrategy::TopicBased;
        let ctx = context(Language::Hindi, false, &strategy);
        let a = build_prompt(&ctx, &mut StdRng::seed_from_u64(3));
        let b = build_prompt(&ctx, &mut StdRng::seed_from_u64(3));
        assert_eq!(a.user, b.user);
        assert_eq!(a.seed, b.seed);
    }

    #[test]
    fn successive_prompts_differ() {
        let strategy = GenerationStrategy::TopicBased;
        let ctx = context(Language::English, false, &strategy);
        let mut rng = StdRng::seed_from_u64(5);
        let a = build_prompt(&ctx, &mut rng);
        let b = build_prompt(&ctx, &mut rng);
        assert_ne!(a.user, b.user);
    }

    #[test]
    fn hindi_prompt_forbids_latin_even_for_science() {
        let strategy = GenerationStrategy::TopicBased;
        let prompt = build_prompt(&context(Language::Hindi, true, &strategy), &mut StdRng::seed_from_u64(1));
        assert!(prompt.system.contains("Devanagari"));
        assert!(prompt.system.contains("NOT an exception"));
    }

    #[test]
    fn kannada_science_prompt_allows_formulas() {
        let strategy = GenerationStrategy::TopicBased;
        let prompt = build_prompt(&context(Language::Kannada, true, &strategy), &mut StdRng::seed_from_u64(1));
        assert!(prompt.system.contains("Kannada script"));
        assert!(prompt.system.contains("H2O"));

        let plain = build_prompt(&context(Language::Kannada, false, &strategy), &mut StdRng::seed_from_u64(1));
        assert!(!plain.system.contains("H2O"));
    }

    #[test]
    fn contract_demands_fifteen_questions_as_json() {
        let strategy = GenerationStrategy::TopicBased;
        let prompt = build_prompt(&context(Language::English, false, &strategy), &mut StdRng::seed_from_u64(1));
        assert!(prompt.system.contains("EXACTLY 15"));
        assert!(prompt.system.contains("\"questions\""));
        assert!(prompt.system.contains("No markdown fences"));
    }

    #[test]
    fn topic_prompt_has_no_excerpt() {
        let strategy = GenerationStrategy::TopicBased;
        let prompt = build_prompt(&context(Language::English, false, &strategy), &mut StdRng::seed_from_u64(1));
        let user: JsonValue = serde_json::from_str(&prompt.user).unwrap();
        assert_eq!(user["mode"], "topic");
        assert!(user.get("chapter_text").is_none());
        assert_eq!(user["chapter"], "Light");
    }

    #[test]
    fn content_prompt_embeds_excerpt() {
        let strategy = GenerationStrategy::ContentBased {
            excerpt: "Light travels in straight lines.".to_string(),
        };
        let prompt = build_prompt(&context(Language::English, false, &strategy), &mut StdRng::seed_from_u64(1));
        let user: JsonValue = serde_json::from_str(&prompt.user).unwrap();
        assert_eq!(user["mode"], "content");
        assert_eq!(user["chapter_text"], "Light travels in straight lines.");
        assert_eq!(user["suggested_answer_positions"].as_array().unwrap().len(), 15);
        assert!(prompt.system.contains("strictly from the chapter text"));
    }
}
