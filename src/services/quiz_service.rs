use crate::error::{Error, GenerationDefect, Result};
use crate::models::chapter::Chapter;
use crate::models::language::Language;
use crate::models::quiz::{
    answer_distribution, is_degenerate, GenerationMeta, QuizDraft, QuizQuestion, QuizRecord,
};
use crate::services::access_service::AccessPolicy;
use crate::services::ai_service::{CompletionRequest, ModelClient};
use crate::services::catalog_service::ChapterCatalog;
use crate::services::content_quality;
use crate::services::language_resolver::{is_technical_subject, resolve_language};
use crate::services::prompt_builder::{build_prompt, Prompt, PromptContext};
use crate::services::quiz_store::QuizStore;
use crate::services::quiz_validator::validate;
use crate::services::response_parser::parse_response;
use crate::services::strategy::select_strategy;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Retries after the first attempt. Only parse and validation defects are
/// retried; a failed model call ends the request.
pub const MAX_RETRIES: usize = 2;

#[derive(Debug, Clone)]
pub struct GenerateQuiz {
    pub chapter_id: Uuid,
    pub requested_by: Uuid,
    pub regenerate: bool,
}

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Upper bound for each model call.
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

impl GenerationOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: CancellationToken::new(),
        }
    }
}

struct Accepted {
    questions: Vec<QuizQuestion>,
    prompt: Prompt,
    attempts: usize,
    recovered: bool,
}

#[derive(Clone)]
pub struct QuizService {
    catalog: Arc<dyn ChapterCatalog>,
    access: Arc<dyn AccessPolicy>,
    store: Arc<dyn QuizStore>,
    model: Arc<dyn ModelClient>,
    model_name: String,
    default_timeout: Duration,
}

impl QuizService {
    pub fn new(
        catalog: Arc<dyn ChapterCatalog>,
        access: Arc<dyn AccessPolicy>,
        store: Arc<dyn QuizStore>,
        model: Arc<dyn ModelClient>,
        model_name: String,
        default_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            access,
            store,
            model,
            model_name,
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Stored quiz for a chapter, if any. Never generates.
    pub async fn get_quiz(&self, chapter_id: Uuid) -> Result<Option<QuizRecord>> {
        let quiz = self.store.find_by_chapter(chapter_id).await?;
        Ok(quiz.map(|q| QuizRecord::from_quiz(q, true)))
    }

    #[tracing::instrument(
        skip(self, options),
        fields(chapter_id = %request.chapter_id, regenerate = request.regenerate)
    )]
    pub async fn generate_quiz(
        &self,
        request: GenerateQuiz,
        options: GenerationOptions,
    ) -> Result<QuizRecord> {
        if options.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if !self
            .access
            .may_generate(request.requested_by, request.chapter_id)
            .await?
        {
            return Err(Error::AccessDenied(request.chapter_id));
        }

        let chapter = self
            .catalog
            .chapter(request.chapter_id)
            .await?
            .ok_or(Error::ChapterNotFound(request.chapter_id))?;

        if !request.regenerate {
            if let Some(existing) = self.store.find_by_chapter(chapter.id).await? {
                tracing::info!(quiz_id = %existing.id, "returning cached quiz");
                return Ok(QuizRecord::from_quiz(existing, true));
            }
        }

        let subject = self
            .catalog
            .subject(chapter.subject_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Subject {} for chapter {}",
                    chapter.subject_id, chapter.id
                ))
            })?;

        let removed = self.store.delete_for_chapter(chapter.id).await?;
        if removed > 0 {
            tracing::info!(removed, "discarded previous quiz before regeneration");
        }

        let subject_names = subject.names();
        let language = resolve_language(&subject_names, subject.medium());
        let technical = is_technical_subject(&subject_names);
        let quality = content_quality::assess(
            chapter.extracted_text.as_deref().unwrap_or(""),
            language,
        );
        if quality.corrupted {
            tracing::warn!(
                mojibake_ratio = quality.mojibake_ratio,
                script_ratio = quality.script_ratio,
                "chapter text looks corrupted, falling back to topic-based generation"
            );
        }
        let strategy = select_strategy(chapter.extracted_text.as_deref(), quality.corrupted);
        tracing::info!(
            language = language.as_str(),
            technical,
            strategy = ?strategy.kind(),
            "generating quiz"
        );

        let prompt_ctx = PromptContext {
            language,
            technical,
            subject_name: &subject.name,
            chapter_name: chapter.display_name(language),
            strategy: &strategy,
        };
        let accepted = self
            .generate_with_retries(&prompt_ctx, &options)
            .await?;

        if options.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let distribution = answer_distribution(&accepted.questions);
        if is_degenerate(&distribution) {
            tracing::warn!(?distribution, "accepted quiz has a degenerate answer key");
        }

        let draft = QuizDraft {
            chapter_id: chapter.id,
            title: quiz_title(&chapter, language),
            questions: accepted.questions,
            created_by: request.requested_by,
            meta: GenerationMeta {
                language,
                strategy: strategy.kind(),
                corrupted: quality.corrupted,
                attempts: accepted.attempts,
                seed: accepted.prompt.seed,
                question_types: accepted
                    .prompt
                    .question_types
                    .iter()
                    .map(|t| t.as_str().to_string())
                    .collect(),
                recovered_partial: accepted.recovered,
                answer_distribution: distribution,
            },
        };

        match self.store.insert(&draft).await {
            Ok(quiz) => {
                tracing::info!(
                    quiz_id = %quiz.id,
                    questions = draft.questions.len(),
                    attempts = draft.meta.attempts,
                    "quiz stored"
                );
                Ok(QuizRecord::from_quiz(quiz, false))
            }
            Err(e) => Err(Error::PersistenceFailed {
                reason: e.to_string(),
                quiz: Box::new(draft),
            }),
        }
    }

    async fn generate_with_retries(
        &self,
        ctx: &PromptContext<'_>,
        options: &GenerationOptions,
    ) -> Result<Accepted> {
        let mut rng = StdRng::from_entropy();
        let max_attempts = MAX_RETRIES + 1;
        let mut last_defect: Option<GenerationDefect> = None;

        for attempt in 1..=max_attempts {
            if options.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let prompt = build_prompt(ctx, &mut rng);
            let request =
                CompletionRequest::json_object(&self.model_name, prompt.system.clone(), prompt.user.clone());
            let raw = self.call_model(&request, options).await?;

            let outcome = parse_response(&raw).and_then(|parsed| {
                validate(&parsed.document, ctx.language, ctx.technical)
                    .map(|questions| (questions, parsed.recovered))
            });

            match outcome {
                Ok((questions, recovered)) => {
                    tracing::debug!(attempt, seed = prompt.seed, "response accepted");
                    return Ok(Accepted {
                        questions,
                        prompt,
                        attempts: attempt,
                        recovered,
                    });
                }
                Err(defect) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        seed = prompt.seed,
                        defect = %defect,
                        "model response rejected"
                    );
                    last_defect = Some(defect);
                }
            }
        }

        Err(Error::GenerationValidationFailed {
            attempts: max_attempts,
            defect: last_defect.unwrap_or(GenerationDefect::MissingQuestions),
        })
    }

    async fn call_model(
        &self,
        request: &CompletionRequest,
        options: &GenerationOptions,
    ) -> Result<String> {
        tokio::select! {
            _ = options.cancel.cancelled() => Err(Error::Cancelled),
            res = tokio::time::timeout(options.timeout, self.model.complete(request)) => match res {
                Ok(Ok(raw)) => Ok(raw),
                Ok(Err(e @ Error::ModelCallFailed(_))) => Err(e),
                Ok(Err(other)) => Err(Error::ModelCallFailed(other.to_string())),
                Err(_) => Err(Error::ModelCallFailed(format!(
                    "no response within {}s",
                    options.timeout.as_secs_f32()
                ))),
            },
        }
    }
}

fn quiz_title(chapter: &Chapter, language: Language) -> String {
    let suffix = match language {
        Language::Kannada => "ರಸಪ್ರಶ್ನೆ",
        Language::Hindi => "प्रश्नोत्तरी",
        Language::English => "Quiz",
    };
    format!("{} - {}", chapter.display_name(language), suffix)
}
