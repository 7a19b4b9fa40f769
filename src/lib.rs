pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    access_service::PgAccessPolicy, ai_service::OpenAiClient, catalog_service::PgChapterCatalog,
    quiz_service::QuizService, quiz_store::PgQuizStore,
};
use axum::{
    routing::get,
    Router,
};
use reqwest::Client;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(config.model_timeout())
            .build()
            .unwrap_or_default();

        let model = OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.model_timeout(),
            http_client,
        );
        let quiz_service = QuizService::new(
            Arc::new(PgChapterCatalog::new(pool.clone())),
            Arc::new(PgAccessPolicy::new(pool.clone())),
            Arc::new(PgQuizStore::new(pool)),
            Arc::new(model),
            config.openai_model.clone(),
            config.model_timeout(),
        );

        Self { quiz_service }
    }

    pub fn from_service(quiz_service: QuizService) -> Self {
        Self { quiz_service }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route(
            "/api/chapters/:id/quiz",
            get(routes::quiz::get_quiz).post(routes::quiz::generate_quiz),
        )
        .with_state(state)
}
