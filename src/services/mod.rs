pub mod access_service;
pub mod ai_service;
pub mod catalog_service;
pub mod content_quality;
pub mod language_resolver;
pub mod prompt_builder;
pub mod quiz_service;
pub mod quiz_store;
pub mod quiz_validator;
pub mod response_parser;
pub mod strategy;
