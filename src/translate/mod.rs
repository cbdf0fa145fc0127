// Translation backends
//
// - Google: public Google Translate endpoint
// - Ollama: local LLM through the Ollama generate API
//
// Long text is split into chunks by `translate_text` before reaching a backend.

pub mod common;
pub mod google;
pub mod ollama;

use async_trait::async_trait;

pub use common::*;
use crate::config::{TranslateConfig, TranslationProvider};
use crate::error::Result;

/// Main trait for translation operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one chunk of text
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn Translator>> {
        match config.provider {
            TranslationProvider::Google => Ok(Box::new(google::GoogleTranslator::new(config)?)),
            TranslationProvider::Ollama => Ok(Box::new(ollama::OllamaTranslator::new(config)?)),
        }
    }
}
