use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{build_client, clean_translation_response, Translator};
use crate::config::TranslateConfig;
use crate::error::{Result, ScriptError};
use crate::language::language_name;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translator backed by a local Ollama model
pub struct OllamaTranslator {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            endpoint: config.endpoint().trim_end_matches('/').to_string(),
            model: config.model,
        })
    }

    fn build_prompt(&self, text: &str, source_language: &str, target_language: &str) -> String {
        let source_name = language_name(source_language);
        let target_name = language_name(target_language);

        format!(
            "You are a professional translator.\n\
             \n\
             Translate the following {} text to {} (language code: {}).\n\
             Keep the meaning and tone; do not summarize or add explanations.\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             \n\
             [Text to translate]\n\
             {}\n",
            source_name, target_name, target_language, target_name, text
        )
    }
}

/// Extract the translation from the model's reply: the JSON envelope when
/// present, otherwise the cleaned raw text.
pub fn parse_generated(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScriptError::Translation("Empty translation received".to_string()));
    }

    if let Ok(result) = serde_json::from_str::<TranslationResult>(raw) {
        return Ok(result.text.trim().to_string());
    }

    Ok(clean_translation_response(raw))
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(text, source_language, target_language),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ScriptError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScriptError::Translation(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ScriptError::Translation(format!("Failed to parse response: {}", e)))?;

        debug!("Raw Ollama response: {}", generated.response);
        parse_generated(&generated.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
