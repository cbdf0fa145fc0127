use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{build_client, Translator};
use crate::config::TranslateConfig;
use crate::error::{Result, ScriptError};

/// Translator using the public Google Translate endpoint
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            endpoint: config.endpoint().to_string(),
        })
    }
}

/// Pull the translated text out of a `translate_a/single` reply.
///
/// The reply is a nested array whose first element lists
/// `[translated, original, ...]` pairs, one per sentence.
pub fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ScriptError::Translation(format!("Failed to parse response: {}", e)))?;

    let sentences = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ScriptError::Translation("Unexpected response shape".to_string()))?;

    let text: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(ScriptError::Translation("Empty translation received".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String> {
        debug!("Sending translation request to: {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| ScriptError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ScriptError::Translation(format!(
                "Translate API error {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScriptError::Translation(format!("Failed to read response: {}", e)))?;
        parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_sentence_response() {
        let body = r#"[[["안녕하세요. ","Hello. ",null,null,10],["반갑습니다.","Nice to meet you.",null,null,10]],null,"en"]"#;
        assert_eq!(parse_response(body).unwrap(), "안녕하세요. 반갑습니다.");
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(parse_response(r#"{"error": "quota"}"#).is_err());
        assert!(parse_response(r#"[[]]"#).is_err());
        assert!(parse_response("not json").is_err());
    }

    #[test]
    fn test_endpoint_from_config() {
        let translator = GoogleTranslator::new(TranslateConfig::default()).unwrap();
        assert_eq!(translator.endpoint, crate::config::DEFAULT_GOOGLE_ENDPOINT);
        assert_eq!(translator.name(), "google");
    }
}
