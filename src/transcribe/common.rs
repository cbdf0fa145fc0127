use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ScriptError};
use crate::text::clean_text;

/// Abstract transcription segment that is service-agnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractTranscriptionSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

/// Abstract transcription result that is service-agnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractTranscription {
    pub text: String,
    pub segments: Vec<AbstractTranscriptionSegment>,
    /// Detected language code, `unknown` when the tool reported none
    pub language: String,
    pub duration: Option<f64>,
}

impl AbstractTranscription {
    /// Whitespace-normalized full text. Falls back to the joined segments
    /// when the tool left the top-level text empty.
    pub fn cleaned_text(&self) -> String {
        let text = clean_text(&self.text);
        if !text.is_empty() {
            return text;
        }
        let joined: Vec<&str> = self.segments.iter().map(|s| s.text.as_str()).collect();
        clean_text(&joined.join(" "))
    }
}

/// Trait for converting service-specific transcription formats to abstract format
pub trait TranscriptionMapper<T> {
    fn to_abstract_transcription(service_result: T) -> Result<AbstractTranscription>;
}

/// Read and parse the JSON document a recognizer wrote to disk
pub fn read_json_output<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScriptError::Recognition(format!("Failed to read output {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| ScriptError::Recognition(format!("Failed to parse recognizer JSON: {}", e)))
}

pub(crate) fn language_or_unknown(language: Option<String>) -> String {
    language
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
